fn main() {
    if let Err(e) = gatehouse::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
