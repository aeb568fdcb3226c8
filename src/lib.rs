//! Gatehouse: rule-driven route access rewriting
//!
//! **Gatehouse rewrites route access requirements before the routing table
//! is compiled.**
//!
//! A host routing subsystem assembles a table of named routes, each
//! carrying a map of access-requirement key/value pairs. Gatehouse takes a
//! mutable borrow of that table for the duration of one alteration pass,
//! applies an ordered list of interception rules, and hands the table back
//! for compilation. Rules only ever set requirement entries; they never
//! create or delete routes and never touch paths or handlers.
//!
//! # Core Properties
//!
//! - **Idempotent**: requirement values are set, not appended or toggled;
//!   re-running a pass against unchanged configuration is a no-op
//! - **Order-dependent**: later rules override earlier ones on the same
//!   route/requirement key
//! - **Failure-isolated**: a rule whose predicate fails is recorded and
//!   skipped; the remaining rules still run
//! - **Silent on missing routes**: a target absent from the table is not
//!   an error; deployments differ in which routes exist
//!
//! # Library Use
//!
//! ```
//! use gatehouse::core::context::{AlterContext, ConfigStore};
//! use gatehouse::core::interceptor;
//! use gatehouse::core::route::{RouteDefinition, RouteTable};
//! use gatehouse::rules::RuleRegistry;
//! use gatehouse::rules::deny_toggle::DenyToggleRule;
//!
//! let mut table = RouteTable::new();
//! table.insert("user.pass", RouteDefinition::new("/user/password"));
//!
//! let mut registry = RuleRegistry::new();
//! registry
//!     .register(Box::new(
//!         DenyToggleRule::new(
//!             "password-reset-lockdown",
//!             "user.pass",
//!             "disable_password_reset",
//!         )
//!         .unwrap(),
//!     ))
//!     .unwrap();
//!
//! let mut config = ConfigStore::new();
//! config.set("disable_password_reset", "true");
//! let ctx = AlterContext { config, ..AlterContext::default() };
//!
//! let report = interceptor::apply(&mut table, registry.rules(), &ctx);
//! assert_eq!(report.applied, 1);
//! assert_eq!(table.get("user.pass").unwrap().requirement("_access"), Some("FALSE"));
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: interceptor, route table model, context, report, recorder
//! - [`rules`]: built-in rule shapes, config loading, the ordered registry

pub mod core;
pub mod rules;

use crate::core::error::GatehouseError;
use crate::core::report::{OutcomeStatus, PassReport};
use crate::core::route::RouteTable;
use crate::core::{interceptor, recorder};
use crate::rules::config as rule_config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "gatehouse",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rule-driven route access rewriter: applies ordered interception rules to a route table before compilation."
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an alteration pass over a route table
    Apply(ApplyCli),

    /// List routes and their access requirements
    Routes(RoutesCli),

    /// List registered rules in application order
    Rules(RulesCli),

    /// Render previously recorded pass events
    Log(LogCli),
}

#[derive(clap::Args, Debug)]
struct ApplyCli {
    /// Route table JSON file
    #[clap(long)]
    routes: PathBuf,
    /// Rule/flag configuration (gatehouse.toml)
    #[clap(long)]
    config: PathBuf,
    /// Output format: 'text' or 'json'
    #[clap(long, default_value = "text")]
    format: String,
    /// Write the rewritten table to this file
    #[clap(long)]
    write: Option<PathBuf>,
    /// Append per-rule outcome events to this JSONL log
    #[clap(long)]
    log: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct RoutesCli {
    /// Route table JSON file
    #[clap(long)]
    routes: PathBuf,
    /// Only show routes whose name matches this regex
    #[clap(long)]
    filter: Option<String>,
}

#[derive(clap::Args, Debug)]
struct RulesCli {
    /// Rule/flag configuration (gatehouse.toml)
    #[clap(long)]
    config: PathBuf,
    /// Output format: 'text' or 'json'
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(clap::Args, Debug)]
struct LogCli {
    /// Event log path (JSONL)
    #[clap(long)]
    path: PathBuf,
    /// Output format: 'text' or 'json'
    #[clap(long, default_value = "text")]
    format: String,
    /// Limit to N most recent events
    #[clap(long, default_value = "100")]
    limit: usize,
}

pub fn run() -> Result<(), GatehouseError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Apply(apply_cli) => run_apply(apply_cli),
        Command::Routes(routes_cli) => run_routes(routes_cli),
        Command::Rules(rules_cli) => run_rules(rules_cli),
        Command::Log(log_cli) => run_log(log_cli),
    }
}

fn run_apply(cli: ApplyCli) -> Result<(), GatehouseError> {
    let mut table = RouteTable::load(&cli.routes)?;
    let config = rule_config::load_config(&cli.config)?;
    let registry = rule_config::build_registry(&config)?;
    let ctx = crate::core::context::AlterContext {
        config: rule_config::flag_store(&config),
        ..Default::default()
    };

    let report = interceptor::apply(&mut table, registry.rules(), &ctx);

    if let Some(log_path) = &cli.log {
        let pass_id = recorder::append_pass(log_path, &report)?;
        if cli.format != "json" {
            println!("Pass events recorded: {} ({})", log_path.display(), pass_id);
        }
    }

    if let Some(out) = &cli.write {
        table.store(out)?;
        if cli.format != "json" {
            println!("Rewritten table written to: {}", out.display());
        }
    }

    if cli.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .map_err(|e| GatehouseError::ValidationError(e.to_string()))?
        );
    } else {
        render_report_text(&report);
    }

    Ok(())
}

fn render_report_text(report: &PassReport) {
    println!();
    println!("ALTERATION PASS");
    println!("---------------------------------------------------------------");
    for outcome in &report.outcomes {
        let status = match outcome.status {
            OutcomeStatus::Applied => "applied".bright_green(),
            OutcomeStatus::NoEffect => "no-effect".bright_black(),
            OutcomeStatus::SkippedMissingRoute => "skipped".bright_yellow(),
            OutcomeStatus::Failed => "FAILED".bright_red().bold(),
        };
        let detail = match (&outcome.status, &outcome.detail) {
            (OutcomeStatus::Applied, Some(v)) => format!("{} = {}", outcome.requirement, v),
            (OutcomeStatus::Failed, Some(msg)) => msg.clone(),
            _ => String::new(),
        };
        println!(
            "  {} {:<28} {:<32} {}",
            status,
            outcome.rule.bright_white(),
            outcome.target,
            detail.bright_black()
        );
    }
    println!("---------------------------------------------------------------");
    println!(
        "  {} applied, {} skipped, {} failed",
        report.applied, report.skipped, report.failed
    );
    println!("  table digest: {}", report.table_digest.bright_black());
    if !report.all_clean() {
        println!(
            "  {} one or more rules failed; their targets were left unmodified",
            "⚠".bright_yellow()
        );
    }
    println!();
}

fn run_routes(cli: RoutesCli) -> Result<(), GatehouseError> {
    let table = RouteTable::load(&cli.routes)?;
    let filter = match &cli.filter {
        Some(pattern) => Some(
            regex::Regex::new(pattern)
                .map_err(|e| GatehouseError::ValidationError(format!("bad filter: {}", e)))?,
        ),
        None => None,
    };

    for (name, route) in table.iter() {
        if let Some(re) = &filter {
            if !re.is_match(name) {
                continue;
            }
        }
        println!("{}  {}", name.bright_white(), route.path.bright_black());
        for (key, value) in &route.requirements {
            println!("    {} = {}", key, value);
        }
    }
    Ok(())
}

fn run_rules(cli: RulesCli) -> Result<(), GatehouseError> {
    let config = rule_config::load_config(&cli.config)?;
    // Build (and thereby validate) the registry even for a listing, so a
    // malformed file is reported here rather than at apply time.
    let registry = rule_config::build_registry(&config)?;

    if cli.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&config.rules)
                .map_err(|e| GatehouseError::ValidationError(e.to_string()))?
        );
    } else {
        for (idx, rule) in registry.rules().iter().enumerate() {
            println!(
                "{:>3}. {:<28} target={} requirement={}",
                idx + 1,
                rule.name().bright_white(),
                rule.target(),
                rule.requirement_key().bright_black()
            );
        }
    }
    Ok(())
}

fn run_log(cli: LogCli) -> Result<(), GatehouseError> {
    if !cli.path.exists() {
        return Err(GatehouseError::NotFound(format!(
            "event log not found: {}",
            cli.path.display()
        )));
    }
    let events = recorder::read_events(&cli.path, cli.limit)?;

    if cli.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&events)
                .map_err(|e| GatehouseError::ValidationError(e.to_string()))?
        );
    } else {
        println!(
            "{:<14} {:<28} {:<28} {:<32} {}",
            "TIME", "PASS", "RULE", "TARGET", "STATUS"
        );
        for ev in &events {
            println!(
                "{:<14} {:<28} {:<28} {:<32} {}",
                ev.ts, ev.pass_id, ev.rule, ev.target, ev.status
            );
        }
        println!("{} event(s)", events.len());
    }
    Ok(())
}
