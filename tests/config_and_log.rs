use gatehouse::core::context::AlterContext;
use gatehouse::core::interceptor;
use gatehouse::core::recorder;
use gatehouse::core::route::{RouteDefinition, RouteTable};
use gatehouse::rules::config::{build_registry, flag_store, load_config};
use tempfile::tempdir;

const CONFIG: &str = r#"
[flags]
disable_password_reset = "true"

[[rule]]
name = "password-reset-lockdown"
kind = "deny-toggle"
route = "user.pass"
flag = "disable_password_reset"

[[rule]]
name = "role-edit-guard"
kind = "capability"
route = "role_delegation.edit_form"
requirement = "_userprotect_role_access_check"
"#;

#[test]
fn test_file_driven_pass_end_to_end() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("gatehouse.toml");
    std::fs::write(&config_path, CONFIG).unwrap();

    let routes_path = tmp.path().join("routes.json");
    let mut table = RouteTable::new();
    table.insert("user.pass", RouteDefinition::new("/user/password"));
    table.insert(
        "role_delegation.edit_form",
        RouteDefinition::new("/user/{user}/roles"),
    );
    table.store(&routes_path).unwrap();

    let config = load_config(&config_path).unwrap();
    let registry = build_registry(&config).unwrap();
    let ctx = AlterContext {
        config: flag_store(&config),
        ..Default::default()
    };

    let mut loaded = RouteTable::load(&routes_path).unwrap();
    let report = interceptor::apply(&mut loaded, registry.rules(), &ctx);

    assert_eq!(report.applied, 2);
    assert_eq!(
        loaded.get("user.pass").unwrap().requirement("_access"),
        Some("FALSE")
    );
    assert_eq!(
        loaded
            .get("role_delegation.edit_form")
            .unwrap()
            .requirement("_userprotect_role_access_check"),
        Some("TRUE")
    );

    // Rewritten table survives a store/load round trip.
    let out_path = tmp.path().join("routes.altered.json");
    loaded.store(&out_path).unwrap();
    let reloaded = RouteTable::load(&out_path).unwrap();
    assert_eq!(reloaded, loaded);
}

#[test]
fn test_config_order_is_application_order() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("gatehouse.toml");
    std::fs::write(&config_path, CONFIG).unwrap();

    let config = load_config(&config_path).unwrap();
    let registry = build_registry(&config).unwrap();
    let names: Vec<&str> = registry.rules().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["password-reset-lockdown", "role-edit-guard"]);
}

#[test]
fn test_malformed_requirement_key_fails_at_load() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("gatehouse.toml");
    std::fs::write(
        &config_path,
        r#"
[[rule]]
name = "bad"
kind = "capability"
route = "user.pass"
requirement = "no_leading_underscore"
"#,
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    assert!(build_registry(&config).is_err());
}

#[test]
fn test_pass_events_are_recorded_per_rule() {
    let tmp = tempdir().unwrap();
    let log_path = tmp.path().join("gatehouse.events.jsonl");
    let config_path = tmp.path().join("gatehouse.toml");
    std::fs::write(&config_path, CONFIG).unwrap();

    let config = load_config(&config_path).unwrap();
    let registry = build_registry(&config).unwrap();
    let ctx = AlterContext {
        config: flag_store(&config),
        ..Default::default()
    };

    let mut table = RouteTable::new();
    table.insert("user.pass", RouteDefinition::new("/user/password"));

    let report = interceptor::apply(&mut table, registry.rules(), &ctx);
    let pass_id = recorder::append_pass(&log_path, &report).unwrap();

    let events = recorder::read_events(&log_path, 100).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.pass_id == pass_id));
    assert!(events.iter().all(|e| e.table_digest == report.table_digest));

    let statuses: Vec<&str> = events.iter().map(|e| e.status.as_str()).collect();
    // Route for the capability rule is absent from this table.
    assert_eq!(statuses, vec!["applied", "skipped (route missing)"]);

    // A second pass appends, never truncates.
    recorder::append_pass(&log_path, &report).unwrap();
    assert_eq!(recorder::read_events(&log_path, 100).unwrap().len(), 4);
}
