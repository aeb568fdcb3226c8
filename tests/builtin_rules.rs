use gatehouse::core::context::{Account, AlterContext, ConfigStore};
use gatehouse::core::interceptor;
use gatehouse::core::route::{REQUIREMENT_ACCESS, RouteDefinition, RouteTable};
use gatehouse::rules::RuleRegistry;
use gatehouse::rules::capability::CapabilityRule;
use gatehouse::rules::deny_toggle::DenyToggleRule;

fn table_with_user_pass() -> RouteTable {
    let mut table = RouteTable::new();
    table.insert("user.pass", RouteDefinition::new("/user/password"));
    table
}

fn deny_toggle_rules() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry
        .register(Box::new(
            DenyToggleRule::new(
                "password-reset-lockdown",
                "user.pass",
                "disable_password_reset",
            )
            .unwrap(),
        ))
        .unwrap();
    registry
}

#[test]
fn test_deny_toggle_flag_true_denies_access() {
    let mut table = table_with_user_pass();
    let mut config = ConfigStore::new();
    config.set("disable_password_reset", "true");
    let ctx = AlterContext::new(config, Account::default());

    let registry = deny_toggle_rules();
    let report = interceptor::apply(&mut table, registry.rules(), &ctx);

    assert_eq!(report.applied, 1);
    assert_eq!(
        table.get("user.pass").unwrap().requirement(REQUIREMENT_ACCESS),
        Some("FALSE")
    );
}

#[test]
fn test_deny_toggle_flag_false_leaves_requirement_unset() {
    let mut table = table_with_user_pass();
    let mut config = ConfigStore::new();
    config.set("disable_password_reset", "false");
    let ctx = AlterContext::new(config, Account::default());

    let registry = deny_toggle_rules();
    let report = interceptor::apply(&mut table, registry.rules(), &ctx);

    assert_eq!(report.applied, 0);
    assert_eq!(
        table.get("user.pass").unwrap().requirement(REQUIREMENT_ACCESS),
        None
    );
}

#[test]
fn test_deny_toggle_preserves_string_sentinel() {
    // The denied value is the exact string "FALSE"; downstream access
    // checkers match on it, so it must never become a boolean.
    let mut table = table_with_user_pass();
    let mut config = ConfigStore::new();
    config.set("disable_password_reset", "1");
    let ctx = AlterContext::new(config, Account::default());

    let registry = deny_toggle_rules();
    interceptor::apply(&mut table, registry.rules(), &ctx);

    let value = table
        .get("user.pass")
        .unwrap()
        .requirement(REQUIREMENT_ACCESS)
        .unwrap();
    assert_eq!(value, "FALSE");
}

#[test]
fn test_capability_rule_attaches_for_any_account() {
    let mut registry = RuleRegistry::new();
    registry
        .register(Box::new(
            CapabilityRule::new(
                "role-edit-guard",
                "role_delegation.edit_form",
                "_userprotect_role_access_check",
            )
            .unwrap(),
        ))
        .unwrap();

    for account in [
        Account::anonymous(),
        Account {
            id: "1".into(),
            roles: vec!["administrator".into()],
            authenticated: true,
        },
    ] {
        let mut table = RouteTable::new();
        table.insert(
            "role_delegation.edit_form",
            RouteDefinition::new("/user/{user}/roles"),
        );
        let ctx = AlterContext::new(ConfigStore::new(), account);
        let report = interceptor::apply(&mut table, registry.rules(), &ctx);

        assert_eq!(report.applied, 1);
        assert_eq!(
            table
                .get("role_delegation.edit_form")
                .unwrap()
                .requirement("_userprotect_role_access_check"),
            Some("TRUE")
        );
    }
}
