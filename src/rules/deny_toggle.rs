//! Unconditional deny toggle.
//!
//! If a named boolean configuration flag is set, the target route's core
//! access requirement is rewritten to the `"FALSE"` sentinel, independent
//! of the current account. The canonical deployment of this shape locks
//! down `user.pass` behind a `disable_password_reset` flag.

use crate::core::context::AlterContext;
use crate::core::error::{GatehouseError, RuleError};
use crate::core::interceptor::{self, InterceptionRule, Rewrite};
use crate::core::route::{ACCESS_DENIED, REQUIREMENT_ACCESS, RouteDefinition};

#[derive(Debug, Clone)]
pub struct DenyToggleRule {
    name: String,
    target: String,
    flag: String,
}

impl DenyToggleRule {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        flag: impl Into<String>,
    ) -> Result<Self, GatehouseError> {
        let rule = DenyToggleRule {
            name: name.into(),
            target: target.into(),
            flag: flag.into(),
        };
        interceptor::validate_target(&rule.target)?;
        if rule.flag.is_empty() {
            return Err(GatehouseError::RegistrationError(
                "deny-toggle rule requires a configuration flag name".to_string(),
            ));
        }
        Ok(rule)
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }
}

impl InterceptionRule for DenyToggleRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn requirement_key(&self) -> &str {
        REQUIREMENT_ACCESS
    }

    fn evaluate(
        &self,
        _route: &RouteDefinition,
        ctx: &AlterContext,
    ) -> Result<Option<Rewrite>, RuleError> {
        if ctx.config.get_flag(&self.flag) {
            Ok(Some(Rewrite::new(REQUIREMENT_ACCESS, ACCESS_DENIED)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ConfigStore;

    fn ctx_with_flag(flag: &str, value: &str) -> AlterContext {
        let mut config = ConfigStore::new();
        config.set(flag, value);
        AlterContext {
            config,
            ..AlterContext::default()
        }
    }

    #[test]
    fn test_flag_set_denies() {
        let rule =
            DenyToggleRule::new("password-reset-lockdown", "user.pass", "disable_password_reset")
                .unwrap();
        let route = RouteDefinition::new("/user/password");
        let rewrite = rule
            .evaluate(&route, &ctx_with_flag("disable_password_reset", "true"))
            .unwrap();
        assert_eq!(
            rewrite,
            Some(Rewrite::new(REQUIREMENT_ACCESS, ACCESS_DENIED))
        );
    }

    #[test]
    fn test_flag_unset_is_no_effect() {
        let rule =
            DenyToggleRule::new("password-reset-lockdown", "user.pass", "disable_password_reset")
                .unwrap();
        let route = RouteDefinition::new("/user/password");
        assert_eq!(rule.evaluate(&route, &AlterContext::default()).unwrap(), None);
        assert_eq!(
            rule.evaluate(&route, &ctx_with_flag("disable_password_reset", "false"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_empty_flag_rejected() {
        assert!(DenyToggleRule::new("x", "user.pass", "").is_err());
    }
}
