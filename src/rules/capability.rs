//! Capability-gated requirement attachment.
//!
//! Unconditionally attaches a custom requirement key to the target route
//! with the `"TRUE"` sentinel. The key names an external access checker
//! that the host's access-checking phase evaluates later against the
//! session account; Gatehouse only plants the hook. The canonical
//! deployment attaches `_userprotect_role_access_check` to the role
//! delegation edit form.

use crate::core::context::AlterContext;
use crate::core::error::{GatehouseError, RuleError};
use crate::core::interceptor::{self, InterceptionRule, Rewrite};
use crate::core::route::{ACCESS_ALLOWED, RouteDefinition};

#[derive(Debug, Clone)]
pub struct CapabilityRule {
    name: String,
    target: String,
    requirement: String,
}

impl CapabilityRule {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        requirement: impl Into<String>,
    ) -> Result<Self, GatehouseError> {
        let rule = CapabilityRule {
            name: name.into(),
            target: target.into(),
            requirement: requirement.into(),
        };
        interceptor::validate_target(&rule.target)?;
        interceptor::validate_requirement_key(&rule.requirement)?;
        Ok(rule)
    }
}

impl InterceptionRule for CapabilityRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn requirement_key(&self) -> &str {
        &self.requirement
    }

    fn evaluate(
        &self,
        _route: &RouteDefinition,
        _ctx: &AlterContext,
    ) -> Result<Option<Rewrite>, RuleError> {
        // Context is deliberately unused: the attached checker consults the
        // account later, during the host's access phase.
        Ok(Some(Rewrite::new(&self.requirement, ACCESS_ALLOWED)))
    }
}
