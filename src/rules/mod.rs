//! Interception rule implementations and the ordered rule registry.
//!
//! Adding a new rule kind: implement `InterceptionRule`, add a `kind`
//! variant to `config::RuleDef`, and wire it in `config::build_registry`.

pub mod capability;
pub mod config;
pub mod deny_toggle;

use crate::core::error::GatehouseError;
use crate::core::interceptor::{self, InterceptionRule};

/// Ordered, validated collection of interception rules.
///
/// The registry is assembled once at startup and never mutated during a
/// pass. Registration order is application order; later rules override
/// earlier ones on the same route/requirement key.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn InterceptionRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry::default()
    }

    /// Register a rule, validating its declared shape up front.
    ///
    /// Misconfigured requirements fail here, not mid-pass.
    pub fn register(&mut self, rule: Box<dyn InterceptionRule>) -> Result<(), GatehouseError> {
        if rule.name().is_empty() {
            return Err(GatehouseError::RegistrationError(
                "rule name must not be empty".to_string(),
            ));
        }
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return Err(GatehouseError::RegistrationError(format!(
                "duplicate rule name '{}'",
                rule.name()
            )));
        }
        interceptor::validate_target(rule.target())?;
        interceptor::validate_requirement_key(rule.requirement_key())?;
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Box<dyn InterceptionRule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
