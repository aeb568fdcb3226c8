use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatehouseError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Route table error: {0}")]
    RouteTableError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Rule registration error: {0}")]
    RegistrationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Failure raised by a rule's predicate during evaluation.
///
/// Rule failures are isolated by the interceptor: they are recorded in the
/// pass report and never abort the remaining rules.
#[derive(Error, Debug, Clone)]
#[error("rule evaluation failed: {0}")]
pub struct RuleError(pub String);

impl RuleError {
    pub fn new(msg: impl Into<String>) -> Self {
        RuleError(msg.into())
    }
}
