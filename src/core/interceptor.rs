//! Route access interceptor.
//!
//! Applies an ordered list of interception rules to a route table during a
//! single compilation pass. The pass only ever rewrites requirement
//! entries: routes are never created, deleted, or otherwise reshaped.
//!
//! Failure isolation: a rule whose predicate fails is recorded in the pass
//! report and the remaining rules still run. One broken rule must not break
//! all routing.

use crate::core::context::AlterContext;
use crate::core::error::{GatehouseError, RuleError};
use crate::core::report::{OutcomeStatus, PassReport, RuleOutcome};
use crate::core::route::{RouteDefinition, RouteTable};

/// A requirement rewrite decided by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub requirement: String,
    pub value: String,
}

impl Rewrite {
    pub fn new(requirement: impl Into<String>, value: impl Into<String>) -> Self {
        Rewrite {
            requirement: requirement.into(),
            value: value.into(),
        }
    }
}

/// One unit of route-requirement interception logic.
///
/// Rules are registered once at startup, in order, and never mutated
/// afterwards. Later rules override earlier rules on the same
/// route/requirement key. Rules must be read-only with respect to the
/// context they are handed.
pub trait InterceptionRule: Send + Sync {
    /// Identifier used in reports and event logs.
    fn name(&self) -> &str;

    /// Name of the route this rule addresses. A route absent from the
    /// table is skipped silently; it may not exist in every deployment.
    fn target(&self) -> &str;

    /// The requirement key this rule sets, declared up front so
    /// registration can validate its shape before any pass runs.
    fn requirement_key(&self) -> &str;

    /// Decide whether to rewrite the target route's requirement.
    fn evaluate(
        &self,
        route: &RouteDefinition,
        ctx: &AlterContext,
    ) -> Result<Option<Rewrite>, RuleError>;
}

/// Apply `rules` to `table` in order, returning a per-rule outcome report.
///
/// The interceptor itself raises no errors: missing routes are skipped,
/// failing rules are isolated, and the report carries what happened where.
pub fn apply(
    table: &mut RouteTable,
    rules: &[Box<dyn InterceptionRule>],
    ctx: &AlterContext,
) -> PassReport {
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let target = rule.target();
        let Some(route) = table.get(target) else {
            outcomes.push(outcome(rule.as_ref(), OutcomeStatus::SkippedMissingRoute, None));
            continue;
        };

        match rule.evaluate(route, ctx) {
            Ok(Some(rewrite)) => {
                // Re-borrow mutably only once the rule has decided; the
                // predicate sees an immutable view of the route.
                if let Some(route) = table.get_mut(target) {
                    route.set_requirement(&rewrite.requirement, &rewrite.value);
                }
                outcomes.push(RuleOutcome {
                    rule: rule.name().to_string(),
                    target: target.to_string(),
                    requirement: rewrite.requirement.clone(),
                    status: OutcomeStatus::Applied,
                    detail: Some(rewrite.value),
                });
            }
            Ok(None) => {
                outcomes.push(outcome(rule.as_ref(), OutcomeStatus::NoEffect, None));
            }
            Err(e) => {
                outcomes.push(outcome(
                    rule.as_ref(),
                    OutcomeStatus::Failed,
                    Some(e.to_string()),
                ));
            }
        }
    }

    PassReport::from_outcomes(outcomes, table)
}

fn outcome(rule: &dyn InterceptionRule, status: OutcomeStatus, detail: Option<String>) -> RuleOutcome {
    RuleOutcome {
        rule: rule.name().to_string(),
        target: rule.target().to_string(),
        requirement: rule.requirement_key().to_string(),
        status,
        detail,
    }
}

/// Validate a requirement key at registration time.
///
/// Host convention: requirement keys are underscore-prefixed machine names
/// (`_access`, `_permission`, custom `_*_access_check` keys). A rule that
/// declares a malformed key is a programming error and fails fast here
/// rather than at apply time.
pub fn validate_requirement_key(key: &str) -> Result<(), GatehouseError> {
    if key.is_empty() {
        return Err(GatehouseError::RegistrationError(
            "requirement key must not be empty".to_string(),
        ));
    }
    if !key.starts_with('_') {
        return Err(GatehouseError::RegistrationError(format!(
            "requirement key '{}' must start with '_'",
            key
        )));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(GatehouseError::RegistrationError(format!(
            "requirement key '{}' must not contain whitespace",
            key
        )));
    }
    Ok(())
}

/// Validate a sentinel requirement value at registration time.
pub fn validate_requirement_value(value: &str) -> Result<(), GatehouseError> {
    if value.is_empty() {
        return Err(GatehouseError::RegistrationError(
            "requirement value must not be empty".to_string(),
        ));
    }
    if value.trim() != value {
        return Err(GatehouseError::RegistrationError(format!(
            "requirement value '{}' must not carry surrounding whitespace",
            value
        )));
    }
    Ok(())
}

/// Validate a target route name at registration time.
pub fn validate_target(target: &str) -> Result<(), GatehouseError> {
    if target.is_empty() {
        return Err(GatehouseError::RegistrationError(
            "rule target route name must not be empty".to_string(),
        ));
    }
    Ok(())
}
