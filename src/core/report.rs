//! Pass report: per-rule outcomes plus a digest of the resulting table.

use crate::core::route::RouteTable;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What happened when one rule was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The rule rewrote a requirement on its target route.
    Applied,
    /// The rule evaluated cleanly but decided not to rewrite anything.
    NoEffect,
    /// The target route is not in the table; not an error.
    SkippedMissingRoute,
    /// The rule's predicate failed; isolated, pass continued.
    Failed,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::NoEffect => write!(f, "no-effect"),
            Self::SkippedMissingRoute => write!(f, "skipped (route missing)"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Outcome record for a single rule application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub target: String,
    pub requirement: String,
    pub status: OutcomeStatus,
    /// Rewritten value for `Applied`, failure message for `Failed`.
    pub detail: Option<String>,
}

/// Summary of one alteration pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassReport {
    pub outcomes: Vec<RuleOutcome>,
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
    /// SHA-256 over the table's sorted (route, key, value) requirement
    /// triples. Equal digests across repeated passes demonstrate that the
    /// rule set is idempotent against the current configuration.
    pub table_digest: String,
}

impl PassReport {
    pub fn from_outcomes(outcomes: Vec<RuleOutcome>, table: &RouteTable) -> Self {
        let applied = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Applied)
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::SkippedMissingRoute)
            .count();
        PassReport {
            outcomes,
            applied,
            failed,
            skipped,
            table_digest: requirements_digest(table),
        }
    }

    pub fn all_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Digest of the table's requirement state only; paths and other opaque
/// attributes are excluded because a pass never touches them.
pub fn requirements_digest(table: &RouteTable) -> String {
    let mut hasher = Sha256::new();
    for (name, route) in table.iter() {
        for (key, value) in &route.requirements {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            hasher.update(key.as_bytes());
            hasher.update([0u8]);
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        }
    }
    format!("{:x}", hasher.finalize())
}
