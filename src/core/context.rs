//! Read-only alteration context.
//!
//! Rules receive configuration state and account identity through an
//! explicit context object rather than reaching into process-wide
//! singletons. The context is read-only for the whole pass: rules must not
//! mutate shared state as a side effect of being evaluated, which keeps
//! repeated compilation passes deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only key/value configuration store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigStore {
    values: BTreeMap<String, String>,
}

impl ConfigStore {
    pub fn new() -> Self {
        ConfigStore::default()
    }

    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        ConfigStore { values }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Boolean interpretation of a flag. Absent flags read as false.
    pub fn get_flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(v) => matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
            None => false,
        }
    }
}

/// The account the host resolved for the current session.
///
/// Gatehouse never interprets capabilities itself; capability-gated rules
/// attach a requirement key for the host's access-checking phase and leave
/// the actual check to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub authenticated: bool,
}

impl Account {
    pub fn anonymous() -> Self {
        Account {
            id: "0".to_string(),
            roles: vec!["anonymous".to_string()],
            authenticated: false,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Everything a rule may consult while deciding a rewrite.
#[derive(Debug, Clone, Default)]
pub struct AlterContext {
    pub config: ConfigStore,
    pub account: Account,
}

impl AlterContext {
    pub fn new(config: ConfigStore, account: Account) -> Self {
        AlterContext { config, account }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_interpretation() {
        let mut config = ConfigStore::new();
        config.set("disable_password_reset", "true");
        config.set("verbose", "0");
        config.set("padded", " Yes ");

        assert!(config.get_flag("disable_password_reset"));
        assert!(!config.get_flag("verbose"));
        assert!(config.get_flag("padded"));
        assert!(!config.get_flag("missing"));
    }

    #[test]
    fn test_anonymous_account() {
        let account = Account::anonymous();
        assert!(!account.authenticated);
        assert!(account.has_role("anonymous"));
        assert!(!account.has_role("administrator"));
    }
}
