//! Rule/flag configuration loading.
//!
//! The CLI surface assembles its registry and configuration store from a
//! single `gatehouse.toml`:
//!
//! ```toml
//! [flags]
//! disable_password_reset = "true"
//!
//! [[rule]]
//! name = "password-reset-lockdown"
//! kind = "deny-toggle"
//! route = "user.pass"
//! flag = "disable_password_reset"
//!
//! [[rule]]
//! name = "role-edit-guard"
//! kind = "capability"
//! route = "role_delegation.edit_form"
//! requirement = "_userprotect_role_access_check"
//! ```
//!
//! Library users register rules directly and never need this file.

use crate::core::context::ConfigStore;
use crate::core::error::GatehouseError;
use crate::rules::RuleRegistry;
use crate::rules::capability::CapabilityRule;
use crate::rules::deny_toggle::DenyToggleRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A rule definition from gatehouse.toml.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleDef {
    pub name: String,
    pub kind: String,
    pub route: String,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub requirement: Option<String>,
}

/// The gatehouse.toml config structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatehouseConfig {
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
}

pub fn load_config(path: &Path) -> Result<GatehouseConfig, GatehouseError> {
    let content = std::fs::read_to_string(path).map_err(GatehouseError::IoError)?;
    toml::from_str(&content)
        .map_err(|e| GatehouseError::ConfigError(format!("{}: {}", path.display(), e)))
}

/// Build an ordered registry from config, failing fast on any malformed
/// rule definition. File order is application order.
pub fn build_registry(config: &GatehouseConfig) -> Result<RuleRegistry, GatehouseError> {
    let mut registry = RuleRegistry::new();
    for def in &config.rules {
        match def.kind.as_str() {
            "deny-toggle" => {
                let flag = def.flag.as_deref().ok_or_else(|| {
                    GatehouseError::ConfigError(format!(
                        "rule '{}': deny-toggle requires a 'flag' entry",
                        def.name
                    ))
                })?;
                registry.register(Box::new(DenyToggleRule::new(&def.name, &def.route, flag)?))?;
            }
            "capability" => {
                let requirement = def.requirement.as_deref().ok_or_else(|| {
                    GatehouseError::ConfigError(format!(
                        "rule '{}': capability requires a 'requirement' entry",
                        def.name
                    ))
                })?;
                registry.register(Box::new(CapabilityRule::new(
                    &def.name,
                    &def.route,
                    requirement,
                )?))?;
            }
            other => {
                return Err(GatehouseError::ConfigError(format!(
                    "rule '{}': unknown kind '{}' (expected 'deny-toggle' or 'capability')",
                    def.name, other
                )));
            }
        }
    }
    Ok(registry)
}

/// Configuration store view over the `[flags]` table.
pub fn flag_store(config: &GatehouseConfig) -> ConfigStore {
    ConfigStore::from_values(config.flags.clone())
}
