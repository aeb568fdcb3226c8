//! Route table data model.
//!
//! The route table is owned by the host's routing subsystem; Gatehouse
//! receives it for the duration of one alteration pass and only reads and
//! writes named entries. Requirement values are string sentinels by host
//! convention (`"TRUE"` / `"FALSE"`), and the string form is preserved
//! exactly: downstream access checkers match on it.

use crate::core::error::GatehouseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Requirement key for the host's core access check.
pub const REQUIREMENT_ACCESS: &str = "_access";
/// Sentinel value granting access unconditionally.
pub const ACCESS_ALLOWED: &str = "TRUE";
/// Sentinel value denying access unconditionally.
pub const ACCESS_DENIED: &str = "FALSE";

/// A single named route.
///
/// Only `requirements` is ever touched by an alteration pass. `path` and
/// anything the host attaches beyond it are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub path: String,
    #[serde(default)]
    pub requirements: BTreeMap<String, String>,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>) -> Self {
        RouteDefinition {
            path: path.into(),
            requirements: BTreeMap::new(),
        }
    }

    /// Set a requirement, overwriting any prior value for the same key.
    pub fn set_requirement(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.requirements.insert(key.into(), value.into());
    }

    pub fn requirement(&self, key: &str) -> Option<&str> {
        self.requirements.get(key).map(String::as_str)
    }
}

/// Mapping from unique route name to definition.
///
/// BTreeMap keeps iteration deterministic, which keeps listings, digests,
/// and serialized output stable across passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteDefinition>,
}

impl RouteTable {
    pub fn new() -> Self {
        RouteTable::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, route: RouteDefinition) {
        self.routes.insert(name.into(), route);
    }

    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RouteDefinition> {
        self.routes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteDefinition)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load a route table from a JSON file (CLI surface).
    pub fn load(path: &Path) -> Result<Self, GatehouseError> {
        let content = std::fs::read_to_string(path).map_err(GatehouseError::IoError)?;
        serde_json::from_str(&content)
            .map_err(|e| GatehouseError::RouteTableError(format!("{}: {}", path.display(), e)))
    }

    /// Write the table back out as pretty-printed JSON.
    pub fn store(&self, path: &Path) -> Result<(), GatehouseError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| GatehouseError::RouteTableError(e.to_string()))?;
        std::fs::write(path, content).map_err(GatehouseError::IoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_requirement_overwrites() {
        let mut route = RouteDefinition::new("/user/password");
        route.set_requirement(REQUIREMENT_ACCESS, ACCESS_ALLOWED);
        route.set_requirement(REQUIREMENT_ACCESS, ACCESS_DENIED);
        assert_eq!(route.requirement(REQUIREMENT_ACCESS), Some(ACCESS_DENIED));
        assert_eq!(route.requirements.len(), 1);
    }

    #[test]
    fn test_table_round_trip() {
        let mut table = RouteTable::new();
        let mut route = RouteDefinition::new("/admin/people/roles");
        route.set_requirement("_permission", "administer users");
        table.insert("role_delegation.edit_form", route);

        let json = serde_json::to_string(&table).unwrap();
        let back: RouteTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
