use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleRule {
    pub id: String,
    pub label: String,
    pub starter_slots: usize,
    #[serde(default)]
    pub substitute_slots: usize,
}

/// A formation: how many starter slots of each role are in use.
/// Roles not listed keep all their starter slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemeRule {
    pub name: String,
    #[serde(default)]
    pub starters: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetConfig {
    pub roles: Vec<RoleRule>,
    #[serde(default)]
    pub schemes: Vec<SchemeRule>,
    #[serde(default)]
    pub default_scheme: Option<String>,
}

impl SheetConfig {
    pub fn role_rule(&self, id: &str) -> Option<&RoleRule> {
        self.roles.iter().find(|rule| rule.id == id)
    }

    pub fn scheme_rule(&self, name: &str) -> Option<&SchemeRule> {
        self.schemes.iter().find(|rule| rule.name == name)
    }

    pub fn starters_for(&self, scheme: &str, role: &str) -> Option<usize> {
        let rule = self.role_rule(role)?;
        let scheme = self.scheme_rule(scheme)?;
        Some(
            scheme
                .starters
                .get(role)
                .copied()
                .unwrap_or(rule.starter_slots),
        )
    }

    pub fn total_slots(&self) -> usize {
        self.roles
            .iter()
            .map(|rule| rule.starter_slots + rule.substitute_slots)
            .sum()
    }
}
