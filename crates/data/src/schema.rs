use serde::{Deserialize, Serialize};
use std::fmt;

pub use teamsheet_core::{RoleRule, SchemeRule, SheetConfig};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SquadFile {
    pub name: String,
    pub players: Vec<PlayerDef>,
}

/// One squad member. `role` names a `RoleRule::id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlayerDef {
    pub name: String,
    pub number: u8,
    pub role: String,
}

impl fmt::Display for PlayerDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.name)
    }
}
