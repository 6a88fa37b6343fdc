//! Principal roles.

use serde::{Deserialize, Serialize};

/// The role of an authenticated principal.
///
/// The set of principals is fixed at process start: exactly one admin and
/// one branch principal per configured branch. There is no dynamic user
/// management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May read the full ledger and the analytics rollups. Never writes.
    Admin,
    /// May append entries for its own branch only.
    Branch,
}

impl Role {
    /// Returns the lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Branch => "branch",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
