/// Account domain
///
/// Account records, capability tiers and the service orchestrating
/// signup, login, lookup and deletion.

mod service;

pub use service::{AccountService, LoginOutcome};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned account identifier
pub type AccountId = i32;

/// Capability tier of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Regular,
    Admin,
}

impl Role {
    /// Whether an account holding `self` may reach a resource requiring `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Regular => true,
            Role::Admin => matches!(self, Role::Admin),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Regular => "Regular",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" => Ok(Role::Regular),
            "Admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A persisted account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    #[serde(rename = "userName")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "userType")]
    pub role: Role,
}

/// An account about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewAccount {
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            role: self.role,
        }
    }
}
