//! User and actor types
//!
//! `User` is a row of the credentials table. `Actor` is the identity that
//! performs one operation; it is handed explicitly to every core call.

use std::fmt;
use std::str::FromStr;

/// The fixed set of roles in the logistics operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Staff representing one branch location
    Branch,
    /// Moves transfers between branches within a region
    Driver,
    /// Monitors one region
    Supervisor,
    /// Monitors the whole company
    Manager,
    /// Monitors the whole company
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Branch => "Branch",
            Role::Driver => "Driver",
            Role::Supervisor => "Supervisor",
            Role::Manager => "Manager",
            Role::Owner => "Owner",
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
        match s.trim().to_lowercase().as_str() {
            "branch" => Ok(Role::Branch),
            "driver" => Ok(Role::Driver),
            "supervisor" => Ok(Role::Supervisor),
            "manager" => Ok(Role::Manager),
            "owner" => Ok(Role::Owner),
            _ => Err(format!("Invalid role: '{}'", s)),
        }
    }
}

/// A row of the user table
///
/// The password is stored and compared in plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub region: String,
    /// Only meaningful for [`Role::Branch`] users
    pub branch_code: Option<String>,
}

/// The identity acting in a single operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub username: String,
    pub role: Role,
    pub region: String,
    pub branch_code: Option<String>,
}

impl Actor {
    pub fn new(username: impl Into<String>, role: Role, region: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role,
            region: region.into(),
            branch_code: None,
        }
    }

    /// Attach the branch this actor represents
    pub fn with_branch(mut self, branch_code: impl Into<String>) -> Self {
        self.branch_code = Some(branch_code.into());
        self
    }

    /// Branch code, treating an empty value as absent
    pub fn branch(&self) -> Option<&str> {
        self.branch_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor {
            username: user.username.clone(),
            role: user.role,
            region: user.region.clone(),
            branch_code: user.branch_code.clone(),
        }
    }
}
