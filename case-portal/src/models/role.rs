use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Portal role carried by every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lawyer,
    Client,
    Detective,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Lawyer, Role::Client, Role::Detective, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lawyer => "lawyer",
            Role::Client => "client",
            Role::Detective => "detective",
            Role::Admin => "admin",
        }
    }

    /// Root of the role's route tree, e.g. `/lawyer`.
    pub fn home_path(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Landing page after login.
    pub fn dashboard_path(&self) -> String {
        format!("/{}/dashboard", self.as_str())
    }

    /// Role owning a request path, judged by its first segment.
    pub fn from_path(path: &str) -> Option<Role> {
        path.trim_start_matches('/')
            .split('/')
            .next()
            .and_then(|segment| segment.parse().ok())
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
            "lawyer" => Ok(Role::Lawyer),
            "client" => Ok(Role::Client),
            "detective" => Ok(Role::Detective),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Roles allowed into a protected region. Built once by the caller, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAllowList(BTreeSet<Role>);

impl RoleAllowList {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    pub fn any() -> Self {
        Self::new(Role::ALL)
    }

    pub fn allows(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for RoleAllowList {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self::new(iter)
    }
}
