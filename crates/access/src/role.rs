use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockbook_core::Error;

/// Role assigned to a user.
///
/// Roles form a closed set; there is no per-permission granularity beyond
/// these three plus the independent receive-eligibility flag (see
/// [`crate::gate`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Manager,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "administrator" => Ok(Role::Administrator),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            other => Err(Error::validation(format!(
                "role must be one of administrator, manager, staff (got {other:?})"
            ))),
        }
    }
}
