use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PolicyError;

/// Role a user holds inside one organization.
///
/// One role per (user, organization) pair; the set is closed so that the
/// policy table can be checked for totality at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
    Billing,
}

impl Role {
    /// Every declared role, in declaration order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Member, Role::Billing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::Billing => "BILLING",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (position, role) in Role::ALL.into_iter().enumerate() {
            assert_eq!(role.index(), position);
        }
    }

    #[test]
    fn parses_screaming_case_only() {
        assert_eq!("BILLING".parse::<Role>().unwrap(), Role::Billing);
        assert_eq!(
            "admin".parse::<Role>().unwrap_err(),
            PolicyError::UnknownRole("admin".to_string())
        );
    }

    #[test]
    fn serde_uses_the_same_spelling_as_display() {
        for role in Role::ALL {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json, serde_json::Value::String(role.to_string()));
        }
    }
}
