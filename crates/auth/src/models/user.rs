use serde::{Deserialize, Serialize};
use serde_json::Value;

use saas_core::UserId;

use crate::{Resource, Role, SubjectKind};

/// Acting user snapshot: identity plus the role held in the current
/// organization. Also a subject in its own right.
///
/// Serializes with `__typename: "User"`. When deserializing the tag may be
/// omitted (sessions hand over bare `{ id, role }` pairs), but any other
/// tag is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "__typename", rename = "User", try_from = "UntaggedUser")]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

#[derive(Deserialize)]
struct UntaggedUser {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    id: UserId,
    role: Role,
}

impl TryFrom<UntaggedUser> for User {
    type Error = String;

    fn try_from(raw: UntaggedUser) -> Result<Self, Self::Error> {
        match raw.typename.as_deref() {
            None | Some("User") => Ok(User::new(raw.id, raw.role)),
            Some(other) => Err(format!("expected __typename 'User', found '{other}'")),
        }
    }
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

impl Resource for User {
    fn typename(&self) -> Option<&str> {
        Some(SubjectKind::User.as_str())
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "role" => Some(Value::String(self.role.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typename_defaults_to_user_when_omitted() {
        let id = UserId::new();
        let user: User = serde_json::from_value(json!({ "id": id.to_string(), "role": "MEMBER" })).unwrap();
        assert_eq!(user, User::new(id, Role::Member));
    }

    #[test]
    fn foreign_typename_is_rejected() {
        let raw = json!({ "__typename": "Project", "id": UserId::new().to_string(), "role": "ADMIN" });
        assert!(serde_json::from_value::<User>(raw).is_err());
    }

    #[test]
    fn serializes_with_typename_tag() {
        let json = serde_json::to_value(User::new(UserId::new(), Role::Billing)).unwrap();
        assert_eq!(json["__typename"], "User");
        assert_eq!(json["role"], "BILLING");
    }
}
