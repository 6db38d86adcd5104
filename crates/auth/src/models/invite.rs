use serde::{Deserialize, Serialize};
use serde_json::Value;

use saas_core::{InviteId, OrganizationId, UserId};

use crate::{Resource, Role, SubjectKind};

/// Pending invitation into an organization with a given role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename", rename = "Invite")]
pub struct Invite {
    pub id: InviteId,
    pub organization_id: OrganizationId,
    pub email: String,
    pub role: Role,
    /// Absent once the inviting user has been deleted.
    #[serde(default)]
    pub author_id: Option<UserId>,
}

impl Resource for Invite {
    fn typename(&self) -> Option<&str> {
        Some(SubjectKind::Invite.as_str())
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "organization_id" => Some(Value::String(self.organization_id.to_string())),
            "email" => Some(Value::String(self.email.clone())),
            "role" => Some(Value::String(self.role.to_string())),
            "author_id" => self.author_id.map(|id| Value::String(id.to_string())),
            _ => None,
        }
    }
}
