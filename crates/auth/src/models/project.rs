use serde::{Deserialize, Serialize};
use serde_json::Value;

use saas_core::{OrganizationId, ProjectId, UserId};

use crate::{Resource, SubjectKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename", rename = "Project")]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub organization_id: OrganizationId,
}

impl Project {
    pub fn new(id: ProjectId, owner_id: UserId, organization_id: OrganizationId) -> Self {
        Self {
            id,
            owner_id,
            organization_id,
        }
    }
}

impl Resource for Project {
    fn typename(&self) -> Option<&str> {
        Some(SubjectKind::Project.as_str())
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "owner_id" => Some(Value::String(self.owner_id.to_string())),
            "organization_id" => Some(Value::String(self.organization_id.to_string())),
            _ => None,
        }
    }
}
