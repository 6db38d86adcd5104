use serde::{Deserialize, Serialize};
use serde_json::Value;

use saas_core::{OrganizationId, UserId};

use crate::{Resource, SubjectKind};

/// Tenant. Ownership is separate from the ADMIN role: an organization has
/// exactly one owner, and several admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename", rename = "Organization")]
pub struct Organization {
    pub id: OrganizationId,
    pub owner_id: UserId,
    pub slug: String,
    /// Email domain whose users may join automatically.
    #[serde(default)]
    pub domain: Option<String>,
}

impl Organization {
    pub fn new(id: OrganizationId, owner_id: UserId, slug: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            slug: slug.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

impl Resource for Organization {
    fn typename(&self) -> Option<&str> {
        Some(SubjectKind::Organization.as_str())
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "owner_id" => Some(Value::String(self.owner_id.to_string())),
            "slug" => Some(Value::String(self.slug.clone())),
            "domain" => self.domain.clone().map(Value::String),
            _ => None,
        }
    }
}
