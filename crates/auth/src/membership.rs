use serde::{Deserialize, Serialize};

use saas_core::{MembershipId, OrganizationId, UserId};

use crate::{Role, User};

/// A user's membership in an organization.
///
/// This is an authorization boundary object: membership resolution happens
/// elsewhere, and this is what it hands over once the role is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    pub role: Role,
}

impl Membership {
    /// The acting user as seen inside this organization.
    pub fn actor(&self) -> User {
        User::new(self.user_id, self.role)
    }
}
