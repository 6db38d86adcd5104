use saas_auth::{Ability, Membership, PolicyTable, User};
use saas_core::OrganizationId;

use crate::AuthzError;

/// Tenant context for a request (the organization addressed by the route).
///
/// This is immutable and must be present for all organization routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    organization_id: OrganizationId,
}

impl TenantContext {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self { organization_id }
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }
}

/// Per-request authorization context: the caller's membership in the
/// addressed organization and the ability derived from it.
///
/// Built fresh for every request and dropped with it.
#[derive(Debug, Clone)]
pub struct MembershipContext {
    membership: Membership,
    ability: Ability,
}

impl MembershipContext {
    /// Derive the ability for `membership` inside `tenant`.
    ///
    /// A membership from another organization is rejected before any policy
    /// runs.
    pub fn resolve(
        tenant: &TenantContext,
        membership: Membership,
        policies: &PolicyTable,
    ) -> Result<Self, AuthzError> {
        if membership.organization_id != tenant.organization_id() {
            return Err(AuthzError::TenantMismatch);
        }

        let ability = policies.build_ability(&membership.actor());
        Ok(Self {
            membership,
            ability,
        })
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn actor(&self) -> User {
        self.membership.actor()
    }

    pub fn ability(&self) -> &Ability {
        &self.ability
    }
}
