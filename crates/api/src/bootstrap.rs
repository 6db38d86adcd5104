//! Startup wiring for the role policy table.

use tracing::info;
use uuid::Uuid;

use saas_auth::{AbilitySummary, PolicyError, PolicyTable, Role, User};
use saas_core::UserId;

/// Build and validate the process-wide policy table.
///
/// Any error here must abort startup; serving with a partial table would
/// deny an entire role everywhere.
pub fn load_policies() -> Result<PolicyTable, PolicyError> {
    let table = PolicyTable::standard()?;
    for role in Role::ALL {
        let rules = table.build_ability(&placeholder(role)).rules().len();
        info!(role = %role, rules, "role policy loaded");
    }
    Ok(table)
}

/// Rule summary for `role`, as a client would receive it.
///
/// Ownership conditions are rendered against the nil user id.
pub fn policy_summary(table: &PolicyTable, role: Role) -> AbilitySummary {
    table.build_ability(&placeholder(role)).summary()
}

fn placeholder(role: Role) -> User {
    User::new(UserId::from_uuid(Uuid::nil()), role)
}
