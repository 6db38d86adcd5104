//! Authorization guard for handlers.
//!
//! This enforces authorization before a handler mutates or returns a
//! resource, while keeping the ability engine transport-agnostic.

use thiserror::Error;

use saas_auth::{Ability, AbilityError, Action, Subject, SubjectKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    /// A normal policy deny. Carries no hint about which rule decided it.
    #[error("forbidden: cannot {action} {subject}")]
    Forbidden { action: Action, subject: SubjectKind },

    /// Integration defect surfaced by the engine; never a policy outcome.
    #[error(transparent)]
    Engine(#[from] AbilityError),
}

impl AuthzError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthzError::Forbidden { .. } | AuthzError::TenantMismatch)
    }
}

/// Check `action` on `subject`, turning a deny into [`AuthzError::Forbidden`].
///
/// - No IO
/// - No panics
pub fn ensure_can<'a>(
    ability: &Ability,
    action: Action,
    subject: impl Into<Subject<'a>>,
) -> Result<(), AuthzError> {
    let subject = subject.into();
    if ability.can(action, subject)? {
        return Ok(());
    }

    Err(AuthzError::Forbidden {
        action,
        subject: subject.classify()?,
    })
}
