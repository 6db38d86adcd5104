use thiserror::Error;

use crate::{Action, Role, SubjectKind};

/// Failure while evaluating a check.
///
/// A deny is never an error; these signal integration defects and are kept
/// distinct from a `false` result so they cannot be mistaken for policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbilityError {
    #[error("unclassifiable subject (typename: {typename:?})")]
    Unclassifiable { typename: Option<String> },

    #[error("malformed condition on field '{field}': {reason}")]
    MalformedCondition { field: String, reason: String },
}

/// Misconfiguration of the role policy table. Fatal at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("no policy registered for role {0}")]
    UnmappedRole(Role),

    #[error("policy registered twice for role {0}")]
    DuplicateRole(Role),

    #[error("policy for role {role} references '{action}' on {subject}, which {subject} does not declare")]
    IllegalRule {
        role: Role,
        action: Action,
        subject: SubjectKind,
    },

    #[error("unknown role '{0}'")]
    UnknownRole(String),
}
