use serde::{Deserialize, Serialize};

/// Operation a user attempts on a subject.
///
/// `Manage` is reserved: in a rule it stands for "any action". Which actions
/// are legal for which subject kind is declared by [`SubjectKind::actions`].
///
/// [`SubjectKind::actions`]: crate::SubjectKind::actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Manage,
    Get,
    Create,
    Update,
    Delete,
    TransferOwnership,
    Export,
    Revoke,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Get => "get",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::TransferOwnership => "transfer_ownership",
            Action::Export => "export",
            Action::Revoke => "revoke",
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Action::Manage)
    }

    /// Whether a rule declared for `self` covers a check for `requested`.
    pub fn covers(self, requested: Action) -> bool {
        self.is_wildcard() || self == requested
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_covers_everything() {
        for action in [Action::Get, Action::Delete, Action::Revoke, Action::Manage] {
            assert!(Action::Manage.covers(action));
        }
    }

    #[test]
    fn specific_action_does_not_cover_manage() {
        assert!(Action::Update.covers(Action::Update));
        assert!(!Action::Update.covers(Action::Manage));
        assert!(!Action::Update.covers(Action::Delete));
    }

    #[test]
    fn serialized_name_matches_as_str() {
        let json = serde_json::to_value(Action::TransferOwnership).unwrap();
        assert_eq!(json, serde_json::json!("transfer_ownership"));
    }
}
