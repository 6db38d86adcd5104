//! Subject registry: resource kinds and how a value is tagged with one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AbilityError, Action};

/// Field that carries the kind discriminant on untyped subject values.
pub const TYPENAME_FIELD: &str = "__typename";

/// Kind of resource the policy reasons about.
///
/// `All` is the reserved wildcard: a rule declared for it applies to every
/// kind, and a check against it is a type-level question about "everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    User,
    Project,
    Organization,
    Billing,
    Invite,
    #[serde(rename = "all")]
    All,
}

impl SubjectKind {
    /// Every concrete (non-wildcard) kind.
    pub const DECLARED: [SubjectKind; 5] = [
        SubjectKind::User,
        SubjectKind::Project,
        SubjectKind::Organization,
        SubjectKind::Billing,
        SubjectKind::Invite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::User => "User",
            SubjectKind::Project => "Project",
            SubjectKind::Organization => "Organization",
            SubjectKind::Billing => "Billing",
            SubjectKind::Invite => "Invite",
            SubjectKind::All => "all",
        }
    }

    /// Resolve an instance discriminant. The wildcard is never an instance tag.
    pub fn from_typename(typename: &str) -> Option<SubjectKind> {
        Self::DECLARED
            .into_iter()
            .find(|kind| kind.as_str() == typename)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, SubjectKind::All)
    }

    /// Actions this kind declares. Empty for the wildcard, which accepts any.
    pub fn actions(&self) -> &'static [Action] {
        use Action::*;

        match self {
            SubjectKind::User => &[Manage, Get, Update, Delete],
            SubjectKind::Project => &[Manage, Get, Create, Update, Delete],
            SubjectKind::Organization => &[Manage, Create, Update, Delete, TransferOwnership],
            SubjectKind::Billing => &[Manage, Get, Update, Export],
            SubjectKind::Invite => &[Manage, Get, Create, Revoke],
            SubjectKind::All => &[],
        }
    }

    /// Whether a rule may pair `action` with this kind.
    pub fn allows(&self, action: Action) -> bool {
        self.is_wildcard() || self.actions().contains(&action)
    }

    /// Whether a rule declared for `self` covers a subject classified as `kind`.
    pub fn covers(self, kind: SubjectKind) -> bool {
        self.is_wildcard() || self == kind
    }
}

impl core::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be checked against an ability.
///
/// Implementors carry an explicit discriminant (`typename`) rather than being
/// recognised by shape, and expose their fields by name for condition
/// evaluation. Field values are compared as JSON values; identifiers are
/// exposed as strings.
pub trait Resource {
    fn typename(&self) -> Option<&str>;

    /// Value of the named field, or `None` when the field is absent.
    fn field(&self, name: &str) -> Option<Value>;
}

impl Resource for Map<String, Value> {
    fn typename(&self) -> Option<&str> {
        self.get(TYPENAME_FIELD).and_then(Value::as_str)
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Untyped values from collaborators, tagged through `__typename`.
impl Resource for Value {
    fn typename(&self) -> Option<&str> {
        self.as_object().and_then(|fields| fields.typename())
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|fields| fields.get(name).cloned())
    }
}

/// What a check is about: a bare kind, or a concrete instance.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    /// "Can the user do X to *any* value of this kind?" No instance in hand.
    Kind(SubjectKind),
    Instance(&'a dyn Resource),
}

impl<'a> Subject<'a> {
    /// Classify to exactly one kind, or fail as unclassifiable.
    pub fn classify(&self) -> Result<SubjectKind, AbilityError> {
        match self {
            Subject::Kind(kind) => Ok(*kind),
            Subject::Instance(resource) => {
                let typename = resource.typename();
                typename
                    .and_then(SubjectKind::from_typename)
                    .ok_or_else(|| AbilityError::Unclassifiable {
                        typename: typename.map(str::to_owned),
                    })
            }
        }
    }

    pub fn instance(&self) -> Option<&'a dyn Resource> {
        match self {
            Subject::Kind(_) => None,
            Subject::Instance(resource) => Some(*resource),
        }
    }
}

impl core::fmt::Debug for Subject<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Subject::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Subject::Instance(resource) => f
                .debug_struct("Instance")
                .field("typename", &resource.typename())
                .finish_non_exhaustive(),
        }
    }
}

impl From<SubjectKind> for Subject<'_> {
    fn from(kind: SubjectKind) -> Self {
        Subject::Kind(kind)
    }
}

impl<'a, R: Resource> From<&'a R> for Subject<'a> {
    fn from(resource: &'a R) -> Self {
        Subject::Instance(resource)
    }
}
