//! `saas-auth` — the authorization ability engine.
//!
//! Given a user's role inside an organization, this crate decides which
//! actions that user may perform on which resources. It is pure and
//! synchronous: no I/O, no shared mutable state, no transport concerns.
//!
//! ```
//! use saas_auth::{define_ability_for, Action, Project, Role, SubjectKind, User};
//! use saas_core::{OrganizationId, ProjectId, UserId};
//!
//! let user = User::new(UserId::new(), Role::Member);
//! let ability = define_ability_for(&user);
//!
//! let own = Project::new(ProjectId::new(), user.id, OrganizationId::new());
//! assert!(ability.can(Action::Update, &own).unwrap());
//! assert!(!ability.can(Action::Delete, SubjectKind::Organization).unwrap());
//! ```

pub mod ability;
pub mod action;
pub mod condition;
pub mod error;
pub mod membership;
pub mod models;
pub mod policy;
pub mod roles;
pub mod rule;
pub mod subject;

pub use ability::{Ability, AbilitySummary, Explanation};
pub use action::Action;
pub use condition::Condition;
pub use error::{AbilityError, PolicyError};
pub use membership::Membership;
pub use models::{Invite, Organization, Project, User};
pub use policy::{Policy, PolicyTable, PolicyTableBuilder, define_ability_for, standard_policy};
pub use roles::Role;
pub use rule::{Actions, Rule, RuleSet};
pub use subject::{Resource, Subject, SubjectKind};
