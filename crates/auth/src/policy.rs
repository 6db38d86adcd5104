//! Role policy table: which rules each role receives.
//!
//! Policies are plain functions from the acting user to an ordered rule
//! list. They must be pure: the same user snapshot always yields the same
//! rules, and no policy may perform I/O.

use tracing::{debug, info};
use uuid::Uuid;

use saas_core::UserId;

use crate::{Ability, Action, Condition, PolicyError, Role, Rule, RuleSet, SubjectKind, User};

/// Rule-producing function for one role.
pub type Policy = fn(&User) -> Vec<Rule>;

/// Policy shipped for each role. Exhaustive over [`Role`], so a new role
/// does not compile until it is given a policy here.
pub fn standard_policy(role: Role) -> Policy {
    match role {
        Role::Admin => admin,
        Role::Member => member,
        Role::Billing => billing,
    }
}

/// Build the ability for a user from the standard policies.
pub fn define_ability_for(user: &User) -> Ability {
    Ability::for_user(user, standard_policy(user.role)(user))
}

fn owned_by(user: &User) -> Condition {
    Condition::eq("owner_id", user.id.to_string())
}

fn admin(user: &User) -> Vec<Rule> {
    RuleSet::new()
        .allow(Action::Manage, SubjectKind::All)
        .deny([Action::TransferOwnership, Action::Update], SubjectKind::Organization)
        .because("only the organization owner may update or transfer it")
        .allow_when(
            [Action::TransferOwnership, Action::Update],
            SubjectKind::Organization,
            owned_by(user),
        )
        .build()
}

fn member(user: &User) -> Vec<Rule> {
    RuleSet::new()
        .allow(Action::Get, SubjectKind::User)
        .allow([Action::Create, Action::Get], SubjectKind::Project)
        .allow_when([Action::Update, Action::Delete], SubjectKind::Project, owned_by(user))
        .build()
}

fn billing(_user: &User) -> Vec<Rule> {
    RuleSet::new().allow(Action::Manage, SubjectKind::Billing).build()
}

/// Read-only mapping from every role to its policy.
///
/// Constructed once at startup through [`PolicyTableBuilder::build`], which
/// refuses to produce a table that misses a role or whose policies reference
/// actions a subject kind does not declare.
#[derive(Clone)]
pub struct PolicyTable {
    policies: Vec<Policy>,
}

impl core::fmt::Debug for PolicyTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PolicyTable")
            .field("roles", &&Role::ALL[..self.policies.len()])
            .finish()
    }
}

impl PolicyTable {
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::default()
    }

    /// The validated table of [`standard_policy`] for every role.
    pub fn standard() -> Result<Self, PolicyError> {
        Role::ALL
            .into_iter()
            .fold(Self::builder(), |builder, role| {
                builder.register(role, standard_policy(role))
            })
            .build()
    }

    pub fn resolve(&self, role: Role) -> Policy {
        self.policies[role.index()]
    }

    pub fn build_ability(&self, user: &User) -> Ability {
        Ability::for_user(user, self.resolve(user.role)(user))
    }

    /// Check that every rule pairs an action with a kind that declares it.
    ///
    /// Policies are run against a placeholder user; ownership conditions do
    /// not affect which (action, kind) pairs appear.
    pub fn lint(&self) -> Result<(), PolicyError> {
        for role in Role::ALL {
            let probe = User::new(UserId::from_uuid(Uuid::nil()), role);
            for rule in self.resolve(role)(&probe) {
                if !rule.is_legal() {
                    return Err(PolicyError::IllegalRule {
                        role,
                        action: rule.action,
                        subject: rule.subject,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct PolicyTableBuilder {
    slots: Vec<(Role, Policy)>,
}

impl core::fmt::Debug for PolicyTableBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|(role, _)| role))
            .finish()
    }
}

impl PolicyTableBuilder {
    pub fn register(mut self, role: Role, policy: Policy) -> Self {
        self.slots.push((role, policy));
        self
    }

    pub fn build(self) -> Result<PolicyTable, PolicyError> {
        let mut policies = Vec::with_capacity(Role::ALL.len());

        for role in Role::ALL {
            let mut registered = self.slots.iter().filter(|(r, _)| *r == role);
            let Some((_, policy)) = registered.next() else {
                return Err(PolicyError::UnmappedRole(role));
            };
            if registered.next().is_some() {
                return Err(PolicyError::DuplicateRole(role));
            }
            debug!(role = %role, "policy registered");
            policies.push(*policy);
        }

        let table = PolicyTable { policies };
        table.lint()?;
        info!(roles = Role::ALL.len(), "policy table validated");
        Ok(table)
    }
}
