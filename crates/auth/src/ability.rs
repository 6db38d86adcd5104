//! Ability evaluator.
//!
//! An [`Ability`] is the ordered rule list derived for one user in one
//! authorization context. Checks scan every rule in registration order and
//! keep the polarity of the last rule that matched:
//!
//! - later rules override earlier ones (last-match-wins, **not** deny-overrides)
//! - no matching rule means deny
//!
//! The ordering sensitivity is part of the contract. Policy authors rely on
//! "general rule, then specific override"; appending a broad rule after a
//! narrow one silently replaces it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use saas_core::UserId;

use crate::{AbilityError, Action, Resource, Role, Rule, Subject, SubjectKind, User};

/// Immutable rule set for one authorization context.
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    user: Option<User>,
    rules: Vec<Rule>,
}

/// Outcome of a scan: the kind the subject classified to and the last match.
struct Verdict<'r> {
    kind: SubjectKind,
    matched: Option<(usize, &'r Rule)>,
}

impl Verdict<'_> {
    fn granted(&self) -> bool {
        self.matched.is_some_and(|(_, rule)| rule.is_allow())
    }
}

impl Ability {
    /// Ability over an explicit rule list, with no acting user attached.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { user: None, rules }
    }

    pub fn for_user(user: &User, rules: Vec<Rule>) -> Self {
        Self {
            user: Some(*user),
            rules,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether `action` is permitted on `subject`.
    ///
    /// Errors only when the subject cannot be classified or a condition is
    /// malformed; a deny is `Ok(false)`.
    pub fn can<'a>(&self, action: Action, subject: impl Into<Subject<'a>>) -> Result<bool, AbilityError> {
        let verdict = self.decide(action, subject.into())?;
        let granted = verdict.granted();

        debug!(
            action = %action,
            subject = %verdict.kind,
            matched_rule = ?verdict.matched.map(|(index, _)| index),
            granted,
            "ability check"
        );

        Ok(granted)
    }

    pub fn cannot<'a>(&self, action: Action, subject: impl Into<Subject<'a>>) -> Result<bool, AbilityError> {
        self.can(action, subject).map(|granted| !granted)
    }

    /// Diagnostic counterpart of [`Ability::can`]: same decision, plus which
    /// rule produced it. Not meant for enforcement paths.
    pub fn explain<'a>(
        &self,
        action: Action,
        subject: impl Into<Subject<'a>>,
    ) -> Result<Explanation, AbilityError> {
        let verdict = self.decide(action, subject.into())?;
        let granted = verdict.granted();

        let (matched_rule, rule, reason) = match verdict.matched {
            Some((index, rule)) => {
                let reason = rule
                    .reason
                    .clone()
                    .unwrap_or_else(|| format!("matched rule #{index} ({rule})"));
                (Some(index), Some(rule.clone()), reason)
            }
            None => (
                None,
                None,
                format!("no rule matches {action} on {}; denied by default", verdict.kind),
            ),
        };

        Ok(Explanation {
            action,
            subject: verdict.kind,
            granted,
            matched_rule,
            rule,
            reason,
        })
    }

    /// Rules whose action and kind match, highest precedence first.
    ///
    /// Conditions are not evaluated; conditional rules are included.
    pub fn rules_for(&self, action: Action, kind: SubjectKind) -> Vec<&Rule> {
        self.rules
            .iter()
            .rev()
            .filter(|rule| rule.is_relevant(action, kind))
            .collect()
    }

    /// Serializable view of the rule set for client-side gating.
    pub fn summary(&self) -> AbilitySummary {
        AbilitySummary {
            user_id: self.user.map(|user| user.id),
            role: self.user.map(|user| user.role),
            rules: self.rules.clone(),
        }
    }

    fn decide<'r>(&'r self, action: Action, subject: Subject<'_>) -> Result<Verdict<'r>, AbilityError> {
        let kind = subject.classify().inspect_err(|err| {
            warn!(action = %action, subject = ?subject, error = %err, "rejecting ability check");
        })?;
        let instance: Option<&dyn Resource> = subject.instance();

        let mut matched = None;
        for (index, rule) in self.rules.iter().enumerate() {
            let hit = rule.matches(action, kind, instance).inspect_err(|err| {
                warn!(rule = index, action = %action, subject = %kind, error = %err, "condition failed");
            })?;
            if hit {
                matched = Some((index, rule));
            }
        }

        Ok(Verdict { kind, matched })
    }
}

/// Why a check came out the way it did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub action: Action,
    pub subject: SubjectKind,
    pub granted: bool,
    /// Index of the deciding rule in registration order.
    pub matched_rule: Option<usize>,
    pub rule: Option<Rule>,
    pub reason: String,
}

/// Read-only summary of an ability, safe to hand to a client.
///
/// Never used for server-side enforcement: there is deliberately no way to
/// turn a summary back into an [`Ability`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub rules: Vec<Rule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Condition, Project, RuleSet};
    use proptest::prelude::*;
    use saas_core::{OrganizationId, ProjectId};
    use serde_json::json;

    fn owned_by(owner: UserId) -> Project {
        Project::new(ProjectId::new(), owner, OrganizationId::new())
    }

    #[test]
    fn later_conditional_deny_overrides_earlier_allow() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .allow(Action::Update, SubjectKind::Project)
                .deny_when(Action::Update, SubjectKind::Project, Condition::exists("id"))
                .build(),
        );
        let project = owned_by(UserId::new());
        assert!(!ability.can(Action::Update, &project).unwrap());
    }

    #[test]
    fn reversing_the_order_flips_the_outcome() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .deny_when(Action::Update, SubjectKind::Project, Condition::exists("id"))
                .allow(Action::Update, SubjectKind::Project)
                .build(),
        );
        let project = owned_by(UserId::new());
        assert!(ability.can(Action::Update, &project).unwrap());
    }

    #[test]
    fn manage_all_narrowed_by_later_deny() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .allow(Action::Manage, SubjectKind::All)
                .deny(Action::Delete, SubjectKind::Project)
                .build(),
        );
        assert!(!ability.can(Action::Delete, SubjectKind::Project).unwrap());
        assert!(ability.can(Action::Update, SubjectKind::Project).unwrap());
        assert!(ability.can(Action::Delete, SubjectKind::Invite).unwrap());
    }

    #[test]
    fn manage_all_placed_last_is_unconditional() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .deny(Action::Delete, SubjectKind::Project)
                .allow(Action::Manage, SubjectKind::All)
                .build(),
        );
        assert!(ability.can(Action::Delete, SubjectKind::Project).unwrap());
    }

    #[test]
    fn ownership_condition_uses_acting_user() {
        let me = UserId::new();
        let ability = Ability::from_rules(
            RuleSet::new()
                .allow_when(
                    Action::Update,
                    SubjectKind::Project,
                    Condition::eq("owner_id", me.to_string()),
                )
                .build(),
        );
        assert!(ability.can(Action::Update, &owned_by(me)).unwrap());
        assert!(!ability.can(Action::Update, &owned_by(UserId::new())).unwrap());
    }

    #[test]
    fn unclassifiable_subject_is_an_error_not_a_deny() {
        let ability = Ability::from_rules(RuleSet::new().allow(Action::Manage, SubjectKind::All).build());
        let untagged = json!({ "owner_id": "u1" });
        assert_eq!(
            ability.can(Action::Get, &untagged).unwrap_err(),
            AbilityError::Unclassifiable { typename: None }
        );
        assert!(ability.cannot(Action::Get, &untagged).is_err());
    }

    #[test]
    fn malformed_condition_propagates() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .allow_when(Action::Get, SubjectKind::Project, Condition::gt("owner_id", 1))
                .build(),
        );
        let project = owned_by(UserId::new());
        assert!(matches!(
            ability.can(Action::Get, &project),
            Err(AbilityError::MalformedCondition { .. })
        ));
    }

    #[test]
    fn empty_ability_denies() {
        let ability = Ability::from_rules(Vec::new());
        for kind in SubjectKind::DECLARED {
            assert!(ability.cannot(Action::Get, kind).unwrap());
        }
    }

    #[test]
    fn explain_reports_the_deciding_rule() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .allow(Action::Manage, SubjectKind::All)
                .deny(Action::Delete, SubjectKind::Project)
                .because("projects are archived, not deleted")
                .build(),
        );

        let explanation = ability.explain(Action::Delete, SubjectKind::Project).unwrap();
        assert!(!explanation.granted);
        assert_eq!(explanation.matched_rule, Some(1));
        assert_eq!(explanation.reason, "projects are archived, not deleted");

        let explanation = ability.explain(Action::Get, SubjectKind::Project).unwrap();
        assert!(explanation.granted);
        assert_eq!(explanation.matched_rule, Some(0));
        assert_eq!(explanation.reason, "matched rule #0 (allow manage all)");
    }

    #[test]
    fn explain_default_deny() {
        let ability = Ability::from_rules(Vec::new());
        let explanation = ability.explain(Action::Export, SubjectKind::Billing).unwrap();
        assert!(!explanation.granted);
        assert_eq!(explanation.matched_rule, None);
        assert!(explanation.reason.contains("denied by default"));
    }

    #[test]
    fn rules_for_lists_highest_precedence_first() {
        let ability = Ability::from_rules(
            RuleSet::new()
                .allow(Action::Manage, SubjectKind::All)
                .allow(Action::Get, SubjectKind::User)
                .deny(Action::Update, SubjectKind::Project)
                .build(),
        );
        let rules = ability.rules_for(Action::Update, SubjectKind::Project);
        assert_eq!(rules.len(), 2);
        assert!(rules[0].inverted);
        assert_eq!(rules[1].subject, SubjectKind::All);
    }

    #[test]
    fn summary_round_trips_through_json() {
        let user = User::new(UserId::new(), Role::Member);
        let ability = Ability::for_user(
            &user,
            RuleSet::new().allow(Action::Get, SubjectKind::User).build(),
        );

        let json = serde_json::to_string(&ability.summary()).unwrap();
        let summary: AbilitySummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary.role, Some(Role::Member));
        assert_eq!(summary, ability.summary());
    }

    /// Reference semantics: the polarity of the last relevant rule, or deny.
    fn reference_can(rules: &[Rule], action: Action, kind: SubjectKind) -> bool {
        rules
            .iter()
            .rev()
            .find(|rule| rule.conditions.is_none() && rule.is_relevant(action, kind))
            .is_some_and(Rule::is_allow)
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop::sample::select(vec![
            Action::Manage,
            Action::Get,
            Action::Create,
            Action::Update,
            Action::Delete,
        ])
    }

    fn kind_strategy() -> impl Strategy<Value = SubjectKind> {
        prop::sample::select(vec![
            SubjectKind::All,
            SubjectKind::Project,
            SubjectKind::Organization,
            SubjectKind::User,
        ])
    }

    fn rule_strategy() -> impl Strategy<Value = Rule> {
        (any::<bool>(), action_strategy(), kind_strategy()).prop_map(|(inverted, action, subject)| {
            if inverted {
                Rule::deny(action, subject)
            } else {
                Rule::allow(action, subject)
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: type-level checks agree with a reverse first-match scan.
        #[test]
        fn last_match_wins(
            rules in prop::collection::vec(rule_strategy(), 0..12),
            action in action_strategy(),
            kind in kind_strategy(),
        ) {
            let expected = reference_can(&rules, action, kind);
            let ability = Ability::from_rules(rules);
            prop_assert_eq!(ability.can(action, kind).unwrap(), expected);
        }

        /// Property: an unconditional rule appended at the end decides every
        /// check it is relevant to, whatever came before.
        #[test]
        fn appended_rule_decides(
            rules in prop::collection::vec(rule_strategy(), 0..12),
            last in rule_strategy(),
        ) {
            let (action, kind, allow) = (last.action, last.subject, last.is_allow());
            let mut rules = rules;
            rules.push(last);
            let ability = Ability::from_rules(rules);
            prop_assert_eq!(ability.can(action, kind).unwrap(), allow);
        }
    }
}
