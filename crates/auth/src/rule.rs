//! Rule model and the builder policies use to produce ordered rule lists.

use serde::{Deserialize, Serialize};

use crate::{AbilityError, Action, Condition, Resource, SubjectKind};

/// One authorization rule.
///
/// `inverted` rules deny, the rest allow. `conditions` only ever match
/// concrete instances; a conditional rule never matches a type-level check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub inverted: bool,
    pub action: Action,
    pub subject: SubjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Rule {
    pub fn allow(action: Action, subject: SubjectKind) -> Self {
        Self {
            inverted: false,
            action,
            subject,
            conditions: None,
            reason: None,
        }
    }

    pub fn deny(action: Action, subject: SubjectKind) -> Self {
        Self {
            inverted: true,
            ..Self::allow(action, subject)
        }
    }

    pub fn when(mut self, conditions: Condition) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_allow(&self) -> bool {
        !self.inverted
    }

    /// Whether the (action, subject) pair is one the subject kind declares.
    pub fn is_legal(&self) -> bool {
        self.subject.allows(self.action)
    }

    /// Action and kind match, conditions ignored.
    pub fn is_relevant(&self, action: Action, kind: SubjectKind) -> bool {
        self.action.covers(action) && self.subject.covers(kind)
    }

    pub(crate) fn matches(
        &self,
        action: Action,
        kind: SubjectKind,
        instance: Option<&dyn Resource>,
    ) -> Result<bool, AbilityError> {
        if !self.is_relevant(action, kind) {
            return Ok(false);
        }

        match (&self.conditions, instance) {
            (None, _) => Ok(true),
            (Some(conditions), Some(resource)) => conditions.evaluate(resource),
            (Some(_), None) => Ok(false),
        }
    }
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let polarity = if self.inverted { "deny" } else { "allow" };
        write!(f, "{polarity} {} {}", self.action, self.subject)?;
        if self.conditions.is_some() {
            f.write_str(" (conditional)")?;
        }
        Ok(())
    }
}

/// One or more actions given to a single [`RuleSet`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions(Vec<Action>);

impl From<Action> for Actions {
    fn from(action: Action) -> Self {
        Self(vec![action])
    }
}

impl<const N: usize> From<[Action; N]> for Actions {
    fn from(actions: [Action; N]) -> Self {
        Self(actions.to_vec())
    }
}

impl From<&[Action]> for Actions {
    fn from(actions: &[Action]) -> Self {
        Self(actions.to_vec())
    }
}

/// Ordered rule list under construction.
///
/// Each call appends rules after everything registered so far, and the
/// evaluator lets the **last** matching rule win. Write the general rule
/// first and its narrower overrides after it:
///
/// ```
/// use saas_auth::{Action, Condition, RuleSet, SubjectKind};
///
/// let rules = RuleSet::new()
///     .allow(Action::Manage, SubjectKind::All)
///     .deny(Action::Update, SubjectKind::Organization)
///     .allow_when(Action::Update, SubjectKind::Organization, Condition::eq("owner_id", "u1"))
///     .build();
/// assert_eq!(rules.len(), 3);
/// ```
///
/// Moving the `deny` to the end would make it unconditional again, so
/// reordering rules changes what a role can do.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    last_call: usize,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(self, actions: impl Into<Actions>, subject: SubjectKind) -> Self {
        self.append(actions.into(), subject, false, None)
    }

    pub fn deny(self, actions: impl Into<Actions>, subject: SubjectKind) -> Self {
        self.append(actions.into(), subject, true, None)
    }

    pub fn allow_when(
        self,
        actions: impl Into<Actions>,
        subject: SubjectKind,
        conditions: Condition,
    ) -> Self {
        self.append(actions.into(), subject, false, Some(conditions))
    }

    pub fn deny_when(
        self,
        actions: impl Into<Actions>,
        subject: SubjectKind,
        conditions: Condition,
    ) -> Self {
        self.append(actions.into(), subject, true, Some(conditions))
    }

    /// Append a prebuilt rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.last_call = self.rules.len();
        self.rules.push(rule);
        self
    }

    /// Attach a reason to every rule added by the previous call.
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        for rule in &mut self.rules[self.last_call..] {
            rule.reason = Some(reason.clone());
        }
        self
    }

    pub fn build(self) -> Vec<Rule> {
        self.rules
    }

    fn append(
        mut self,
        Actions(actions): Actions,
        subject: SubjectKind,
        inverted: bool,
        conditions: Option<Condition>,
    ) -> Self {
        self.last_call = self.rules.len();
        self.rules.extend(actions.into_iter().map(|action| Rule {
            inverted,
            action,
            subject,
            conditions: conditions.clone(),
            reason: None,
        }));
        self
    }
}
