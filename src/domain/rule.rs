use crate::domain::version_map::VersionMap;
use crate::error::{BumperError, Result};
use crate::scheme::SchemeGrammar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Event class a bump rule is conditioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    Commit,
    Manual,
    PullRequest,
    Comment,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Commit => "commit",
            Trigger::Manual => "manual",
            Trigger::PullRequest => "pull-request",
            Trigger::Comment => "comment",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = BumperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "commit" => Ok(Trigger::Commit),
            "manual" => Ok(Trigger::Manual),
            "pull-request" => Ok(Trigger::PullRequest),
            "comment" => Ok(Trigger::Comment),
            other => Err(BumperError::config(format!(
                "unknown trigger '{}' (expected commit, manual, pull-request or comment)",
                other
            ))),
        }
    }
}

/// One field name or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldSelection {
    One(String),
    Many(Vec<String>),
}

impl FieldSelection {
    pub fn names(&self) -> &[String] {
        match self {
            FieldSelection::One(name) => std::slice::from_ref(name),
            FieldSelection::Many(names) => names,
        }
    }
}

impl From<&str> for FieldSelection {
    fn from(name: &str) -> Self {
        FieldSelection::One(name.to_string())
    }
}

impl From<Vec<&str>> for FieldSelection {
    fn from(names: Vec<&str>) -> Self {
        FieldSelection::Many(names.into_iter().map(String::from).collect())
    }
}

/// How to change a version when a trigger fires on a branch.
///
/// A rule without `branch` matches every branch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BumpRule {
    pub trigger: Trigger,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bump: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<FieldSelection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl BumpRule {
    /// Create a rule that matches `trigger` on any branch and changes nothing
    pub fn new(trigger: Trigger) -> Self {
        BumpRule {
            trigger,
            branch: None,
            bump: None,
            reset: None,
            prefix: None,
            suffix: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_bump(mut self, field: impl Into<String>) -> Self {
        self.bump = Some(field.into());
        self
    }

    pub fn with_reset(mut self, fields: impl Into<FieldSelection>) -> Self {
        self.reset = Some(fields.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Check if this rule applies to `trigger` on `branch`
    pub fn matches(&self, trigger: Trigger, branch: &str) -> bool {
        self.trigger == trigger
            && self
                .branch
                .as_deref()
                .map_or(true, |rule_branch| rule_branch == branch)
    }

    /// Every field name this rule bumps or resets
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.reset
            .iter()
            .flat_map(|reset| reset.names().iter().map(String::as_str))
            .chain(self.bump.as_deref())
    }
}

/// Rules matching `trigger` on `branch`, in declaration order
pub fn matching_rules<'r>(
    rules: &'r [BumpRule],
    trigger: Trigger,
    branch: &str,
) -> Vec<&'r BumpRule> {
    rules
        .iter()
        .filter(|rule| rule.matches(trigger, branch))
        .collect()
}

/// Result of applying rules to a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpOutcome {
    pub map: VersionMap,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl BumpOutcome {
    /// The new version literal, decorated with the chosen prefix and suffix
    pub fn render(&self, grammar: &SchemeGrammar) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            self.map.decode(grammar),
            self.suffix.as_deref().unwrap_or("")
        )
    }
}

fn checked_field<'g>(grammar: &SchemeGrammar, field: &'g str) -> Result<&'g str> {
    match grammar.field(field) {
        Some(_) => Ok(field),
        None => Err(BumperError::unknown_field(field, grammar.raw())),
    }
}

/// Apply already selected rules to `map`.
///
/// All resets of all rules run first, then all bumps, each phase in rule order. Bumps are
/// cumulative: two rules bumping the same field raise it by two. Of the rules that carry a
/// prefix or suffix, the last one wins.
///
/// # Errors
/// - [`BumperError::UnknownField`] if a rule names a field the scheme does not have
/// - [`BumperError::FieldOverflow`] if a bump would overflow
pub fn apply_rules(
    mut map: VersionMap,
    grammar: &SchemeGrammar,
    rules: &[&BumpRule],
) -> Result<BumpOutcome> {
    for rule in rules {
        if let Some(reset) = &rule.reset {
            for field in reset.names() {
                map.insert(checked_field(grammar, field)?, 0);
            }
        }
    }

    let mut prefix = None;
    let mut suffix = None;
    for rule in rules {
        if let Some(field) = rule.bump.as_deref() {
            let field = checked_field(grammar, field)?;
            let current = map.get(field).unwrap_or(0);
            let next = current
                .checked_add(1)
                .ok_or_else(|| BumperError::FieldOverflow {
                    field: field.to_string(),
                    value: format!("{}+1", current),
                })?;
            map.insert(field, next);
        }
        if rule.prefix.is_some() {
            prefix = rule.prefix.clone();
        }
        if rule.suffix.is_some() {
            suffix = rule.suffix.clone();
        }
    }

    debug!(rules = rules.len(), ?map, "applied bump rules");

    Ok(BumpOutcome {
        map,
        prefix,
        suffix,
    })
}
