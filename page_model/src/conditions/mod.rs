//! Conditions: when a page is shown and how the user may leave it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::elements::{parse_number, InputKind};
use crate::error::{ModelError, Result};

/// Comparators the app understands in visibility conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "in")]
    In,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    AtMost,
}

impl Comparator {
    /// Parse an authored comparator, ignoring case.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "=" | "==" => Ok(Comparator::Equals),
            "!=" => Ok(Comparator::NotEquals),
            "in" => Ok(Comparator::In),
            ">" => Ok(Comparator::GreaterThan),
            ">=" => Ok(Comparator::AtLeast),
            "<" => Ok(Comparator::LessThan),
            "<=" => Ok(Comparator::AtMost),
            _ => Err(ModelError::UnknownComparator(raw.trim().to_string())),
        }
    }
}

/// Right-hand side of a visibility condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Set(Vec<i64>),
    Scalar(String),
}

/// A rule gating whether a page is shown based on a prior answer.
///
/// Encoded as `[variable_name, comparator, value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityCondition {
    pub variable: String,
    pub comparator: Comparator,
    pub value: ConditionValue,
}

impl VisibilityCondition {
    /// Parse `"var;cmp;value"` or `"var;value[,value...]"`.
    ///
    /// In the two-part form a comma-separated value becomes an integer set
    /// compared with `in`; anything else is compared with `=`. Blank input
    /// means the page is always visible.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = raw.split(';').map(str::trim).collect();
        let condition = match parts.as_slice() {
            [variable, comparator, value] => Self {
                variable: variable.to_string(),
                comparator: Comparator::parse(comparator)?,
                value: ConditionValue::Scalar(value.to_string()),
            },
            [variable, value] if value.contains(',') => Self {
                variable: variable.to_string(),
                comparator: Comparator::In,
                value: ConditionValue::Set(
                    value
                        .split(',')
                        .filter_map(|v| v.trim().parse::<i64>().ok())
                        .collect(),
                ),
            },
            [variable, value] => Self {
                variable: variable.to_string(),
                comparator: Comparator::Equals,
                value: ConditionValue::Scalar(value.to_string()),
            },
            _ => return Err(ModelError::InvalidCondition(raw.to_string())),
        };

        Ok(Some(condition))
    }
}

impl Serialize for VisibilityCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.variable, &self.comparator, &self.value).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VisibilityCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (variable, comparator, value) =
            <(String, Comparator, ConditionValue)>::deserialize(deserializer)?;
        Ok(Self {
            variable,
            comparator,
            value,
        })
    }
}

/// When the "next" button appears, as authored in the sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdvanceTrigger {
    WhenCorrect,
    AfterTimeout,
    Never,
    WhenComplete,
}

impl AdvanceTrigger {
    /// Parse an authored trigger, ignoring case. Blank means unspecified.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let trigger = match raw.trim().to_lowercase().as_str() {
            "" => return Ok(None),
            "whencorrect" => AdvanceTrigger::WhenCorrect,
            "aftertimeout" => AdvanceTrigger::AfterTimeout,
            "never" => AdvanceTrigger::Never,
            "whencomplete" => AdvanceTrigger::WhenComplete,
            _ => return Err(ModelError::UnknownAdvanceTrigger(raw.trim().to_string())),
        };
        Ok(Some(trigger))
    }
}

/// Parse a timeout authored in seconds, returned in milliseconds.
pub fn parse_timeout(raw: &str) -> Result<Option<u64>> {
    let Some(seconds) = parse_number("timeout", raw)? else {
        return Ok(None);
    };
    u64::try_from(seconds)
        .ok()
        .and_then(|seconds| seconds.checked_mul(1000))
        .map(Some)
        .ok_or_else(|| ModelError::InvalidNumber {
            field: "timeout",
            value: raw.trim().to_string(),
        })
}

/// One step of a navigation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavToken {
    WaitForCorrect,
    WaitForClick,
    WaitForComplete,
    /// Milliseconds.
    WaitForTime(u64),
}

/// A rule gating whether and how the user may advance past a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavigationCondition {
    Single(NavToken),
    Sequence(Vec<NavToken>),
}

impl NavigationCondition {
    /// Every token of the rule, in order.
    pub fn tokens(&self) -> Vec<NavToken> {
        match self {
            NavigationCondition::Single(token) => vec![*token],
            NavigationCondition::Sequence(tokens) => tokens.clone(),
        }
    }

    /// Derive a page's navigation rule.
    ///
    /// Rules are checked in priority order:
    /// 1. a puzzle input always waits for the correct answer
    /// 2. a timeout with `AfterTimeout` waits for the timer, then a click
    /// 3. any other timeout only waits for the timer
    /// 4. `WhenCorrect` waits for the correct answer, then a click
    /// 5. `WhenComplete` waits for every input, then a click
    /// 6. otherwise the app default applies
    pub fn derive(
        trigger: Option<AdvanceTrigger>,
        timeout_ms: Option<u64>,
        inputs: &[InputKind],
    ) -> Option<Self> {
        if inputs.contains(&InputKind::Puzzle) {
            return Some(NavigationCondition::Single(NavToken::WaitForCorrect));
        }

        if let Some(millis) = timeout_ms {
            let wait = NavToken::WaitForTime(millis);
            return Some(match trigger {
                Some(AdvanceTrigger::AfterTimeout) => {
                    NavigationCondition::Sequence(vec![wait, NavToken::WaitForClick])
                }
                _ => NavigationCondition::Sequence(vec![wait]),
            });
        }

        match trigger {
            Some(AdvanceTrigger::WhenCorrect) => Some(NavigationCondition::Sequence(vec![
                NavToken::WaitForCorrect,
                NavToken::WaitForClick,
            ])),
            Some(AdvanceTrigger::WhenComplete) => Some(NavigationCondition::Sequence(vec![
                NavToken::WaitForComplete,
                NavToken::WaitForClick,
            ])),
            _ => None,
        }
    }
}
