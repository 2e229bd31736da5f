//! Input kinds and the closed mapping from a kind to its element.

use serde::{Deserialize, Serialize};

use super::{Element, InputMeta};
use crate::error::{ModelError, Result};
use crate::text::is_yes_no;

/// Choice offered beside a slider when the sheet lists none.
pub const DEFAULT_SLIDER_OTHERS: &str = "Prefer not to answer";
/// How long each timed text stays on screen, in milliseconds.
pub const TIMED_TEXT_DURATION_MS: u64 = 15000;

const SCHEDULER_FLOW: &str = "flow://flows/sessions";
const SCHEDULER_MESSAGE: &str = "It's time to practice thinking flexibly! Head over to \
     Mindtrails Movement for your scheduled session.";

/// All input kinds a sheet may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Picker,
    Slider,
    Entry,
    Buttons,
    Scheduler,
    /// Multiselect buttons.
    Checkbox,
    TimedText,
    /// Word puzzles are built by the scenario groups; the kind only gates navigation.
    Puzzle,
}

impl InputKind {
    /// Parse a declared kind, ignoring case.
    ///
    /// A blank cell means the page has no input.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let kind = match raw.trim().to_lowercase().as_str() {
            "" => return Ok(None),
            "picker" => InputKind::Picker,
            "slider" => InputKind::Slider,
            "entry" => InputKind::Entry,
            "buttons" => InputKind::Buttons,
            "scheduler" => InputKind::Scheduler,
            "checkbox" => InputKind::Checkbox,
            "timedtext" => InputKind::TimedText,
            "puzzle" => InputKind::Puzzle,
            _ => return Err(ModelError::UnknownInputKind(raw.trim().to_string())),
        };
        Ok(Some(kind))
    }

    /// Build the element for this kind.
    ///
    /// `items` feeds pickers, buttons and slider side choices; `texts` feeds
    /// timed text. Returns `None` for [`InputKind::Puzzle`].
    pub fn build(&self, spec: InputSpec) -> Option<Element> {
        let InputSpec {
            items,
            min,
            max,
            texts,
        } = spec;

        let element = match self {
            InputKind::Picker => Element::Picker {
                items: items.unwrap_or_default(),
                meta: InputMeta::default(),
            },
            InputKind::Slider => Element::Slider {
                min,
                max,
                others: items.unwrap_or_else(|| vec![DEFAULT_SLIDER_OTHERS.to_string()]),
                meta: InputMeta::default(),
            },
            InputKind::Entry => Element::entry(),
            InputKind::Buttons => {
                let buttons = items.unwrap_or_default();
                let column_count = is_yes_no(buttons.as_slice()).then_some(2);
                Element::Buttons {
                    buttons,
                    selectable: true,
                    multiselect: false,
                    column_count,
                    correct_value: None,
                    feedback: None,
                    meta: InputMeta::default(),
                }
            }
            InputKind::Scheduler => Element::Scheduler {
                days_ahead: 1,
                flow: SCHEDULER_FLOW.to_string(),
                count: 2,
                message: SCHEDULER_MESSAGE.to_string(),
                meta: InputMeta::named("schedule_session"),
            },
            InputKind::Checkbox => Element::Buttons {
                buttons: items.unwrap_or_default(),
                selectable: true,
                multiselect: true,
                column_count: None,
                correct_value: None,
                feedback: None,
                meta: InputMeta::default(),
            },
            InputKind::TimedText => Element::TimedText {
                texts: texts.unwrap_or_default(),
                duration: TIMED_TEXT_DURATION_MS,
                meta: InputMeta::default(),
            },
            InputKind::Puzzle => return None,
        };

        Some(element)
    }
}

/// Values an input element may draw on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSpec {
    pub items: Option<Vec<String>>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub texts: Option<Vec<String>>,
}

impl InputSpec {
    /// Spec carrying only a list of items.
    pub fn with_items(items: Option<Vec<String>>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Spec carrying only timed texts.
    pub fn with_texts(texts: Option<Vec<String>>) -> Self {
        Self {
            texts,
            ..Default::default()
        }
    }
}

/// Parse an optional whole number cell.
pub fn parse_number(field: &'static str, raw: &str) -> Result<Option<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ModelError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })
}
