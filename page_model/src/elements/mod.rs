//! Element definitions - the building blocks of a page.

mod inputs;

pub use inputs::*;

use serde::{Deserialize, Serialize};

/// Feedback shown on pages that check an answer.
pub const CORRECT_FEEDBACK: &str = "Correct!";
pub const INCORRECT_FEEDBACK: &str =
    "Whoops! That doesn't look right. Please wait a moment and try again.";
/// Milliseconds before a wrong answer can be retried.
pub const INCORRECT_DELAY_MS: u64 = 5000;
/// Milliseconds before a word puzzle shows its letters.
pub const PUZZLE_DISPLAY_DELAY_MS: u64 = 2000;

/// Identity of an input for the app's response data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputMeta {
    /// Name the response is saved under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Variable later visibility conditions refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
}

impl InputMeta {
    /// Meta with only a response name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            variable_name: None,
        }
    }
}

/// Feedback for inputs that have a correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub correct_feedback: String,
    pub incorrect_feedback: String,
    pub incorrect_delay: u64,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            correct_feedback: CORRECT_FEEDBACK.to_string(),
            incorrect_feedback: INCORRECT_FEEDBACK.to_string(),
            incorrect_delay: INCORRECT_DELAY_MS,
        }
    }
}

/// A single unit of page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        html: bool,
    },

    Media {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        border: Option<bool>,
    },

    Label {
        text: String,
    },

    Entry {
        #[serde(flatten)]
        meta: InputMeta,
    },

    Picker {
        items: Vec<String>,
        #[serde(flatten)]
        meta: InputMeta,
    },

    Slider {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        others: Vec<String>,
        #[serde(flatten)]
        meta: InputMeta,
    },

    Buttons {
        buttons: Vec<String>,
        selectable: bool,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        multiselect: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_count: Option<u32>,
        /// Set when the buttons form a question with one right answer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_value: Option<String>,
        #[serde(flatten)]
        feedback: Option<Feedback>,
        #[serde(flatten)]
        meta: InputMeta,
    },

    Scheduler {
        days_ahead: u32,
        flow: String,
        count: u32,
        message: String,
        #[serde(flatten)]
        meta: InputMeta,
    },

    TimedText {
        texts: Vec<String>,
        duration: u64,
        #[serde(flatten)]
        meta: InputMeta,
    },

    WordPuzzle {
        words: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        missing_letter_count: Option<u8>,
        display_delay: u64,
        #[serde(flatten)]
        feedback: Feedback,
        #[serde(flatten)]
        meta: InputMeta,
    },
}

impl Element {
    /// Plain text element.
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text {
            text: text.into(),
            html: false,
        }
    }

    /// Text element rendered as HTML.
    pub fn html(text: impl Into<String>) -> Self {
        Element::Text {
            text: text.into(),
            html: true,
        }
    }

    /// Media element without a border setting.
    pub fn media(url: impl Into<String>) -> Self {
        Element::Media {
            url: url.into(),
            border: None,
        }
    }

    /// Media element with an explicit border setting.
    pub fn framed_media(url: impl Into<String>, border: bool) -> Self {
        Element::Media {
            url: url.into(),
            border: Some(border),
        }
    }

    /// Label element.
    pub fn label(text: impl Into<String>) -> Self {
        Element::Label { text: text.into() }
    }

    /// Free-text entry.
    pub fn entry() -> Self {
        Element::Entry {
            meta: InputMeta::default(),
        }
    }

    /// Free-text entry saved under `name`.
    pub fn named_entry(name: impl Into<String>) -> Self {
        Element::Entry {
            meta: InputMeta::named(name),
        }
    }

    /// Word puzzle for a single target word.
    pub fn word_puzzle(name: impl Into<String>, word: impl Into<String>) -> Self {
        Element::WordPuzzle {
            words: vec![word.into()],
            missing_letter_count: None,
            display_delay: PUZZLE_DISPLAY_DELAY_MS,
            feedback: Feedback::default(),
            meta: InputMeta::named(name),
        }
    }

    /// Single-answer question rendered as one column of buttons.
    pub fn question(
        name: impl Into<String>,
        choices: Vec<String>,
        correct_value: impl Into<String>,
    ) -> Self {
        Element::Buttons {
            buttons: choices,
            selectable: false,
            multiselect: false,
            column_count: Some(1),
            correct_value: Some(correct_value.into()),
            feedback: Some(Feedback::default()),
            meta: InputMeta::named(name),
        }
    }

    /// Response metadata, for input elements.
    pub fn meta(&self) -> Option<&InputMeta> {
        match self {
            Element::Entry { meta }
            | Element::Picker { meta, .. }
            | Element::Slider { meta, .. }
            | Element::Buttons { meta, .. }
            | Element::Scheduler { meta, .. }
            | Element::TimedText { meta, .. }
            | Element::WordPuzzle { meta, .. } => Some(meta),
            Element::Text { .. } | Element::Media { .. } | Element::Label { .. } => None,
        }
    }

    fn meta_mut(&mut self) -> Option<&mut InputMeta> {
        match self {
            Element::Entry { meta }
            | Element::Picker { meta, .. }
            | Element::Slider { meta, .. }
            | Element::Buttons { meta, .. }
            | Element::Scheduler { meta, .. }
            | Element::TimedText { meta, .. }
            | Element::WordPuzzle { meta, .. } => Some(meta),
            Element::Text { .. } | Element::Media { .. } | Element::Label { .. } => None,
        }
    }

    /// Check if this element collects a response.
    pub fn is_input(&self) -> bool {
        self.meta().is_some()
    }

    /// Name the response of an input element. No-op for content elements.
    pub fn set_name(&mut self, name: impl Into<String>) {
        if let Some(meta) = self.meta_mut() {
            meta.name = Some(name.into());
        }
    }

    /// Bind an input element to a condition variable. No-op for content elements.
    pub fn set_variable_name(&mut self, variable_name: impl Into<String>) {
        if let Some(meta) = self.meta_mut() {
            meta.variable_name = Some(variable_name.into());
        }
    }

    /// Set the number of hidden letters of a word puzzle.
    pub fn with_missing_letters(mut self, count: u8) -> Self {
        if let Element::WordPuzzle {
            missing_letter_count,
            ..
        } = &mut self
        {
            *missing_letter_count = Some(count);
        }
        self
    }
}
