//! Page documents - the unit the delivery app renders one screen at a time.

mod group;

pub use group::*;

use serde::{Deserialize, Serialize};

use crate::conditions::{NavigationCondition, VisibilityCondition};
use crate::elements::Element;
use crate::error::{ModelError, Result};

/// Icon shown beside every page heading.
pub const DEFAULT_HEADER_ICON: &str = "assets/subtitle.png";

/// Kind tag marking pages of a negative scenario.
pub const NEGATIVE_KIND: &str = "negative";

/// Where supplementary content sits relative to its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    After,
}

impl Position {
    /// Parse `before` / `after`, ignoring case.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "before" => Ok(Position::Before),
            "after" => Ok(Position::After),
            _ => Err(ModelError::UnknownPosition(raw.trim().to_string())),
        }
    }
}

/// Supplementary content attached to a page (reminders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Information {
    pub elements: Vec<Element>,
    pub position: Position,
    /// How many times the app repeats the content.
    pub information_count: u32,
}

/// One screen's worth of content and at most one navigation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_icon: Option<String>,

    pub elements: Vec<Element>,

    #[serde(
        rename = "navigation_conditions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub navigation: Option<NavigationCondition>,

    #[serde(rename = "condition", default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityCondition>,

    /// Ordinal of the scenario this page belongs to within its dose.
    #[serde(rename = "scenario_num", default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<usize>,

    /// Free-form tag such as [`NEGATIVE_KIND`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<Information>,
}

impl Page {
    /// Create a page with a heading and the default heading icon.
    pub fn new(header_text: impl Into<String>) -> Self {
        Self {
            header_text: Some(header_text.into()),
            header_icon: Some(DEFAULT_HEADER_ICON.to_string()),
            ..Self::untitled()
        }
    }

    /// Create a page without a heading.
    pub fn untitled() -> Self {
        Self {
            header_text: None,
            header_icon: None,
            elements: Vec::new(),
            navigation: None,
            visibility: None,
            scenario: None,
            kind: None,
            information: None,
        }
    }

    /// Add an element.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Add every present element, in order.
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = Option<Element>>) -> Self {
        self.elements.extend(elements.into_iter().flatten());
        self
    }

    /// Set the navigation rule.
    pub fn with_navigation(mut self, navigation: Option<NavigationCondition>) -> Self {
        self.navigation = navigation;
        self
    }

    /// Set the visibility rule.
    pub fn with_visibility(mut self, visibility: Option<VisibilityCondition>) -> Self {
        self.visibility = visibility;
        self
    }

    /// Check whether this page carries the negative kind tag.
    pub fn is_negative(&self) -> bool {
        self.kind.as_deref() == Some(NEGATIVE_KIND)
    }

    /// Check whether the heading contains `needle`, ignoring case.
    pub fn heading_contains(&self, needle: &str) -> bool {
        self.header_text
            .as_deref()
            .map(|heading| heading.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }
}
