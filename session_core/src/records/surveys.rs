//! Survey-style sheets: survey questions, write-your-own, discrimination,
//! reminders and lessons learned.

use std::collections::BTreeMap;

use super::{cell, trimmed};
use crate::sources::Row;

/// Subgroup name whose rows expand into the dose-1 practice scenarios.
pub const PRACTICE_SUBGROUP: &str = "Practice CBM-I";

/// A row of the survey-question sheet. The write-your-own sheet shares the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyRecord {
    pub subgroup: String,
    pub title: String,
    pub dose: String,
    pub subject: String,
    pub text: String,
    pub input_1: String,
    pub input_2: String,
    pub minimum: String,
    pub maximum: String,
    pub media: String,
    pub items: String,
    pub image_framed: bool,
    pub timeout: String,
    pub show_buttons: String,
    pub variable_name: String,
    pub conditions: String,
    pub input_name: String,
}

impl SurveyRecord {
    pub fn from_row(row: &[String]) -> Self {
        Self {
            subgroup: cell(row, 0),
            title: trimmed(row, 1),
            dose: cell(row, 2),
            subject: cell(row, 3),
            text: cell(row, 4),
            input_1: trimmed(row, 5),
            input_2: trimmed(row, 6),
            minimum: trimmed(row, 7),
            maximum: trimmed(row, 8),
            media: cell(row, 9),
            items: cell(row, 10),
            image_framed: trimmed(row, 11).eq_ignore_ascii_case("true"),
            timeout: trimmed(row, 12),
            show_buttons: trimmed(row, 13),
            variable_name: trimmed(row, 16),
            conditions: cell(row, 17),
            input_name: trimmed(row, 18),
        }
    }

    /// Flow key used by the session stage: `{subject}_{dose}`, lowercased.
    pub fn lookup_id(&self) -> String {
        format!("{}_{}", self.subject, self.dose).to_lowercase()
    }

    /// Flow key used by the survey stage: `(dose, subject)`, lowercased.
    pub fn group_id(&self) -> (String, String) {
        (self.dose.to_lowercase(), self.subject.to_lowercase())
    }

    pub fn is_practice(&self) -> bool {
        self.subgroup == PRACTICE_SUBGROUP
    }
}

/// A row of the discrimination sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscriminationRecord {
    pub title: String,
    pub text: String,
    pub input: String,
    pub items: String,
    pub variable_name: String,
    pub conditions: String,
    pub input_name: String,
}

impl DiscriminationRecord {
    pub fn from_row(row: &[String]) -> Self {
        Self {
            title: cell(row, 0),
            text: cell(row, 1),
            input: trimmed(row, 2),
            items: cell(row, 7),
            variable_name: trimmed(row, 13),
            conditions: cell(row, 14),
            input_name: trimmed(row, 15),
        }
    }
}

/// A row of the reminder sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderRecord {
    /// A dose ordinal, or a marker starting with `<`.
    pub key: String,
    /// Lowercased page locator or heading needle.
    pub page: String,
    pub position: String,
    pub content: String,
}

impl ReminderRecord {
    pub fn from_row(row: &[String]) -> Self {
        Self {
            key: trimmed(row, 0),
            page: trimmed(row, 1).to_lowercase(),
            position: trimmed(row, 2).to_lowercase(),
            content: cell(row, 4),
        }
    }
}

/// Lessons-learned text by domain.
pub fn lessons_learned(rows: &[Row]) -> BTreeMap<String, String> {
    rows.iter()
        .map(|row| (cell(row, 0), cell(row, 1)))
        .collect()
}
