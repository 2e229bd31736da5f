//! Scenario sheets: short scenarios, dose-1 practice, long scenarios and the
//! long-scenario page template.

use super::{cell, trimmed};

/// Label fragment marking a write-your-own row in the short-scenario sheet.
pub const WRITE_YOUR_OWN_MARKER: &str = "write your own";

/// Column holding the missing-letter policy in the short-scenario sheet.
const MISSING_LETTERS_COLUMN: usize = 21;

/// The block of puzzle columns shared by scenario sheets.
///
/// `offset` points at the first scenario sentence; the population decides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioFields {
    pub sentence_1: String,
    pub sentence_2: String,
    pub question: String,
    /// The correct answer is always authored first.
    pub answer: String,
    pub other_choice: String,
    pub image: String,
}

impl ScenarioFields {
    fn from_row(row: &[String], offset: usize) -> Self {
        Self {
            sentence_1: cell(row, offset),
            sentence_2: cell(row, offset + 1),
            question: cell(row, offset + 2),
            answer: trimmed(row, offset + 3),
            other_choice: trimmed(row, offset + 4),
            image: cell(row, offset + 6),
        }
    }

    /// Both choices in authored order.
    pub fn choices(&self) -> Vec<String> {
        vec![self.answer.clone(), self.other_choice.clone()]
    }
}

/// A row of the short-scenario sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortScenarioRecord {
    /// Lowercased kind tag, e.g. "negative".
    pub kind_tag: String,
    pub domain: String,
    pub label: String,
    pub fields: ScenarioFields,
    /// Blank when the previous policy still applies.
    pub missing_letters: String,
}

impl ShortScenarioRecord {
    pub fn from_row(row: &[String], offset: usize) -> Self {
        Self {
            kind_tag: trimmed(row, 2).to_lowercase(),
            domain: trimmed(row, 3),
            label: cell(row, 6),
            fields: ScenarioFields::from_row(row, offset),
            missing_letters: trimmed(row, MISSING_LETTERS_COLUMN),
        }
    }

    /// Rows without a domain or label carry no content.
    pub fn is_blank(&self) -> bool {
        self.domain.is_empty() || self.label.is_empty()
    }

    pub fn is_write_your_own(&self) -> bool {
        self.label.to_lowercase().contains(WRITE_YOUR_OWN_MARKER)
    }
}

/// A row of the dose-1 practice sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeScenarioRecord {
    pub domain: String,
    pub label: String,
    pub fields: ScenarioFields,
}

impl PracticeScenarioRecord {
    pub fn from_row(row: &[String], offset: usize) -> Self {
        Self {
            domain: trimmed(row, 0),
            label: cell(row, 3),
            fields: ScenarioFields::from_row(row, offset),
        }
    }
}

/// Number of thought, feeling and behavior columns in a long scenario.
const RESPONSE_COLUMNS: usize = 5;

/// A row of the long-scenario sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongScenarioRecord {
    pub domain: String,
    pub second_domain: Option<String>,
    pub label: String,
    pub image: String,
    pub description: String,
    pub thoughts: Vec<String>,
    pub feelings: Vec<String>,
    pub behaviors: Vec<String>,
}

impl LongScenarioRecord {
    /// Build the record, or `None` when the row stops before the behaviors.
    pub fn from_row(row: &[String], offset: usize) -> Option<Self> {
        if row.len() <= offset + 3 * RESPONSE_COLUMNS + 1 {
            return None;
        }

        let responses = |start: usize| -> Vec<String> {
            (start..start + RESPONSE_COLUMNS)
                .map(|index| trimmed(row, index))
                .collect()
        };

        let second_domain = trimmed(row, 1);
        Some(Self {
            domain: trimmed(row, 0),
            second_domain: (!second_domain.is_empty()).then_some(second_domain),
            label: cell(row, 3),
            image: cell(row, 21),
            description: cell(row, offset),
            thoughts: responses(offset + 2),
            feelings: responses(offset + 2 + RESPONSE_COLUMNS),
            behaviors: responses(offset + 2 + 2 * RESPONSE_COLUMNS),
        })
    }

    /// Domains this long scenario is served in.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.domain.as_str())
            .chain(self.second_domain.as_deref())
            .filter(|domain| !domain.is_empty())
    }
}

/// A row of the long-scenario page template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongTemplateRecord {
    pub heading: String,
    pub body: String,
    pub input: String,
    pub is_image: bool,
    pub timeout: String,
}

impl LongTemplateRecord {
    pub fn from_row(row: &[String]) -> Self {
        Self {
            heading: cell(row, 0),
            body: cell(row, 4),
            input: trimmed(row, 6),
            is_image: trimmed(row, 10).eq_ignore_ascii_case("true"),
            timeout: trimmed(row, 13),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::row;

    fn short_row(offset: usize) -> Vec<String> {
        let mut values = vec![String::new(); 22];
        values[2] = " Negative ".to_string();
        values[3] = " Finances ".to_string();
        values[6] = "Rent Day".to_string();
        values[offset] = "You pay the rent on time.".to_string();
        values[offset + 2] = "Did you pay?".to_string();
        values[offset + 3] = " Yes ".to_string();
        values[offset + 4] = "No".to_string();
        values[offset + 6] = "rent.jpg".to_string();
        values[21] = "2".to_string();
        values
    }

    #[test]
    fn test_short_scenario_record() {
        let record = ShortScenarioRecord::from_row(&short_row(7), 7);

        assert_eq!(record.kind_tag, "negative");
        assert_eq!(record.domain, "Finances");
        assert_eq!(record.label, "Rent Day");
        assert_eq!(record.fields.answer, "Yes");
        assert_eq!(record.fields.choices(), vec!["Yes", "No"]);
        assert_eq!(record.fields.image, "rent.jpg");
        assert_eq!(record.missing_letters, "2");
        assert!(!record.is_blank());
        assert!(!record.is_write_your_own());
    }

    #[test]
    fn test_write_your_own_marker() {
        let mut values = short_row(7);
        values[6] = "Write Your Own Scenario".to_string();
        assert!(ShortScenarioRecord::from_row(&values, 7).is_write_your_own());
    }

    #[test]
    fn test_practice_record() {
        let values = row(&["Finances", "", "", "Budget", "It adds up.", "", "Q?", "Yes", "No", "", "b.jpg"]);
        let record = PracticeScenarioRecord::from_row(&values, 4);
        assert_eq!(record.domain, "Finances");
        assert_eq!(record.label, "Budget");
        assert_eq!(record.fields.sentence_1, "It adds up.");
        assert_eq!(record.fields.image, "b.jpg");
    }

    #[test]
    fn test_long_record_requires_full_row() {
        assert!(LongScenarioRecord::from_row(&row(&["Finances", "", "", "Label"]), 4).is_none());

        let mut values = vec![String::new(); 22];
        values[0] = "Finances".to_string();
        values[1] = "Mental Health".to_string();
        values[3] = "The Bill".to_string();
        values[4] = "A bill arrives.".to_string();
        values[6] = "I can handle it".to_string();
        values[11] = "calm".to_string();
        values[16] = "open it".to_string();
        values[21] = "bill.jpg".to_string();

        let record = LongScenarioRecord::from_row(&values, 4).unwrap();
        assert_eq!(record.thoughts[0], "I can handle it");
        assert_eq!(record.feelings[0], "calm");
        assert_eq!(record.behaviors[0], "open it");
        assert_eq!(record.domains().collect::<Vec<_>>(), vec!["Finances", "Mental Health"]);
    }

    #[test]
    fn test_template_record() {
        let mut values = vec![String::new(); 14];
        values[0] = "[Scenario_Name]".to_string();
        values[4] = "Imagine [Scenario_Description]".to_string();
        values[6] = "TimedText".to_string();
        values[10] = "TRUE".to_string();
        values[13] = "30".to_string();

        let record = LongTemplateRecord::from_row(&values);
        assert!(record.is_image);
        assert_eq!(record.input, "TimedText");
        assert_eq!(record.timeout, "30");
    }
}
