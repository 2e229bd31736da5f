//! Resource sheets: motivational statements, tips, emotion-regulation
//! strategies and the on-demand library.

use std::collections::BTreeMap;

use super::{cell, trimmed};
use crate::error::{BuildError, Result};
use crate::sources::{Row, Table};

/// A labelled piece of post-dose resource text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStatement {
    pub label: String,
    pub text: String,
}

impl ResourceStatement {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Rows with text in column 1, numbered from 1 with `label`.
fn numbered(rows: &[Row], label: &str) -> Vec<ResourceStatement> {
    rows.iter()
        .map(|row| cell(row, 1))
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(index, text)| ResourceStatement::new(format!("{} #{}", label, index + 1), text))
        .collect()
}

/// Motivational statements from column 1.
pub fn motivational_statements(rows: &[Row]) -> Vec<ResourceStatement> {
    numbered(rows, "Motivational Statement")
}

/// Tips for applying lessons learned, from column 1.
pub fn tips(rows: &[Row]) -> Vec<ResourceStatement> {
    numbered(rows, "Tip")
}

/// Emotion-regulation strategies by domain.
///
/// The header names one domain per column starting at column 1. Row `i`
/// (1-indexed) contributes strategy `#i` to every domain with a value in its
/// column.
pub fn regulation_strategies(table: &Table) -> BTreeMap<String, Vec<ResourceStatement>> {
    let domains: Vec<String> = table
        .header
        .iter()
        .skip(1)
        .map(|domain| domain.trim().to_string())
        .collect();

    let mut strategies: BTreeMap<String, Vec<ResourceStatement>> = domains
        .iter()
        .map(|domain| (domain.clone(), Vec::new()))
        .collect();

    for (number, row) in table.rows.iter().enumerate() {
        for (column, domain) in domains.iter().enumerate() {
            let text = cell(row, column + 1);
            if text.is_empty() {
                continue;
            }
            if let Some(list) = strategies.get_mut(domain) {
                list.push(ResourceStatement::new(
                    format!("Emotion Regulation Strategy #{}", number + 1),
                    text,
                ));
            }
        }
    }

    strategies
}

/// A row of the on-demand resource library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryResourceRecord {
    pub domain: String,
    pub subdomain: String,
    pub name: String,
    pub link: String,
    pub text: String,
}

impl LibraryResourceRecord {
    /// Library rows have exactly five columns; `index` is only used in errors.
    pub fn from_row(row: &[String], index: usize) -> Result<Self> {
        match row {
            [_, _, _, _, _] => Ok(Self {
                domain: trimmed(row, 0),
                subdomain: trimmed(row, 1),
                name: cell(row, 2),
                link: trimmed(row, 3),
                text: cell(row, 4),
            }),
            _ => Err(BuildError::MalformedRow {
                source_name: "resource library".to_string(),
                row: index,
                reason: format!("expected 5 columns, found {}", row.len()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::row;

    #[test]
    fn test_statements_skip_blank_rows() {
        let rows = vec![row(&["1", "Keep going."]), row(&["2", ""]), row(&["3", "You can do it."])];

        let statements = motivational_statements(&rows);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].label, "Motivational Statement #1");
        assert_eq!(statements[1], ResourceStatement::new("Motivational Statement #2", "You can do it."));

        assert_eq!(tips(&rows)[1].label, "Tip #2");
    }

    #[test]
    fn test_regulation_columns_follow_header() {
        let table = Table {
            header: row(&["", "Finances", "Mental Health"]),
            rows: vec![
                row(&["1", "Budget calmly.", "Take a walk."]),
                row(&["2", "", "Call a friend."]),
            ],
        };

        let strategies = regulation_strategies(&table);
        assert_eq!(strategies["Finances"].len(), 1);
        assert_eq!(strategies["Finances"][0].text, "Budget calmly.");
        assert_eq!(strategies["Mental Health"].len(), 2);
        assert_eq!(strategies["Mental Health"][1].label, "Emotion Regulation Strategy #2");
    }

    #[test]
    fn test_library_record_requires_five_columns() {
        let record = LibraryResourceRecord::from_row(
            &row(&["Finances", "Budgeting", "Guide", "https://example.org", "Read this"]),
            1,
        )
        .unwrap();
        assert_eq!(record.subdomain, "Budgeting");
        assert_eq!(record.link, "https://example.org");

        assert!(matches!(
            LibraryResourceRecord::from_row(&row(&["Finances", "Budgeting"]), 2),
            Err(BuildError::MalformedRow { row: 2, .. })
        ));
    }
}
