//! Typed records - one per sheet layout.
//!
//! Each sheet addresses its fields by column position. Rows are turned into
//! records right after reading so nothing downstream indexes a raw row.

mod resources;
mod scenarios;
mod surveys;

pub use resources::*;
pub use scenarios::*;
pub use surveys::*;

/// Text of column `index`, or an empty string when the row is short.
pub(crate) fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// Trimmed text of column `index`.
pub(crate) fn trimmed(row: &[String], index: usize) -> String {
    cell(row, index).trim().to_string()
}

#[cfg(test)]
pub(crate) fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let values = row(&["a", " b "]);
        assert_eq!(cell(&values, 0), "a");
        assert_eq!(trimmed(&values, 1), "b");
        assert_eq!(cell(&values, 9), "");
    }
}
