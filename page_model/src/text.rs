//! Helpers for authored text: clean-up, blank detection and word puzzles.

/// Replacements applied to every authored string, in order.
///
/// Spreadsheet exports carry smart punctuation and mis-decoded apostrophes;
/// the app renders plain ASCII punctuation more reliably.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{00e2}\u{20ac}\u{2122}", "'"),
    ("\u{2026}", "..."),
    ("\u{2013}", " - "),
    ("\u{2014}", " - "),
    ("\u{201c}", "\""),
    ("\u{201d}", "\""),
    ("\\n", "\n"),
    ("\u{2019}", "'"),
    ("\u{00f1}", "n"),
    ("  ", " "),
];

/// Normalize punctuation in authored text and trim surrounding whitespace.
pub fn clean_up_unicode(text: &str) -> String {
    let mut cleaned = text.to_string();
    for (from, to) in REPLACEMENTS {
        cleaned = cleaned.replace(from, to);
    }
    cleaned.trim().to_string()
}

/// Check whether a cell holds real content (not blank and not an NA marker).
pub fn has_value(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !matches!(trimmed.to_uppercase().as_str(), "NA" | "N/A" | "N\\A")
}

/// `Some(trimmed)` when the cell has a value.
pub fn non_blank(value: &str) -> Option<String> {
    has_value(value).then(|| value.trim().to_string())
}

/// Check whether a set of choices is exactly yes/no, ignoring case.
pub fn is_yes_no<S: AsRef<str>>(values: &[S]) -> bool {
    let mut lowered: Vec<String> = values.iter().map(|v| v.as_ref().to_lowercase()).collect();
    lowered.sort();
    lowered.dedup();
    lowered == ["no", "yes"]
}

/// Escape characters that cannot appear in a single path segment.
pub fn dir_safe(text: &str) -> String {
    text.replace('/', "%2F")
        .replace('\\', "%5C")
        .replace('+', "%2B")
}

/// Split an authored item list ("a; b; c") into cleaned items.
///
/// Returns `None` when the cell holds no items.
pub fn parse_items(raw: &str) -> Option<Vec<String>> {
    let cleaned = clean_up_unicode(raw);
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.split("; ").map(str::to_string).collect())
}

/// A word puzzle derived from a scenario sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// The sentence with its final word replaced by "..".
    pub prompt: String,
    /// The word the user has to complete.
    pub word: String,
}

impl Puzzle {
    /// Derive a puzzle from the last word of a sentence.
    ///
    /// Returns `None` for blank or NA sentences.
    pub fn from_sentence(sentence: &str) -> Option<Self> {
        if !has_value(sentence) {
            return None;
        }

        let last = sentence.split_whitespace().last()?;
        let word = last.trim_matches(|c| matches!(c, '?' | '.' | '!')).to_string();

        let needle = format!(" {}", word);
        let prompt = match sentence.rfind(&needle) {
            Some(index) => format!(
                "{}..{}",
                &sentence[..index],
                &sentence[index + needle.len()..]
            ),
            None => sentence.to_string(),
        };

        Some(Self { prompt, word })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_up_unicode() {
        assert_eq!(clean_up_unicode("  It\u{2019}s fine\u{2026} "), "It's fine...");
        assert_eq!(clean_up_unicode("one\u{2014}two"), "one - two");
        assert_eq!(clean_up_unicode("\u{201c}quoted\u{201d}"), "\"quoted\"");
        assert_eq!(clean_up_unicode("line\\nbreak"), "line\nbreak");
        assert_eq!(clean_up_unicode(""), "");
    }

    #[test]
    fn test_has_value() {
        assert!(has_value("word"));
        assert!(!has_value(""));
        assert!(!has_value("   "));
        assert!(!has_value("NA"));
        assert!(!has_value("n/a"));
        assert!(!has_value("N\\A"));
    }

    #[test]
    fn test_is_yes_no() {
        assert!(is_yes_no(&["Yes", "no"]));
        assert!(is_yes_no(&["NO", "yes", "Yes"]));
        assert!(!is_yes_no(&["Happy", "Sad"]));
        assert!(!is_yes_no(&["yes"]));
        assert!(!is_yes_no::<&str>(&[]));
    }

    #[test]
    fn test_dir_safe() {
        assert_eq!(dir_safe("Work/Career Development"), "Work%2FCareer Development");
        assert_eq!(dir_safe("a\\b+c"), "a%5Cb%2Bc");
    }

    #[test]
    fn test_parse_items() {
        assert_eq!(
            parse_items("Never; Sometimes; Often"),
            Some(vec!["Never".to_string(), "Sometimes".to_string(), "Often".to_string()])
        );
        assert_eq!(parse_items(""), None);
        assert_eq!(parse_items("  "), None);
    }

    #[test]
    fn test_puzzle_from_sentence() {
        let puzzle = Puzzle::from_sentence("You finally feel at home.").unwrap();
        assert_eq!(puzzle.word, "home");
        assert_eq!(puzzle.prompt, "You finally feel at...");

        let question = Puzzle::from_sentence("Is it going to be okay?").unwrap();
        assert_eq!(question.word, "okay");
        assert_eq!(question.prompt, "Is it going to be..?");
    }

    #[test]
    fn test_puzzle_replaces_last_occurrence_only() {
        let puzzle = Puzzle::from_sentence("Calm people stay calm").unwrap();
        assert_eq!(puzzle.word, "calm");
        assert_eq!(puzzle.prompt, "Calm people stay..");
    }

    #[test]
    fn test_puzzle_blank_sentence() {
        assert!(Puzzle::from_sentence("").is_none());
        assert!(Puzzle::from_sentence("NA").is_none());
    }
}
