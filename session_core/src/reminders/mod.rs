//! Reminder Injector - attaches supplementary content to located pages.
//!
//! Two kinds of reminders are authored in one sheet:
//! - **Dose reminders** are keyed by a dose ordinal and find their page with
//!   a [`Locator`] such as `scenario 3` / `after`.
//! - **Heading reminders** are keyed by a marker starting with `<` and attach
//!   to every before-domain survey page whose heading contains a needle.
//!
//! Injection never adds or removes pages; it sets the information block of
//! at most one page per reminder. A locator that matches nothing is a no-op.

use std::collections::BTreeMap;

use page_model::text::has_value;
use page_model::{Dose, Element, Information, Page, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::records::ReminderRecord;
use crate::sources::MediaStore;

const HEADING_MARKER: char = '<';
const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Which scenario a dose reminder is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The first scenario tagged negative.
    FirstNegative,
    /// The Nth scenario of the dose, 1-indexed.
    Scenario(usize),
}

/// A scenario target plus which side of it the reminder sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub target: Target,
    pub position: Position,
}

impl Locator {
    /// Parse `first negative` or `scenario N`, and `before` or `after`.
    pub fn parse(target: &str, position: &str) -> Result<Self> {
        let normalized = target.trim().to_lowercase();
        let target = if normalized == "first negative" {
            Target::FirstNegative
        } else {
            normalized
                .strip_prefix("scenario")
                .and_then(|number| number.trim().parse::<usize>().ok())
                .filter(|number| *number > 0)
                .map(Target::Scenario)
                .ok_or_else(|| BuildError::InvalidLocator(target.trim().to_string()))?
        };

        Ok(Self {
            target,
            position: Position::parse(position)?,
        })
    }
}

/// Find the page a locator points at.
///
/// Scenario groups are delimited by changes of the scenario ordinal. `Before`
/// resolves to the first page of the matched group and `After` to its last.
pub fn locate<'a>(pages: impl IntoIterator<Item = &'a Page>, locator: &Locator) -> Option<usize> {
    // (first page index, first page is negative) per group
    let mut groups: Vec<(usize, bool)> = Vec::new();
    let mut current: Option<Option<usize>> = None;
    let mut page_count = 0;

    for (index, page) in pages.into_iter().enumerate() {
        if current != Some(page.scenario) {
            current = Some(page.scenario);
            groups.push((index, page.is_negative()));
        }
        page_count = index + 1;
    }

    let group = match locator.target {
        Target::FirstNegative => groups.iter().position(|(_, negative)| *negative)?,
        Target::Scenario(number) => number.checked_sub(1)?,
    };
    let (start, _) = *groups.get(group)?;

    match locator.position {
        Position::Before => Some(start),
        Position::After => match groups.get(group + 1) {
            Some((next_start, _)) => Some(next_start - 1),
            None => Some(page_count - 1),
        },
    }
}

/// Attach `information` to the located page, if any.
pub fn inject(mut pages: Vec<Page>, locator: &Locator, information: &Information) -> Vec<Page> {
    if let Some(index) = locate(pages.iter(), locator) {
        pages[index].information = Some(information.clone());
    }
    pages
}

/// Build the information block for authored reminder content.
///
/// Image file names become media; anything else is shown as text. Blank
/// content attaches nothing.
pub fn reminder_information(
    content: &str,
    position: Position,
    count: u32,
    media: &MediaStore,
) -> Result<Option<Information>> {
    if !has_value(content) {
        return Ok(None);
    }

    let lowered = content.to_lowercase();
    let element = if IMAGE_EXTENSIONS.iter().any(|ext| lowered.contains(ext)) {
        match media.resolve(content)? {
            Some(url) => Element::media(url),
            None => return Ok(None),
        }
    } else {
        Element::text(content.to_string())
    };

    Ok(Some(Information {
        elements: vec![element],
        position,
        information_count: count,
    }))
}

/// How often the app repeats each kind of reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatCounts {
    pub dose: u32,
    pub heading: u32,
}

impl Default for RepeatCounts {
    fn default() -> Self {
        Self { dose: 1, heading: 3 }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DoseReminder {
    locator: Locator,
    information: Information,
}

#[derive(Debug, Clone, PartialEq)]
struct HeadingReminder {
    needle: String,
    information: Information,
}

/// Every reminder of a run, loaded once and applied after assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderBook {
    by_dose: BTreeMap<usize, Vec<DoseReminder>>,
    by_heading: Vec<HeadingReminder>,
}

impl ReminderBook {
    /// Parse the reminder sheet. Rows with a blank key are ignored.
    pub fn from_records(
        records: &[ReminderRecord],
        media: &MediaStore,
        counts: RepeatCounts,
    ) -> Result<Self> {
        let mut book = Self::default();

        for record in records {
            if record.key.is_empty() {
                continue;
            }

            if record.key.starts_with(HEADING_MARKER) {
                let position = Position::parse(&record.position)?;
                if let Some(information) =
                    reminder_information(&record.content, position, counts.heading, media)?
                {
                    book.by_heading.push(HeadingReminder {
                        needle: record.page.clone(),
                        information,
                    });
                }
                continue;
            }

            let ordinal: usize = record
                .key
                .parse()
                .map_err(|_| BuildError::InvalidReminderKey(record.key.clone()))?;
            let locator = Locator::parse(&record.page, &record.position)?;

            if let Some(information) =
                reminder_information(&record.content, locator.position, counts.dose, media)?
            {
                book.by_dose
                    .entry(ordinal)
                    .or_default()
                    .push(DoseReminder { locator, information });
            }
        }

        Ok(book)
    }

    pub fn is_empty(&self) -> bool {
        self.by_dose.is_empty() && self.by_heading.is_empty()
    }

    /// Number of dose reminders keyed to `ordinal`.
    pub fn dose_reminder_count(&self, ordinal: usize) -> usize {
        self.by_dose.get(&ordinal).map(Vec::len).unwrap_or(0)
    }

    /// Apply the reminders keyed to the dose's ordinal.
    pub fn apply_to_dose(&self, dose: &mut Dose) {
        let Some(reminders) = self.by_dose.get(&dose.ordinal) else {
            return;
        };

        for reminder in reminders {
            match locate(dose.pages(), &reminder.locator) {
                Some(index) => {
                    if let Some(page) = dose.page_mut(index) {
                        page.information = Some(reminder.information.clone());
                    }
                }
                None => debug!(
                    dose = dose.ordinal,
                    locator = ?reminder.locator,
                    "Reminder target not found, skipping"
                ),
            }
        }
    }

    /// Apply heading reminders to every page whose heading contains the needle.
    pub fn apply_to_survey(&self, pages: &mut [Page]) {
        for reminder in &self.by_heading {
            for page in pages.iter_mut().filter(|page| page.heading_contains(&reminder.needle)) {
                page.information = Some(reminder.information.clone());
            }
        }
    }
}
