//! Long-scenario page groups.
//!
//! Every long scenario is laid out by the same page template; the template
//! rows name the scenario and its description through placeholders.

use page_model::text::{clean_up_unicode, has_value};
use page_model::{
    parse_timeout, AdvanceTrigger, Element, GroupRole, InputKind, InputSpec, NavigationCondition,
    Page, PageGroup,
};

use crate::error::Result;
use crate::records::{LongScenarioRecord, LongTemplateRecord};
use crate::rng::{channels, ShuffleRegistry};
use crate::sources::MediaStore;

const NAME_PLACEHOLDER: &str = "[Scenario_Name]";
const DESCRIPTION_PLACEHOLDER: &str = "[Scenario_Description]";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplatePage {
    heading: String,
    body: String,
    input: Option<InputKind>,
    is_image: bool,
    timeout_ms: Option<u64>,
}

/// The page template shared by all long scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongTemplate {
    pages: Vec<TemplatePage>,
}

impl LongTemplate {
    pub fn from_records(records: &[LongTemplateRecord]) -> Result<Self> {
        let pages = records
            .iter()
            .map(|record| {
                Ok(TemplatePage {
                    heading: record.heading.clone(),
                    body: record.body.clone(),
                    input: InputKind::parse(&record.input)?,
                    is_image: record.is_image,
                    timeout_ms: parse_timeout(&record.timeout)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pages })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// One long scenario ready to be laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongScenario {
    pub label: String,
    pub description: String,
    pub thoughts: Vec<String>,
    pub feelings: Vec<String>,
    pub behaviors: Vec<String>,
    pub image: Option<String>,
}

impl LongScenario {
    /// Returns `None` for rows without a label or description.
    pub fn from_record(record: &LongScenarioRecord, media: &MediaStore) -> Result<Option<Self>> {
        if !has_value(&record.label) || !has_value(&record.description) {
            return Ok(None);
        }

        let present = |values: &[String]| -> Vec<String> {
            values.iter().filter(|value| has_value(value)).cloned().collect()
        };

        Ok(Some(Self {
            label: record.label.trim().to_string(),
            description: record.description.clone(),
            thoughts: present(&record.thoughts),
            feelings: present(&record.feelings),
            behaviors: present(&record.behaviors),
            image: media.resolve(&record.image)?,
        }))
    }

    /// Responses a timed-text page cycles through, picked by what its body asks about.
    fn responses_for(&self, body: &str) -> Vec<String> {
        let body = body.to_lowercase();
        if body.contains("thoughts") {
            self.thoughts.clone()
        } else if body.contains("feelings") {
            self.feelings.clone()
        } else if body.contains("behaviors") {
            self.behaviors.clone()
        } else {
            Vec::new()
        }
    }
}

/// Lay a long scenario out on the template.
///
/// Timed-text responses are shuffled on the `long_pages` channel.
pub fn long_group(
    template: &LongTemplate,
    scenario: &LongScenario,
    rng: &mut ShuffleRegistry,
) -> PageGroup {
    let mut pages = Vec::with_capacity(template.len());

    for row in &template.pages {
        let heading = row.heading.replace(NAME_PLACEHOLDER, &scenario.label);
        let body = clean_up_unicode(&row.body.replace(DESCRIPTION_PLACEHOLDER, &scenario.description));

        let media = if row.is_image {
            scenario
                .image
                .as_ref()
                .map(|url| Element::framed_media(url.clone(), true))
        } else {
            None
        };

        let input = row.input.and_then(|kind| {
            let texts = (kind == InputKind::TimedText).then(|| {
                let mut texts = scenario.responses_for(&body);
                rng.shuffle(channels::LONG_PAGES, &mut texts);
                texts
            });
            kind.build(InputSpec::with_texts(texts))
        });

        let advance = match (row.timeout_ms, row.input) {
            (Some(_), _) => Some(AdvanceTrigger::AfterTimeout),
            (None, Some(InputKind::TimedText)) => Some(AdvanceTrigger::WhenComplete),
            _ => None,
        };
        let inputs: Vec<InputKind> = row.input.into_iter().collect();

        pages.push(
            Page::new(heading)
                .with_elements([Some(Element::text(body)), media, input])
                .with_navigation(NavigationCondition::derive(advance, row.timeout_ms, &inputs)),
        );
    }

    PageGroup::new(GroupRole::LongScenario, pages)
}
