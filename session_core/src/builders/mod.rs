//! Page builders - typed values in, one page out.
//!
//! Group builders live in the submodules: short scenarios, long scenarios
//! and the resource page that closes every dose.

mod long;
mod resource;
mod scenario;

pub use long::*;
pub use resource::*;
pub use scenario::*;

use page_model::text::{clean_up_unicode, has_value, non_blank, parse_items};
use page_model::{
    parse_number, parse_timeout, AdvanceTrigger, Element, InputKind, InputSpec,
    NavigationCondition, Page, VisibilityCondition,
};

use crate::error::Result;
use crate::records::{DiscriminationRecord, SurveyRecord};
use crate::sources::MediaStore;

/// Heading of write-your-own pages authored without a title.
pub const WRITE_YOUR_OWN_HEADING: &str = "Write Your Own";

const VIDEO_PROMPT: &str = "Please press play on the training video below to learn more!";

const SUBDOMAIN_SEPARATOR: &str = "<br/><br/><br/><br/>";

const INSTRUCTIONS_TEXT: &str = "The stories you're about to see are a little bit different than \
     ones you've seen before. Rather than fill in missing letters to complete the final word, \
     we're going to challenge you to generate your own final word that will complete the story. \
     Your goal is to think of a word that will end the story on a positive note. The ending \
     doesn't have to be so positive that it doesn't seem possible, but we want you to imagine \
     you are handling the situation well.";

/// Everything a survey page is built from, already parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyPageSpec {
    pub title: String,
    pub text: Option<String>,
    pub media: Option<String>,
    pub image_framed: bool,
    pub items: Option<Vec<String>>,
    pub input_1: Option<InputKind>,
    pub input_2: Option<InputKind>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub variable_name: Option<String>,
    pub input_name: Option<String>,
    pub advance: Option<AdvanceTrigger>,
    pub visibility: Option<VisibilityCondition>,
    pub timeout_ms: Option<u64>,
}

impl SurveyPageSpec {
    /// Parse a survey-sheet record, resolving its media.
    pub fn from_record(record: &SurveyRecord, media: &MediaStore) -> Result<Self> {
        Ok(Self {
            title: record.title.clone(),
            text: non_blank(&clean_up_unicode(&record.text)),
            media: media.resolve(&record.media)?,
            image_framed: record.image_framed,
            items: parse_items(&record.items),
            input_1: InputKind::parse(&record.input_1)?,
            input_2: InputKind::parse(&record.input_2)?,
            minimum: parse_number("minimum", &record.minimum)?,
            maximum: parse_number("maximum", &record.maximum)?,
            variable_name: non_blank(&record.variable_name),
            input_name: non_blank(&record.input_name),
            advance: AdvanceTrigger::parse(&record.show_buttons)?,
            visibility: VisibilityCondition::parse(&record.conditions)?,
            timeout_ms: parse_timeout(&record.timeout)?,
        })
    }

    fn input(&self, kind: Option<InputKind>) -> Option<Element> {
        kind?.build(InputSpec {
            items: self.items.clone(),
            min: self.minimum,
            max: self.maximum,
            texts: None,
        })
    }

    fn input_kinds(&self) -> Vec<InputKind> {
        self.input_1.into_iter().chain(self.input_2).collect()
    }
}

/// Build a survey page: text, media, then up to two inputs.
///
/// `input_name` names both inputs. `variable_name` goes on the first input,
/// or on the second when the first is absent.
pub fn survey_page(spec: &SurveyPageSpec) -> Page {
    let text = spec.text.clone().map(Element::text);
    let media = spec
        .media
        .clone()
        .map(|url| Element::framed_media(url, spec.image_framed));

    let mut input_1 = spec.input(spec.input_1);
    let mut input_2 = spec.input(spec.input_2);

    if let Some(name) = &spec.input_name {
        for input in [&mut input_1, &mut input_2].into_iter().flatten() {
            input.set_name(name.clone());
        }
    }

    if let Some(variable_name) = &spec.variable_name {
        match (&mut input_1, &mut input_2) {
            (Some(first), _) => first.set_variable_name(variable_name.clone()),
            (None, Some(second)) => second.set_variable_name(variable_name.clone()),
            (None, None) => {}
        }
    }

    Page::new(spec.title.clone())
        .with_elements([text, media, input_1, input_2])
        .with_visibility(spec.visibility.clone())
        .with_navigation(NavigationCondition::derive(
            spec.advance,
            spec.timeout_ms,
            &spec.input_kinds(),
        ))
}

/// Build a discrimination page: HTML text and one input.
pub fn discrimination_page(record: &DiscriminationRecord) -> Result<Page> {
    let kind = InputKind::parse(&record.input)?;
    let mut input = kind.and_then(|kind| kind.build(InputSpec::with_items(parse_items(&record.items))));

    if let Some(input) = input.as_mut() {
        if has_value(&record.input_name) {
            input.set_name(record.input_name.clone());
        }
        if has_value(&record.variable_name) {
            input.set_variable_name(record.variable_name.clone());
        }
    }

    let inputs: Vec<InputKind> = kind.into_iter().collect();
    Ok(Page::new(record.title.clone())
        .with_elements([Some(Element::html(record.text.clone())), input])
        .with_visibility(VisibilityCondition::parse(&record.conditions)?)
        .with_navigation(NavigationCondition::derive(None, None, &inputs)))
}

/// Build a write-your-own page, or `None` for rows without text.
pub fn write_your_own_page(record: &SurveyRecord) -> Result<Option<Page>> {
    let Some(text) = non_blank(&clean_up_unicode(&record.text)) else {
        return Ok(None);
    };

    let title = if record.title.is_empty() {
        WRITE_YOUR_OWN_HEADING.to_string()
    } else {
        record.title.clone()
    };

    let spec = SurveyPageSpec {
        title,
        text: Some(text),
        input_1: InputKind::parse(&record.input_1)?,
        input_name: non_blank(&record.input_name),
        ..Default::default()
    };

    Ok(Some(survey_page(&spec)))
}

/// Training video shown before practice scenario `number`. Videos carry no heading.
pub fn video_page(number: usize) -> Page {
    Page::untitled()
        .with_element(Element::text(VIDEO_PROMPT))
        .with_element(Element::framed_media(format!("/videos/video{}.mp4", number), true))
}

/// HTML block describing one library resource.
pub fn library_resource_text(name: &str, link: &str, text: &str) -> String {
    format!(
        "<b><font color=\"#9769ED\" size=6>{}</font></b><br/><br/>{}<br/><br/><a href=\"{}\">{}</a>",
        name, text, link, link
    )
}

/// Library page listing every resource of a subdomain.
pub fn subdomain_page(subdomain: &str, resource_texts: &[String]) -> Page {
    Page::new(subdomain).with_element(Element::html(resource_texts.join(SUBDOMAIN_SEPARATOR)))
}

/// Reflection page opening a dose at the lessons-learned cadence.
pub fn lessons_learned_page(domain: &str, ordinal: usize, text: &str) -> Page {
    Page::new("Lessons Learned")
        .with_element(Element::text(clean_up_unicode(text)))
        .with_element(Element::named_entry(format!(
            "lessons_learned_{}_{}",
            domain, ordinal
        )))
}

/// Explains the free-entry puzzles of reveal-nothing doses.
pub fn instructions_page() -> Page {
    Page::new("Instructions").with_element(Element::text(INSTRUCTIONS_TEXT))
}
