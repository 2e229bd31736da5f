//! Short-scenario page groups.

use page_model::text::{has_value, Puzzle};
use page_model::{Element, NavToken, NavigationCondition, Page, PageGroup};

use super::{instructions_page, lessons_learned_page};
use crate::error::{BuildError, Result};
use crate::records::ScenarioFields;
use crate::rng::{channels, ShuffleRegistry};
use crate::sources::MediaStore;

/// How much of each puzzle word is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingLetters {
    #[default]
    One,
    Two,
    /// The whole word is withheld; the user writes their own ending.
    RevealNothing,
}

impl MissingLetters {
    /// Parse the authored policy: `1`, `2` or `all`.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "1" => Ok(MissingLetters::One),
            "2" => Ok(MissingLetters::Two),
            "all" => Ok(MissingLetters::RevealNothing),
            _ => Err(BuildError::UnknownMissingLetters(raw.trim().to_string())),
        }
    }

    fn count(&self) -> Option<u8> {
        match self {
            MissingLetters::One => Some(1),
            MissingLetters::Two => Some(2),
            MissingLetters::RevealNothing => None,
        }
    }
}

/// The authored content of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioContent {
    pub primary: Puzzle,
    pub secondary: Option<Puzzle>,
    pub question: String,
    /// Choices in display order.
    pub choices: Vec<String>,
    pub answer: String,
    pub image: Option<String>,
}

impl ScenarioContent {
    /// Derive puzzles and choices from a scenario block.
    ///
    /// Returns `None` when the first sentence is blank.
    pub fn from_fields(fields: &ScenarioFields, media: &MediaStore) -> Result<Option<Self>> {
        let Some(primary) = Puzzle::from_sentence(&fields.sentence_1) else {
            return Ok(None);
        };

        Ok(Some(Self {
            primary,
            secondary: Puzzle::from_sentence(&fields.sentence_2)
                .filter(|puzzle| has_value(&puzzle.word) && has_value(&puzzle.prompt)),
            question: fields.question.clone(),
            choices: fields.choices(),
            answer: fields.answer.clone(),
            image: media.resolve(&fields.image)?,
        }))
    }

    /// Replace yes/no choices with their canonical spelling.
    pub fn normalize_yes_no(mut self) -> Self {
        let first = self
            .choices
            .first()
            .map(|choice| choice.trim().to_lowercase())
            .unwrap_or_default();
        if first == "yes" || first == "no" {
            self.choices = vec!["Yes".to_string(), "No".to_string()];
        }
        self
    }

    /// Shuffle the choices on the `scenario_choices` channel.
    pub fn shuffle_choices(mut self, rng: &mut ShuffleRegistry) -> Self {
        rng.shuffle(channels::SCENARIO_CHOICES, &mut self.choices);
        self
    }
}

/// One scenario placed in a dose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSpec {
    pub domain: String,
    pub label: String,
    /// 0-indexed position within the dose.
    pub ordinal: usize,
    pub content: ScenarioContent,
    pub missing_letters: MissingLetters,
    pub kind: Option<String>,
    /// First scenario of its dose.
    pub opens_dose: bool,
    /// Lessons-learned text, when this scenario opens with a reflection.
    pub lessons: Option<String>,
}

impl ScenarioSpec {
    pub fn new(
        domain: impl Into<String>,
        label: impl Into<String>,
        ordinal: usize,
        content: ScenarioContent,
    ) -> Self {
        Self {
            domain: domain.into(),
            label: label.into(),
            ordinal,
            content,
            missing_letters: MissingLetters::default(),
            kind: None,
            opens_dose: ordinal == 0,
            lessons: None,
        }
    }

    pub fn with_missing_letters(mut self, missing_letters: MissingLetters) -> Self {
        self.missing_letters = missing_letters;
        self
    }

    /// Tag every page of the group, e.g. as negative. Blank tags are ignored.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        self.kind = (!kind.is_empty()).then_some(kind);
        self
    }

    pub fn with_lessons(mut self, lessons: Option<String>) -> Self {
        self.lessons = lessons;
        self
    }

    fn puzzle_page(&self, puzzle: &Puzzle, name: String) -> Page {
        let (input, navigation) = match self.missing_letters.count() {
            Some(count) => (
                Element::word_puzzle(name, puzzle.word.clone()).with_missing_letters(count),
                NavigationCondition::Single(NavToken::WaitForCorrect),
            ),
            None => (
                Element::named_entry(name),
                NavigationCondition::Sequence(vec![NavToken::WaitForComplete, NavToken::WaitForClick]),
            ),
        };

        Page::new(self.label.clone())
            .with_element(Element::text(puzzle.prompt.clone()))
            .with_element(input)
            .with_navigation(Some(navigation))
    }
}

/// Build the page group of one short scenario.
///
/// Pages in order:
/// 1. lessons learned, when lessons text is attached
/// 2. instructions, for the first scenario of a reveal-nothing dose
/// 3. the scenario image
/// 4. the primary puzzle
/// 5. the secondary puzzle, when authored
/// 6. the comprehension question, unless the policy reveals nothing
pub fn scenario_group(spec: &ScenarioSpec) -> Result<PageGroup> {
    let content = &spec.content;

    let answer = content.answer.to_lowercase();
    if !content.choices.iter().any(|choice| choice.to_lowercase() == answer) {
        return Err(BuildError::AnswerNotInChoices {
            label: spec.label.clone(),
            answer: content.answer.clone(),
            choices: content.choices.clone(),
        });
    }

    let reveal_nothing = spec.missing_letters == MissingLetters::RevealNothing;
    let mut pages = Vec::new();

    if let Some(lessons) = &spec.lessons {
        pages.push(lessons_learned_page(&spec.domain, spec.ordinal, lessons));
    }

    if reveal_nothing && spec.opens_dose {
        pages.push(instructions_page());
    }

    if let Some(image) = &content.image {
        pages.push(
            Page::new(spec.label.clone())
                .with_element(Element::label(spec.label.clone()))
                .with_element(Element::media(image.clone())),
        );
    }

    pages.push(spec.puzzle_page(
        &content.primary,
        format!("{}_{}_puzzle1", spec.label, spec.domain),
    ));

    if let Some(secondary) = &content.secondary {
        pages.push(spec.puzzle_page(
            secondary,
            format!("{}_{}_puzzle_word2", spec.label, spec.domain),
        ));
    }

    if !reveal_nothing {
        pages.push(
            Page::new(spec.label.clone())
                .with_element(Element::text(content.question.clone()))
                .with_element(Element::question(
                    format!("{}_{}_comp_question", spec.label, spec.domain),
                    content.choices.clone(),
                    content.answer.clone(),
                ))
                .with_navigation(Some(NavigationCondition::Sequence(vec![
                    NavToken::WaitForCorrect,
                    NavToken::WaitForClick,
                ]))),
        );
    }

    Ok(PageGroup::scenario(spec.ordinal, spec.kind.clone(), pages))
}
