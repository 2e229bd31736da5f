//! Sessions stage - the treatment and control session trees of a population.

use std::collections::BTreeMap;

use page_model::text::dir_safe;
use page_model::{GroupRole, Page, PageGroup};
use tracing::{debug, info, warn};

use super::{Grouped, Pipeline};
use crate::assembler::{CyclicSource, SessionAssembler, SessionPlanner};
use crate::builders::{
    discrimination_page, long_group, scenario_group, survey_page, video_page, write_your_own_page,
    LongScenario, LongTemplate, ResourcePools, ScenarioContent, ScenarioSpec, SurveyPageSpec,
};
use crate::config::PopulationConfig;
use crate::error::Result;
use crate::output::{Flow, OutputTree};
use crate::records::{
    lessons_learned, motivational_statements, regulation_strategies, tips, DiscriminationRecord,
    LongScenarioRecord, LongTemplateRecord, PracticeScenarioRecord, ReminderRecord, ShortScenarioRecord,
    SurveyRecord,
};
use crate::reminders::ReminderBook;
use crate::rng::channels;
use crate::sources::read_table;

/// Directories of a population root this stage rewrites.
pub(super) const OWNED_DIRS: [&str; 2] = ["control/sessions", "treatment/sessions"];

const DOMAIN_SELECTION_TEXT: &str = "The domains listed here are some areas that may cause you to \
     feel anxious. Please select the one that you'd like to work on during today's training.\n\n\
     We encourage you to choose different domains to practice thinking flexibly across areas of your life!";

/// Survey lookups used around the sessions, keyed by suffix after the population name.
const BEFORE_DOMAIN: &str = "beforedomain_all";
const AFTER_DOMAIN: &str = "afterdomain_all";
const FIRST_DOSE: &str = "dose_1";
const CONTROL_FIRST_DOSE: &str = "control_dose_1";

impl Pipeline {
    /// Build the session tree of one population, relative to its output root.
    ///
    /// # Algorithm
    ///
    /// 1. Collect the surveys around the doses, expanding the practice block
    /// 2. Plan every short-scenario row into per-domain batches
    /// 3. Build the long-scenario sources, the write-your-own group, the
    ///    resource pools and the reminders
    /// 4. Assemble each domain's doses
    /// 5. Lay everything out as flows and page sequences
    pub fn build_sessions(&mut self, population: &PopulationConfig) -> Result<OutputTree> {
        let files = self.config.files.clone();

        // Step 1: surveys
        let surveys = self.session_surveys(population)?;
        let lookup = |suffix: &str| format!("{}_{}", population.lookup_name(), suffix);
        let flat = |suffix: &str| {
            let id = lookup(suffix);
            surveys.flat_where(|(lookup_id, _)| *lookup_id == id)
        };

        // Step 2: short scenarios
        let lessons = lessons_learned(&self.rows(&files.lessons_learned, population, 1)?);
        let short_rows = self.rows(&files.short_scenarios, population, 1)?;
        let mut planner = SessionPlanner::new(self.config.assembly, &lessons, &self.media);
        for row in &short_rows {
            planner.push_row(&ShortScenarioRecord::from_row(row, population.short_offset), &mut self.rng)?;
        }
        let plans = planner.finish();

        // Step 3: shared content
        let long_sources = self.long_sources(population)?;
        let write_your_own = self.write_your_own_group(population)?;
        let resources = ResourcePools::new(
            motivational_statements(&self.rows(&files.motivations, population, 1)?),
            tips(&self.rows(&files.tips, population, 1)?),
            regulation_strategies(&read_table(&self.source_path(&files.regulation, population))?),
        );
        let reminder_records: Vec<ReminderRecord> = self
            .rows(&files.reminders, population, 1)?
            .iter()
            .map(|row| ReminderRecord::from_row(row))
            .collect();
        let reminders = ReminderBook::from_records(&reminder_records, &self.media, self.config.reminders)?;
        let discrimination = self
            .rows(&files.discrimination, population, 1)?
            .iter()
            .map(|row| discrimination_page(&DiscriminationRecord::from_row(row)))
            .collect::<Result<Vec<Page>>>()?;

        // Step 4: doses
        let mut assembler =
            SessionAssembler::new(self.config.assembly, write_your_own, long_sources, resources, &reminders);
        let mut domains = Vec::with_capacity(plans.len());
        for (domain, batches) in plans {
            domains.push(assembler.assemble_domain(&domain, batches, &mut self.rng)?);
        }

        // Step 5: layout
        let mut before_domain = flat(BEFORE_DOMAIN);
        reminders.apply_to_survey(&mut before_domain);

        let selection = Flow::select(DOMAIN_SELECTION_TEXT)
            .with_title_case()
            .with_columns(2)
            .with_title(self.config.app_title.clone())
            .with_selections(
                population
                    .selections
                    .iter()
                    .map(|selection| (selection.label.clone(), selection.directory())),
            );

        let mut tree = OutputTree::new();
        tree.insert_sequence("control/sessions/__first__", &flat(CONTROL_FIRST_DOSE))?;
        tree.insert_document("treatment/sessions/__flow__.json", &selection)?;
        tree.insert_sequence("treatment/sessions/__first__", &flat(FIRST_DOSE))?;
        tree.insert_sequence("treatment/sessions/__before__", &before_domain)?;
        tree.insert_sequence("treatment/sessions/__after__", &flat(AFTER_DOMAIN))?;
        tree.insert_sequence("treatment/sessions/Discrimination", &discrimination)?;

        let domain_flow = Flow::sequential().with_take(1).with_repeat();
        for sessions in domains {
            let directory = format!("treatment/sessions/{}", dir_safe(&sessions.name));
            let doses = sessions.doses.len();
            tree.insert_document(format!("{}/__flow__.json", directory), &domain_flow)?;
            for (index, pages) in sessions.into_page_sequences().into_iter().enumerate() {
                tree.insert_sequence(format!("{}/{}", directory, index + 1), &pages)?;
            }
            debug!(population = %population.name, directory = %directory, doses, "Laid out domain");
        }

        info!(population = %population.name, entries = tree.len(), "Session tree built");
        Ok(tree)
    }

    /// Survey pages grouped by lookup id and subgroup, first-seen order.
    fn session_surveys(&mut self, population: &PopulationConfig) -> Result<Grouped<(String, String), Page>> {
        let name = population.lookup_name();
        let accepted: Vec<String> = [BEFORE_DOMAIN, AFTER_DOMAIN, FIRST_DOSE, CONTROL_FIRST_DOSE]
            .iter()
            .map(|suffix| format!("{}_{}", name, suffix))
            .collect();

        let rows = self.rows(&self.config.files.surveys, population, 1)?;
        let mut surveys = Grouped::default();

        for row in &rows {
            let record = SurveyRecord::from_row(row);
            let lookup_id = record.lookup_id();
            if !accepted.contains(&lookup_id) {
                continue;
            }

            let key = (lookup_id, record.subgroup.clone());
            if record.is_practice() {
                let pages = self.practice_pages(population)?;
                surveys.extend(key, pages);
            } else if !record.dose.is_empty() {
                let page = survey_page(&SurveyPageSpec::from_record(&record, &self.media)?);
                surveys.push(key, page);
            }
        }

        Ok(surveys)
    }

    /// The dose-1 practice block: a training video before every practice scenario.
    fn practice_pages(&mut self, population: &PopulationConfig) -> Result<Vec<Page>> {
        let rows = self.rows(&self.config.files.practice_scenarios, population, 1)?;
        let mut pages = Vec::new();
        let mut ordinal = 0;

        for row in &rows {
            let record = PracticeScenarioRecord::from_row(row, population.dose1_offset);
            let Some(content) = ScenarioContent::from_fields(&record.fields, &self.media)? else {
                warn!(label = %record.label, "Practice scenario without a puzzle, skipping");
                continue;
            };
            let content = content.shuffle_choices(&mut self.rng);
            let spec = ScenarioSpec::new(record.domain, record.label, ordinal, content);

            pages.push(video_page(ordinal + 1));
            pages.extend(scenario_group(&spec)?.into_pages());
            ordinal += 1;
        }

        Ok(pages)
    }

    /// One endless, shuffled long-scenario source per domain.
    fn long_sources(&mut self, population: &PopulationConfig) -> Result<BTreeMap<String, CyclicSource<PageGroup>>> {
        let files = self.config.files.clone();
        let template_records: Vec<LongTemplateRecord> = self
            .rows(&files.long_template, population, 1)?
            .iter()
            .map(|row| LongTemplateRecord::from_row(row))
            .collect();
        let template = LongTemplate::from_records(&template_records)?;

        let mut by_domain: Grouped<String, PageGroup> = Grouped::default();
        for row in &self.rows(&files.long_scenarios, population, 2)? {
            let Some(record) = LongScenarioRecord::from_row(row, population.long_offset) else {
                continue;
            };
            let Some(scenario) = LongScenario::from_record(&record, &self.media)? else {
                continue;
            };
            let group = long_group(&template, &scenario, &mut self.rng);
            for domain in record.domains() {
                by_domain.push(domain.to_string(), group.clone());
            }
        }

        let mut sources = BTreeMap::new();
        for (domain, groups) in by_domain.iter_mut() {
            self.rng.shuffle(channels::LONG_SESSIONS, groups);
            if let Some(source) = CyclicSource::new(std::mem::take(groups)) {
                sources.insert(domain.clone(), source);
            }
        }
        Ok(sources)
    }

    /// The write-your-own session shared by every domain.
    fn write_your_own_group(&self, population: &PopulationConfig) -> Result<PageGroup> {
        let rows = self.rows(&self.config.files.write_your_own, population, 1)?;
        let mut pages = Vec::new();
        for row in &rows {
            if let Some(page) = write_your_own_page(&SurveyRecord::from_row(row))? {
                pages.push(page);
            }
        }
        Ok(PageGroup::new(GroupRole::WriteYourOwn, pages))
    }
}
