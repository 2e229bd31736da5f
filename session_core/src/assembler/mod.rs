//! Session Assembler - turns per-domain scenario streams into doses.
//!
//! Assembly runs in two passes:
//! 1. **Planning**: short-scenario rows are grouped per domain into batches.
//!    A batch closes when it is full, or when a write-your-own marker arrives
//!    after enough scenarios. Groups left running at the end are dropped.
//!    Each scenario becomes a page group as it is read, so its position in
//!    the batch is known.
//! 2. **Assembly**: batches become doses. Long scenarios are interleaved at a
//!    fixed cadence, regular doses receive their reminders, and every dose
//!    closes with exactly one resource group.

mod cyclic;

pub use cyclic::*;

use std::collections::BTreeMap;

use page_model::{Dose, DoseKind, Page, PageGroup};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::builders::{scenario_group, MissingLetters, ResourcePools, ScenarioContent, ScenarioSpec};
use crate::error::Result;
use crate::records::ShortScenarioRecord;
use crate::reminders::ReminderBook;
use crate::rng::ShuffleRegistry;
use crate::sources::MediaStore;

/// Configuration for batching and interleaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Scenario groups per regular dose.
    pub batch_size: usize,

    /// A write-your-own marker closes the running batch only above this size.
    pub write_your_own_threshold: usize,

    /// Lessons learned open every Nth batch.
    pub lessons_cadence: usize,

    /// A long scenario is served before every Nth dose.
    pub long_cadence: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            write_your_own_threshold: 6,
            lessons_cadence: 4,
            long_cadence: 5,
        }
    }
}

/// A planned dose before assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    Scenarios(Vec<PageGroup>),
    WriteYourOwn,
}

#[derive(Debug, Clone, Default)]
struct DomainPlan {
    name: String,
    closed: Vec<Batch>,
    running: Vec<PageGroup>,
}

impl DomainPlan {
    fn close(&mut self) {
        let groups = std::mem::take(&mut self.running);
        self.closed.push(Batch::Scenarios(groups));
    }
}

/// Groups short-scenario rows into per-domain batches.
pub struct SessionPlanner<'a> {
    config: AssemblyConfig,
    lessons: &'a BTreeMap<String, String>,
    media: &'a MediaStore,
    /// Domains in first-seen order.
    plans: Vec<DomainPlan>,
    /// Carries over between rows until a row sets a new policy.
    missing_letters: MissingLetters,
}

impl<'a> SessionPlanner<'a> {
    pub fn new(config: AssemblyConfig, lessons: &'a BTreeMap<String, String>, media: &'a MediaStore) -> Self {
        Self {
            config,
            lessons,
            media,
            plans: Vec::new(),
            missing_letters: MissingLetters::default(),
        }
    }

    fn plan_mut(&mut self, domain: &str) -> &mut DomainPlan {
        let index = match self.plans.iter().position(|plan| plan.name == domain) {
            Some(index) => index,
            None => {
                self.plans.push(DomainPlan {
                    name: domain.to_string(),
                    ..Default::default()
                });
                self.plans.len() - 1
            }
        };
        &mut self.plans[index]
    }

    /// Handle one short-scenario row.
    ///
    /// Before the row is placed, the running batch closes when it is full, or
    /// when the row is a write-your-own marker and the batch is above the
    /// threshold. A marker always starts a fresh batch.
    pub fn push_row(&mut self, record: &ShortScenarioRecord, rng: &mut ShuffleRegistry) -> Result<()> {
        if record.is_blank() {
            return Ok(());
        }

        let config = self.config;
        let is_write_your_own = record.is_write_your_own();

        let plan = self.plan_mut(&record.domain);
        if plan.running.len() == config.batch_size
            || (is_write_your_own && plan.running.len() > config.write_your_own_threshold)
        {
            plan.close();
        }

        if is_write_your_own {
            if !plan.running.is_empty() {
                warn!(
                    domain = %plan.name,
                    discarded = plan.running.len(),
                    "Write-your-own marker discards a short batch"
                );
            }
            plan.running.clear();
            plan.closed.push(Batch::WriteYourOwn);
            return Ok(());
        }

        let Some(content) = ScenarioContent::from_fields(&record.fields, self.media)? else {
            return Ok(());
        };
        let content = content.normalize_yes_no().shuffle_choices(rng);

        if !record.missing_letters.is_empty() {
            self.missing_letters = MissingLetters::parse(&record.missing_letters)?;
        }
        let missing_letters = self.missing_letters;
        let lessons_text = self.lessons.get(&record.domain).cloned();

        let plan = self.plan_mut(&record.domain);
        let ordinal = plan.running.len();
        let closed = plan.closed.len();
        let opens_with_lessons = closed > 0 && ordinal == 0 && closed % config.lessons_cadence == 0;

        let spec = ScenarioSpec::new(record.domain.clone(), record.label.clone(), ordinal, content)
            .with_kind(record.kind_tag.clone())
            .with_missing_letters(missing_letters)
            .with_lessons(lessons_text.filter(|_| opens_with_lessons));

        plan.running.push(scenario_group(&spec)?);
        Ok(())
    }

    /// Hand out the closed batches in first-seen domain order.
    ///
    /// A batch only closes when a later row closes it, so groups still
    /// running at the end of the sheet are dropped.
    pub fn finish(self) -> Vec<(String, Vec<Batch>)> {
        self.plans
            .into_iter()
            .map(|plan| {
                if !plan.running.is_empty() {
                    warn!(
                        domain = %plan.name,
                        discarded = plan.running.len(),
                        "Unclosed batch at end of sheet, discarding"
                    );
                }
                (plan.name, plan.closed)
            })
            .collect()
    }
}

/// The doses of one domain, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSessions {
    pub name: String,
    pub doses: Vec<Dose>,
}

impl DomainSessions {
    /// Doses flattened to the page sequences the app reads.
    pub fn into_page_sequences(self) -> Vec<Vec<Page>> {
        self.doses.into_iter().map(Dose::into_pages).collect()
    }
}

/// Turns planned batches into doses.
pub struct SessionAssembler<'a> {
    config: AssemblyConfig,
    write_your_own: PageGroup,
    long_sources: BTreeMap<String, CyclicSource<PageGroup>>,
    resources: ResourcePools,
    reminders: &'a ReminderBook,
}

impl<'a> SessionAssembler<'a> {
    pub fn new(
        config: AssemblyConfig,
        write_your_own: PageGroup,
        long_sources: BTreeMap<String, CyclicSource<PageGroup>>,
        resources: ResourcePools,
        reminders: &'a ReminderBook,
    ) -> Self {
        Self {
            config,
            write_your_own,
            long_sources,
            resources,
            reminders,
        }
    }

    /// Assemble the doses of one domain.
    ///
    /// # Algorithm
    ///
    /// For each batch in order:
    /// 1. when the domain already has doses and their count is a multiple of
    ///    the long cadence, serve the next long scenario as its own dose
    /// 2. a write-your-own batch becomes the shared write-your-own group
    /// 3. a regular batch gets the reminders keyed to its ordinal
    /// 4. the dose closes with one resource group
    pub fn assemble_domain(
        &mut self,
        domain: &str,
        batches: Vec<Batch>,
        rng: &mut ShuffleRegistry,
    ) -> Result<DomainSessions> {
        let mut doses: Vec<Dose> = Vec::with_capacity(batches.len());
        let mut warned = false;

        for batch in batches {
            // Step 1: interleave a long scenario
            if !doses.is_empty() && doses.len() % self.config.long_cadence == 0 {
                match self.long_sources.get_mut(domain) {
                    Some(source) => {
                        let mut dose = Dose::new(doses.len() + 1, DoseKind::LongScenario, vec![source.next_item()]);
                        dose.push_group(self.resources.next_group(domain, rng)?);
                        doses.push(dose);
                    }
                    None if !warned => {
                        warn!(domain, "No long scenarios for domain, skipping interleave");
                        warned = true;
                    }
                    None => {}
                }
            }

            let ordinal = doses.len() + 1;
            let mut dose = match batch {
                // Step 2: shared write-your-own session
                Batch::WriteYourOwn => Dose::new(ordinal, DoseKind::WriteYourOwn, vec![self.write_your_own.clone()]),
                // Step 3: reminders
                Batch::Scenarios(groups) => {
                    let mut dose = Dose::new(ordinal, DoseKind::Regular, groups);
                    self.reminders.apply_to_dose(&mut dose);
                    dose
                }
            };

            // Step 4: resource
            dose.push_group(self.resources.next_group(domain, rng)?);
            doses.push(dose);
        }

        debug!(domain, doses = doses.len(), "Assembled domain");

        Ok(DomainSessions {
            name: domain.to_string(),
            doses,
        })
    }
}
