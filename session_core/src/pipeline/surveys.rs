//! Surveys stage - end-of-day, reasons-for-ending and progress tracking.

use page_model::Page;
use tracing::info;

use super::{Grouped, Pipeline};
use crate::builders::{survey_page, SurveyPageSpec};
use crate::config::PopulationConfig;
use crate::error::Result;
use crate::output::{Flow, OutputTree};
use crate::records::SurveyRecord;

pub(super) const OWNED_DIRS: [&str; 6] = [
    "treatment/end of day",
    "treatment/reasons for ending",
    "treatment/track your progress",
    "control/end of day",
    "control/reasons for ending",
    "control/track your progress",
];

/// Dose keys of the weekly questions appended to each progress check.
const PROGRESS_WEEKS: [&str; 4] = ["weekly 2", "weekly 4", "weekly 6", "weekly 10"];

/// `(dose, subject)` lookup of a survey flow.
type FlowKey = (String, String);

impl Pipeline {
    /// Build the survey flows of one population, relative to its output root.
    pub fn build_surveys(&self, population: &PopulationConfig) -> Result<OutputTree> {
        let mut pages: Grouped<(FlowKey, String), Page> = Grouped::default();
        for row in &self.rows(&self.config.files.surveys, population, 1)? {
            let record = SurveyRecord::from_row(row);
            if record.dose.is_empty() || record.is_practice() {
                continue;
            }
            let page = survey_page(&SurveyPageSpec::from_record(&record, &self.media)?);
            pages.push((record.group_id(), record.subgroup.clone()), page);
        }

        let name = population.lookup_name();
        let flat = |dose: &str, subject: String| -> Vec<Page> {
            let key = (dose.to_string(), subject);
            pages.flat_where(|(flow, _)| *flow == key)
        };
        let progress_flow = Flow::sequential().with_size(1);

        let mut tree = OutputTree::new();

        // Treatment
        tree.insert_sequence("treatment/end of day", &flat("all", format!("{}_eod", name)))?;
        tree.insert_sequence(
            "treatment/reasons for ending",
            &flat("all", format!("{}_reasonsforending", name)),
        )?;
        tree.insert_document("treatment/track your progress/__flow__.json", &progress_flow)?;
        let biweekly = flat("all", format!("{}_biweekly", name));
        for (index, week) in PROGRESS_WEEKS.iter().enumerate() {
            let mut check = biweekly.clone();
            check.extend(flat(week, format!("{}_biweekly", name)));
            tree.insert_sequence(format!("treatment/track your progress/{}", index + 1), &check)?;
        }

        // Control
        tree.insert_sequence("control/end of day", &flat("all", "eod".to_string()))?;
        tree.insert_sequence(
            "control/reasons for ending",
            &flat("all", format!("{}_reasonsforending_control", name)),
        )?;
        tree.insert_document("control/track your progress/__flow__.json", &progress_flow)?;
        let control_check = flat("all", format!("{}_biweekly_control", name));
        for index in 1..=PROGRESS_WEEKS.len() {
            tree.insert_sequence(format!("control/track your progress/{}", index), &control_check)?;
        }

        info!(population = %population.name, entries = tree.len(), "Survey tree built");
        Ok(tree)
    }
}
