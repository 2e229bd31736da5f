//! Library stage - the on-demand resource library, identical for both groups.

use page_model::text::dir_safe;
use tracing::info;

use super::{Grouped, Pipeline};
use crate::builders::{library_resource_text, subdomain_page};
use crate::config::PopulationConfig;
use crate::error::Result;
use crate::output::{Flow, OutputTree};
use crate::records::LibraryResourceRecord;

pub(super) const OWNED_DIRS: [&str; 2] = ["treatment/resources", "control/resources"];

const DOMAIN_SELECTION_TEXT: &str = "Please click on any topic to learn about resources that can help \
     you manage that part of your life.\n\nThough resources were carefully selected by our team of \
     researchers and clinicians, the University of Virginia does not endorse these resources.";

const SUBDOMAIN_SELECTION_TEXT: &str = "Click on the specific topic to see associated resources.";

/// Catch-all subdomain listed last.
const OTHER_SUBDOMAIN: &str = "other";

impl Pipeline {
    /// Build the resource library of one population, relative to its output root.
    pub fn build_library(&self, population: &PopulationConfig) -> Result<OutputTree> {
        let rows = self.rows(&self.config.files.library, population, 1)?;

        let mut domains: Grouped<String, (String, String)> = Grouped::default();
        for (index, row) in rows.iter().enumerate() {
            // Row numbers count the header.
            let record = LibraryResourceRecord::from_row(row, index + 2)?;
            let text = library_resource_text(&record.name, &record.link, &record.text);
            domains.push(record.domain, (record.subdomain, text));
        }

        let mut library = OutputTree::new();
        library.insert_document(
            "__flow__.json",
            &Flow::select(DOMAIN_SELECTION_TEXT).with_columns(2).with_title_case(),
        )?;

        let subdomain_flow = Flow::select(SUBDOMAIN_SELECTION_TEXT).with_last_item(OTHER_SUBDOMAIN);
        for (domain, resources) in domains.iter() {
            let directory = dir_safe(domain);
            library.insert_document(format!("{}/__flow__.json", directory), &subdomain_flow)?;

            let mut subdomains: Grouped<&str, String> = Grouped::default();
            for (subdomain, text) in resources {
                subdomains.push(subdomain.as_str(), text.clone());
            }
            for (subdomain, texts) in subdomains.iter() {
                library.insert_document(
                    format!("{}/{}.json", directory, dir_safe(subdomain)),
                    &subdomain_page(subdomain, texts),
                )?;
            }
        }

        let mut tree = OutputTree::new();
        for group in ["treatment", "control"] {
            tree.merge(&format!("{}/resources", group), library.clone());
        }

        info!(population = %population.name, entries = tree.len(), "Resource library built");
        Ok(tree)
    }
}
