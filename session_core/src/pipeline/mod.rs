//! Pipeline - reads every population's sheets and writes its output stages.
//!
//! Stages:
//! - **sessions**: surveys around the doses, the discrimination session and
//!   every domain's assembled doses
//! - **surveys**: end-of-day, reasons-for-ending and progress-tracking flows
//! - **library**: the on-demand resource library
//!
//! Populations are processed one at a time. Each stage clears the
//! directories it owns before writing, so re-running replaces its output.

mod library;
mod sessions;
mod surveys;

use std::path::PathBuf;

use tracing::info;

use crate::config::{Config, PopulationConfig};
use crate::error::Result;
use crate::output::{clear, OutputTree};
use crate::rng::ShuffleRegistry;
use crate::sources::{read_rows, MediaStore, Row};

/// Runs the output stages for every configured population.
pub struct Pipeline {
    config: Config,
    rng: ShuffleRegistry,
    media: MediaStore,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let rng = ShuffleRegistry::new(config.seed);
        let media = MediaStore::new(config.media_dir.clone(), config.verify_media);
        Self { config, rng, media }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build and write the session stage of every population.
    pub fn run_sessions(&mut self) -> Result<usize> {
        let mut written = 0;
        for population in self.config.populations.clone() {
            info!(population = %population.name, "Building sessions");
            let tree = self.build_sessions(&population)?;
            written += self.replace(&population, &sessions::OWNED_DIRS, &tree)?;
        }
        Ok(written)
    }

    /// Build and write the survey stage of every population.
    pub fn run_surveys(&mut self) -> Result<usize> {
        let mut written = 0;
        for population in self.config.populations.clone() {
            info!(population = %population.name, "Building surveys");
            let tree = self.build_surveys(&population)?;
            written += self.replace(&population, &surveys::OWNED_DIRS, &tree)?;
        }
        Ok(written)
    }

    /// Build and write the resource library of every population.
    pub fn run_library(&mut self) -> Result<usize> {
        let mut written = 0;
        for population in self.config.populations.clone() {
            info!(population = %population.name, "Building resource library");
            let tree = self.build_library(&population)?;
            written += self.replace(&population, &library::OWNED_DIRS, &tree)?;
        }
        Ok(written)
    }

    /// Run every stage in order.
    pub fn run_all(&mut self) -> Result<usize> {
        Ok(self.run_sessions()? + self.run_surveys()? + self.run_library()?)
    }

    fn population_root(&self, population: &PopulationConfig) -> PathBuf {
        self.config.out_dir.join(&population.name)
    }

    fn replace(&self, population: &PopulationConfig, owned: &[&str], tree: &OutputTree) -> Result<usize> {
        let root = self.population_root(population);
        let owned: Vec<String> = owned.iter().map(|dir| dir.to_string()).collect();
        clear(&root, &owned)?;
        let written = tree.write(&root)?;
        info!(population = %population.name, files = written, root = %root.display(), "Stage written");
        Ok(written)
    }

    /// Rows of a population's sheet, header rows dropped.
    fn rows(&self, template: &str, population: &PopulationConfig, skip: usize) -> Result<Vec<Row>> {
        read_rows(&self.config.source_path(template, &population.name), skip)
    }

    fn source_path(&self, template: &str, population: &PopulationConfig) -> PathBuf {
        self.config.source_path(template, &population.name)
    }
}

/// Values grouped by key, keys kept in first-seen order.
#[derive(Debug, Clone)]
struct Grouped<K, V> {
    entries: Vec<(K, Vec<V>)>,
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: PartialEq, V> Grouped<K, V> {
    fn entry(&mut self, key: K) -> &mut Vec<V> {
        let index = match self.entries.iter().position(|(existing, _)| *existing == key) {
            Some(index) => index,
            None => {
                self.entries.push((key, Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    fn push(&mut self, key: K, value: V) {
        self.entry(key).push(value);
    }

    fn extend(&mut self, key: K, values: impl IntoIterator<Item = V>) {
        self.entry(key).extend(values);
    }

    fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries.iter().map(|(key, values)| (key, values.as_slice()))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut Vec<V>)> {
        self.entries.iter_mut().map(|(key, values)| (&*key, values))
    }
}

impl<K: PartialEq, V: Clone> Grouped<K, V> {
    /// Every value whose key matches, in key then insertion order.
    fn flat_where(&self, matches: impl Fn(&K) -> bool) -> Vec<V> {
        self.entries
            .iter()
            .filter(|(key, _)| matches(key))
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }
}
