//! Build configuration
//!
//! Read from `mtm-build.toml` when present; every field has a default so an
//! absent file builds the two standard populations from `./make/CSV`.

use std::path::{Path, PathBuf};

use page_model::text::dir_safe;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembler::AssemblyConfig;
use crate::error::{BuildError, Result};
use crate::reminders::RepeatCounts;
use crate::rng::DEFAULT_SEED;

/// Config file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "mtm-build.toml";

/// Placeholder replaced by the population name in source file names.
pub const POPULATION_PLACEHOLDER: &str = "{population}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the authored CSV sheets
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,

    /// Root of the generated JSON tree
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Directory every referenced image must exist in
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Seed of every shuffle channel
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Fail the build when a referenced image is missing
    #[serde(default = "default_true")]
    pub verify_media: bool,

    /// Title of the domain selection screen
    #[serde(default = "default_app_title")]
    pub app_title: String,

    #[serde(default)]
    pub assembly: AssemblyConfig,

    #[serde(default)]
    pub reminders: RepeatCounts,

    #[serde(default)]
    pub files: SourceFiles,

    #[serde(default = "default_populations")]
    pub populations: Vec<PopulationConfig>,
}

/// One participant population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub name: String,

    /// First scenario column of the short-scenario sheet
    pub short_offset: usize,

    /// Description column of the long-scenario sheet
    pub long_offset: usize,

    /// First scenario column of the dose-1 practice sheet
    pub dose1_offset: usize,

    /// Domain selection screen entries, in display order
    #[serde(default)]
    pub selections: Vec<Selection>,
}

impl PopulationConfig {
    /// Name used in survey lookup ids.
    pub fn lookup_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// An entry of the domain selection screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub label: String,
    /// Domain whose session directory the entry opens
    pub domain: String,
}

impl Selection {
    pub fn new(label: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            domain: domain.into(),
        }
    }

    /// Directory name of the domain.
    pub fn directory(&self) -> String {
        dir_safe(&self.domain)
    }
}

/// Source sheet names. `{population}` is replaced by the population name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub short_scenarios: String,
    pub practice_scenarios: String,
    pub long_scenarios: String,
    pub long_template: String,
    pub surveys: String,
    pub write_your_own: String,
    pub discrimination: String,
    pub reminders: String,
    pub lessons_learned: String,
    pub regulation: String,
    pub tips: String,
    pub motivations: String,
    pub library: String,
}

const STATEMENTS_PREFIX: &str = "MT Movement Ranked Statements and Tips (post-session recommendations)";

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            short_scenarios: "MTM Short Scenarios by Session - MTM {population} Final for app_old.csv".to_string(),
            practice_scenarios: "MTM dose1_scenarios.csv".to_string(),
            long_scenarios: "MT Movement Final Long Scenarios - MTM Long Scenarios-{population} FOR APP.csv"
                .to_string(),
            long_template: "MTM_long_scenarios_structure.csv".to_string(),
            surveys: "MTM_survey_questions - Final_{population} MTM_survey_questions.csv".to_string(),
            write_your_own: "MTM_write_your_own.csv".to_string(),
            discrimination: "MTM Discrimination - MTM ({population}).csv".to_string(),
            reminders: "Reminders.csv".to_string(),
            lessons_learned: "MTM lessons_learned_text - {population}.csv".to_string(),
            regulation: format!("{} - ER Strategies- {{population}}.csv", STATEMENTS_PREFIX),
            tips: format!("{} - Tips to Apply Lessons Learned.csv", STATEMENTS_PREFIX),
            motivations: format!("{} - New {{population}} Motivational Statements.csv", STATEMENTS_PREFIX),
            library: "MT Movement Resources for On-Demand Library - {population} Resources.csv".to_string(),
        }
    }
}

/// Expand a file name template for a population.
pub fn source_name(template: &str, population: &str) -> String {
    template.replace(POPULATION_PLACEHOLDER, population)
}

// Defaults
fn default_csv_dir() -> PathBuf { PathBuf::from("./make/CSV") }
fn default_out_dir() -> PathBuf { PathBuf::from("./make/~out") }
fn default_media_dir() -> PathBuf { PathBuf::from("./src/images") }
fn default_seed() -> u64 { DEFAULT_SEED }
fn default_true() -> bool { true }
fn default_app_title() -> String { "MindTrails Movement".to_string() }

fn shared_selections() -> Vec<Selection> {
    [
        "Family & Home Life",
        "Finances",
        "Mental Health",
        "Physical Health",
        "Romantic Relationships",
        "Social Situations",
    ]
    .into_iter()
    .map(|domain| Selection::new(domain, domain))
    .collect()
}

fn default_populations() -> Vec<PopulationConfig> {
    let mut hd = vec![
        Selection::new("Huntington's: Early-Mid Stage", "Early/Mid-Stage Symptoms"),
        Selection::new("Huntington's: Presymptomatic", "Presymptomatic"),
    ];
    hd.extend(shared_selections());
    hd.push(Selection::new("Work/Career Development", "Work/Career Development"));
    hd.push(Selection::new("Discrimination", "Discrimination"));

    let mut pd = vec![
        Selection::new("Parkinson's Disease", "Early/Mid-Stage Symptoms"),
        Selection::new("Presymptomatic", "Presymptomatic"),
        Selection::new("Work/Career Development", "Work/Career Development"),
    ];
    pd.extend(shared_selections());
    pd.push(Selection::new("Discrimination", "Discrimination"));

    vec![
        PopulationConfig {
            name: "HD".to_string(),
            short_offset: 7,
            long_offset: 4,
            dose1_offset: 4,
            selections: hd,
        },
        PopulationConfig {
            name: "PD".to_string(),
            short_offset: 14,
            long_offset: 4,
            dose1_offset: 11,
            selections: pd,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
            out_dir: default_out_dir(),
            media_dir: default_media_dir(),
            seed: default_seed(),
            verify_media: true,
            app_title: default_app_title(),
            assembly: AssemblyConfig::default(),
            reminders: RepeatCounts::default(),
            files: SourceFiles::default(),
            populations: default_populations(),
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Path of a source sheet for a population.
    pub fn source_path(&self, template: &str, population: &str) -> PathBuf {
        self.csv_dir.join(source_name(template, population))
    }

    fn validate(&self) -> Result<()> {
        let assembly = &self.assembly;
        let cadences = [
            ("assembly.batch_size", assembly.batch_size),
            ("assembly.lessons_cadence", assembly.lessons_cadence),
            ("assembly.long_cadence", assembly.long_cadence),
        ];
        if let Some((name, _)) = cadences.iter().find(|(_, value)| *value == 0) {
            return Err(BuildError::InvalidSetting(format!("{} must be at least 1", name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.seed, 1);
        assert_eq!(config.assembly.batch_size, 10);
        assert_eq!(config.reminders.heading, 3);
        assert_eq!(config.populations.len(), 2);
        assert_eq!(config.populations[0].selections.len(), 10);
        assert_eq!(config.populations[1].short_offset, 14);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            seed = 42
            verify_media = false

            [assembly]
            batch_size = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert!(!config.verify_media);
        assert_eq!(config.assembly.batch_size, 8);
        assert_eq!(config.assembly.long_cadence, 5);
        assert_eq!(config.populations[0].name, "HD");
    }

    #[test]
    fn test_populations_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [[populations]]
            name = "XY"
            short_offset = 7
            long_offset = 4
            dose1_offset = 4

            [[populations.selections]]
            label = "Work"
            domain = "Work/Career Development"
            "#,
        )
        .unwrap();

        assert_eq!(config.populations.len(), 1);
        assert_eq!(config.populations[0].lookup_name(), "xy");
        assert_eq!(config.populations[0].selections[0].directory(), "Work%2FCareer Development");
    }

    #[test]
    fn test_zero_cadence_is_rejected() {
        assert!(matches!(
            Config::from_toml_str("[assembly]\nlong_cadence = 0\n"),
            Err(BuildError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_source_path_expands_population() {
        let config = Config::default();
        let path = config.source_path(&config.files.lessons_learned, "HD");
        assert_eq!(path, PathBuf::from("./make/CSV/MTM lessons_learned_text - HD.csv"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }
}
