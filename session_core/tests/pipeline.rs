//! End-to-end builds over a small authored sheet set.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use session_core::{BuildError, Config, Pipeline, PopulationConfig, Selection, SourceFiles};
use tempfile::TempDir;

const POPULATION: &str = "HD";

/// A row of `width` empty cells with some cells filled in.
fn padded(width: usize, cells: &[(usize, &str)]) -> Vec<String> {
    let mut row = vec![String::new(); width];
    for (index, value) in cells {
        row[*index] = value.to_string();
    }
    row
}

fn write_csv(dir: &Path, template: &str, rows: &[Vec<String>]) {
    let path = dir.join(session_core::source_name(template, POPULATION));
    let mut writer = csv::Writer::from_path(path).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
}

fn short_row(label: &str, kind: &str) -> Vec<String> {
    padded(
        22,
        &[
            (2, kind),
            (3, "Finances"),
            (6, label),
            (7, "You open the bill and stay calm."),
            (9, "Did you stay calm?"),
            (10, "Yes"),
            (11, "No"),
        ],
    )
}

fn survey_row(subgroup: &str, title: &str, dose: &str, subject: &str, text: &str) -> Vec<String> {
    padded(19, &[(0, subgroup), (1, title), (2, dose), (3, subject), (4, text)])
}

/// Write every sheet of the HD population into `csv_dir`.
fn write_sheets(csv_dir: &Path, short_rows: usize) {
    let files = SourceFiles::default();
    let header = |width: usize| padded(width, &[(0, "header")]);

    let mut short = vec![header(22)];
    short.extend((0..short_rows).map(|n| short_row(&format!("Scenario {}", n), if n % 3 == 0 { "Negative" } else { "" })));
    write_csv(csv_dir, &files.short_scenarios, &short);

    write_csv(
        csv_dir,
        &files.practice_scenarios,
        &[
            header(11),
            padded(11, &[(0, "Practice"), (3, "Warm Up"), (4, "You tie your shoes and feel ready."), (6, "Did you feel ready?"), (7, "Yes"), (8, "No")]),
            padded(11, &[(0, "Practice"), (3, "Stretch"), (4, "You stretch and feel loose."), (6, "Did you feel loose?"), (7, "Yes"), (8, "No")]),
        ],
    );

    write_csv(
        csv_dir,
        &files.long_scenarios,
        &[
            header(22),
            header(22),
            padded(
                22,
                &[
                    (0, "Finances"),
                    (3, "Budget Day"),
                    (4, "You sit down to plan the month."),
                    (6, "I can handle this."),
                    (7, "One step at a time."),
                    (11, "Calm"),
                    (16, "I make a list."),
                    (21, "sunrise.png"),
                ],
            ),
        ],
    );

    write_csv(
        csv_dir,
        &files.long_template,
        &[
            header(14),
            padded(14, &[(0, "[Scenario_Name]"), (4, "[Scenario_Description]"), (10, "TRUE")]),
            padded(14, &[(0, "Your Thoughts"), (4, "What thoughts come up?"), (6, "TimedText")]),
        ],
    );

    write_csv(
        csv_dir,
        &files.surveys,
        &[
            header(19),
            survey_row("Intro", "Welcome", "1", "HD_Dose", "Welcome to your first session."),
            survey_row("Practice CBM-I", "", "1", "HD_Dose", ""),
            survey_row("Check In", "Check in", "all", "HD_beforeDomain", "How are you feeling?"),
            survey_row("Wrap Up", "Thanks", "all", "HD_afterDomain", "Thanks for practicing."),
            survey_row("EOD", "End of day", "all", "HD_EOD", "How was your day?"),
            survey_row("Progress", "Biweekly", "all", "HD_biweekly", "How are things going?"),
            survey_row("Progress", "Week two", "Weekly 2", "HD_biweekly", "Anything new this week?"),
            survey_row("EOD", "Control end of day", "all", "EOD", "How was your day?"),
        ],
    );

    write_csv(
        csv_dir,
        &files.write_your_own,
        &[
            header(19),
            padded(19, &[(1, "Your Story"), (4, "Write a story with a hopeful ending."), (5, "Entry"), (18, "wyo_story")]),
        ],
    );

    write_csv(
        csv_dir,
        &files.discrimination,
        &[
            header(16),
            padded(16, &[(0, "Discrimination"), (1, "Have you been treated unfairly?"), (2, "Buttons"), (7, "Yes; No")]),
        ],
    );

    write_csv(
        csv_dir,
        &files.reminders,
        &[
            header(5),
            padded(5, &[(0, "1"), (1, "scenario 1"), (2, "before"), (4, "Remember to breathe.")]),
            padded(5, &[(0, "<"), (1, "check in"), (2, "after"), (4, "Take a moment for yourself.")]),
        ],
    );

    write_csv(
        csv_dir,
        &files.lessons_learned,
        &[header(2), padded(2, &[(0, "Finances"), (1, "Money worries are easier to face one step at a time.")])],
    );
    write_csv(
        csv_dir,
        &files.regulation,
        &[padded(2, &[(1, "Finances")]), padded(2, &[(0, "1"), (1, "Take a slow walk.")])],
    );
    write_csv(csv_dir, &files.tips, &[header(2), padded(2, &[(0, "1"), (1, "Write it down.")])]);
    write_csv(csv_dir, &files.motivations, &[header(2), padded(2, &[(0, "1"), (1, "You can do this.")])]);
    write_csv(
        csv_dir,
        &files.library,
        &[
            header(5),
            padded(5, &[(0, "Finances"), (1, "Budgeting"), (2, "Budget Tool"), (3, "https://example.org"), (4, "Plan your month.")]),
            padded(5, &[(0, "Finances"), (1, "Other"), (2, "Help Line"), (3, "https://example.org/help"), (4, "Talk to someone.")]),
        ],
    );
}

struct Fixture {
    dir: TempDir,
    config: Config,
}

impl Fixture {
    fn new(short_rows: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_dir = dir.path().join("csv");
        fs::create_dir_all(&csv_dir).unwrap();
        write_sheets(&csv_dir, short_rows);

        let config = Config {
            csv_dir,
            out_dir: dir.path().join("out"),
            media_dir: dir.path().join("images"),
            verify_media: false,
            populations: vec![PopulationConfig {
                name: POPULATION.to_string(),
                short_offset: 7,
                long_offset: 4,
                dose1_offset: 4,
                selections: vec![Selection::new("Finances", "Finances")],
            }],
            ..Config::default()
        };

        Self { dir, config }
    }

    fn with_out_dir(mut self, name: &str) -> Self {
        self.config.out_dir = self.dir.path().join(name);
        self
    }

    fn root(&self) -> PathBuf {
        self.config.out_dir.join(POPULATION)
    }

    fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).unwrap()
    }
}

/// Every file under `root`, keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn visit(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                visit(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, fs::read(&path).unwrap());
            }
        }
    }

    let mut files = BTreeMap::new();
    visit(root, root, &mut files);
    files
}

#[test]
fn test_build_writes_every_stage() {
    let fixture = Fixture::new(62);
    let written = Pipeline::new(fixture.config.clone()).run_all().unwrap();
    assert!(written > 0);

    let root = fixture.root();
    for path in [
        "treatment/sessions/__flow__.json",
        "treatment/sessions/__first__/1.json",
        "treatment/sessions/__before__/1.json",
        "treatment/sessions/__after__/1.json",
        "treatment/sessions/Discrimination/1.json",
        "treatment/sessions/Finances/__flow__.json",
        "treatment/sessions/Finances/7/1.json",
        "treatment/end of day/1.json",
        "treatment/reasons for ending",
        "treatment/track your progress/__flow__.json",
        "treatment/track your progress/4/1.json",
        "control/sessions/__first__",
        "control/end of day/1.json",
        "control/track your progress/1",
        "treatment/resources/__flow__.json",
        "treatment/resources/Finances/__flow__.json",
        "treatment/resources/Finances/Budgeting.json",
        "control/resources/Finances/Other.json",
    ] {
        assert!(root.join(path).exists(), "missing {}", path);
    }
    assert!(!root.join("treatment/sessions/Finances/8").exists());
}

#[test]
fn test_sixth_dose_is_the_long_scenario() {
    let fixture = Fixture::new(62);
    Pipeline::new(fixture.config.clone()).run_sessions().unwrap();

    let long = fixture.read("treatment/sessions/Finances/6/1.json");
    assert!(long.contains("Budget Day"));
    assert!(long.contains("./images/sunrise.png"));

    // Five doses of ten, the long scenario, then the sixth batch.
    // The last two rows never close a batch.
    let last = snapshot(&fixture.root().join("treatment/sessions/Finances/7"));
    assert!(last.len() >= 3);
}

#[test]
fn test_first_dose_expands_practice_block() {
    let fixture = Fixture::new(12);
    Pipeline::new(fixture.config.clone()).run_sessions().unwrap();

    assert!(fixture.read("treatment/sessions/__first__/1.json").contains("Welcome to your first session."));
    assert!(fixture.read("treatment/sessions/__first__/2.json").contains("/videos/video1.mp4"));
}

#[test]
fn test_reminders_reach_doses_and_surveys() {
    let fixture = Fixture::new(12);
    Pipeline::new(fixture.config.clone()).run_sessions().unwrap();

    assert!(fixture.read("treatment/sessions/__before__/1.json").contains("Take a moment for yourself."));
    let first_dose = snapshot(&fixture.root().join("treatment/sessions/Finances/1"));
    assert!(first_dose
        .values()
        .any(|bytes| String::from_utf8_lossy(bytes).contains("Remember to breathe.")));
}

#[test]
fn test_progress_checks_append_weekly_questions() {
    let fixture = Fixture::new(12);
    Pipeline::new(fixture.config.clone()).run_surveys().unwrap();

    assert!(fixture.read("treatment/track your progress/1/1.json").contains("How are things going?"));
    assert!(fixture.read("treatment/track your progress/1/2.json").contains("Anything new this week?"));
    assert!(!fixture.root().join("treatment/track your progress/2/2.json").exists());
    assert!(fixture.read("treatment/track your progress/__flow__.json").contains("\"size\": 1"));
}

#[test]
fn test_library_lists_other_last() {
    let fixture = Fixture::new(12);
    Pipeline::new(fixture.config.clone()).run_library().unwrap();

    let flow = fixture.read("control/resources/Finances/__flow__.json");
    assert!(flow.contains("\"last_item\": \"other\""));
    assert!(fixture.read("treatment/resources/Finances/Budgeting.json").contains("https://example.org"));
}

#[test]
fn test_runs_are_byte_identical() {
    let first = Fixture::new(62);
    Pipeline::new(first.config.clone()).run_all().unwrap();

    let second = first.with_out_dir("again");
    Pipeline::new(second.config.clone()).run_all().unwrap();

    let a = snapshot(&second.dir.path().join("out"));
    let b = snapshot(&second.dir.path().join("again"));
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn test_rerun_replaces_stale_output() {
    let fixture = Fixture::new(12);
    let stale = fixture.root().join("treatment/sessions/Retired Domain/1");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("1.json"), "{}").unwrap();

    Pipeline::new(fixture.config.clone()).run_sessions().unwrap();
    let before = snapshot(&fixture.root());
    Pipeline::new(fixture.config.clone()).run_sessions().unwrap();

    assert!(!fixture.root().join("treatment/sessions/Retired Domain").exists());
    assert_eq!(before, snapshot(&fixture.root()));
}

#[test]
fn test_missing_media_stops_the_build() {
    let mut fixture = Fixture::new(12);
    fixture.config.verify_media = true;

    let result = Pipeline::new(fixture.config.clone()).run_sessions();
    assert!(matches!(result, Err(BuildError::MissingMedia { ref name, .. }) if name == "sunrise.png"));

    fs::create_dir_all(&fixture.config.media_dir).unwrap();
    fs::write(fixture.config.media_dir.join("sunrise.png"), b"png").unwrap();
    assert!(Pipeline::new(fixture.config.clone()).run_sessions().is_ok());
}
