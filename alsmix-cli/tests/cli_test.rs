use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use alsmix_core::document::Document;

const SAMPLE_SET: &str = include_str!("../../alsmix-core/tests/fixtures/sample_set.xml");

struct Run {
    dir: tempfile::TempDir,
}

impl Run {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn sample(&self) -> PathBuf {
        let path = self.path("sample.als");
        Document::from_xml(SAMPLE_SET).unwrap().save(&path, 6).unwrap();
        path
    }

    fn batch(&self, json: &str) -> PathBuf {
        let path = self.path("changes.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    /// Run the binary with config and log files kept inside the temp dir.
    fn alsmix(&self, args: &[&Path]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_alsmix"))
            .args(args)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .output()
            .expect("binary runs")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn inspect_lists_the_project() {
    let run = Run::new();
    let input = run.sample();
    let output = run.alsmix(&[Path::new("inspect"), input.as_path()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("=== ABLETON LIVE SET ANALYSIS ===\nVersion: Ableton Live 12.0.10\nTempo: 124 BPM"));
    assert!(text.contains("--- Group: \"Drums\" (Vol: +0.0 dB) ---"));
    assert!(text.contains("=== RETURN TRACKS ==="));
    assert!(text.contains("- Muted tracks: Snare"));
}

#[test]
fn apply_writes_next_to_the_input() {
    let run = Run::new();
    let input = run.sample();
    let changes = run.batch(
        r#"{"changes": [
            {"track_name": "Kick", "target": "volume", "value": -3},
            {"track_name": "Ghost", "target": "pan", "value": "C"}
        ]}"#,
    );
    let output = run.alsmix(&[Path::new("apply"), input.as_path(), changes.as_path()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Applying 2 changes...\n  Kick: Volume -6.0 → -3.0 dB\n"));
    assert!(text.contains("Applied 1 changes successfully.\n1 changes failed."));
    assert!(stderr(&output).contains("ERROR: Could not find track 'Ghost'"));

    let written = run.path("sample-modified.als");
    assert!(text.contains(&format!("Written to: {}", written.display())));
    let doc = Document::open(&written).unwrap();
    let snapshot = alsmix_core::project::read_project(&doc).unwrap();
    assert!((snapshot.tracks[1].volume_db.unwrap() + 3.0).abs() < 1e-9);
}

#[test]
fn apply_to_explicit_output_with_verbose_flag() {
    let run = Run::new();
    let input = run.sample();
    let changes = run.batch(r#"{"changes": [{"track_name": "MASTER", "target": "volume", "value": -1}]}"#);
    let out = run.path("mixed.als");
    let output = run.alsmix(&[Path::new("apply"), input.as_path(), Path::new("--verbose"), changes.as_path(), out.as_path()]);
    assert!(output.status.success());
    assert!(out.exists());
    assert!(!run.path("sample-modified.als").exists());
}

#[test]
fn empty_batch_writes_nothing() {
    let run = Run::new();
    let input = run.sample();
    let changes = run.batch(r#"{"changes": []}"#);
    let output = run.alsmix(&[Path::new("apply"), input.as_path(), changes.as_path()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "No changes to apply.");
    assert!(!run.path("sample-modified.als").exists());
}

#[test]
fn score_prints_grade() {
    let run = Run::new();
    let input = run.sample();
    let output = run.alsmix(&[Path::new("-v"), Path::new("score"), input.as_path()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Tracks: 3 regular, 1 groups, 1 returns"));
    assert!(text.contains("=== OVERALL: 76% : Grade B ==="));
}

#[test]
fn failures_exit_nonzero() {
    let run = Run::new();
    assert!(!run.alsmix(&[]).status.success());
    assert!(!run.alsmix(&[Path::new("frobnicate")]).status.success());

    let missing = run.path("missing.als");
    let output = run.alsmix(&[Path::new("inspect"), missing.as_path()]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("Error:"));

    let input = run.sample();
    let bad = run.batch("{not json");
    let output = run.alsmix(&[Path::new("apply"), input.as_path(), bad.as_path()]);
    assert!(!output.status.success());
    assert!(!run.path("sample-modified.als").exists());
}
