//! Read-only evaluation of a project snapshot: heuristic issue detection and
//! the six-category mix score.

mod issues;
pub mod score;

pub use issues::detect_issues;
pub use score::{score_project, CategoryScore, Grade, MixScore};

#[cfg(test)]
mod tests {
    use alsmix_types::{
        DeviceSnapshot, MasterSnapshot, ProjectInfo, ProjectSnapshot, SendSnapshot, TrackKind,
        TrackSnapshot,
    };

    use super::*;
    use crate::project::read_project;
    use crate::testing::sample_doc;

    fn device(tag: &str, name: &str) -> DeviceSnapshot {
        DeviceSnapshot {
            tag: tag.to_string(),
            name: name.to_string(),
            enabled: true,
            params: Vec::new(),
            raw: Vec::new(),
        }
    }

    fn track(name: &str, volume_db: f64, devices: Vec<DeviceSnapshot>) -> TrackSnapshot {
        TrackSnapshot {
            kind: TrackKind::Audio,
            id: None,
            name: name.to_string(),
            group_id: -1,
            volume_db: Some(volume_db),
            pan: 0.0,
            muted: false,
            sends: vec![SendSnapshot {
                name: "A".to_string(),
                db: f64::NEG_INFINITY,
                active: true,
            }],
            output: "Main".to_string(),
            devices,
        }
    }

    fn project(tracks: Vec<TrackSnapshot>) -> ProjectSnapshot {
        ProjectSnapshot {
            info: ProjectInfo { creator: "test".into(), tempo: None },
            tracks,
            returns: vec![track("Verb", 0.0, Vec::new())],
            master: Some(MasterSnapshot { volume_db: Some(0.0), devices: Vec::new() }),
        }
    }

    #[test]
    fn flat_unprocessed_mix_reports_everything() {
        let p = project(vec![
            track("A", 0.0, Vec::new()),
            track("B", 0.0, Vec::new()),
            track("C", 0.0, Vec::new()),
            track("D", 4.5, vec![device("Reverb", "Reverb")]),
        ]);
        let issues = detect_issues(&p);
        assert_eq!(
            issues,
            vec![
                "3 of 4 tracks at 0.0 dB (default fader position, no gain staging)",
                "4 of 4 tracks panned to center (narrow stereo image)",
                "No EQ found on any track",
                "No compressor found on any track",
                "No limiter on the Main/Master track",
                "Return tracks exist but no sends are active (all at -inf)",
                "Tracks above +3 dB (clipping risk): D",
                "Tracks with no devices: A, B, C",
            ]
        );
    }

    #[test]
    fn empty_project_has_no_issues() {
        assert!(detect_issues(&project(Vec::new())).is_empty());
    }

    #[test]
    fn sample_project_issues() {
        let snapshot = read_project(&sample_doc()).unwrap();
        let issues = detect_issues(&snapshot);
        assert_eq!(
            issues,
            vec![
                "Tracks above +3 dB (clipping risk): Snare",
                "Disabled devices on: \"Snare\": VST Plugin: Serum",
                "Muted tracks: Snare",
            ]
        );
    }

    #[test]
    fn sample_project_grade() {
        let snapshot = read_project(&sample_doc()).unwrap();
        let score = score_project(&snapshot);
        assert_eq!(score.categories.len(), 6);
        // 70 + 100 + 65 + 65 + 75 + 85
        assert_eq!(score.total(), 460);
        assert_eq!(score.percent(), 76);
        assert_eq!(score.grade(), Grade::B);
    }
}
