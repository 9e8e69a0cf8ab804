use alsmix_types::ProjectSnapshot;

/// Faders within this distance of 0 dB count as untouched.
const DEFAULT_FADER_DB: f64 = 0.05;
const HOT_TRACK_DB: f64 = 3.0;

/// Heuristic checks for common mixing problems, one message per finding.
pub fn detect_issues(project: &ProjectSnapshot) -> Vec<String> {
    let mut issues = Vec::new();
    let tracks: Vec<_> = project.non_group_tracks().collect();
    if tracks.is_empty() {
        return issues;
    }
    let n = tracks.len();

    let at_zero = tracks
        .iter()
        .filter(|t| t.volume_db.is_some_and(|db| db.abs() < DEFAULT_FADER_DB))
        .count();
    if at_zero as f64 > (n as f64 * 0.6).max(2.0) {
        issues.push(format!(
            "{} of {} tracks at 0.0 dB (default fader position, no gain staging)",
            at_zero, n
        ));
    }

    let centered = tracks.iter().filter(|t| t.pan_label() == "C").count();
    if centered as f64 > (n as f64 * 0.7).max(3.0) && n > 3 {
        issues.push(format!(
            "{} of {} tracks panned to center (narrow stereo image)",
            centered, n
        ));
    }

    let has_device_named = |needles: &[&str]| {
        tracks
            .iter()
            .flat_map(|t| t.devices.iter())
            .any(|d| needles.iter().any(|needle| d.name.contains(needle)))
    };
    if !has_device_named(&["EQ"]) && n > 2 {
        issues.push("No EQ found on any track".to_string());
    }
    if !has_device_named(&["Compressor", "Glue"]) && n > 3 {
        issues.push("No compressor found on any track".to_string());
    }

    if let Some(master) = &project.master {
        if !master.devices.iter().any(|d| d.name.contains("Limiter")) {
            issues.push("No limiter on the Main/Master track".to_string());
        }
    }

    if !project.returns.is_empty() {
        let all_silent = tracks
            .iter()
            .filter(|t| !t.sends.is_empty())
            .all(|t| t.sends.iter().all(|s| s.is_silent()));
        if all_silent {
            issues.push("Return tracks exist but no sends are active (all at -inf)".to_string());
        }
    }

    let hot: Vec<&str> = tracks
        .iter()
        .filter(|t| t.volume_db.is_some_and(|db| db > HOT_TRACK_DB))
        .map(|t| t.name.as_str())
        .collect();
    if !hot.is_empty() {
        issues.push(format!("Tracks above +3 dB (clipping risk): {}", hot.join(", ")));
    }

    let empty: Vec<&str> = tracks
        .iter()
        .filter(|t| t.devices.is_empty())
        .map(|t| t.name.as_str())
        .collect();
    if !empty.is_empty() && empty.len() < n {
        issues.push(format!("Tracks with no devices: {}", empty.join(", ")));
    }

    let disabled: Vec<String> = project
        .tracks
        .iter()
        .filter_map(|t| {
            let off: Vec<&str> = t
                .devices
                .iter()
                .filter(|d| !d.enabled)
                .map(|d| d.name.as_str())
                .collect();
            (!off.is_empty()).then(|| format!("\"{}\": {}", t.name, off.join(", ")))
        })
        .collect();
    if !disabled.is_empty() {
        issues.push(format!("Disabled devices on: {}", disabled.join("; ")));
    }

    let muted: Vec<&str> = project
        .tracks
        .iter()
        .filter(|t| t.muted)
        .map(|t| t.name.as_str())
        .collect();
    if !muted.is_empty() {
        issues.push(format!("Muted tracks: {}", muted.join(", ")));
    }

    issues
}
