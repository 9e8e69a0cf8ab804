//! Plain-text rendering of project listings and score reports.

use alsmix_core::analysis::MixScore;
use alsmix_types::units::format_db;
use alsmix_types::{DeviceSnapshot, ProjectSnapshot, TrackSnapshot};

const BAR_WIDTH: usize = 20;
const BAR_STEP: i32 = 5;

fn tempo(snapshot: &ProjectSnapshot) -> String {
    snapshot
        .info
        .tempo
        .map_or_else(|| "?".to_string(), |t| format!("{:.0}", t))
}

fn device_line(device: &DeviceSnapshot) -> String {
    let status = if device.enabled { "on" } else { "OFF" };
    if device.params.is_empty() {
        format!("{} ({})", device.name, status)
    } else {
        format!("{} ({}) ({})", device.name, status, device.params.join(", "))
    }
}

fn device_chain(devices: &[DeviceSnapshot]) -> String {
    devices.iter().map(device_line).collect::<Vec<_>>().join(" -> ")
}

fn push_track(lines: &mut Vec<String>, track: &TrackSnapshot) {
    let muted = if track.muted { " [MUTED]" } else { "" };
    lines.push(format!(
        "  [{}] \"{}\" | Vol: {} | Pan: {} | Out: {}{}",
        track.kind.label(),
        track.name,
        format_db(track.volume_db),
        track.pan_label(),
        track.output,
        muted
    ));
    if !track.devices.is_empty() {
        lines.push(format!("    Devices: {}", device_chain(&track.devices)));
    }
    let sends: Vec<String> = track
        .active_sends()
        .map(|s| format!("{}: {}", s.name, format_db(Some(s.db))))
        .collect();
    if !sends.is_empty() {
        lines.push(format!("    Sends: {}", sends.join(" | ")));
    }
}

/// Full listing: tracks by group, returns, master chain, then detected issues.
pub fn format_project(snapshot: &ProjectSnapshot, issues: &[String]) -> String {
    let mut lines = vec![
        "=== ABLETON LIVE SET ANALYSIS ===".to_string(),
        format!("Version: {}", snapshot.info.creator),
        format!("Tempo: {} BPM", tempo(snapshot)),
        String::new(),
    ];

    let mut groups: Vec<&TrackSnapshot> = snapshot.groups().collect();
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    lines.push(format!(
        "=== TRACKS ({} tracks, {} groups, {} returns) ===",
        snapshot.non_group_tracks().count(),
        groups.len(),
        snapshot.returns.len()
    ));

    for group in &groups {
        lines.push(String::new());
        lines.push(format!(
            "--- Group: \"{}\" (Vol: {}) ---",
            group.name,
            format_db(group.volume_db)
        ));
        for track in snapshot
            .non_group_tracks()
            .filter(|t| snapshot.group_of(t).is_some_and(|g| g.id == group.id))
        {
            push_track(&mut lines, track);
        }
    }

    let ungrouped: Vec<&TrackSnapshot> = snapshot
        .non_group_tracks()
        .filter(|t| snapshot.group_of(t).is_none())
        .collect();
    if !ungrouped.is_empty() {
        lines.push(String::new());
        lines.push("--- Ungrouped ---".to_string());
        for track in ungrouped {
            push_track(&mut lines, track);
        }
    }

    if !snapshot.returns.is_empty() {
        lines.push(String::new());
        lines.push("=== RETURN TRACKS ===".to_string());
        for track in &snapshot.returns {
            push_track(&mut lines, track);
        }
    }

    if let Some(master) = &snapshot.master {
        lines.push(String::new());
        lines.push("=== MAIN/MASTER TRACK ===".to_string());
        lines.push(format!("  Vol: {}", format_db(master.volume_db)));
        if !master.devices.is_empty() {
            lines.push(format!("  Devices: {}", device_chain(&master.devices)));
        }
    }

    if !issues.is_empty() {
        lines.push(String::new());
        lines.push("=== POTENTIAL ISSUES (auto-detected) ===".to_string());
        lines.extend(issues.iter().map(|i| format!("- {}", i)));
    }

    lines.join("\n")
}

fn bar(score: i32) -> String {
    let filled = (score / BAR_STEP).clamp(0, BAR_WIDTH as i32) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn format_score(snapshot: &ProjectSnapshot, score: &MixScore) -> String {
    let mut lines = vec![
        "=== MIX STANDARDS CHECK ===".to_string(),
        format!("Version: {}", snapshot.info.creator),
        format!("Tempo: {} BPM", tempo(snapshot)),
        format!(
            "Tracks: {} regular, {} groups, {} returns",
            snapshot.non_group_tracks().count(),
            snapshot.groups().count(),
            snapshot.returns.len()
        ),
        String::new(),
    ];

    for category in &score.categories {
        lines.push(format!(
            "  {:>20}: {} {}/100",
            category.name,
            bar(category.score),
            category.score
        ));
        for note in &category.notes {
            lines.push(format!("{:24}{}", "", note));
        }
        lines.push(String::new());
    }

    let grade = score.grade();
    lines.push(format!(
        "=== OVERALL: {}% : Grade {} ===",
        score.percent(),
        grade.letter()
    ));
    lines.push(grade.label().to_string());
    lines.join("\n")
}
