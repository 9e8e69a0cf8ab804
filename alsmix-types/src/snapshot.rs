//! Read-only semantic view of a project, decoded from the document.
//!
//! A snapshot is an independent copy: editing it never touches the document it came from.

use serde::{Deserialize, Serialize};

use crate::units::{is_silent, pan_to_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Audio,
    Midi,
    Group,
    Return,
}

impl TrackKind {
    /// Map a track element tag to its kind. Non-track tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AudioTrack" => Some(TrackKind::Audio),
            "MidiTrack" => Some(TrackKind::Midi),
            "GroupTrack" => Some(TrackKind::Group),
            "ReturnTrack" => Some(TrackKind::Return),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TrackKind::Audio => "AudioTrack",
            TrackKind::Midi => "MidiTrack",
            TrackKind::Group => "GroupTrack",
            TrackKind::Return => "ReturnTrack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackKind::Audio => "AUDIO",
            TrackKind::Midi => "MIDI",
            TrackKind::Group => "GROUP",
            TrackKind::Return => "RETURN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Free-text creator/version string from the document root
    pub creator: String,
    pub tempo: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendSnapshot {
    /// Name of the return track this send feeds
    pub name: String,
    /// Send level in dB; `-inf` at the silence floor
    pub db: f64,
    pub active: bool,
}

impl SendSnapshot {
    pub fn is_silent(&self) -> bool {
        is_silent(self.db)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub tag: String,
    /// Display name, including the vendor name for third-party plugins
    pub name: String,
    pub enabled: bool,
    /// Formatted `label: value` strings in schema order
    pub params: Vec<String>,
    /// Raw numeric values of the schema parameters, keyed by element name
    #[serde(default)]
    pub raw: Vec<(String, f64)>,
}

impl DeviceSnapshot {
    pub fn raw_value(&self, key: &str) -> Option<f64> {
        self.raw.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub kind: TrackKind,
    pub id: Option<i64>,
    pub name: String,
    /// Owning group track id; zero or negative means ungrouped
    pub group_id: i64,
    pub volume_db: Option<f64>,
    /// Normalized pan in -1..=1
    pub pan: f64,
    pub muted: bool,
    pub sends: Vec<SendSnapshot>,
    pub output: String,
    pub devices: Vec<DeviceSnapshot>,
}

impl TrackSnapshot {
    pub fn pan_label(&self) -> String {
        pan_to_string(self.pan)
    }

    pub fn is_group(&self) -> bool {
        self.kind == TrackKind::Group
    }

    pub fn active_sends(&self) -> impl Iterator<Item = &SendSnapshot> {
        self.sends.iter().filter(|s| !s.is_silent())
    }

    pub fn has_device(&self, tags: &[&str]) -> bool {
        self.devices.iter().any(|d| tags.contains(&d.tag.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterSnapshot {
    pub volume_db: Option<f64>,
    pub devices: Vec<DeviceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub info: ProjectInfo,
    /// Audio, MIDI and group tracks in document order
    pub tracks: Vec<TrackSnapshot>,
    pub returns: Vec<TrackSnapshot>,
    pub master: Option<MasterSnapshot>,
}

impl ProjectSnapshot {
    pub fn non_group_tracks(&self) -> impl Iterator<Item = &TrackSnapshot> {
        self.tracks.iter().filter(|t| !t.is_group())
    }

    pub fn groups(&self) -> impl Iterator<Item = &TrackSnapshot> {
        self.tracks.iter().filter(|t| t.is_group())
    }

    /// Resolve a track's group membership to the owning group track.
    pub fn group_of(&self, track: &TrackSnapshot) -> Option<&TrackSnapshot> {
        if track.group_id <= 0 {
            return None;
        }
        self.groups().find(|g| g.id == Some(track.group_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(kind: TrackKind, id: i64, group_id: i64) -> TrackSnapshot {
        TrackSnapshot {
            kind,
            id: Some(id),
            name: format!("T{}", id),
            group_id,
            volume_db: Some(0.0),
            pan: 0.0,
            muted: false,
            sends: Vec::new(),
            output: "Main".to_string(),
            devices: Vec::new(),
        }
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in [TrackKind::Audio, TrackKind::Midi, TrackKind::Group, TrackKind::Return] {
            assert_eq!(TrackKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(TrackKind::from_tag("MainTrack"), None);
    }

    #[test]
    fn group_resolution() {
        let snapshot = ProjectSnapshot {
            info: ProjectInfo { creator: "test".into(), tempo: None },
            tracks: vec![
                track(TrackKind::Group, 10, -1),
                track(TrackKind::Audio, 11, 10),
                track(TrackKind::Audio, 12, 99),
                track(TrackKind::Midi, 13, -1),
            ],
            returns: Vec::new(),
            master: None,
        };
        assert_eq!(snapshot.group_of(&snapshot.tracks[1]).map(|g| g.id), Some(Some(10)));
        assert!(snapshot.group_of(&snapshot.tracks[2]).is_none());
        assert!(snapshot.group_of(&snapshot.tracks[3]).is_none());
        assert_eq!(snapshot.non_group_tracks().count(), 3);
    }
}
