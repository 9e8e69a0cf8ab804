//! Change requests: typed edits read from a change batch document.
//!
//! A batch is a JSON object with a single `changes` list. Each entry names a
//! track and a `target` kind; the remaining fields depend on the kind:
//!
//! ```json
//! { "changes": [
//!     { "track_name": "Snare", "target": "volume", "value": -6.0 },
//!     { "track_name": "Snare", "track_type": "MidiTrack", "track_index": 1,
//!       "target": "device_param", "device_tag": "GlueCompressor",
//!       "param_name": "Ratio", "param_value": 4 },
//!     { "track_name": "MASTER", "target": "add_device", "device_tag": "Limiter" }
//! ] }
//! ```

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::units::{parse_finite, UnitError};

/// Track names that select the main/master bus (case-insensitive).
pub const MASTER_TOKENS: &[&str] = &["MASTER", "MAIN"];

/// Prefix selecting a return track by name substring, e.g. `RETURN:Reverb`.
pub const RETURN_PREFIX: &str = "RETURN:";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeBatch {
    #[serde(default)]
    pub changes: Vec<ChangeRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRequest {
    #[serde(flatten)]
    pub track: TrackSelector,
    #[serde(flatten)]
    pub target: ChangeTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackSelector {
    #[serde(default)]
    pub track_name: String,
    /// Track element tag (`AudioTrack`, `MidiTrack`, ...) to narrow name matches
    #[serde(default)]
    pub track_type: Option<String>,
    /// 0-based occurrence among tracks sharing the name
    #[serde(default)]
    pub track_index: usize,
}

/// How a selector addresses the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRef<'a> {
    Master,
    /// First return track whose name contains this text
    Return(&'a str),
    Named {
        name: &'a str,
        kind: Option<&'a str>,
        index: usize,
    },
}

impl TrackSelector {
    pub fn named(name: &str) -> Self {
        Self {
            track_name: name.to_string(),
            track_type: None,
            track_index: 0,
        }
    }

    pub fn track_ref(&self) -> TrackRef<'_> {
        let name = self.track_name.as_str();
        if MASTER_TOKENS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
            return TrackRef::Master;
        }
        if let Some(prefix) = name.get(..RETURN_PREFIX.len()) {
            if prefix.eq_ignore_ascii_case(RETURN_PREFIX) {
                return TrackRef::Return(&name[RETURN_PREFIX.len()..]);
            }
        }
        TrackRef::Named {
            name,
            kind: self.track_type.as_deref(),
            index: self.track_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum ChangeTarget {
    Volume {
        /// Fader level in dB; missing means silence
        #[serde(default)]
        value: Option<f64>,
    },
    Pan {
        /// Position string such as `18R`, `C`, or a bare -1..=1 number
        value: ParamInput,
    },
    Send {
        #[serde(default)]
        send_index: usize,
        #[serde(default)]
        value: Option<f64>,
    },
    DeviceParam {
        device_tag: String,
        #[serde(default)]
        device_index: usize,
        /// Slash-separated path inside the device, e.g. `Bands.0/ParameterA/Gain`
        param_name: String,
        param_value: ParamInput,
        /// Label used in the description instead of the tag
        #[serde(default)]
        device_name: Option<String>,
    },
    AddDevice {
        device_tag: String,
        /// Insert position in the chain; missing, negative or past the end appends
        #[serde(default)]
        position: Option<i64>,
        #[serde(default)]
        params: ParamList,
        #[serde(default)]
        device_name: Option<String>,
    },
    GroupVolume {
        #[serde(default)]
        value: Option<f64>,
    },
}

impl ChangeTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeTarget::Volume { .. } => "volume",
            ChangeTarget::Pan { .. } => "pan",
            ChangeTarget::Send { .. } => "send",
            ChangeTarget::DeviceParam { .. } => "device_param",
            ChangeTarget::AddDevice { .. } => "add_device",
            ChangeTarget::GroupVolume { .. } => "group_volume",
        }
    }
}

/// A user-supplied scalar: number, boolean or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamInput {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamInput {
    pub fn as_f64(&self) -> Result<f64, UnitError> {
        match self {
            ParamInput::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            ParamInput::Int(v) => Ok(*v as f64),
            ParamInput::Float(v) if v.is_finite() => Ok(*v),
            ParamInput::Float(v) => Err(UnitError::InvalidFormat(v.to_string())),
            ParamInput::Text(s) => {
                parse_finite(s.trim()).ok_or_else(|| UnitError::InvalidFormat(s.clone()))
            }
        }
    }
}

impl fmt::Display for ParamInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamInput::Bool(b) => write!(f, "{}", b),
            ParamInput::Int(v) => write!(f, "{}", v),
            ParamInput::Float(v) => write!(f, "{}", v),
            ParamInput::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamInput {
    fn from(v: f64) -> Self {
        ParamInput::Float(v)
    }
}

impl From<&str> for ParamInput {
    fn from(s: &str) -> Self {
        ParamInput::Text(s.to_string())
    }
}

/// Ordered parameter assignments; keeps the order they were written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList(pub Vec<(String, ParamInput)>);

impl ParamList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamInput)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'de> Deserialize<'de> for ParamList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamListVisitor;

        impl<'de> Visitor<'de> for ParamListVisitor {
            type Value = ParamList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of parameter paths to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ParamList, A::Error> {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, ParamInput>()? {
                    entries.push((key, value));
                }
                Ok(ParamList(entries))
            }
        }

        deserializer.deserialize_map(ParamListVisitor)
    }
}
