//! Static per-device tables: display names, mixing-relevant parameter schemas,
//! and which parameters are stored as linear amplitude.
//!
//! Adding support for a device type is a data change here, not new code.

use crate::units::ParamUnit;

pub const UTILITY_TAG: &str = "StereoGain";
pub const EQ8_TAG: &str = "Eq8";
pub const COMPRESSOR_TAG: &str = "Compressor2";

/// Number of bands on the built-in multi-band equalizer.
pub const EQ8_BAND_COUNT: usize = 8;

pub const PLUGIN_TAGS: &[&str] = &["PluginDevice", "AuPluginDevice", "Vst3PluginDevice"];
pub const EQ_TAGS: &[&str] = &["Eq8", "ChannelEq"];
pub const COMP_TAGS: &[&str] = &["Compressor2", "GlueCompressor"];
pub const LIMITER_TAGS: &[&str] = &["Limiter"];

/// Where each plugin format keeps the vendor-supplied name, tried in order.
pub const PLUGIN_NAME_PATHS: &[&str] = &[
    "PluginDesc/VstPluginInfo/PlugName",
    "PluginDesc/Vst3PluginInfo/Name",
    "PluginDesc/AuPluginInfo/Name",
];

static DEVICE_NAMES: &[(&str, &str)] = &[
    // Instruments
    ("InstrumentGroupDevice", "Instrument Rack"),
    ("DrumGroupDevice", "Drum Rack"),
    ("Operator", "Operator"),
    ("InstrumentVector", "Wavetable"),
    ("OriginalSimpler", "Simpler"),
    ("MultiSampler", "Sampler"),
    ("StringStudio", "Tension"),
    ("Collision", "Collision"),
    ("LoungeLizard", "Electric"),
    ("InstrumentImpulse", "Impulse"),
    ("UltraAnalog", "Analog"),
    ("Drift", "Drift"),
    ("Meld", "Meld"),
    // Audio effects
    ("AudioEffectGroupDevice", "Audio Effect Rack"),
    ("Reverb", "Reverb"),
    ("Delay", "Delay"),
    ("Eq8", "EQ Eight"),
    ("ChannelEq", "Channel EQ"),
    ("GlueCompressor", "Glue Compressor"),
    ("Compressor2", "Compressor"),
    ("AutoFilter", "Auto Filter"),
    ("FilterDelay", "Filter Delay"),
    ("Chorus2", "Chorus-Ensemble"),
    ("Phaser", "Phaser"),
    ("Flanger", "Flanger"),
    ("Gate", "Gate"),
    ("Limiter", "Limiter"),
    ("MultibandDynamics", "Multiband Dynamics"),
    ("Saturator", "Saturator"),
    ("Overdrive", "Overdrive"),
    ("Redux2", "Redux"),
    ("DrumBuss", "Drum Buss"),
    ("PingPongDelay", "Ping Pong Delay"),
    ("Vinyl", "Vinyl Distortion"),
    ("StereoGain", "Utility"),
    ("Tuner", "Tuner"),
    ("SpectrumAnalyzer", "Spectrum"),
    ("CrossDelay", "Echo"),
    ("Corpus", "Corpus"),
    ("Resonators", "Resonators"),
    ("FrequencyShifter", "Frequency Shifter"),
    ("BeatRepeat", "Beat Repeat"),
    ("Erosion", "Erosion"),
    ("Amp", "Amp"),
    ("Cabinet", "Cabinet"),
    ("Pedal", "Pedal"),
    ("Shifter", "Shifter"),
    // Third-party
    ("PluginDevice", "VST Plugin"),
    ("AuPluginDevice", "AU Plugin"),
    ("Vst3PluginDevice", "VST3 Plugin"),
];

/// One mixing-relevant parameter of a device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Element name inside the device
    pub key: &'static str,
    pub label: &'static str,
    pub unit: ParamUnit,
}

const fn spec(key: &'static str, label: &'static str, unit: ParamUnit) -> ParamSpec {
    ParamSpec { key, label, unit }
}

use ParamUnit::*;

static DEVICE_PARAMS: &[(&str, &[ParamSpec])] = &[
    (
        "Reverb",
        &[
            spec("PreDelay", "Pre-delay", Ms),
            spec("DecayTime", "Decay", Ms),
            spec("RoomSize", "Room Size", Percent),
            spec("DryWet", "Dry/Wet", Ratio),
        ],
    ),
    (
        "Delay",
        &[spec("Feedback", "Feedback", Ratio), spec("DryWet", "Dry/Wet", Ratio)],
    ),
    (
        "Compressor2",
        &[
            spec("Threshold", "Threshold", DbLinear),
            spec("Ratio", "Ratio", Raw),
            spec("Attack", "Attack", Ms),
            spec("Release", "Release", Ms),
            spec("GainCompensation", "Makeup", Bool),
            spec("DryWet", "Dry/Wet", Ratio),
        ],
    ),
    (
        "GlueCompressor",
        &[
            spec("Threshold", "Threshold", Db),
            spec("Ratio", "Ratio", Raw),
            spec("Attack", "Attack", Ms),
            spec("Release", "Release", Seconds),
            spec("Makeup", "Makeup", Db),
            spec("DryWet", "Dry/Wet", Ratio),
        ],
    ),
    (
        "Limiter",
        &[
            spec("Ceiling", "Ceiling", Db),
            spec("Release", "Release", Ms),
            spec("Gain", "Gain", Db),
        ],
    ),
    ("Eq8", &[spec("GlobalGain", "Global Gain", Db)]),
    (
        "ChannelEq",
        &[
            spec("HighpassOn", "HPF", Bool),
            spec("LowShelfGain", "Low Gain", Raw),
            spec("MidGain", "Mid Gain", Raw),
            spec("MidFreq", "Mid Freq", Hz),
            spec("HighShelfGain", "High Gain", Raw),
        ],
    ),
    (
        "Saturator",
        &[spec("DryWet", "Dry/Wet", Ratio), spec("Drive", "Drive", Db)],
    ),
    (
        "DrumBuss",
        &[spec("DryWet", "Dry/Wet", Ratio), spec("Drive", "Drive", Raw)],
    ),
    (
        "Gate",
        &[
            spec("Threshold", "Threshold", DbLinear),
            spec("Return", "Return", DbLinear),
            spec("Attack", "Attack", Ms),
            spec("Hold", "Hold", Ms),
            spec("Release", "Release", Ms),
        ],
    ),
    ("MultibandDynamics", &[spec("DryWet", "Dry/Wet", Ratio)]),
    (
        "AutoFilter",
        &[
            spec("DryWet", "Dry/Wet", Ratio),
            spec("Frequency", "Frequency", Hz),
            spec("Resonance", "Resonance", Raw),
        ],
    ),
];

/// Parameters written as linear amplitude but addressed in dB by change requests.
static DB_LINEAR_PARAMS: &[(&str, &str)] = &[
    ("Compressor2", "Threshold"),
    ("Compressor2", "OutputGain"),
    ("Gate", "Threshold"),
    ("Gate", "Return"),
];

/// Human-readable device name, or the tag itself for unknown devices.
pub fn display_name(tag: &str) -> &str {
    DEVICE_NAMES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, name)| *name)
        .unwrap_or(tag)
}

/// Parameter schema for a device type; empty for unknown types and the utility device.
pub fn device_params(tag: &str) -> &'static [ParamSpec] {
    DEVICE_PARAMS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, params)| *params)
        .unwrap_or(&[])
}

pub fn param_spec(tag: &str, key: &str) -> Option<&'static ParamSpec> {
    device_params(tag).iter().find(|p| p.key == key)
}

pub fn is_db_linear(tag: &str, param: &str) -> bool {
    DB_LINEAR_PARAMS.iter().any(|(t, p)| *t == tag && *p == param)
}

pub fn is_plugin(tag: &str) -> bool {
    PLUGIN_TAGS.contains(&tag)
}

/// Utility channel mode names; modes 0 and 1 are both plain stereo.
pub fn channel_mode_name(mode: i64) -> Option<&'static str> {
    match mode {
        0 | 1 => Some("Stereo"),
        2 => Some("Left"),
        3 => Some("Right"),
        4 => Some("Swap"),
        5 => Some("Mono"),
        6 => Some("Mid"),
        7 => Some("Side"),
        _ => None,
    }
}
