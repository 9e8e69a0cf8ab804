use alsmix_types::device::{
    channel_mode_name, device_params, display_name, is_plugin, EQ8_BAND_COUNT, EQ8_TAG,
    PLUGIN_NAME_PATHS, UTILITY_TAG,
};
use alsmix_types::units::{format_db, format_freq, format_param, parse_linear_db, raw_to_f64};
use alsmix_types::DeviceSnapshot;

use crate::document::{Element, VALUE_ATTR};

/// Utility gain below this magnitude (dB) is treated as unity.
const UTILITY_GAIN_EPSILON: f64 = 0.05;

pub(super) fn read_devices(chain: Option<&Element>) -> Vec<DeviceSnapshot> {
    chain
        .map(|devices| devices.children().map(read_device).collect())
        .unwrap_or_default()
}

pub fn read_device(device: &Element) -> DeviceSnapshot {
    let tag = device.name();
    let mut name = display_name(tag).to_string();
    if is_plugin(tag) {
        if let Some(vendor) = plugin_name(device) {
            name = format!("{}: {}", name, vendor);
        }
    }
    let enabled = device
        .param_value("On")
        .map_or(true, |v| v.eq_ignore_ascii_case("true"));

    let mut params = Vec::new();
    let mut raw = Vec::new();
    if tag == UTILITY_TAG {
        params = utility_params(device);
    } else {
        for spec in device_params(tag) {
            if let Some(value) = device.param_value(spec.key) {
                params.push(format_param(spec.label, value, spec.unit));
                if let Some(n) = raw_to_f64(value) {
                    raw.push((spec.key.to_string(), n));
                }
            }
        }
    }
    if tag == EQ8_TAG {
        let bands = eq_bands(device);
        if !bands.is_empty() {
            params.push(format!("Active bands: {}", bands.join(", ")));
        }
    }

    DeviceSnapshot {
        tag: tag.to_string(),
        name,
        enabled,
        params,
        raw,
    }
}

fn plugin_name(device: &Element) -> Option<&str> {
    PLUGIN_NAME_PATHS
        .iter()
        .filter_map(|path| device.find(path))
        .filter_map(|e| e.attr(VALUE_ATTR))
        .find(|name| !name.is_empty())
}

/// Only the utility settings that differ from a neutral pass-through.
fn utility_params(device: &Element) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(db) = device.param_value("Gain").and_then(parse_linear_db) {
        if db.abs() > UTILITY_GAIN_EPSILON {
            out.push(format!("Gain: {}", format_db(Some(db))));
        }
    }
    let is_true = |key: &str| {
        device
            .param_value(key)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    };
    if is_true("Mute") {
        out.push("Muted".to_string());
    }
    if is_true("PhaseInvertL") {
        out.push("Phase Invert L".to_string());
    }
    if is_true("PhaseInvertR") {
        out.push("Phase Invert R".to_string());
    }
    if let Some(mode) = device
        .param_value("ChannelMode")
        .and_then(raw_to_f64)
        .map(|v| v as i64)
    {
        if mode != 0 && mode != 1 {
            match channel_mode_name(mode) {
                Some(label) => out.push(format!("Mode: {}", label)),
                None => out.push(format!("Mode: {}", mode)),
            }
        }
    }
    if let Some(balance) = device.param_value("MidSideBalance").and_then(raw_to_f64) {
        if (balance - 1.0).abs() > 0.01 {
            out.push(format!("M/S Balance: {:.2}", balance));
        }
    }
    out
}

/// Summaries of the enabled EQ bands, e.g. `B1 60Hz +3.0dB Q0.7`.
fn eq_bands(device: &Element) -> Vec<String> {
    let mut bands = Vec::new();
    for i in 0..EQ8_BAND_COUNT {
        let prefix = format!("Bands.{}/ParameterA", i);
        let on = device
            .param_value(&format!("{}/IsOn", prefix))
            .or_else(|| device.param_value(&format!("Band{}On", i + 1)));
        if !on.is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            continue;
        }
        let number = |key: &str| {
            device
                .param_value(&format!("{}/{}", prefix, key))
                .and_then(raw_to_f64)
        };
        let mut info = format!("B{}", i + 1);
        if let Some(freq) = number("Freq") {
            info.push(' ');
            info.push_str(&format_freq(freq));
        }
        if let Some(gain) = number("Gain") {
            info.push_str(&format!(" {:+.1}dB", gain));
        }
        if let Some(q) = number("Q") {
            info.push_str(&format!(" Q{:.1}", q));
        }
        bands.push(info);
    }
    bands
}
