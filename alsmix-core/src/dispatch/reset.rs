//! Neutral starting state for devices cloned from an existing instance.
//!
//! A donor device carries whatever the user dialed in; registered resetters
//! bring a clone back to a blank state before the request's own parameters
//! are applied. Unregistered device types are inserted as cloned.

use alsmix_types::device::{COMPRESSOR_TAG, EQ8_BAND_COUNT, EQ8_TAG};
use alsmix_types::units::db_to_linear;

use crate::document::Element;

type ResetFn = fn(&mut Element);

static RESETTERS: &[(&str, ResetFn)] = &[(EQ8_TAG, reset_eq8), (COMPRESSOR_TAG, reset_compressor)];

pub(super) fn resetter(tag: &str) -> Option<ResetFn> {
    RESETTERS.iter().find(|(t, _)| *t == tag).map(|(_, f)| *f)
}

/// Write `value` where the parameter exists; absent parameters are left alone.
fn set_if_present(device: &mut Element, path: &str, value: &str) {
    if let Some(mut slot) = device.value_slot_mut(path) {
        slot.set(value);
    }
}

/// Every band off and flat with the default Q, on both parameter sets.
fn reset_eq8(device: &mut Element) {
    for band in 0..EQ8_BAND_COUNT {
        for set in ["ParameterA", "ParameterB"] {
            let prefix = format!("Bands.{}/{}", band, set);
            set_if_present(device, &format!("{}/IsOn", prefix), "false");
            set_if_present(device, &format!("{}/Gain", prefix), "0");
            set_if_present(device, &format!("{}/Q", prefix), "0.7071067");
        }
    }
}

fn reset_compressor(device: &mut Element) {
    let unity = db_to_linear(Some(0.0)).to_string();
    set_if_present(device, "Threshold", &unity);
    set_if_present(device, "Ratio", "2");
    set_if_present(device, "Attack", "10");
    set_if_present(device, "Release", "100");
    set_if_present(device, "DryWet", "1");
    set_if_present(device, "GainCompensation", "true");
}
