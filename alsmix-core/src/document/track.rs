//! Locations inside a track (or master bus) element.

use super::element::{Element, VALUE_ATTR};

pub const NAME_PATH: &str = "Name/EffectiveName";
pub const MIXER_PATH: &str = "DeviceChain/Mixer";
pub const DEVICES_PATH: &str = "DeviceChain/DeviceChain/Devices";
pub const OUTPUT_PATH: &str = "DeviceChain/AudioOutputRouting/UpperDisplayString";
pub const GROUP_ID: &str = "TrackGroupId";
pub const SENDS: &str = "Sends";
pub const SEND_LEVEL: &str = "Send";
pub const SEND_ACTIVE: &str = "Active";

/// Display name of a track, from the first `Name/EffectiveName` in the subtree.
pub fn effective_name(track: &Element) -> Option<&str> {
    track.find_descendant(NAME_PATH)?.attr(VALUE_ATTR)
}

pub fn mixer(track: &Element) -> Option<&Element> {
    track.find_descendant(MIXER_PATH)
}

pub fn mixer_mut(track: &mut Element) -> Option<&mut Element> {
    track.find_descendant_mut(MIXER_PATH)
}

pub fn devices(track: &Element) -> Option<&Element> {
    track.find(DEVICES_PATH)
}

pub fn devices_mut(track: &mut Element) -> Option<&mut Element> {
    track.find_mut(DEVICES_PATH)
}
