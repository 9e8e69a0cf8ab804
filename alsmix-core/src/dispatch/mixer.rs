use alsmix_types::units::{
    db_to_linear, is_silent, pan_from_str, pan_to_string, parse_linear_db, send_letter,
};
use alsmix_types::ParamInput;

use super::target::{track_mut, TrackLocation};
use super::Outcome;
use crate::document::track::{self, SENDS, SEND_LEVEL};
use crate::document::{Document, Element};
use crate::error::ChangeError;

const VOLUME: &str = "Volume";
const PAN: &str = "Pan";
const MIXER_TAG: &str = "Mixer";

fn signed_db(db: f64) -> String {
    if is_silent(db) {
        "-inf".to_string()
    } else {
        format!("{:+.1}", db)
    }
}

fn old_db(raw: Option<&str>) -> String {
    raw.and_then(parse_linear_db)
        .map_or_else(|| "?".to_string(), signed_db)
}

fn mixer_of<'a>(
    doc: &'a mut Document,
    location: TrackLocation,
    label: &str,
) -> Result<&'a mut Element, ChangeError> {
    let track = track_mut(doc, location, label)?;
    track::mixer_mut(track).ok_or_else(|| ChangeError::MixerNotFound { track: label.to_string() })
}

fn missing(param: &str, label: &str) -> ChangeError {
    ChangeError::ParameterNotFound {
        param: param.to_string(),
        tag: MIXER_TAG.to_string(),
        track: label.to_string(),
    }
}

/// Set a fader level in dB; `None` or anything at -70 dB and below writes the silence floor.
pub(super) fn set_volume(
    doc: &mut Document,
    location: TrackLocation,
    label: &str,
    db: Option<f64>,
    group: bool,
) -> Result<Outcome, ChangeError> {
    let mixer = mixer_of(doc, location, label)?;
    let mut slot = mixer.value_slot_mut(VOLUME).ok_or_else(|| missing(VOLUME, label))?;
    let old = old_db(slot.get());
    slot.set(db_to_linear(db).to_string());

    let who = if group {
        format!("{} (group)", label)
    } else {
        label.to_string()
    };
    let new = db.map_or_else(|| "-inf".to_string(), signed_db);
    Ok(Outcome::Applied(format!("{}: Volume {} → {} dB", who, old, new)))
}

pub(super) fn set_pan(
    doc: &mut Document,
    location: TrackLocation,
    label: &str,
    value: &ParamInput,
) -> Result<Outcome, ChangeError> {
    let pan = pan_from_str(&value.to_string())?.clamp(-1.0, 1.0);
    let mixer = mixer_of(doc, location, label)?;
    let mut slot = mixer.value_slot_mut(PAN).ok_or_else(|| missing(PAN, label))?;
    let old = slot
        .get()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map_or_else(|| "?".to_string(), pan_to_string);
    slot.set(pan.to_string());
    Ok(Outcome::Applied(format!(
        "{}: Pan {} → {}",
        label,
        old,
        pan_to_string(pan)
    )))
}

/// Set a send level. A send index the track does not have is a silent no-op.
pub(super) fn set_send(
    doc: &mut Document,
    location: TrackLocation,
    label: &str,
    index: usize,
    db: Option<f64>,
) -> Result<Outcome, ChangeError> {
    let mixer = mixer_of(doc, location, label)?;
    let Some(holder) = mixer.child_mut(SENDS).and_then(|s| s.nth_child_mut(index)) else {
        log::warn!(target: "dispatch", "{}: no send {}, skipping", label, index);
        return Ok(Outcome::Skipped);
    };
    let mut slot = holder
        .value_slot_mut(SEND_LEVEL)
        .ok_or_else(|| missing(SEND_LEVEL, label))?;
    let old = old_db(slot.get());
    slot.set(db_to_linear(db).to_string());

    let new = db.map_or_else(|| "-inf".to_string(), signed_db);
    Ok(Outcome::Applied(format!(
        "{}: Send {} {} → {} dB",
        label,
        send_letter(index),
        old,
        new
    )))
}
