use alsmix_types::device::is_db_linear;
use alsmix_types::units::{db_to_linear, is_silent, parse_linear_db};
use alsmix_types::{ParamInput, ParamList};

use super::reset::resetter;
use super::target::{track_mut, TrackLocation};
use super::{IdAllocator, Outcome};
use crate::document::track;
use crate::document::{Document, Element};
use crate::error::ChangeError;

const ON: &str = "On";

/// Encode a requested value for the document. dB-addressed linear parameters
/// are converted; everything else is written as given.
fn encode(tag: &str, param: &str, value: &ParamInput) -> Result<String, ChangeError> {
    if is_db_linear(tag, param) {
        Ok(db_to_linear(Some(value.as_f64()?)).to_string())
    } else {
        Ok(value.to_string())
    }
}

pub(super) struct ParamEdit<'a> {
    pub tag: &'a str,
    pub index: usize,
    pub param: &'a str,
    pub value: &'a ParamInput,
    pub display_name: Option<&'a str>,
}

pub(super) fn set_param(
    doc: &mut Document,
    location: TrackLocation,
    label: &str,
    edit: ParamEdit<'_>,
) -> Result<Outcome, ChangeError> {
    let db_linear = is_db_linear(edit.tag, edit.param);
    let raw = encode(edit.tag, edit.param, edit.value)?;
    let shown = if db_linear {
        format!("{} dB", edit.value)
    } else {
        edit.value.to_string()
    };

    let track = track_mut(doc, location, label)?;
    let device = track::devices_mut(track)
        .and_then(|d| d.nth_named_mut(edit.tag, edit.index))
        .ok_or_else(|| ChangeError::DeviceNotFound {
            tag: edit.tag.to_string(),
            track: label.to_string(),
        })?;
    let mut slot = device
        .value_slot_mut(edit.param)
        .ok_or_else(|| ChangeError::ParameterNotFound {
            param: edit.param.to_string(),
            tag: edit.tag.to_string(),
            track: label.to_string(),
        })?;

    let old = match slot.get() {
        None => "?".to_string(),
        Some(v) if db_linear => match parse_linear_db(v) {
            Some(db) if is_silent(db) => "-inf dB".to_string(),
            Some(db) => format!("{:.1} dB", db),
            None => v.to_string(),
        },
        Some(v) => v.to_string(),
    };
    slot.set(raw);

    Ok(Outcome::Applied(format!(
        "{}: {} {} {} → {}",
        label,
        edit.display_name.unwrap_or(edit.tag),
        edit.param,
        old,
        shown
    )))
}

pub(super) struct DeviceInsert<'a> {
    pub tag: &'a str,
    pub position: Option<i64>,
    pub params: &'a ParamList,
    pub display_name: Option<&'a str>,
}

/// Clone the first instance of the device type found anywhere in the
/// document, give it fresh identifiers, reset it, apply the requested
/// parameters and splice it into the track's chain.
pub(super) fn add_device(
    doc: &mut Document,
    location: TrackLocation,
    label: &str,
    ids: &mut IdAllocator,
    insert: DeviceInsert<'_>,
) -> Result<Outcome, ChangeError> {
    let tag = insert.tag;
    let mut device = doc
        .find_first(tag)
        .cloned()
        .ok_or_else(|| ChangeError::NoDonorAvailable { tag: tag.to_string() })?;
    let next_id = ids.renumber(&mut device);
    log::debug!(
        target: "dispatch",
        "cloned donor {} for {}, ids {}..{}",
        tag,
        label,
        ids.peek(),
        next_id
    );

    if let Some(reset) = resetter(tag) {
        log::debug!(target: "dispatch", "resetting cloned {}", tag);
        reset(&mut device);
    }
    if let Some(mut on) = device.value_slot_mut(ON) {
        on.set("true");
    }
    for (path, value) in insert.params.iter() {
        let raw = encode(tag, path, value)?;
        device
            .value_slot_mut(path)
            .ok_or_else(|| ChangeError::NewDeviceParameterNotFound {
                param: path.to_string(),
                tag: tag.to_string(),
                track: label.to_string(),
            })?
            .set(raw);
    }

    let track = track_mut(doc, location, label)?;
    let chain: &mut Element = track::devices_mut(track)
        .ok_or_else(|| ChangeError::NoDeviceChain { track: label.to_string() })?;
    let count = chain.child_count();
    let placement = match insert.position {
        Some(p) if p >= 0 && (p as usize) < count => {
            chain.insert_child(p as usize, device);
            format!("position {}", p)
        }
        _ => {
            chain.push_child(device);
            "end".to_string()
        }
    };
    ids.commit(next_id);

    let settings = if insert.params.is_empty() {
        "defaults".to_string()
    } else {
        insert
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    };
    Ok(Outcome::Applied(format!(
        "{}: Added {} at {} ({})",
        label,
        insert.display_name.unwrap_or(tag),
        placement,
        settings
    )))
}
