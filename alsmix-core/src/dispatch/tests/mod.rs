mod device;

use std::collections::HashSet;

use alsmix_types::{ChangeRequest, ChangeTarget, ParamInput, ProjectSnapshot, TrackSelector};

use super::*;
use crate::document::{Document, Element, ID_ATTR};
use crate::project::read_project;

pub(super) fn request(track: &str, target: ChangeTarget) -> ChangeRequest {
    ChangeRequest {
        track: TrackSelector::named(track),
        target,
    }
}

pub(super) fn nth(track: &str, kind: Option<&str>, index: usize, target: ChangeTarget) -> ChangeRequest {
    ChangeRequest {
        track: TrackSelector {
            track_name: track.to_string(),
            track_type: kind.map(str::to_string),
            track_index: index,
        },
        target,
    }
}

pub(super) fn apply_one(doc: &mut Document, change: ChangeRequest) -> Result<Outcome, ChangeError> {
    let mut ids = IdAllocator::scan(doc);
    apply_change(doc, &change, &mut ids)
}

/// Apply and return the description, panicking on anything else.
pub(super) fn applied(doc: &mut Document, change: ChangeRequest) -> String {
    match apply_one(doc, change) {
        Ok(Outcome::Applied(desc)) => desc,
        other => panic!("expected an applied change, got {:?}", other),
    }
}

pub(super) fn snapshot(doc: &Document) -> ProjectSnapshot {
    read_project(doc).expect("snapshot")
}

pub(super) fn track(doc: &Document, index: usize) -> &Element {
    doc.tracks().unwrap().nth_child(index).unwrap()
}

pub(super) fn volume(value: Option<f64>) -> ChangeTarget {
    ChangeTarget::Volume { value }
}

pub(super) fn param(tag: &str, name: &str, value: ParamInput) -> ChangeTarget {
    ChangeTarget::DeviceParam {
        device_tag: tag.to_string(),
        device_index: 0,
        param_name: name.to_string(),
        param_value: value,
        device_name: None,
    }
}

pub(super) fn add(tag: &str, position: Option<i64>, params: &[(&str, ParamInput)]) -> ChangeTarget {
    ChangeTarget::AddDevice {
        device_tag: tag.to_string(),
        position,
        params: alsmix_types::ParamList(
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ),
        device_name: None,
    }
}

/// Every `Id` attribute in the document appears exactly once.
pub(super) fn assert_unique_ids(doc: &Document) {
    let mut seen = HashSet::new();
    for el in doc.root().descendants() {
        if let Some(id) = el.attr(ID_ATTR) {
            assert!(seen.insert(id.to_string()), "duplicate Id {}", id);
        }
    }
}
