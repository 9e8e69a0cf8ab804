use alsmix_types::{TrackKind, TrackRef, TrackSelector};

use crate::document::track::effective_name;
use crate::document::{Document, Element};
use crate::error::ChangeError;

/// A resolved change target inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackLocation {
    Master,
    /// Element position within the track list
    Track(usize),
}

pub fn resolve(doc: &Document, selector: &TrackSelector) -> Result<TrackLocation, ChangeError> {
    let tracks = doc.tracks().map_err(|_| ChangeError::TrackNotFound {
        name: selector.track_name.clone(),
    })?;

    match selector.track_ref() {
        TrackRef::Master => doc
            .master()
            .map(|_| TrackLocation::Master)
            .ok_or(ChangeError::MasterBusNotFound),
        TrackRef::Return(needle) => tracks
            .children()
            .position(|el| {
                el.name() == TrackKind::Return.tag()
                    && effective_name(el).is_some_and(|n| n.contains(needle))
            })
            .map(TrackLocation::Track)
            .ok_or_else(|| ChangeError::ReturnNotFound { name: needle.to_string() }),
        TrackRef::Named { name, kind, index } => {
            let matches: Vec<usize> = tracks
                .children()
                .enumerate()
                .filter(|(_, el)| kind.map_or(true, |k| el.name() == k))
                .filter(|(_, el)| effective_name(el) == Some(name))
                .map(|(i, _)| i)
                .collect();
            if matches.is_empty() {
                return Err(ChangeError::TrackNotFound { name: name.to_string() });
            }
            matches
                .get(index)
                .copied()
                .map(TrackLocation::Track)
                .ok_or(ChangeError::TrackIndexOutOfRange {
                    name: name.to_string(),
                    index,
                    found: matches.len(),
                })
        }
    }
}

pub(super) fn track_mut<'a>(
    doc: &'a mut Document,
    location: TrackLocation,
    label: &str,
) -> Result<&'a mut Element, ChangeError> {
    let found = match location {
        TrackLocation::Master => doc.master_mut(),
        TrackLocation::Track(i) => doc.tracks_mut().ok().and_then(|t| t.nth_child_mut(i)),
    };
    found.ok_or_else(|| ChangeError::TrackNotFound { name: label.to_string() })
}
