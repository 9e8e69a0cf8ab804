mod device;
mod mixer;
mod reset;
mod target;

#[cfg(test)]
mod tests;

pub use target::{resolve, TrackLocation};

use std::fs;
use std::path::Path;

use alsmix_types::{ChangeBatch, ChangeRequest, ChangeTarget};

use crate::document::{Document, Element};
use crate::error::{ChangeBatchError, ChangeError};

/// Result of one successfully handled change request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The document changed; human-readable description of the edit
    Applied(String),
    /// Nothing to change (e.g. a send index the track does not have)
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeResult {
    /// Position of the request in the batch
    pub index: usize,
    pub kind: &'static str,
    pub outcome: Result<Outcome, ChangeError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub results: Vec<ChangeResult>,
}

impl BatchReport {
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Ok(Outcome::Applied(desc)) => Some(desc.as_str()),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &ChangeError> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().err())
    }

    pub fn applied_count(&self) -> usize {
        self.descriptions().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Next free element identifier for the batch.
///
/// Seeded from the highest `Id` in the document; every inserted subtree is
/// renumbered from here so identifiers stay unique across the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: i64,
}

impl IdAllocator {
    pub fn scan(doc: &Document) -> Self {
        Self { next: doc.max_id() + 1 }
    }

    pub fn peek(&self) -> i64 {
        self.next
    }

    /// Renumber a detached subtree and return the id that would follow it.
    /// Nothing is reserved until [`IdAllocator::commit`].
    fn renumber(&self, element: &mut Element) -> i64 {
        element.remap_ids(self.next)
    }

    fn commit(&mut self, next: i64) {
        self.next = self.next.max(next);
    }
}

/// Apply a batch in order. Each request succeeds or fails on its own; a failed
/// request leaves the document as it was and the batch moves on.
pub fn apply_changes(doc: &mut Document, changes: &[ChangeRequest]) -> BatchReport {
    let mut ids = IdAllocator::scan(doc);
    let mut report = BatchReport::default();
    for (index, change) in changes.iter().enumerate() {
        let kind = change.target.kind();
        let outcome = apply_change(doc, change, &mut ids);
        match &outcome {
            Ok(Outcome::Applied(desc)) => log::info!(target: "dispatch", "{}", desc),
            Ok(Outcome::Skipped) => {
                log::debug!(target: "dispatch", "change {} ({}) had nothing to do", index, kind)
            }
            Err(e) => log::warn!(target: "dispatch", "change {} ({}) failed: {}", index, kind, e),
        }
        report.results.push(ChangeResult { index, kind, outcome });
    }
    report
}

pub fn apply_change(
    doc: &mut Document,
    change: &ChangeRequest,
    ids: &mut IdAllocator,
) -> Result<Outcome, ChangeError> {
    let location = resolve(doc, &change.track)?;
    let label = change.track.track_name.as_str();
    match &change.target {
        ChangeTarget::Volume { value } => mixer::set_volume(doc, location, label, *value, false),
        ChangeTarget::GroupVolume { value } => {
            mixer::set_volume(doc, location, label, *value, true)
        }
        ChangeTarget::Pan { value } => mixer::set_pan(doc, location, label, value),
        ChangeTarget::Send { send_index, value } => {
            mixer::set_send(doc, location, label, *send_index, *value)
        }
        ChangeTarget::DeviceParam {
            device_tag,
            device_index,
            param_name,
            param_value,
            device_name,
        } => device::set_param(
            doc,
            location,
            label,
            device::ParamEdit {
                tag: device_tag,
                index: *device_index,
                param: param_name,
                value: param_value,
                display_name: device_name.as_deref(),
            },
        ),
        ChangeTarget::AddDevice {
            device_tag,
            position,
            params,
            device_name,
        } => device::add_device(
            doc,
            location,
            label,
            ids,
            device::DeviceInsert {
                tag: device_tag,
                position: *position,
                params,
                display_name: device_name.as_deref(),
            },
        ),
    }
}

/// Load a change batch document from disk.
pub fn read_batch(path: &Path) -> Result<ChangeBatch, ChangeBatchError> {
    let text = fs::read_to_string(path)?;
    let batch: ChangeBatch = serde_json::from_str(&text)?;
    log::debug!(target: "dispatch", "loaded {} changes from {}", batch.changes.len(), path.display());
    Ok(batch)
}
