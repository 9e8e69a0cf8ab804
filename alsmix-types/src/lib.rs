//! # alsmix-types
//!
//! Shared type definitions for the alsmix tools: value conversions between the
//! project file's internal encodings and human units, the per-device parameter
//! tables, the decoded project snapshot, and the change request model.

pub mod change;
pub mod device;
pub mod snapshot;
pub mod units;

pub use change::{ChangeBatch, ChangeRequest, ChangeTarget, ParamInput, ParamList, TrackRef, TrackSelector};
pub use device::ParamSpec;
pub use snapshot::{
    DeviceSnapshot, MasterSnapshot, ProjectInfo, ProjectSnapshot, SendSnapshot, TrackKind,
    TrackSnapshot,
};
pub use units::{ParamUnit, UnitError};
