//! # alsmix-core
//!
//! Library behind the `alsmix` tool: loads Ableton Live sets (gzip-compressed
//! XML), decodes their mixer and device state, applies batches of mixing
//! changes, and writes the result back without disturbing anything it did not
//! touch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use alsmix_core::config::Config;
//! use alsmix_core::dispatch::{apply_changes, read_batch};
//! use alsmix_core::document::{derive_output_path, Document};
//! use alsmix_core::project::read_project;
//!
//! let config = Config::load();
//! let mut doc = Document::open(path)?;
//! let snapshot = read_project(&doc)?;
//!
//! let batch = read_batch(changes_path)?;
//! let report = apply_changes(&mut doc, &batch.changes);
//! for line in report.descriptions() {
//!     println!("{}", line);
//! }
//! doc.save(&derive_output_path(path, config.output_suffix()), config.compression_level())?;
//! ```
//!
//! ## Module Overview
//!
//! - [`document`]: `Document` tree, gzip container handling, lossless XML read/write
//! - [`project`]: `read_project()` decodes tracks, returns, master and devices into a snapshot
//! - [`dispatch`]: `apply_changes()` runs a change batch against a document
//! - [`analysis`]: issue detection and mix scoring over a snapshot
//! - [`config`]: TOML configuration loading (embedded defaults + user override)
//! - [`error`]: error types for loading and for individual changes

pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod project;

#[cfg(test)]
mod testing;
