//! Project container: gzip-compressed XML decoded into an owned element tree.
//!
//! A [`Document`] is loaded once, mutated in place by the change engine, and
//! written back out as a new container. Everything the file contained, known
//! or not, survives a load/save cycle.

mod element;
mod parse;
pub mod track;
mod write;


use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

pub use element::{Descendants, Element, Node, ValueSlot, ID_ATTR, MANUAL, VALUE_ATTR};

use crate::error::ProjectError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const LIVE_SET: &str = "LiveSet";
pub const TRACKS_PATH: &str = "LiveSet/Tracks";
/// Master bus element names, newest format first.
pub const MASTER_PATHS: &[&str] = &["LiveSet/MainTrack", "LiveSet/MasterTrack"];

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Comments, processing instructions and doctype before the root element
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl Document {
    /// Build a document from uncompressed XML text.
    pub fn from_xml(xml: &str) -> Result<Self, ProjectError> {
        let (prolog, root, epilog) = parse::parse_xml(xml)?;
        let doc = Self { prolog, root, epilog };
        doc.tracks()?;
        Ok(doc)
    }

    /// Decode a gzip-compressed container.
    pub fn from_gzip(bytes: &[u8]) -> Result<Self, ProjectError> {
        if !bytes.starts_with(&GZIP_MAGIC) {
            return Err(ProjectError::NotGzip);
        }
        let mut raw = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut raw)?;
        let xml = String::from_utf8(raw)?;
        Self::from_xml(&xml)
    }

    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        let bytes = fs::read(path)?;
        let doc = Self::from_gzip(&bytes)?;
        log::debug!(target: "document", "loaded {} ({} bytes compressed)", path.display(), bytes.len());
        Ok(doc)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Nodes outside the root element, before and after it.
    pub fn outside_nodes(&self) -> (&[Node], &[Node]) {
        (&self.prolog, &self.epilog)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Creator/version string recorded on the root element.
    pub fn creator(&self) -> &str {
        self.root.attr("Creator").unwrap_or("Unknown")
    }

    pub fn tracks(&self) -> Result<&Element, ProjectError> {
        self.root
            .find(TRACKS_PATH)
            .ok_or_else(|| ProjectError::MissingElement { path: TRACKS_PATH.to_string() })
    }

    pub(crate) fn tracks_mut(&mut self) -> Result<&mut Element, ProjectError> {
        self.root
            .find_mut(TRACKS_PATH)
            .ok_or_else(|| ProjectError::MissingElement { path: TRACKS_PATH.to_string() })
    }

    pub fn master(&self) -> Option<&Element> {
        MASTER_PATHS.iter().find_map(|p| self.root.find(p))
    }

    pub(crate) fn master_mut(&mut self) -> Option<&mut Element> {
        let path = MASTER_PATHS.iter().find(|p| self.root.find(p).is_some())?;
        self.root.find_mut(path)
    }

    /// First element with `tag` anywhere in the document.
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.root.descendants().find(|e| e.name() == tag)
    }

    pub fn max_id(&self) -> i64 {
        self.root.max_id()
    }

    pub fn to_xml(&self) -> Result<Vec<u8>, ProjectError> {
        write::write_xml(&self.prolog, &self.root, &self.epilog)
    }

    pub fn to_gzip(&self, level: u32) -> Result<Vec<u8>, ProjectError> {
        let xml = self.to_xml()?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
        encoder.write_all(&xml)?;
        Ok(encoder.finish()?)
    }

    pub fn save(&self, path: &Path, level: u32) -> Result<(), ProjectError> {
        let bytes = self.to_gzip(level)?;
        fs::write(path, &bytes)?;
        log::info!(target: "document", "wrote {} ({} bytes compressed)", path.display(), bytes.len());
        Ok(())
    }
}

/// `song.als` -> `song-modified.als` for a `-modified` suffix.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    input.with_file_name(name)
}
