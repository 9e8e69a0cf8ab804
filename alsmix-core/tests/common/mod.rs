#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use alsmix_core::document::{Document, ID_ATTR};

pub const SAMPLE_SET: &str = include_str!("../fixtures/sample_set.xml");

/// Write the sample project into `dir` as a compressed container.
pub fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("sample.als");
    let doc = Document::from_xml(SAMPLE_SET).expect("fixture parses");
    doc.save(&path, 6).expect("fixture saves");
    path
}

pub fn write_batch(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("changes.json");
    std::fs::write(&path, json).expect("batch written");
    path
}

pub fn ids(doc: &Document) -> Vec<String> {
    doc.root()
        .descendants()
        .filter_map(|e| e.attr(ID_ATTR))
        .map(str::to_string)
        .collect()
}

pub fn assert_unique_ids(doc: &Document) {
    let all = ids(doc);
    let unique: HashSet<&String> = all.iter().collect();
    assert_eq!(unique.len(), all.len(), "duplicate ids in {:?}", all);
}
