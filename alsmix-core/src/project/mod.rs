//! Decode a [`Document`] into a [`ProjectSnapshot`].
//!
//! Reading never fails on a document that loaded: anything optional that is
//! missing becomes a default (`N/A` volume, center pan, empty device list).

mod devices;


use alsmix_types::units::{parse_linear_db, send_letter};
use alsmix_types::{
    MasterSnapshot, ProjectInfo, ProjectSnapshot, SendSnapshot, TrackKind, TrackSnapshot,
};

use crate::document::track::{self, GROUP_ID, OUTPUT_PATH, SENDS, SEND_ACTIVE, SEND_LEVEL};
use crate::document::{Document, Element, ID_ATTR, VALUE_ATTR};
use crate::error::ProjectError;

const TEMPO_PATH: &str = "Mixer/Tempo";
const DEFAULT_OUTPUT: &str = "Main";

pub use devices::read_device;

pub fn read_project(doc: &Document) -> Result<ProjectSnapshot, ProjectError> {
    let tracks_el = doc.tracks()?;

    let return_names = return_names(tracks_el);
    let mut tracks = Vec::new();
    let mut returns = Vec::new();
    for el in tracks_el.children() {
        let Some(kind) = TrackKind::from_tag(el.name()) else {
            log::debug!(target: "project", "skipping unknown track element <{}>", el.name());
            continue;
        };
        let snapshot = read_track(el, kind, &return_names);
        match kind {
            TrackKind::Return => returns.push(snapshot),
            _ => tracks.push(snapshot),
        }
    }

    let master = doc.master().map(read_master);
    let tempo = doc
        .master()
        .and_then(|m| m.find_descendant(TEMPO_PATH))
        .and_then(|t| t.param_value(""))
        .and_then(|v| v.trim().parse::<f64>().ok());

    log::debug!(
        target: "project",
        "read {} tracks, {} returns, master {}",
        tracks.len(),
        returns.len(),
        if master.is_some() { "present" } else { "missing" }
    );

    Ok(ProjectSnapshot {
        info: ProjectInfo {
            creator: doc.creator().to_string(),
            tempo,
        },
        tracks,
        returns,
        master,
    })
}

/// Names of the return tracks in order; unnamed returns get `Return A`, `Return B`, ...
fn return_names(tracks: &Element) -> Vec<String> {
    tracks
        .children()
        .filter(|el| el.name() == TrackKind::Return.tag())
        .enumerate()
        .map(|(i, el)| match track::effective_name(el) {
            Some(name) => name.to_string(),
            None => format!("Return {}", send_letter(i)),
        })
        .collect()
}

fn read_track(el: &Element, kind: TrackKind, return_names: &[String]) -> TrackSnapshot {
    let id: Option<i64> = el.attr(ID_ATTR).and_then(|v| v.trim().parse().ok());
    let name = match track::effective_name(el) {
        Some(name) => name.to_string(),
        None => format!("Track {}", id.map_or_else(|| "?".to_string(), |i| i.to_string())),
    };
    let group_id = el
        .child(GROUP_ID)
        .and_then(|g| g.attr(VALUE_ATTR))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(-1);

    let mixer = track::mixer(el);
    let volume_db = mixer
        .and_then(|m| m.param_value("Volume"))
        .and_then(parse_linear_db);
    let pan = mixer
        .and_then(|m| m.param_value("Pan"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0);
    let muted = mixer
        .and_then(|m| m.param_value("Speaker"))
        .is_some_and(|v| v.eq_ignore_ascii_case("false"));
    let sends = mixer.map(|m| read_sends(m, return_names)).unwrap_or_default();

    let output = el
        .find(OUTPUT_PATH)
        .and_then(|o| o.attr(VALUE_ATTR))
        .unwrap_or(DEFAULT_OUTPUT)
        .to_string();

    TrackSnapshot {
        kind,
        id,
        name,
        group_id,
        volume_db,
        pan,
        muted,
        sends,
        output,
        devices: devices::read_devices(track::devices(el)),
    }
}

fn read_sends(mixer: &Element, return_names: &[String]) -> Vec<SendSnapshot> {
    let Some(holders) = mixer.child(SENDS) else {
        return Vec::new();
    };
    holders
        .children()
        .enumerate()
        .map(|(i, holder)| {
            let level = holder.param_value(SEND_LEVEL).unwrap_or("0");
            let db = parse_linear_db(level).unwrap_or(f64::NEG_INFINITY);
            let active = holder
                .param_value(SEND_ACTIVE)
                .map_or(true, |v| v.eq_ignore_ascii_case("true"));
            let name = return_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("Return {}", send_letter(i)));
            SendSnapshot { name, db, active }
        })
        .collect()
}

fn read_master(el: &Element) -> MasterSnapshot {
    let volume_db = el
        .find_descendant("Mixer/Volume")
        .and_then(|v| v.param_value(""))
        .and_then(parse_linear_db);
    MasterSnapshot {
        volume_db,
        devices: devices::read_devices(track::devices(el)),
    }
}
