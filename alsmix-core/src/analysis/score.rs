//! Mix scoring: six fixed categories scored 0..=100 from a project snapshot.

use alsmix_types::device::{is_db_linear, is_plugin, COMP_TAGS, EQ_TAGS, LIMITER_TAGS};
use alsmix_types::units::linear_to_db;
use alsmix_types::{DeviceSnapshot, MasterSnapshot, ProjectSnapshot, TrackSnapshot};

const MAX_CATEGORY: i32 = 100;
const DEFAULT_FADER_DB: f64 = 0.05;
/// Send level (linear) above which a send counts as in use.
const ACTIVE_SEND_LINEAR: f64 = 0.0004;
const CENTER_PAN: f64 = 0.02;
const EXTREME_PAN: f64 = 0.8;
const BASS_PAN: f64 = 0.1;
const BASS_NAMES: &[&str] = &["sub", "bass", "kick"];
const METER_TAGS: &[&str] = &["SpectrumAnalyzer"];
const RETURN_FX_TAGS: &[&str] = &["Reverb", "Delay"];

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub name: &'static str,
    pub score: i32,
    pub notes: Vec<String>,
}

impl CategoryScore {
    fn new(name: &'static str, score: i32, notes: Vec<String>) -> Self {
        Self {
            name,
            score: score.clamp(0, MAX_CATEGORY),
            notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 85 {
            Grade::A
        } else if percent >= 70 {
            Grade::B
        } else if percent >= 55 {
            Grade::C
        } else if percent >= 40 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "Mix Ready: professional-level mixing decisions",
            Grade::B => "Solid Foundation: most fundamentals in place",
            Grade::C => "Getting There: key areas need attention",
            Grade::D => "Needs Work: significant mixing gaps",
            Grade::F => "Starting Out: major fundamentals missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixScore {
    pub categories: Vec<CategoryScore>,
}

impl MixScore {
    pub fn total(&self) -> i32 {
        self.categories.iter().map(|c| c.score).sum()
    }

    /// Whole-number percentage of the maximum possible total, rounded down.
    pub fn percent(&self) -> u32 {
        let max = self.categories.len() as i32 * MAX_CATEGORY;
        if max == 0 {
            return 0;
        }
        (self.total().max(0) * 100 / max) as u32
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percent(self.percent())
    }
}

pub fn score_project(project: &ProjectSnapshot) -> MixScore {
    let active: Vec<&TrackSnapshot> = project.non_group_tracks().filter(|t| !t.muted).collect();
    let groups: Vec<&TrackSnapshot> = project.groups().collect();
    MixScore {
        categories: vec![
            gain_staging(&active, &groups),
            stereo_image(&active),
            dynamics(&active),
            frequency_balance(&active),
            effects_sends(&active, &project.returns),
            master_chain(project.master.as_ref()),
        ],
    }
}

fn no_active_tracks(name: &'static str) -> CategoryScore {
    CategoryScore::new(name, 0, vec!["No active tracks".to_string()])
}

fn ratio(count: usize, of: usize) -> f64 {
    count as f64 / of as f64
}

fn at_default(db: Option<f64>) -> bool {
    db.is_some_and(|v| v.abs() < DEFAULT_FADER_DB)
}

fn gain_staging(tracks: &[&TrackSnapshot], groups: &[&TrackSnapshot]) -> CategoryScore {
    const NAME: &str = "Gain Staging";
    if tracks.is_empty() {
        return no_active_tracks(NAME);
    }
    let n = tracks.len();
    let mut score = MAX_CATEGORY;
    let mut notes = Vec::new();

    let defaults = tracks.iter().filter(|t| at_default(t.volume_db)).count();
    let default_pct = ratio(defaults, n);
    let penalty = if default_pct > 0.5 {
        (default_pct * 40.0) as i32
    } else if default_pct > 0.2 {
        (default_pct * 20.0) as i32
    } else {
        0
    };
    if penalty > 0 {
        score -= penalty;
        notes.push(format!("{}/{} tracks at default 0.0 dB (-{}pts)", defaults, n, penalty));
    }

    let hot: Vec<&str> = tracks
        .iter()
        .filter(|t| t.volume_db.is_some_and(|db| db > 3.0))
        .map(|t| t.name.as_str())
        .collect();
    if !hot.is_empty() {
        let penalty = 10 * hot.len() as i32;
        score -= penalty;
        notes.push(format!("Tracks above +3 dB: {} (-{}pts)", hot.join(", "), penalty));
    }

    let in_range = tracks
        .iter()
        .filter(|t| t.volume_db.is_some_and(|db| (-18.0..=-6.0).contains(&db)))
        .count();
    let range_pct = ratio(in_range, n);
    if range_pct > 0.5 {
        let bonus = (range_pct * 15.0) as i32;
        score = (score + bonus).min(MAX_CATEGORY);
        notes.push(format!(
            "{}/{} tracks in ideal -18 to -6 dB range (+{}pts)",
            in_range, n, bonus
        ));
    }

    if !groups.is_empty() {
        let default_groups = groups.iter().filter(|g| at_default(g.volume_db)).count();
        if default_groups == groups.len() {
            score -= 20;
            notes.push(format!("All {} group faders at 0.0 dB (unused) (-20pts)", groups.len()));
        } else if default_groups as f64 > groups.len() as f64 * 0.5 {
            score -= 10;
            notes.push(format!(
                "{}/{} group faders at 0.0 dB (-10pts)",
                default_groups,
                groups.len()
            ));
        } else if default_groups == 0 {
            notes.push("All group faders adjusted (+0pts, good)".to_string());
        }
    }

    CategoryScore::new(NAME, score, notes)
}

fn stereo_image(tracks: &[&TrackSnapshot]) -> CategoryScore {
    const NAME: &str = "Stereo Image";
    if tracks.is_empty() {
        return no_active_tracks(NAME);
    }
    let n = tracks.len();
    let mut score = MAX_CATEGORY;
    let mut notes = Vec::new();

    let centered = tracks.iter().filter(|t| t.pan.abs() < CENTER_PAN).count();
    let center_pct = ratio(centered, n);
    let (penalty, verdict) = if center_pct > 0.85 {
        (50, "nearly mono mix")
    } else if center_pct > 0.7 {
        (30, "narrow image")
    } else if center_pct > 0.5 {
        (15, "could be wider")
    } else {
        (0, "")
    };
    if penalty > 0 {
        score -= penalty;
        notes.push(format!("{}/{} tracks at center: {} (-{}pts)", centered, n, verdict, penalty));
    } else {
        notes.push(format!(
            "Good stereo spread: {}/{} tracks panned off-center",
            n - centered,
            n
        ));
    }

    let extreme: Vec<&str> = tracks
        .iter()
        .filter(|t| t.pan.abs() > EXTREME_PAN)
        .map(|t| t.name.as_str())
        .collect();
    if !extreme.is_empty() {
        let penalty = 5 * extreme.len() as i32;
        score -= penalty;
        notes.push(format!("Extreme panning (>40): {} (-{}pts)", extreme.join(", "), penalty));
    }

    for t in tracks {
        let lower = t.name.to_lowercase();
        if BASS_NAMES.iter().any(|b| lower.contains(b)) && t.pan.abs() > BASS_PAN {
            score -= 10;
            notes.push(format!("Bass element '{}' panned off-center (-10pts)", t.name));
        }
    }

    CategoryScore::new(NAME, score, notes)
}

fn active_compressors<'a>(track: &'a TrackSnapshot) -> impl Iterator<Item = &'a DeviceSnapshot> {
    track
        .devices
        .iter()
        .filter(|d| d.enabled && COMP_TAGS.contains(&d.tag.as_str()))
}

/// Compressor threshold in dB regardless of how the device stores it.
fn threshold_db(device: &DeviceSnapshot) -> Option<f64> {
    let raw = device.raw_value("Threshold")?;
    if is_db_linear(&device.tag, "Threshold") {
        Some(linear_to_db(raw))
    } else {
        Some(raw)
    }
}

fn dynamics(tracks: &[&TrackSnapshot]) -> CategoryScore {
    const NAME: &str = "Dynamics";
    if tracks.is_empty() {
        return no_active_tracks(NAME);
    }
    let mut score = 50;
    let mut notes = Vec::new();

    let mut any_compression = false;
    for t in tracks {
        for comp in active_compressors(t) {
            any_compression = true;
            let ratio = comp.raw_value("Ratio");
            let threshold = threshold_db(comp);

            if let Some(r) = ratio.filter(|r| *r <= 1.01) {
                score -= 5;
                notes.push(format!("'{}' compressor ratio {:.1}: not compressing (-5pts)", t.name, r));
            }
            if let Some(th) = threshold.filter(|th| *th > -1.0) {
                score -= 5;
                notes.push(format!(
                    "'{}' compressor threshold {:.1} dB: too high to engage (-5pts)",
                    t.name, th
                ));
            }
            if let (Some(r), Some(th)) = (ratio, threshold) {
                if (2.0..=6.0).contains(&r) && th < -5.0 {
                    score += 5;
                    notes.push(format!(
                        "'{}' compressor ratio {:.1}, threshold {:.1} dB: good (+5pts)",
                        t.name, r, th
                    ));
                }
            }
        }
    }
    if !any_compression {
        score -= 20;
        notes.push("No compression on any track (-20pts)".to_string());
    }

    for (keyword, role) in [("snare", "Snare"), ("vox", "Vocal"), ("vocal", "Vocal")] {
        for t in tracks.iter().filter(|t| t.name.to_lowercase().contains(keyword)) {
            if active_compressors(t).next().is_some() {
                score += 5;
                notes.push(format!("'{}' has compression: good for {} (+5pts)", t.name, role));
            } else {
                score -= 5;
                notes.push(format!(
                    "'{}' has no compression: {} usually needs it (-5pts)",
                    t.name, role
                ));
            }
        }
    }

    CategoryScore::new(NAME, score, notes)
}

fn frequency_balance(tracks: &[&TrackSnapshot]) -> CategoryScore {
    const NAME: &str = "Frequency Balance";
    if tracks.is_empty() {
        return no_active_tracks(NAME);
    }
    let n = tracks.len();
    let mut score = 50;
    let mut notes = Vec::new();

    let with_eq = tracks.iter().filter(|t| t.has_device(EQ_TAGS)).count();
    let eq_pct = ratio(with_eq, n);
    if with_eq == 0 {
        score -= 30;
        notes.push("No EQ on any track (-30pts)".to_string());
    } else if eq_pct < 0.2 {
        score -= 10;
        notes.push(format!("Only {}/{} tracks have EQ (-10pts)", with_eq, n));
    } else if eq_pct > 0.4 {
        score += 15;
        notes.push(format!("{}/{} tracks have EQ: good coverage (+15pts)", with_eq, n));
    } else {
        score += 5;
        notes.push(format!("{}/{} tracks have EQ (+5pts)", with_eq, n));
    }

    let empty: Vec<&str> = tracks
        .iter()
        .filter(|t| t.devices.is_empty())
        .map(|t| t.name.as_str())
        .collect();
    if !empty.is_empty() {
        let penalty = 3 * empty.len() as i32;
        score -= penalty;
        let shown: Vec<&str> = empty.iter().take(5).copied().collect();
        notes.push(format!("Tracks with no devices: {} (-{}pts)", shown.join(", "), penalty));
    }

    CategoryScore::new(NAME, score, notes)
}

fn effects_sends(tracks: &[&TrackSnapshot], returns: &[TrackSnapshot]) -> CategoryScore {
    const NAME: &str = "Effects & Sends";
    let mut score = 50;
    let mut notes = Vec::new();

    if returns.is_empty() {
        notes.push("No return tracks (-20pts)".to_string());
        return CategoryScore::new(NAME, score - 20, notes);
    }

    let active_db = linear_to_db(ACTIVE_SEND_LINEAR);
    let n = tracks.len();
    let sending = tracks
        .iter()
        .filter(|t| t.sends.iter().any(|s| s.db > active_db))
        .count();
    if sending == 0 {
        score -= 30;
        notes.push("Return tracks exist but no sends active: unused returns (-30pts)".to_string());
    } else if (sending as f64) < n as f64 * 0.2 {
        score -= 10;
        notes.push(format!("Only {}/{} tracks use sends (-10pts)", sending, n));
    } else if sending as f64 > n as f64 * 0.3 {
        score += 20;
        notes.push(format!("{}/{} tracks use sends: good (+20pts)", sending, n));
    } else {
        score += 10;
        notes.push(format!("{}/{} tracks use sends (+10pts)", sending, n));
    }

    for r in returns {
        if r.has_device(RETURN_FX_TAGS) || r.has_device(COMP_TAGS) {
            score += 5;
            notes.push(format!("Return '{}' has processing: good (+5pts)", r.name));
        }
    }

    CategoryScore::new(NAME, score, notes)
}

fn master_chain(master: Option<&MasterSnapshot>) -> CategoryScore {
    const NAME: &str = "Master Chain";
    let Some(master) = master else {
        return CategoryScore::new(NAME, 0, vec!["No master track found".to_string()]);
    };
    let mut score = 50;
    let mut notes = Vec::new();
    let has = |tags: &[&str]| master.devices.iter().any(|d| tags.contains(&d.tag.as_str()));

    if has(LIMITER_TAGS) {
        score += 25;
        notes.push("Limiter present on master (+25pts)".to_string());
        let ceiling = master
            .devices
            .iter()
            .rev()
            .find(|d| LIMITER_TAGS.contains(&d.tag.as_str()))
            .and_then(|d| d.raw_value("Ceiling"));
        if let Some(ceiling) = ceiling {
            if (-1.5..=-0.1).contains(&ceiling) {
                score += 10;
                notes.push(format!("Limiter ceiling at {:.1} dB: good range (+10pts)", ceiling));
            } else if ceiling > 0.0 {
                score -= 10;
                notes.push(format!(
                    "Limiter ceiling at {:.1} dB: above 0, will clip (-10pts)",
                    ceiling
                ));
            }
        }
    } else {
        score -= 25;
        notes.push("No limiter on master (-25pts)".to_string());
    }

    if has(EQ_TAGS) {
        score += 5;
        notes.push("EQ on master (+5pts)".to_string());
    }

    if has(METER_TAGS) || master.devices.iter().any(|d| is_plugin(&d.tag)) {
        score += 5;
        notes.push("Metering/analysis on master (+5pts)".to_string());
    }

    if master.devices.is_empty() {
        score -= 20;
        notes.push("Master chain is completely empty (-20pts)".to_string());
    }

    CategoryScore::new(NAME, score, notes)
}
