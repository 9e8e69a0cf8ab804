use std::fmt;

use serde::{Deserialize, Serialize};

/// Linear amplitude the host writes for a fully attenuated fader (about -70 dB).
pub const SILENCE_FLOOR: f64 = 0.0003162277571;

/// Decibel values at or below this encode as [`SILENCE_FLOOR`].
pub const MIN_DB: f64 = -70.0;

/// Pan values closer to zero than this render as center.
const PAN_CENTER_EPSILON: f64 = 0.01;

/// Pan positions run 0..=50 in each direction.
const PAN_SCALE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    InvalidFormat(String),
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::InvalidFormat(text) => write!(f, "invalid value format: '{}'", text),
        }
    }
}

impl std::error::Error for UnitError {}

/// Convert decibels to the linear amplitude stored in the document.
///
/// `None` and anything at or below -70 dB become the silence floor rather than zero,
/// matching how the host encodes a fader pulled all the way down.
pub fn db_to_linear(db: Option<f64>) -> f64 {
    match db {
        Some(db) if db > MIN_DB => 10f64.powf(db / 20.0),
        _ => SILENCE_FLOOR,
    }
}

/// Convert a stored linear amplitude to decibels. The silence floor and below is -inf.
pub fn linear_to_db(amplitude: f64) -> f64 {
    if amplitude <= SILENCE_FLOOR {
        f64::NEG_INFINITY
    } else {
        20.0 * amplitude.log10()
    }
}

/// Parse a stored amplitude string and convert it to decibels.
pub fn parse_linear_db(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().map(linear_to_db)
}

pub fn is_silent(db: f64) -> bool {
    db.is_infinite() && db < 0.0
}

/// Signed one-decimal dB rendering: `+0.0 dB`, `-inf`, or `N/A` when unknown.
pub fn format_db(db: Option<f64>) -> String {
    match db {
        None => "N/A".to_string(),
        Some(v) if is_silent(v) => "-inf".to_string(),
        Some(v) => format!("{:+.1} dB", v),
    }
}

/// Parse a pan position such as `C`, `18R`, `22L`, or a bare number in -1..=1.
pub fn pan_from_str(text: &str) -> Result<f64, UnitError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("c") || text == "0" {
        return Ok(0.0);
    }
    let invalid = || UnitError::InvalidFormat(text.to_string());
    let (digits, sign) = match text.chars().last() {
        Some('L') | Some('l') => (&text[..text.len() - 1], -1.0),
        Some('R') | Some('r') => (&text[..text.len() - 1], 1.0),
        _ => return parse_finite(text).ok_or_else(invalid),
    };
    let pos = parse_finite(digits.trim()).ok_or_else(invalid)?;
    Ok(sign * pos / PAN_SCALE)
}

/// `f64` parsing that rejects `nan`, `inf` and `infinity`.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a stored pan value as a position string (`C`, `18R`, `22L`).
pub fn pan_to_string(value: f64) -> String {
    if value.abs() < PAN_CENTER_EPSILON {
        return "C".to_string();
    }
    let direction = if value < 0.0 { 'L' } else { 'R' };
    format!("{:.0}{}", (value.abs() * PAN_SCALE).round(), direction)
}

/// Letter label for the return track fed by send `index` (`A`, `B`, ...).
/// Past `Z` the 1-based number is used.
pub fn send_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Frequency rendering shared by parameter lists and EQ band summaries.
pub fn format_freq(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{:.1}kHz", hz / 1000.0)
    } else {
        format!("{:.0}Hz", hz)
    }
}

/// How a device parameter's raw document value should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamUnit {
    Bool,
    /// 0..1 stored, shown as a percentage
    Ratio,
    /// Already stored in decibels
    Db,
    /// Stored as linear amplitude, shown as dB
    DbLinear,
    /// Like `DbLinear` but signed, for the utility gain stage
    DbUtility,
    Ms,
    Seconds,
    Hz,
    Percent,
    Int,
    Raw,
}

fn parse_raw(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    raw.parse().ok()
}

/// Render `label: value` for one parameter. Unparseable raw values are shown verbatim.
pub fn format_param(label: &str, raw: &str, unit: ParamUnit) -> String {
    let Some(v) = parse_raw(raw) else {
        return format!("{}: {}", label, raw);
    };
    match unit {
        ParamUnit::Bool => format!("{}: {}", label, if v != 0.0 { "on" } else { "off" }),
        ParamUnit::Ratio => format!("{}: {:.0}%", label, v * 100.0),
        ParamUnit::Db => format!("{}: {:.1} dB", label, v),
        ParamUnit::DbLinear => {
            let db = linear_to_db(v);
            if is_silent(db) {
                format!("{}: -inf dB", label)
            } else {
                format!("{}: {:.1} dB", label, db)
            }
        }
        ParamUnit::DbUtility => {
            let db = linear_to_db(v);
            if is_silent(db) {
                format!("{}: -inf", label)
            } else {
                format!("{}: {:+.1} dB", label, db)
            }
        }
        ParamUnit::Ms => {
            if v >= 1000.0 {
                format!("{}: {:.1}s", label, v / 1000.0)
            } else {
                format!("{}: {:.0}ms", label, v)
            }
        }
        ParamUnit::Seconds => format!("{}: {:.2}s", label, v),
        ParamUnit::Hz => format!("{}: {}", label, format_freq(v)),
        ParamUnit::Percent => format!("{}: {:.0}%", label, v),
        ParamUnit::Int => format!("{}: {}", label, v.trunc() as i64),
        ParamUnit::Raw => format!("{}: {:.2}", label, v),
    }
}

/// Numeric view of a raw parameter string, accepting `true`/`false`.
pub fn raw_to_f64(raw: &str) -> Option<f64> {
    parse_raw(raw)
}
