//! Url hash parameter codec
//!
//! Three parameters carry navigable state in a shareable link:
//!
//! * `map=<zoom>/<lat>/<lon>[/<bearing>]`
//! * `id=<comma separated entity ids>`
//! * `note=true` or `note=<numeric id>`
//!
//! Parsing never fails. Anything unreadable falls back to a safe default and
//! every value is clamped or wrapped into its domain, so a stale or hand
//! edited link still produces a valid view.

use crate::core::constants::{BEARING_EPSILON, DEFAULT_ZOOM, MAX_Z, MIN_Z, ZOOM_PRECISION};
use crate::core::geo::{num_wrap, LatLng};
use crate::traits::{EntityId, NoteId};
use fxhash::FxHashMap;

/// Key -> value view of the url hash
pub type HashParams = FxHashMap<String, String>;

pub const MAP_PARAM: &str = "map";
pub const ID_PARAM: &str = "id";
pub const NOTE_PARAM: &str = "note";

/// The decoded `map` parameter, already clamped and wrapped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapParam {
    pub zoom: f64,
    pub center: LatLng,
    /// Clockwise map rotation in radians
    pub rotation: f64,
}

impl MapParam {
    /// Decodes `zoom/lat/lon[/bearing]`.
    ///
    /// The hash stores the bearing the user faces, which is the negation of
    /// the map rotation.
    pub fn parse(value: Option<&str>) -> Self {
        let mut parts = [f64::NAN; 4];
        if let Some(value) = value {
            for (slot, part) in parts.iter_mut().zip(value.split('/')) {
                *slot = parse_number(part).unwrap_or(f64::NAN);
            }
        }
        let [zoom, lat, lon, bearing] = parts.map(|v| if v.is_finite() { v } else { 0.0 });
        let zoom = if parts[0].is_finite() { zoom } else { DEFAULT_ZOOM };

        // `+ 0.0` keeps a missing bearing from becoming -0
        let degrees = num_wrap(-bearing, 0.0, 360.0) + 0.0;
        Self {
            zoom: zoom.clamp(MIN_Z, MAX_Z),
            center: LatLng::new(lat.clamp(-90.0, 90.0), lon.clamp(-180.0, 180.0)),
            rotation: degrees.to_radians(),
        }
    }

    /// Encodes a view. Coordinate precision grows with zoom and the bearing is
    /// only written when it is noticeably off north.
    pub fn format(zoom: f64, center: LatLng, rotation: f64) -> String {
        let bearing = num_wrap(-rotation.to_degrees(), 0.0, 360.0);
        let precision = zoom.log2().ceil().max(0.0) as usize;

        let mut value = format!(
            "{}/{}/{}",
            to_fixed(zoom, ZOOM_PRECISION),
            to_fixed(center.lat, precision),
            to_fixed(center.lng, precision)
        );
        if bearing.abs() > BEARING_EPSILON {
            value.push('/');
            value.push_str(&to_fixed(bearing, 1));
        }
        value
    }
}

/// Splits `id=` into trimmed, non-empty identifiers
pub fn parse_ids(value: &str) -> Vec<EntityId> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The decoded `note` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteParam {
    Disabled,
    /// Show the annotation layer without selecting anything
    Enabled,
    /// Show the annotation layer and select this annotation
    Select(NoteId),
}

impl NoteParam {
    /// The first numeric token wins; `true` only enables the layer
    pub fn parse(value: &str) -> Self {
        let mut enabled = false;
        let tokens = value
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        for token in tokens {
            if token == "true" {
                enabled = true;
                continue;
            }
            if let Some(num) = parse_number(&token).filter(|n| n.is_finite()) {
                // ids beyond the i64 range would saturate to a different id
                let fits = num.abs() < 9.2e18;
                if num.fract() == 0.0 && num != 0.0 && fits {
                    return NoteParam::Select(num as NoteId);
                }
                enabled = true;
                break;
            }
        }

        if enabled {
            NoteParam::Enabled
        } else {
            NoteParam::Disabled
        }
    }

    /// What to publish given the layer state and current selection
    pub fn from_state(layer_enabled: bool, selected: Option<NoteId>) -> Self {
        match (layer_enabled, selected) {
            (false, _) => NoteParam::Disabled,
            (true, Some(id)) => NoteParam::Select(id),
            (true, None) => NoteParam::Enabled,
        }
    }

    /// The hash value, `None` removes the parameter
    pub fn to_value(&self) -> Option<String> {
        match self {
            NoteParam::Disabled => None,
            NoteParam::Enabled => Some("true".to_string()),
            NoteParam::Select(id) => Some(id.to_string()),
        }
    }
}

/// Lenient number parsing: surrounding whitespace is ignored and an empty
/// component reads as zero.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>().ok()
}

fn to_fixed(value: f64, digits: usize) -> String {
    let formatted = format!("{:.*}", digits, value);
    // tiny negatives would otherwise print as "-0.00"
    match formatted.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => formatted,
    }
}
