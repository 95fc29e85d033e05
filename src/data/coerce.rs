use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{GeoPoint, Measure};

/// Signed decimal or integer tokens, left to right.
static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?(?:\d*\.\d+|\d+)").unwrap());

/// Coerce a raw numeric cell.
///
/// Every `,` is read as a decimal separator (`"12,5"` → `12.5`). Blank or
/// unparseable text yields [`Measure::Missing`]; nothing is ever an error.
pub fn coerce_numeric(raw: &str) -> Measure {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Measure::Missing;
    }
    normalized
        .parse::<f64>()
        .map_or(Measure::Missing, Measure::from_f64)
}

/// Coerce a `POINT (lon lat)` cell into coordinates.
///
/// The first two numeric tokens are taken as longitude then latitude; any
/// further tokens are ignored. Fewer than two tokens means no coordinates at
/// all, never a half-filled point.
pub fn coerce_geolocation(raw: &str) -> Option<GeoPoint> {
    let mut tokens = NUMBER_TOKEN
        .find_iter(raw)
        .map(|m| m.as_str().parse::<f64>().ok().filter(|v| v.is_finite()));

    let lon = tokens.next()??;
    let lat = tokens.next()??;
    Some(GeoPoint { lat, lon })
}
