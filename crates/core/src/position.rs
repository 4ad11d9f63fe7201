//! Position parsing from board URLs.
//!
//! Boards encode the viewer's position in the URL path, e.g.
//! `https://example.org/t/@59.911491,10.757933`. The TUI reuses the same
//! format so an existing board link can be pasted straight into the config.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Position;

static POSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)").expect("invalid position regex")
});

/// Extract a position from a board URL, if one is encoded in it.
///
/// Returns `None` when no `@lat,lon` fragment is present or the coordinates
/// are out of range.
pub fn position_from_url(url: &str) -> Option<Position> {
    let caps = POSITION_RE.captures(url)?;
    let latitude: f64 = caps.get(1)?.as_str().parse().ok()?;
    let longitude: f64 = caps.get(2)?.as_str().parse().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Position {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position_fragment() {
        let pos = position_from_url("https://example.org/t/@59.911491,10.757933").unwrap();
        assert_eq!(pos.latitude, 59.911491);
        assert_eq!(pos.longitude, 10.757933);
    }

    #[test]
    fn parses_negative_coordinates() {
        let pos = position_from_url("/@-33.8688,151.2093/board").unwrap();
        assert_eq!(pos.latitude, -33.8688);
        assert_eq!(pos.longitude, 151.2093);
    }

    #[test]
    fn rejects_urls_without_fragment() {
        assert!(position_from_url("https://example.org/t/oslo").is_none());
        assert!(position_from_url("").is_none());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(position_from_url("/@91.0,10.0").is_none());
        assert!(position_from_url("/@59.9,181.0").is_none());
    }
}
