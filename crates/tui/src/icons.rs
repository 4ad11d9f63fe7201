//! Glyph lookup for transport modes.

use tavle_core::models::{TransportMode, TransportSubmode};

/// Resolve the glyph shown next to a mode, submode first.
pub fn icon(mode: &TransportMode, submode: Option<&TransportSubmode>) -> &'static str {
    if let Some(TransportSubmode(raw)) = submode {
        match raw.as_str() {
            "airportLinkRail" | "airportLinkBus" => return "✈",
            "highSpeedPassengerService" | "highSpeedVehicleService" => return "🚤",
            "localTram" | "cityTram" => return "🚋",
            _ => {}
        }
    }
    match mode {
        TransportMode::Bus => "🚌",
        TransportMode::Tram => "🚊",
        TransportMode::Bicycle => "🚲",
        TransportMode::Water => "⛴",
        TransportMode::Rail => "🚆",
        TransportMode::Metro => "🚇",
        TransportMode::Air => "✈",
        TransportMode::Other(_) => "·",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_mode_has_a_glyph() {
        let modes = [
            TransportMode::Bus,
            TransportMode::Tram,
            TransportMode::Bicycle,
            TransportMode::Water,
            TransportMode::Rail,
            TransportMode::Metro,
            TransportMode::Air,
        ];
        for mode in modes {
            assert!(!icon(&mode, None).is_empty());
        }
    }

    #[test]
    fn submode_overrides_the_mode_glyph() {
        let submode = TransportSubmode("airportLinkRail".to_string());
        assert_eq!(icon(&TransportMode::Rail, Some(&submode)), "✈");
        assert_eq!(icon(&TransportMode::Rail, None), "🚆");
    }
}
