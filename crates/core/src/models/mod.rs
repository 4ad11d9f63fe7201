//! Shared domain models.

use serde::{Deserialize, Serialize};

/// A transport mode as reported by the journey planner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Local and regional buses.
    Bus,
    /// Trams.
    Tram,
    /// City bike rental.
    Bicycle,
    /// Ferries and other boats.
    Water,
    /// Trains.
    Rail,
    /// Metro/subway.
    Metro,
    /// Flights.
    Air,
    /// Any mode identifier we do not recognize, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl TransportMode {
    /// Norwegian display title for the mode.
    ///
    /// Unrecognized modes pass through their raw identifier unchanged.
    pub fn title(&self) -> &str {
        match self {
            TransportMode::Bus => "Buss",
            TransportMode::Tram => "Trikk",
            TransportMode::Bicycle => "Bysykkel",
            TransportMode::Water => "Ferje",
            TransportMode::Rail => "Tog",
            TransportMode::Metro => "T-bane",
            TransportMode::Air => "Fly",
            TransportMode::Other(raw) => raw,
        }
    }
}

/// Refinement of a transport mode (e.g. `airportLinkRail`), kept as the
/// raw identifier the service reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportSubmode(pub String);

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Kind tag for a nearby place, matching the service's `__typename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceKind {
    /// A city-bike docking station.
    BikeRentalStation,
    /// A stop place (bus stop, station, quay group).
    StopPlace,
    /// Any other place kind, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Reference to a nearby place of some kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRef {
    /// Stable place identifier.
    pub id: String,
    /// What kind of place this is.
    pub kind: PlaceKind,
}

/// Snapshot of a bike-rental station as reported by the service.
///
/// Not mutated locally; each refresh replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeStation {
    /// Stable station identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Bikes currently available, when reported.
    #[serde(default)]
    pub bikes_available: Option<u32>,
    /// Free docks currently available, when reported.
    #[serde(default)]
    pub spaces_available: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_titles_match_the_fixed_table() {
        let table = [
            (TransportMode::Bus, "Buss"),
            (TransportMode::Tram, "Trikk"),
            (TransportMode::Bicycle, "Bysykkel"),
            (TransportMode::Water, "Ferje"),
            (TransportMode::Rail, "Tog"),
            (TransportMode::Metro, "T-bane"),
            (TransportMode::Air, "Fly"),
        ];
        for (mode, title) in table {
            assert_eq!(mode.title(), title);
        }
    }

    #[test]
    fn unknown_mode_title_passes_through() {
        let mode = TransportMode::Other("funicular".to_string());
        assert_eq!(mode.title(), "funicular");
    }

    #[test]
    fn modes_round_trip_through_serde() {
        let json = serde_json::to_string(&TransportMode::Bicycle).unwrap();
        assert_eq!(json, "\"bicycle\"");
        let back: TransportMode = serde_json::from_str("\"coach\"").unwrap();
        assert_eq!(back, TransportMode::Other("coach".to_string()));
    }

    #[test]
    fn place_kind_matches_service_typename() {
        let kind: PlaceKind = serde_json::from_str("\"BikeRentalStation\"").unwrap();
        assert_eq!(kind, PlaceKind::BikeRentalStation);
        let other: PlaceKind = serde_json::from_str("\"Quay\"").unwrap();
        assert_eq!(other, PlaceKind::Other("Quay".to_string()));
    }
}
