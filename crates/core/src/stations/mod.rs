//! Bike-rental station derivation and ordering.
//!
//! Pure building blocks for the board: which nearby places are bike
//! stations, which ids to fetch given the user's settings, and how the
//! result is ordered.

pub mod source;

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::client::{ApiError, StationApi};
use crate::models::{BikeStation, PlaceKind, PlaceRef, TransportMode};
use crate::settings::Settings;

/// Ids of the nearby places that are bike-rental stations, input order
/// preserved.
pub fn nearest_bike_station_ids(places: &[PlaceRef]) -> Vec<String> {
    places
        .iter()
        .filter(|place| place.kind == PlaceKind::BikeRentalStation)
        .map(|place| place.id.clone())
        .collect()
}

/// Candidate ids for a fetch: pinned stations followed by nearby ones,
/// minus hidden ids, deduplicated keeping the first occurrence.
pub fn candidate_station_ids(settings: &Settings, nearest: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for id in settings.new_stations.iter().chain(nearest.iter()) {
        if settings.hidden_stations.contains(id) {
            continue;
        }
        if seen.insert(id.clone()) {
            ids.push(id.clone());
        }
    }
    ids
}

/// Compare two display names under Norwegian collation.
///
/// Case-insensitive; æ, ø and å sort after z, in that order.
pub fn norwegian_cmp(a: &str, b: &str) -> Ordering {
    let left = a.chars().flat_map(char::to_lowercase).map(collation_rank);
    let right = b.chars().flat_map(char::to_lowercase).map(collation_rank);
    left.cmp(right)
}

fn collation_rank(c: char) -> (u8, u32) {
    match c {
        'æ' => (1, 0),
        'ø' => (1, 1),
        'å' => (1, 2),
        _ => (0, c as u32),
    }
}

/// The stations the board should show for the given settings and nearby ids,
/// sorted by name.
///
/// A hidden bicycle mode short-circuits to an empty list without touching
/// the service.
pub async fn board_stations(
    api: &dyn StationApi,
    settings: &Settings,
    nearest: &[String],
) -> Result<Vec<BikeStation>, ApiError> {
    if settings.is_mode_hidden(&TransportMode::Bicycle) {
        return Ok(Vec::new());
    }
    let ids = candidate_station_ids(settings, nearest);
    let mut stations = api.bike_rental_stations(&ids).await?;
    stations.sort_by(|a, b| norwegian_cmp(&a.name, &b.name));
    Ok(stations)
}


#[cfg(test)]
mod tests {
    use super::testing::{station, StubApi};
    use super::*;
    use crate::models::Position;

    fn place(id: &str, kind: PlaceKind) -> PlaceRef {
        PlaceRef {
            id: id.to_string(),
            kind,
        }
    }

    #[test]
    fn filters_nearby_places_to_bike_stations() {
        let places = vec![
            place("NSR:StopPlace:1", PlaceKind::StopPlace),
            place("YBY:Station:1", PlaceKind::BikeRentalStation),
            place("NSR:Quay:2", PlaceKind::Other("Quay".to_string())),
            place("YBY:Station:2", PlaceKind::BikeRentalStation),
        ];
        assert_eq!(
            nearest_bike_station_ids(&places),
            vec!["YBY:Station:1", "YBY:Station:2"]
        );
    }

    #[test]
    fn candidates_are_deduplicated_and_exclude_hidden() {
        let settings = Settings {
            new_stations: vec!["a".into(), "b".into(), "a".into()],
            hidden_stations: vec!["b".into(), "d".into()],
            ..Settings::default()
        };
        let nearest = vec!["c".to_string(), "a".to_string(), "d".to_string()];
        let ids = candidate_station_ids(&settings, &nearest);
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn pinned_stations_come_before_nearby_ones() {
        let settings = Settings {
            new_stations: vec!["pinned".into()],
            ..Settings::default()
        };
        let nearest = vec!["near".to_string()];
        assert_eq!(
            candidate_station_ids(&settings, &nearest),
            vec!["pinned", "near"]
        );
    }

    #[test]
    fn norwegian_letters_sort_after_z() {
        let mut names = vec!["Østbanen", "Ålesund", "Zoo", "Ærespark", "Bislett"];
        names.sort_by(|a, b| norwegian_cmp(a, b));
        assert_eq!(names, vec!["Bislett", "Zoo", "Ærespark", "Østbanen", "Ålesund"]);
    }

    #[test]
    fn collation_is_case_insensitive() {
        assert_eq!(norwegian_cmp("aker", "AKER"), Ordering::Equal);
        assert_eq!(norwegian_cmp("øst", "ÅS"), Ordering::Less);
    }

    #[tokio::test]
    async fn hidden_bicycle_mode_short_circuits() -> Result<(), ApiError> {
        let api = StubApi::with_stations(vec![station("a", "Alpha")]);
        let mut settings = Settings {
            new_stations: vec!["a".into()],
            ..Settings::default()
        };
        settings.toggle_mode(TransportMode::Bicycle);

        let result = board_stations(&api, &settings, &["a".to_string()]).await?;
        assert!(result.is_empty());
        assert_eq!(api.station_calls(), 0, "the service must not be queried");
        Ok(())
    }

    #[tokio::test]
    async fn board_stations_are_sorted_by_name() -> Result<(), ApiError> {
        let api = StubApi::with_stations(vec![
            station("1", "Økern"),
            station("2", "Birkelunden"),
            station("3", "Alexander Kiellands plass"),
        ]);
        let settings = Settings::default();
        let nearest: Vec<String> = vec!["1".into(), "2".into(), "3".into()];

        let result = board_stations(&api, &settings, &nearest).await?;
        let names: Vec<_> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Alexander Kiellands plass", "Birkelunden", "Økern"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn stub_api_serves_places() -> Result<(), ApiError> {
        let api = StubApi {
            places: vec![place("x", PlaceKind::BikeRentalStation)],
            ..StubApi::default()
        };
        let position = Position {
            latitude: 59.91,
            longitude: 10.75,
        };
        let places = api.nearest_places(position, 500).await?;
        assert_eq!(nearest_bike_station_ids(&places), vec!["x"]);
        Ok(())
    }
}
