//! Offline client serving stations from a JSON document.
//!
//! Useful for development and demos without network access: point
//! `offline_data` in the config at a file containing an array of station
//! records, and the board behaves as if the service returned them.

use std::path::Path;

use async_trait::async_trait;

use crate::models::{BikeStation, PlaceKind, PlaceRef, Position};

use super::error::ApiError;
use super::StationApi;

/// Client that answers every query from a fixed set of stations.
#[derive(Debug, Clone)]
pub struct FileStationApi {
    stations: Vec<BikeStation>,
}

impl FileStationApi {
    /// Load stations from a JSON document holding an array of records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| ApiError::Offline(format!("{}: {err}", path.display())))?;
        let stations = serde_json::from_str(&contents)?;
        Ok(Self { stations })
    }

    /// Build directly from station records.
    pub fn new(stations: Vec<BikeStation>) -> Self {
        Self { stations }
    }
}

#[async_trait]
impl StationApi for FileStationApi {
    async fn bike_rental_stations(&self, ids: &[String]) -> Result<Vec<BikeStation>, ApiError> {
        Ok(self
            .stations
            .iter()
            .filter(|station| ids.contains(&station.id))
            .cloned()
            .collect())
    }

    async fn nearest_places(
        &self,
        _position: Position,
        _distance: u32,
    ) -> Result<Vec<PlaceRef>, ApiError> {
        Ok(self
            .stations
            .iter()
            .map(|station| PlaceRef {
                id: station.id.clone(),
                kind: PlaceKind::BikeRentalStation,
            })
            .collect())
    }
}
