//! Journey-planner clients.
//!
//! The board talks to the remote service through the [`StationApi`] trait so
//! the polling source can run against the real GraphQL endpoint, an offline
//! JSON document, or a test stub.

mod entur;
mod error;
mod mock;

pub use entur::{ClientConfig, EnturClient};
pub use error::ApiError;
pub use mock::FileStationApi;

use async_trait::async_trait;

use crate::models::{BikeStation, PlaceRef, Position};

/// Remote operations the board needs from the journey planner.
#[async_trait]
pub trait StationApi: Send + Sync {
    /// Full station records for the given ids.
    async fn bike_rental_stations(&self, ids: &[String]) -> Result<Vec<BikeStation>, ApiError>;

    /// Places of any kind within `distance` metres of `position`.
    async fn nearest_places(
        &self,
        position: Position,
        distance: u32,
    ) -> Result<Vec<PlaceRef>, ApiError>;
}
