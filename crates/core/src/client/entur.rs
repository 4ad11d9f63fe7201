//! GraphQL client for the Entur journey planner.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{BikeStation, PlaceKind, PlaceRef, Position};

use super::error::ApiError;
use super::StationApi;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const BIKE_RENTAL_STATIONS_QUERY: &str = r#"
query ($ids: [String]!) {
  bikeRentalStations(ids: $ids) {
    id
    name
    latitude
    longitude
    bikesAvailable
    spacesAvailable
  }
}
"#;

const NEAREST_PLACES_QUERY: &str = r#"
query ($latitude: Float!, $longitude: Float!, $distance: Float!) {
  nearest(latitude: $latitude, longitude: $longitude, maximumDistance: $distance) {
    edges {
      node {
        place {
          __typename
          ... on BikeRentalStation { id }
          ... on StopPlace { id }
        }
      }
    }
  }
}
"#;

/// Configuration for the journey-planner client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub api_url: String,
    /// Sent as the `ET-Client-Name` header; Entur requires callers to
    /// identify themselves.
    pub client_name: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create a config for the given endpoint and client name.
    pub fn new(api_url: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client_name: client_name.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Entur GraphQL journey planner.
#[derive(Debug, Clone)]
pub struct EnturClient {
    http: reqwest::Client,
    api_url: String,
}

impl EnturClient {
    /// Build a client from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let client_name = HeaderValue::from_str(&config.client_name)
            .map_err(|_| ApiError::Service("invalid ET-Client-Name value".to_string()))?;
        headers.insert("ET-Client-Name", client_name);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url,
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(&self.api_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;

        let body: GraphqlResponse<T> = response.json().await?;
        if let Some(error) = body.errors.into_iter().next() {
            return Err(ApiError::Service(error.message));
        }
        body.data
            .ok_or_else(|| ApiError::Service("response carried no data".to_string()))
    }
}

#[async_trait]
impl StationApi for EnturClient {
    async fn bike_rental_stations(&self, ids: &[String]) -> Result<Vec<BikeStation>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        debug!("fetching {} bike rental stations", ids.len());
        let data: BikeStationsData = self
            .query(BIKE_RENTAL_STATIONS_QUERY, json!({ "ids": ids }))
            .await?;
        // The service returns null entries for ids it no longer knows.
        Ok(data.bike_rental_stations.into_iter().flatten().collect())
    }

    async fn nearest_places(
        &self,
        position: Position,
        distance: u32,
    ) -> Result<Vec<PlaceRef>, ApiError> {
        let data: NearestData = self
            .query(
                NEAREST_PLACES_QUERY,
                json!({
                    "latitude": position.latitude,
                    "longitude": position.longitude,
                    "distance": distance,
                }),
            )
            .await?;
        Ok(data
            .nearest
            .edges
            .into_iter()
            .filter_map(|edge| {
                let place = edge.node.place?;
                let id = place.id?;
                Some(PlaceRef {
                    id,
                    kind: place.kind,
                })
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BikeStationsData {
    #[serde(rename = "bikeRentalStations", default)]
    bike_rental_stations: Vec<Option<BikeStation>>,
}

#[derive(Debug, Deserialize)]
struct NearestData {
    nearest: NearestConnection,
}

#[derive(Debug, Deserialize)]
struct NearestConnection {
    #[serde(default)]
    edges: Vec<NearestEdge>,
}

#[derive(Debug, Deserialize)]
struct NearestEdge {
    node: NearestNode,
}

#[derive(Debug, Deserialize)]
struct NearestNode {
    place: Option<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(rename = "__typename")]
    kind: PlaceKind,
    id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_station_response() {
        let body = r#"{
            "data": {
                "bikeRentalStations": [
                    {
                        "id": "YBY:Station:1",
                        "name": "Aker brygge",
                        "latitude": 59.9095,
                        "longitude": 10.7263,
                        "bikesAvailable": 4,
                        "spacesAvailable": 21
                    },
                    null
                ]
            }
        }"#;
        let parsed: GraphqlResponse<BikeStationsData> = serde_json::from_str(body).unwrap();
        let stations: Vec<BikeStation> = parsed
            .data
            .unwrap()
            .bike_rental_stations
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Aker brygge");
        assert_eq!(stations[0].bikes_available, Some(4));
    }

    #[test]
    fn decodes_nearest_response_with_mixed_kinds() {
        let body = r#"{
            "data": {
                "nearest": {
                    "edges": [
                        { "node": { "place": { "__typename": "BikeRentalStation", "id": "YBY:Station:2" } } },
                        { "node": { "place": { "__typename": "StopPlace", "id": "NSR:StopPlace:58366" } } },
                        { "node": { "place": null } }
                    ]
                }
            }
        }"#;
        let parsed: GraphqlResponse<NearestData> = serde_json::from_str(body).unwrap();
        let places: Vec<_> = parsed
            .data
            .unwrap()
            .nearest
            .edges
            .into_iter()
            .filter_map(|edge| edge.node.place)
            .collect();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].kind, PlaceKind::BikeRentalStation);
        assert_eq!(places[1].kind, PlaceKind::StopPlace);
    }

    #[test]
    fn surfaces_graphql_errors() {
        let body = r#"{ "data": null, "errors": [ { "message": "rate limited" } ] }"#;
        let parsed: GraphqlResponse<BikeStationsData> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.errors[0].message, "rate limited");
        assert!(parsed.data.is_none());
    }
}
