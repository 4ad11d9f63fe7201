#![warn(clippy::all, missing_docs)]

//! Core domain logic for the tavle departure board.
//!
//! This crate hosts the data models, configuration and settings handling,
//! the journey-planner clients, and the polling station sources used by the
//! terminal UI and any future frontends.

pub mod client;
pub mod config;
pub mod models;
pub mod position;
pub mod settings;
pub mod stations;

pub use client::{ApiError, ClientConfig, EnturClient, FileStationApi, StationApi};
pub use config::AppConfig;
pub use models::{BikeStation, PlaceKind, PlaceRef, Position, TransportMode, TransportSubmode};
pub use settings::{Settings, SettingsStore};
pub use stations::source::{NearestSource, StationSource, REFRESH_INTERVAL};
