mod app;
mod icons;
mod mode_panel;

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{prelude::*, EnvFilter};
use tavle_core::{
    client::{ClientConfig, EnturClient, FileStationApi, StationApi},
    config::{self, AppConfig},
    models::Position,
    position::position_from_url,
    settings::SettingsStore,
    NearestSource, StationSource,
};

// Oslo city centre, used when the board URL carries no position.
const FALLBACK_POSITION: Position = Position {
    latitude: 59.9139,
    longitude: 10.7522,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let position = position_from_url(&config.board_url).unwrap_or_else(|| {
        tracing::info!("no position in board URL; falling back to Oslo city centre");
        FALLBACK_POSITION
    });

    let api: Arc<dyn StationApi> = match &config.offline_data {
        Some(path) => {
            tracing::info!("serving stations offline from {}", path.display());
            Arc::new(FileStationApi::load(path)?)
        }
        None => Arc::new(EnturClient::new(ClientConfig::new(
            &config.api_url,
            &config.client_name,
        ))?),
    };

    let mut settings_store = SettingsStore::open(config::settings_path()?)?;
    settings_store.watch_file()?;

    let nearest = NearestSource::spawn(Arc::clone(&api), position, settings_store.subscribe());
    let stations = StationSource::spawn(
        Arc::clone(&api),
        settings_store.subscribe(),
        nearest.subscribe(),
    );

    let mut app = app::TavleApp::new(settings_store, stations, nearest);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("tavle.log");

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
