//! User settings: pinned stations, hidden stations and hidden modes.
//!
//! Settings live in a JSON file so that several consumers (and the user's
//! editor) can change them. The store hands out read-only snapshots over a
//! watch channel; every change, local or external, produces a new snapshot.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::TransportMode;

const DEFAULT_DISTANCE: u32 = 500;

/// Snapshot of the user's board settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Station ids pinned by the user beyond the proximity lookup.
    pub new_stations: Vec<String>,
    /// Station ids excluded from display and fetching.
    pub hidden_stations: Vec<String>,
    /// Transport modes excluded from display and fetching.
    pub hidden_modes: Vec<TransportMode>,
    /// Search radius in metres for the nearest-places lookup.
    pub distance: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            new_stations: Vec::new(),
            hidden_stations: Vec::new(),
            hidden_modes: Vec::new(),
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl Settings {
    /// Whether the given mode is currently hidden.
    pub fn is_mode_hidden(&self, mode: &TransportMode) -> bool {
        self.hidden_modes.contains(mode)
    }

    /// Flip the visibility of a transport mode.
    pub fn toggle_mode(&mut self, mode: TransportMode) {
        if let Some(index) = self.hidden_modes.iter().position(|m| *m == mode) {
            self.hidden_modes.remove(index);
        } else {
            self.hidden_modes.push(mode);
        }
    }
}

/// Shared settings store backed by a JSON file.
pub struct SettingsStore {
    path: PathBuf,
    tx: Arc<watch::Sender<Settings>>,
    _watcher: Option<RecommendedWatcher>,
}

impl SettingsStore {
    /// Open the store, creating the file with defaults when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            load_settings(&path)?
        } else {
            let settings = Settings::default();
            persist_settings(&path, &settings)?;
            settings
        };
        let (tx, _) = watch::channel(settings);
        Ok(Self {
            path,
            tx: Arc::new(tx),
            _watcher: None,
        })
    }

    /// Receiver for settings snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Apply a change, persist it, and notify subscribers.
    pub fn update(&self, apply: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut settings = self.tx.borrow().clone();
        apply(&mut settings);
        persist_settings(&self.path, &settings)?;
        self.tx.send_if_modified(|current| {
            if *current == settings {
                false
            } else {
                *current = settings;
                true
            }
        });
        Ok(())
    }

    /// Start picking up external edits to the settings file.
    ///
    /// The watcher lives as long as the store; snapshots are only republished
    /// when the file content actually changed.
    pub fn watch_file(&mut self) -> Result<()> {
        let tx = Arc::clone(&self.tx);
        let path = self.path.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_settings(&path) {
                        Ok(settings) => {
                            let changed = tx.send_if_modified(|current| {
                                if *current == settings {
                                    false
                                } else {
                                    *current = settings;
                                    true
                                }
                            });
                            if changed {
                                debug!("settings reloaded from {}", path.display());
                            }
                        }
                        Err(err) => warn!("failed to reload settings: {err:#}"),
                    }
                }
                Ok(_) => {}
                Err(err) => warn!("settings watcher error: {err}"),
            }
        })
        .context("failed to create settings watcher")?;
        watcher
            .watch(&self.path, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", self.path.display()))?;
        self._watcher = Some(watcher);
        Ok(())
    }
}

fn load_settings(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse settings {}", path.display()))
}

fn persist_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create settings directory {}", parent.display()))?;
    }
    let serialized =
        serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write settings {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_default_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        let store = SettingsStore::open(&path)?;
        assert!(path.exists());
        assert_eq!(store.current(), Settings::default());
        Ok(())
    }

    #[test]
    fn update_persists_and_notifies() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        let store = SettingsStore::open(&path)?;
        let mut rx = store.subscribe();

        store.update(|s| s.toggle_mode(TransportMode::Bicycle))?;
        assert!(rx.has_changed()?);
        assert!(rx
            .borrow_and_update()
            .is_mode_hidden(&TransportMode::Bicycle));

        // A second store sees the persisted state.
        let reopened = SettingsStore::open(&path)?;
        assert!(reopened
            .current()
            .is_mode_hidden(&TransportMode::Bicycle));
        Ok(())
    }

    #[test]
    fn toggle_mode_flips_both_ways() {
        let mut settings = Settings::default();
        settings.toggle_mode(TransportMode::Tram);
        assert!(settings.is_mode_hidden(&TransportMode::Tram));
        settings.toggle_mode(TransportMode::Tram);
        assert!(!settings.is_mode_hidden(&TransportMode::Tram));
    }

    #[test]
    fn unchanged_update_does_not_notify() -> Result<()> {
        let dir = tempdir()?;
        let store = SettingsStore::open(dir.path().join("settings.json"))?;
        let mut rx = store.subscribe();
        store.update(|_| {})?;
        assert!(!rx.has_changed()?);
        Ok(())
    }
}
