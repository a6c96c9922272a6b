//! Best level reached
//!
//! Persisted to LocalStorage on the web and to a small JSON file natively.
//! Storage problems are logged and otherwise ignored; they never reach the
//! simulation.

use serde::{Deserialize, Serialize};

/// Highest level the player has completed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestLevel {
    pub level: u32,
}

impl BestLevel {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "best";

    pub fn new(level: u32) -> Self {
        Self { level }
    }

    /// Record a completed level; returns true if it is a new best
    pub fn record(&mut self, level: u32) -> bool {
        if level > self.level {
            self.level = level;
            true
        } else {
            false
        }
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(value)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(level) = value.trim().parse::<u32>() {
                    log::info!("Loaded best level {}", level);
                    return Self::new(level);
                }
            }
        }

        log::info!("No best level found, starting fresh");
        Self::default()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.level.to_string());
            log::info!("Best level saved ({})", self.level);
        }
    }

    /// Load from a JSON file; a missing or unreadable file means no best yet
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<BestLevel>(&json) {
                Ok(best) => {
                    log::info!("Loaded best level {} from {}", best.level, path.display());
                    best
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt best file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No best level found, starting fresh");
                Self::default()
            }
        }
    }

    /// Save to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) {
        let result = serde_json::to_string(self)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => log::info!("Best level saved ({})", self.level),
            Err(e) => log::warn!("Failed to save best level to {}: {}", path.display(), e),
        }
    }
}
