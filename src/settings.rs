use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

pub const DEFAULT_SETTINGS_FILE: &str = "settings.default.ron";
pub const OVERRIDE_SETTINGS_FILE: &str = "settings.ron";

pub const BASE_URL_ENV: &str = "WEIGHTINGS_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub messages: Messages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub auth_scheme: String,
    /// `None` leaves requests without a timeout.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    pub fallback_error: String,
    pub saved: String,
    pub deleted: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: Api {
                base_url: "http://localhost:8000/api".to_string(),
                auth_scheme: "Bearer".to_string(),
                timeout_secs: None,
            },
            messages: Messages {
                fallback_error: "Something went wrong while talking to the server".to_string(),
                saved: "Saved".to_string(),
                deleted: "Deleted".to_string(),
            },
        }
    }
}

impl Api {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Settings {
    pub fn load() -> &'static Settings {
        SETTINGS.get_or_init(|| Self::load_from_dir(Path::new(".")))
    }

    /// Reads the default file then the override file from `dir`, then applies
    /// environment overrides. Unreadable or malformed files fall back silently.
    pub fn load_from_dir(dir: &Path) -> Settings {
        let default_path = dir.join(DEFAULT_SETTINGS_FILE);
        let override_path = dir.join(OVERRIDE_SETTINGS_FILE);

        let mut settings = if default_path.exists() {
            fs::read_to_string(&default_path)
                .ok()
                .and_then(|content| ron::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Settings::default()
        };

        if override_path.exists() {
            if let Ok(content) = fs::read_to_string(&override_path) {
                if let Ok(overrides) = ron::from_str::<Settings>(&content) {
                    settings = overrides;
                }
            }
        }

        settings.apply_env();
        settings
    }

    fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url;
            }
        }
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}
