//! Persisted UI settings
//!
//! Theme and eye-protection state shared between the catalog and viewer
//! surfaces. Settings are read once at startup and written synchronously
//! on every change, last write wins. Persistence goes through an injected
//! [`SettingsStore`] so the session never touches a global.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "lectern";

fn default_intensity() -> u8 {
    50
}

/// Tint of the eye-protection overlay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTemperature {
    #[default]
    Warm,
    Neutral,
    Cool,
}

/// The full persisted settings record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,

    #[serde(default)]
    pub eye_protection_enabled: bool,

    /// Overlay strength, 0-100
    #[serde(default = "default_intensity")]
    pub eye_protection_intensity: u8,

    #[serde(default)]
    pub color_temperature: ColorTemperature,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            eye_protection_enabled: false,
            eye_protection_intensity: default_intensity(),
            color_temperature: ColorTemperature::default(),
        }
    }
}

impl Settings {
    /// Clamp out-of-range values from hand-edited files
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.eye_protection_intensity = self.eye_protection_intensity.min(100);
        self
    }
}

/// Key-value persistence for [`Settings`]
pub trait SettingsStore {
    /// Load the stored settings. Corrupt or missing data silently falls
    /// back to defaults.
    fn load(&self) -> Settings;

    /// Persist the settings synchronously. Failures are logged, not
    /// surfaced: a broken settings file never takes the reader down.
    fn save(&self, settings: &Settings);
}

/// File-backed store at a fixed path
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the platform config location,
    /// `<config_dir>/lectern/config.yaml`
    #[must_use]
    pub fn at_default_location() -> Option<Self> {
        dirs::config_dir().map(|config| Self::new(config.join(APP_NAME).join(SETTINGS_FILENAME)))
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Settings {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!(
                    "settings file {:?} not readable ({err}), using defaults",
                    self.path
                );
                return Settings::default();
            }
        };

        match serde_yaml::from_str::<Settings>(&content) {
            Ok(settings) => settings.normalized(),
            Err(err) => {
                warn!("failed to parse settings file {:?}: {err}", self.path);
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                if let Err(err) = fs::create_dir_all(parent) {
                    error!("failed to create config directory {parent:?}: {err}");
                    return;
                }
            }
        }

        let content = match serde_yaml::to_string(settings) {
            Ok(content) => content,
            Err(err) => {
                error!("failed to serialize settings: {err}");
                return;
            }
        };

        match fs::write(&self.path, content) {
            Ok(()) => debug!("saved settings to {:?}", self.path),
            Err(err) => error!("failed to save settings to {:?}: {err}", self.path),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    current: RefCell<Settings>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            current: RefCell::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Settings {
        self.current.borrow().clone()
    }

    fn save(&self, settings: &Settings) {
        *self.current.borrow_mut() = settings.clone();
    }
}
