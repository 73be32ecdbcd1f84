//! Color scheme derived from settings

use crate::settings::Settings;

/// The two presentation color schemes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Value for the presentation layer's color-scheme attribute
    #[must_use]
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
