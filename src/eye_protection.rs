//! Eye-protection overlay
//!
//! A full-screen tint drawn over the content. Intensity maps to overlay
//! opacity with a hard ceiling so the content always stays readable.

use crate::settings::{ColorTemperature, Settings};

/// Opacity at intensity 100
pub const MAX_OVERLAY_ALPHA: f32 = 0.3;

/// Presentation state of the overlay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Tint color as RGB
    pub tint: (u8, u8, u8),
    /// Overlay opacity, 0.0 to [`MAX_OVERLAY_ALPHA`]
    pub alpha: f32,
    pub visible: bool,
}

/// Tint for each color temperature
#[must_use]
pub fn tint_for(temperature: ColorTemperature) -> (u8, u8, u8) {
    match temperature {
        ColorTemperature::Warm => (255, 200, 87),
        ColorTemperature::Neutral => (255, 236, 204),
        ColorTemperature::Cool => (201, 226, 255),
    }
}

/// Compute the overlay from the current settings
#[must_use]
pub fn overlay_style(settings: &Settings) -> OverlayStyle {
    let intensity = f32::from(settings.eye_protection_intensity.min(100));
    OverlayStyle {
        tint: tint_for(settings.color_temperature),
        alpha: intensity / 100.0 * MAX_OVERLAY_ALPHA,
        visible: settings.eye_protection_enabled,
    }
}
