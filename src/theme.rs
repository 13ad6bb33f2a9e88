//! Centralized color theme for the application.
//!
//! This module provides the overlay tints used on blueprint surfaces and the
//! egui palette for panels and dialogs. Modify values here to change the
//! application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Mapping Region Colors
// ============================================================================

/// Default region tint (red, 30%)
pub const REGION_FILL: Color = Color::srgba(1.0, 0.0, 0.0, 0.3);

/// Read-only view: mapping already has a photo (green)
pub const REGION_FILL_WITH_PHOTO: Color = Color::srgba(0.0, 1.0, 0.0, 0.3);

/// Read-only view: mapping still needs a photo
pub const REGION_FILL_WITHOUT_PHOTO: Color = Color::srgba(1.0, 0.0, 0.0, 0.3);

/// Region outline
pub const REGION_STROKE: Color = Color::srgb(1.0, 0.0, 0.0);

// ============================================================================
// Drag Preview Colors
// ============================================================================

/// Dashed outline of the rectangle being drawn
pub const PREVIEW_OUTLINE: Color = Color::srgb(1.0, 0.0, 0.0);

/// Faint fill behind the dashed outline
pub const PREVIEW_FILL: Color = Color::srgba(1.0, 0.0, 0.0, 0.1);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Green "EDITING" badge on a blueprint card
    pub const EDITING_BADGE: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text and empty states
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Orange for offline/sample data notices
    pub const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);

    /// Background of the placeholder shown while an image loads
    pub const IMAGE_PLACEHOLDER: egui::Color32 = egui::Color32::from_rgb(60, 60, 60);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (preserving alpha)
pub fn bevy_to_egui(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bevy_to_egui_preserves_alpha() {
        let c = bevy_to_egui(REGION_FILL);
        assert_eq!(c, egui::Color32::from_rgba_unmultiplied(255, 0, 0, 76));
    }
}
