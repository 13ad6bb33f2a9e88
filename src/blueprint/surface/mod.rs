//! Blueprint surface: where a blueprint image, its mapping regions and the
//! live drag preview meet the pointer.
//!
//! ## Module Structure
//!
//! - `input` - Turns mouse/touch input into state machine calls
//! - `render` - egui painting of image, regions and preview

mod input;
mod render;

use bevy::prelude::*;
use std::collections::HashMap;

use super::ViewMode;
use super::geometry::{CanonicalRect, PointerSample, fit_width};
use crate::constants::REFERENCE_WIDTH;
use crate::theme;

pub use input::{
    Contact, PointerFrame, PointerInput, SurfaceEvent, SurfacePointer, TouchSnapshot,
    drive_surface_input, gesture_frame, route_pointer,
};
pub use render::{SurfaceAction, show_surface};

/// Where a surface sits on screen and how reference coordinates map onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    /// Screen position of the image's top-left corner
    pub origin: Vec2,
    /// Displayed image size
    pub size: Vec2,
    /// Display pixels per reference pixel
    pub scale: f32,
}

impl SurfaceLayout {
    pub fn new(origin: Vec2, display_width: f32, image_size: Vec2) -> Self {
        Self {
            origin,
            size: fit_width(image_size, display_width),
            scale: display_width / REFERENCE_WIDTH,
        }
    }

    pub fn contains(&self, screen: Vec2) -> bool {
        let max = self.origin + self.size;
        screen.x >= self.origin.x && screen.x <= max.x && screen.y >= self.origin.y && screen.y <= max.y
    }

    /// Pointer position in reference coordinates.
    pub fn sample(&self, input: &PointerInput) -> Option<PointerSample> {
        let local = match input {
            PointerInput::Mouse(position) => Some(PointerSample::from_mouse(*position, self.origin)),
            PointerInput::Touch(contacts) => PointerSample::from_touches(contacts, self.origin),
        }?;
        Some(PointerSample::new(local.x / self.scale, local.y / self.scale))
    }

    /// Screen-space corners of a rectangle stored in reference coordinates.
    pub fn to_screen(&self, rect: CanonicalRect) -> (Vec2, Vec2) {
        let scaled = rect.scaled(self.scale);
        (self.origin + scaled.min(), self.origin + scaled.max())
    }
}

/// What the last UI pass drew for one blueprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    pub layout: SurfaceLayout,
    /// egui reports the surface as the topmost widget under the pointer
    pub pointer_over: bool,
}

/// Surfaces drawn in the last UI pass, keyed by blueprint id. Input systems
/// run before the UI pass, so they route against the previous frame.
#[derive(Resource, Default, Debug)]
pub struct SurfaceRegistry {
    frames: HashMap<String, SurfaceFrame>,
}

impl SurfaceRegistry {
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn register(&mut self, blueprint_id: &str, frame: SurfaceFrame) {
        self.frames.insert(blueprint_id.to_string(), frame);
    }

    pub fn get(&self, blueprint_id: &str) -> Option<&SurfaceFrame> {
        self.frames.get(blueprint_id)
    }

    /// Surface under `screen` that egui considers reachable.
    pub fn surface_at(&self, screen: Vec2) -> Option<(&str, &SurfaceFrame)> {
        self.frames
            .iter()
            .find(|(_, frame)| frame.pointer_over && frame.layout.contains(screen))
            .map(|(id, frame)| (id.as_str(), frame))
    }
}

/// Fill tint of a mapping region.
///
/// The admin view uses one tint. The read-only view tells apart mappings that
/// already have a photo. Hover lightens either.
pub fn region_fill(mode: ViewMode, hovered: bool, has_photo: bool) -> Color {
    let base = match mode {
        ViewMode::Admin => theme::REGION_FILL,
        ViewMode::User if has_photo => theme::REGION_FILL_WITH_PHOTO,
        ViewMode::User => theme::REGION_FILL_WITHOUT_PHOTO,
    };
    if hovered {
        base.with_alpha(base.alpha() * 0.5)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SurfaceLayout {
        // 1600x1200 image shown 400px wide at (100, 50)
        SurfaceLayout::new(Vec2::new(100.0, 50.0), 400.0, Vec2::new(1600.0, 1200.0))
    }

    #[test]
    fn test_layout_preserves_aspect() {
        let layout = layout();
        assert_eq!(layout.size, Vec2::new(400.0, 300.0));
        assert_eq!(layout.scale, 0.5);
    }

    #[test]
    fn test_sample_converts_to_reference_space() {
        let sample = layout()
            .sample(&PointerInput::Mouse(Vec2::new(150.0, 90.0)))
            .unwrap();
        assert_eq!(sample, PointerSample::new(100.0, 80.0));
    }

    #[test]
    fn test_touch_sample_uses_first_contact() {
        let input = PointerInput::Touch(vec![Vec2::new(110.0, 60.0), Vec2::new(400.0, 300.0)]);
        assert_eq!(layout().sample(&input), Some(PointerSample::new(20.0, 20.0)));
        assert_eq!(layout().sample(&PointerInput::Touch(Vec::new())), None);
    }

    #[test]
    fn test_to_screen_round_trips_sample() {
        let layout = layout();
        let rect = CanonicalRect::from_coords([100.0, 80.0, 300.0, 200.0]);
        let (min, max) = layout.to_screen(rect);
        assert_eq!(min, Vec2::new(150.0, 90.0));
        assert_eq!(max, Vec2::new(250.0, 150.0));
    }

    #[test]
    fn test_contains() {
        let layout = layout();
        assert!(layout.contains(Vec2::new(100.0, 50.0)));
        assert!(layout.contains(Vec2::new(500.0, 350.0)));
        assert!(!layout.contains(Vec2::new(99.0, 60.0)));
        assert!(!layout.contains(Vec2::new(200.0, 351.0)));
    }

    #[test]
    fn test_surface_at_requires_pointer_over() {
        let mut registry = SurfaceRegistry::default();
        registry.register(
            "covered",
            SurfaceFrame {
                layout: layout(),
                pointer_over: false,
            },
        );
        assert!(registry.surface_at(Vec2::new(200.0, 100.0)).is_none());

        registry.register(
            "visible",
            SurfaceFrame {
                layout: layout(),
                pointer_over: true,
            },
        );
        let (id, _) = registry.surface_at(Vec2::new(200.0, 100.0)).unwrap();
        assert_eq!(id, "visible");
    }

    #[test]
    fn test_region_fill() {
        assert_eq!(region_fill(ViewMode::Admin, false, true), theme::REGION_FILL);
        assert!((region_fill(ViewMode::Admin, true, false).alpha() - 0.15).abs() < 1e-6);
        assert_eq!(
            region_fill(ViewMode::User, false, true),
            theme::REGION_FILL_WITH_PHOTO
        );
        assert_eq!(
            region_fill(ViewMode::User, false, false),
            theme::REGION_FILL_WITHOUT_PHOTO
        );
        assert_ne!(
            region_fill(ViewMode::User, false, true),
            region_fill(ViewMode::User, false, false)
        );
    }
}
