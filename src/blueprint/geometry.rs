//! Rectangle normalization and pointer input unification.
//!
//! Everything here is pure. The interaction state machine only ever sees a
//! [`PointerSample`], never a raw mouse or touch event, so it has no notion of
//! which input device produced a gesture.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// A single pointer position in surface-local coordinates (origin at the
/// top-left corner of the displayed blueprint image).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Build a sample from a mouse position given in window coordinates.
    pub fn from_mouse(client: Vec2, surface_origin: Vec2) -> Self {
        let local = client - surface_origin;
        Self::new(local.x, local.y)
    }

    /// Build a sample from a list of touch contacts.
    ///
    /// Only the first contact is read; any additional contacts are ignored.
    /// Returns `None` when the list is empty (e.g. a touch-end that already
    /// lifted every finger).
    pub fn from_touches(contacts: &[Vec2], surface_origin: Vec2) -> Option<Self> {
        contacts
            .first()
            .map(|first| Self::from_mouse(*first, surface_origin))
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for PointerSample {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Axis-aligned rectangle in canonical form: `x1 <= x2` and `y1 <= y2`.
///
/// Serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct CanonicalRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CanonicalRect {
    /// Canonical rectangle spanning two arbitrary corner points.
    pub fn normalize(a: PointerSample, b: PointerSample) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    /// Canonicalize a raw quadruple whose corners may be in any order.
    pub fn from_coords(coords: [f32; 4]) -> Self {
        Self::normalize(
            PointerSample::new(coords[0], coords[1]),
            PointerSample::new(coords[2], coords[3]),
        )
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x1, self.y1)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x2, self.y2)
    }

    /// Inclusive containment test, so zero-area rectangles still hit.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Scale every coordinate by `factor` (image space to display space and back).
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x1: self.x1 * factor,
            y1: self.y1 * factor,
            x2: self.x2 * factor,
            y2: self.y2 * factor,
        }
    }
}

// Stored records always go through canonicalization, even if hand-edited.
impl From<[f32; 4]> for CanonicalRect {
    fn from(coords: [f32; 4]) -> Self {
        Self::from_coords(coords)
    }
}

impl From<CanonicalRect> for [f32; 4] {
    fn from(rect: CanonicalRect) -> Self {
        rect.to_array()
    }
}

/// Size of an image scaled to a fixed display width, preserving aspect ratio.
pub fn fit_width(image_size: Vec2, display_width: f32) -> Vec2 {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return Vec2::new(display_width, 0.0);
    }
    Vec2::new(display_width, image_size.y * display_width / image_size.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> PointerSample {
        PointerSample::new(x, y)
    }

    #[test]
    fn test_normalize_is_symmetric() {
        let pairs = [
            (p(0.0, 0.0), p(10.0, 10.0)),
            (p(50.0, 80.0), p(30.0, 120.0)),
            (p(-5.0, 3.0), p(4.0, -7.0)),
            (p(1.5, 1.5), p(1.5, 1.5)),
        ];
        for (a, b) in pairs {
            assert_eq!(CanonicalRect::normalize(a, b), CanonicalRect::normalize(b, a));
        }
    }

    #[test]
    fn test_normalize_produces_canonical_order() {
        let rect = CanonicalRect::normalize(p(50.0, 80.0), p(30.0, 120.0));
        assert_eq!(rect.to_array(), [30.0, 80.0, 50.0, 120.0]);
        assert!(rect.x1 <= rect.x2);
        assert!(rect.y1 <= rect.y2);
    }

    #[test]
    fn test_normalize_degenerate_point() {
        let rect = CanonicalRect::normalize(p(10.0, 10.0), p(10.0, 10.0));
        assert_eq!(rect.to_array(), [10.0, 10.0, 10.0, 10.0]);
        assert_eq!(rect.area(), 0.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_from_mouse_subtracts_origin() {
        let sample = PointerSample::from_mouse(Vec2::new(150.0, 240.0), Vec2::new(100.0, 200.0));
        assert_eq!(sample, p(50.0, 40.0));
    }

    #[test]
    fn test_from_touches_reads_first_contact_only() {
        let contacts = [Vec2::new(20.0, 30.0), Vec2::new(500.0, 500.0)];
        let sample = PointerSample::from_touches(&contacts, Vec2::new(10.0, 10.0));
        assert_eq!(sample, Some(p(10.0, 20.0)));
    }

    #[test]
    fn test_from_touches_empty() {
        assert_eq!(PointerSample::from_touches(&[], Vec2::ZERO), None);
    }

    #[test]
    fn test_deserialize_canonicalizes() {
        let rect: CanonicalRect = serde_json::from_str("[50, 120, 30, 80]").unwrap();
        assert_eq!(rect.to_array(), [30.0, 80.0, 50.0, 120.0]);
        assert_eq!(serde_json::to_string(&rect).unwrap(), "[30.0,80.0,50.0,120.0]");
    }

    #[test]
    fn test_contains_edges() {
        let rect = CanonicalRect::from_coords([0.0, 0.0, 10.0, 5.0]);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(10.0, 5.0)));
        assert!(!rect.contains(Vec2::new(10.1, 2.0)));
        assert!(!rect.contains(Vec2::new(5.0, -0.1)));
    }

    #[test]
    fn test_fit_width_preserves_aspect() {
        assert_eq!(fit_width(Vec2::new(1600.0, 1200.0), 800.0), Vec2::new(800.0, 600.0));
        assert_eq!(fit_width(Vec2::new(400.0, 100.0), 800.0), Vec2::new(800.0, 200.0));
        assert_eq!(fit_width(Vec2::ZERO, 800.0), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn test_scaled() {
        let rect = CanonicalRect::from_coords([10.0, 20.0, 30.0, 40.0]).scaled(0.5);
        assert_eq!(rect.to_array(), [5.0, 10.0, 15.0, 20.0]);
    }
}
