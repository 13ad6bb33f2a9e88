//! Mapping and blueprint records.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::geometry::CanonicalRect;
use crate::constants::DEFAULT_BLUEPRINT_NAME;

/// Region shape tag. Only rectangles exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    #[serde(rename = "rect", alias = "rectangle")]
    Rectangle,
}

/// One rectangular region of interest on a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub id: u32,
    pub shape: Shape,
    pub coords: CanonicalRect,
    pub title: String,
}

impl Mapping {
    pub fn new(id: u32, coords: CanonicalRect) -> Self {
        Self {
            id,
            shape: Shape::Rectangle,
            coords,
            title: default_title(id),
        }
    }
}

pub fn default_title(id: u32) -> String {
    format!("Mapping {}", id)
}

/// Where a blueprint's image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

impl ImageSource {
    /// Human readable reference, shown in error states.
    pub fn display(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::File(path) => path.display().to_string(),
        }
    }
}

/// An annotatable image belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
    pub image: ImageSource,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

impl Blueprint {
    pub fn new(id: impl Into<String>, image: ImageSource) -> Self {
        Self {
            id: id.into(),
            name: DEFAULT_BLUEPRINT_NAME.to_string(),
            image,
            mappings: Vec::new(),
        }
    }
}

/// Blueprint names are never empty: blank input falls back to the default.
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_BLUEPRINT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_wire_format() {
        let mapping = Mapping::new(3, CanonicalRect::from_coords([1.0, 2.0, 3.0, 4.0]));
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "shape": "rect",
                "coords": [1.0, 2.0, 3.0, 4.0],
                "title": "Mapping 3"
            })
        );
    }

    #[test]
    fn test_shape_accepts_long_tag() {
        let json = r#"{"id":1,"shape":"rectangle","coords":[0,0,5,5],"title":"Door"}"#;
        let mapping: Mapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.shape, Shape::Rectangle);
        assert_eq!(mapping.title, "Door");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name(""), "Unnamed Blueprint");
        assert_eq!(sanitize_name("   "), "Unnamed Blueprint");
        assert_eq!(sanitize_name(" Level 2 "), "Level 2");
    }

    #[test]
    fn test_new_blueprint_defaults() {
        let bp = Blueprint::new("abc", ImageSource::Url("http://x/y.png".into()));
        assert_eq!(bp.name, "Unnamed Blueprint");
        assert!(bp.mappings.is_empty());
        assert_eq!(bp.image.display(), "http://x/y.png");
    }
}
