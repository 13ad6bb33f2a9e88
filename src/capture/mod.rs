//! Photo capture for mappings and the mapping-to-photo associations.
//!
//! A field user clicks a mapping and attaches a still image to it. Each
//! mapping holds at most one photo; capturing again replaces it.

use bevy::prelude::*;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::api::ApiError;
use crate::blueprint::{RegionClicked, ViewMode};
use crate::collaborators::Collaborators;
use crate::ui::Toasts;

/// Still image captured for one mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    pub mapping_id: u32,
    pub bytes: Vec<u8>,
    /// File the photo was taken from, when the capture source is a file.
    pub source: Option<PathBuf>,
    pub captured_at: DateTime<Local>,
}

impl CapturedPhoto {
    pub fn label(&self) -> String {
        let name = self
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        format!("{} ({} KB)", name, self.bytes.len().div_ceil(1024))
    }
}

/// Source of still images for a mapping.
pub trait PhotoCapture: Send + Sync {
    /// `Ok(None)` when the user backs out without capturing.
    fn capture(&self, mapping_id: u32) -> Result<Option<CapturedPhoto>, ApiError>;
}

/// Desktop capture: the user picks an image file taken with any camera.
pub struct FilePickerCapture;

pub const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff"];

impl PhotoCapture for FilePickerCapture {
    fn capture(&self, mapping_id: u32) -> Result<Option<CapturedPhoto>, ApiError> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", PHOTO_EXTENSIONS)
            .set_title(format!("Photo for Mapping {}", mapping_id))
            .pick_file()
        else {
            return Ok(None);
        };

        let bytes = std::fs::read(&path)?;
        photo_from_bytes(mapping_id, bytes, Some(path)).map(Some)
    }
}

/// Reject anything that is not a recognizable image.
pub fn photo_from_bytes(
    mapping_id: u32,
    bytes: Vec<u8>,
    source: Option<PathBuf>,
) -> Result<CapturedPhoto, ApiError> {
    if let Err(e) = image::guess_format(&bytes) {
        return Err(ApiError::Invalid(format!("Not an image: {}", e)));
    }
    Ok(CapturedPhoto {
        mapping_id,
        bytes,
        source,
        captured_at: Local::now(),
    })
}

/// Photos keyed by blueprint and mapping id. Mapping ids are only unique
/// within a blueprint, so the blueprint id is part of the key.
#[derive(Resource, Default)]
pub struct PhotoAssociations {
    photos: HashMap<(String, u32), CapturedPhoto>,
}

impl PhotoAssociations {
    pub fn associate(&mut self, blueprint_id: &str, photo: CapturedPhoto) {
        self.photos
            .insert((blueprint_id.to_string(), photo.mapping_id), photo);
    }

    pub fn get(&self, blueprint_id: &str, mapping_id: u32) -> Option<&CapturedPhoto> {
        self.photos.get(&(blueprint_id.to_string(), mapping_id))
    }

    pub fn has_photo(&self, blueprint_id: &str, mapping_id: u32) -> bool {
        self.get(blueprint_id, mapping_id).is_some()
    }

    /// Drop the photo of a mapping that no longer exists (e.g. after undo).
    pub fn remove(&mut self, blueprint_id: &str, mapping_id: u32) -> Option<CapturedPhoto> {
        self.photos.remove(&(blueprint_id.to_string(), mapping_id))
    }

    pub fn remove_blueprint(&mut self, blueprint_id: &str) {
        self.photos.retain(|(bp, _), _| bp != blueprint_id);
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Photos of one blueprint, ordered by mapping id.
    pub fn for_blueprint(&self, blueprint_id: &str) -> Vec<&CapturedPhoto> {
        let mut photos: Vec<&CapturedPhoto> = self
            .photos
            .iter()
            .filter(|((bp, _), _)| bp == blueprint_id)
            .map(|(_, photo)| photo)
            .collect();
        photos.sort_by_key(|p| p.mapping_id);
        photos
    }
}

/// Admin clicks identify the region; user clicks attach a photo to it.
fn apply_region_click(
    event: &RegionClicked,
    mode: ViewMode,
    capture: &dyn PhotoCapture,
    photos: &mut PhotoAssociations,
    toasts: &mut Toasts,
) {
    match mode {
        ViewMode::Admin => {
            info!(
                "Clicked on area {} of blueprint {}",
                event.mapping_id, event.blueprint_id
            );
            toasts.push(format!("Clicked on area {}", event.mapping_id));
        }
        ViewMode::User => match capture.capture(event.mapping_id) {
            Ok(Some(photo)) => {
                info!(
                    "Attached photo to mapping {} of blueprint {}",
                    event.mapping_id, event.blueprint_id
                );
                photos.associate(&event.blueprint_id, photo);
                toasts.push(format!("Photo attached to Mapping {}", event.mapping_id));
            }
            Ok(None) => debug!("Photo capture cancelled"),
            Err(e) => {
                error!("Photo capture failed: {}", e);
                toasts.push("Failed to capture photo");
            }
        },
    }
}

fn handle_region_clicks(
    mut events: MessageReader<RegionClicked>,
    mode: Res<ViewMode>,
    collaborators: Res<Collaborators>,
    mut photos: ResMut<PhotoAssociations>,
    mut toasts: ResMut<Toasts>,
) {
    for event in events.read() {
        apply_region_click(
            event,
            *mode,
            collaborators.capture.as_ref(),
            &mut photos,
            &mut toasts,
        );
    }
}

pub struct CapturePlugin;

impl Plugin for CapturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhotoAssociations>().add_systems(
            Update,
            handle_region_clicks
                .run_if(on_message::<RegionClicked>)
                .run_if(resource_exists::<Collaborators>),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG signature + IHDR start is enough for format sniffing.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn photo(mapping_id: u32) -> CapturedPhoto {
        photo_from_bytes(mapping_id, PNG_MAGIC.to_vec(), None).unwrap()
    }

    #[test]
    fn test_photo_from_bytes_rejects_non_images() {
        let result = photo_from_bytes(1, b"hello world".to_vec(), None);
        assert!(matches!(result, Err(ApiError::Invalid(_))));
    }

    #[test]
    fn test_associate_replaces_previous_photo() {
        let mut photos = PhotoAssociations::default();
        photos.associate("bp", photo(1));

        let mut newer = photo(1);
        newer.source = Some(PathBuf::from("/tmp/second.png"));
        photos.associate("bp", newer.clone());

        assert_eq!(photos.for_blueprint("bp"), vec![&newer]);
    }

    #[test]
    fn test_mapping_ids_are_scoped_per_blueprint() {
        let mut photos = PhotoAssociations::default();
        photos.associate("a", photo(1));

        assert!(photos.has_photo("a", 1));
        assert!(!photos.has_photo("b", 1));
    }

    #[test]
    fn test_for_blueprint_sorted() {
        let mut photos = PhotoAssociations::default();
        photos.associate("bp", photo(3));
        photos.associate("bp", photo(1));
        photos.associate("other", photo(2));

        let ids: Vec<u32> = photos.for_blueprint("bp").iter().map(|p| p.mapping_id).collect();
        assert_eq!(ids, vec![1, 3]);

        photos.remove_blueprint("bp");
        assert!(photos.for_blueprint("bp").is_empty());
        assert!(photos.has_photo("other", 2));
    }

    struct FixedCapture(Option<CapturedPhoto>);

    impl PhotoCapture for FixedCapture {
        fn capture(&self, _mapping_id: u32) -> Result<Option<CapturedPhoto>, ApiError> {
            Ok(self.0.clone())
        }
    }

    fn click(mapping_id: u32) -> RegionClicked {
        RegionClicked {
            blueprint_id: "bp".to_string(),
            mapping_id,
        }
    }

    #[test]
    fn test_admin_click_only_notifies() {
        let mut photos = PhotoAssociations::default();
        let mut toasts = Toasts::default();

        apply_region_click(
            &click(2),
            ViewMode::Admin,
            &FixedCapture(Some(photo(2))),
            &mut photos,
            &mut toasts,
        );

        assert!(!photos.has_photo("bp", 2));
        assert_eq!(toasts.texts(), vec!["Clicked on area 2"]);
    }

    #[test]
    fn test_user_click_attaches_photo() {
        let mut photos = PhotoAssociations::default();
        let mut toasts = Toasts::default();

        apply_region_click(
            &click(2),
            ViewMode::User,
            &FixedCapture(Some(photo(2))),
            &mut photos,
            &mut toasts,
        );
        assert!(photos.has_photo("bp", 2));

        apply_region_click(
            &click(3),
            ViewMode::User,
            &FixedCapture(None),
            &mut photos,
            &mut toasts,
        );
        assert!(!photos.has_photo("bp", 3));
    }

    #[test]
    fn test_label() {
        let mut p = photo(1);
        p.source = Some(PathBuf::from("/photos/door.jpg"));
        assert_eq!(p.label(), "door.jpg (1 KB)");
    }
}
