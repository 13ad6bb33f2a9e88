//! Decoded image textures for blueprints, permit scans and photos.
//!
//! UI code asks the [`ImageCache`] for a source every frame. Unknown sources
//! are queued, fetched and decoded on the IO task pool, then uploaded as Bevy
//! images and registered with egui.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::tasks::{IoTaskPool, Task};
use bevy_egui::{EguiTextureHandle, EguiUserTextures, egui};
use futures_lite::future;
use std::collections::HashMap;

use crate::api::{ApiError, HttpClient};
use crate::blueprint::ImageSource;
use crate::collaborators::Collaborators;

/// What the UI can draw for a source right now.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    Loading,
    Ready {
        texture_id: egui::TextureId,
        size: Vec2,
    },
    Failed(String),
}

#[derive(Resource, Default)]
pub struct ImageCache {
    states: HashMap<ImageSource, ImageState>,
    handles: HashMap<ImageSource, Handle<Image>>,
    pending: Vec<ImageSource>,
}

impl ImageCache {
    /// Current state of `source`, queueing a load the first time it is seen.
    pub fn request(&mut self, source: &ImageSource) -> ImageState {
        if let Some(state) = self.states.get(source) {
            return state.clone();
        }
        self.states.insert(source.clone(), ImageState::Loading);
        self.pending.push(source.clone());
        ImageState::Loading
    }

    /// Forget a failed load so the next request tries again.
    pub fn retry(&mut self, source: &ImageSource) {
        if matches!(self.states.get(source), Some(ImageState::Failed(_))) {
            self.states.remove(source);
        }
    }

    /// Forget a source, returning its texture handle so the caller can release
    /// it. A load still in flight for it is dropped when it finishes.
    pub fn evict(&mut self, source: &ImageSource) -> Option<Handle<Image>> {
        self.states.remove(source);
        self.pending.retain(|s| s != source);
        self.handles.remove(source)
    }

    /// Forget every source, returning all texture handles.
    pub fn clear(&mut self) -> Vec<Handle<Image>> {
        self.states.clear();
        self.pending.clear();
        self.handles.drain().map(|(_, handle)| handle).collect()
    }

    fn is_loading(&self, source: &ImageSource) -> bool {
        matches!(self.states.get(source), Some(ImageState::Loading))
    }

    fn take_pending(&mut self) -> Vec<ImageSource> {
        std::mem::take(&mut self.pending)
    }

    fn fail(&mut self, source: ImageSource, message: String) {
        self.states.insert(source, ImageState::Failed(message));
    }

    fn ready(
        &mut self,
        source: ImageSource,
        handle: Handle<Image>,
        texture_id: egui::TextureId,
        size: Vec2,
    ) {
        self.handles.insert(source.clone(), handle);
        self.states.insert(source, ImageState::Ready { texture_id, size });
    }
}

/// Release cached textures.
#[derive(Message, Debug, Clone)]
pub enum ReleaseImages {
    One(ImageSource),
    All,
}

/// Background fetch + decode of one source.
#[derive(Component)]
pub struct ImageLoadTask {
    source: ImageSource,
    task: Task<Result<image::RgbaImage, String>>,
}

/// Fetch the raw bytes behind a source.
pub fn load_bytes(http: &HttpClient, source: &ImageSource) -> Result<Vec<u8>, ApiError> {
    match source {
        ImageSource::Url(url) => http.get_bytes(url),
        ImageSource::File(path) => Ok(std::fs::read(path)?),
    }
}

/// Decode any supported format into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<image::RgbaImage, String> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| format!("Failed to decode image: {}", e))
}

/// Wrap decoded pixels as a Bevy texture.
pub fn rgba_to_image(rgba: image::RgbaImage) -> Image {
    let (width, height) = rgba.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        rgba.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

fn spawn_image_loads(
    mut commands: Commands,
    mut cache: ResMut<ImageCache>,
    collaborators: Res<Collaborators>,
) {
    let pool = IoTaskPool::get();
    for source in cache.take_pending() {
        debug!("Loading image {}", source.display());
        let http = collaborators.http.clone();
        let task_source = source.clone();
        let task = pool.spawn(async move {
            let bytes = load_bytes(&http, &task_source).map_err(|e| e.to_string())?;
            decode_image(&bytes)
        });
        commands.spawn(ImageLoadTask { source, task });
    }
}

fn finish_image_loads(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ImageLoadTask)>,
    mut cache: ResMut<ImageCache>,
    mut images: ResMut<Assets<Image>>,
    mut egui_textures: ResMut<EguiUserTextures>,
) {
    for (entity, mut load) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut load.task)) else {
            continue;
        };

        let source = load.source.clone();
        commands.entity(entity).despawn();
        if !cache.is_loading(&source) {
            debug!("Dropping image {} released while loading", source.display());
            continue;
        }

        match result {
            Ok(rgba) => {
                let size = Vec2::new(rgba.width() as f32, rgba.height() as f32);
                let handle = images.add(rgba_to_image(rgba));
                let texture_id = egui_textures.add_image(EguiTextureHandle::Weak(handle.id()));
                info!("Loaded image {} ({}x{})", source.display(), size.x, size.y);
                cache.ready(source, handle, texture_id, size);
            }
            Err(message) => {
                warn!("Image {} failed: {}", source.display(), message);
                cache.fail(source, message);
            }
        }
    }
}

fn release_images(
    mut events: MessageReader<ReleaseImages>,
    mut cache: ResMut<ImageCache>,
    mut egui_textures: ResMut<EguiUserTextures>,
) {
    let mut released = Vec::new();
    for event in events.read() {
        match event {
            ReleaseImages::One(source) => released.extend(cache.evict(source)),
            ReleaseImages::All => released.extend(cache.clear()),
        }
    }

    if !released.is_empty() {
        debug!("Releasing {} image texture(s)", released.len());
    }
    // Dropping the strong handle frees the image asset
    for handle in released {
        egui_textures.remove_image(handle.id());
    }
}

pub struct ImageCachePlugin;

impl Plugin for ImageCachePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImageCache>()
            .add_message::<ReleaseImages>()
            .add_systems(
                Update,
                (
                    release_images.run_if(on_message::<ReleaseImages>),
                    spawn_image_loads.run_if(resource_exists::<Collaborators>),
                    finish_image_loads,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_image() {
        let rgba = decode_image(&png_bytes(4, 2)).unwrap();
        assert_eq!(rgba.dimensions(), (4, 2));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(err.starts_with("Failed to decode image"));
    }

    #[test]
    fn test_load_bytes_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.png");
        std::fs::write(&path, png_bytes(1, 1)).unwrap();

        let http = HttpClient::new("http://127.0.0.1:9");
        let bytes = load_bytes(&http, &ImageSource::File(path)).unwrap();
        assert!(decode_image(&bytes).is_ok());
    }

    #[test]
    fn test_load_bytes_missing_file() {
        let http = HttpClient::new("http://127.0.0.1:9");
        let result = load_bytes(&http, &ImageSource::File("/no/such/file.png".into()));
        assert!(matches!(result, Err(ApiError::Io(_))));
    }

    #[test]
    fn test_request_queues_once() {
        let mut cache = ImageCache::default();
        let source = ImageSource::Url("http://example.com/a.png".to_string());

        assert_eq!(cache.request(&source), ImageState::Loading);
        assert_eq!(cache.request(&source), ImageState::Loading);
        assert_eq!(cache.take_pending(), vec![source.clone()]);
        assert!(cache.take_pending().is_empty());
    }

    #[test]
    fn test_retry_after_failure() {
        let mut cache = ImageCache::default();
        let source = ImageSource::Url("http://example.com/broken.png".to_string());
        cache.request(&source);
        cache.take_pending();
        cache.fail(source.clone(), "boom".to_string());

        assert_eq!(cache.request(&source), ImageState::Failed("boom".to_string()));
        cache.retry(&source);
        assert_eq!(cache.request(&source), ImageState::Loading);
        assert_eq!(cache.take_pending(), vec![source]);
    }

    #[test]
    fn test_evict_forgets_source() {
        let mut cache = ImageCache::default();
        let source = ImageSource::Url("http://example.com/plan.png".to_string());
        let other = ImageSource::Url("http://example.com/permit.png".to_string());
        cache.request(&source);
        cache.request(&other);
        cache.take_pending();
        cache.fail(other.clone(), "boom".to_string());

        assert!(cache.evict(&source).is_none());
        assert!(!cache.is_loading(&source));
        assert_eq!(cache.request(&other), ImageState::Failed("boom".to_string()));

        // Asking again starts a fresh load
        assert_eq!(cache.request(&source), ImageState::Loading);
        assert_eq!(cache.take_pending(), vec![source]);
    }

    #[test]
    fn test_evict_drops_queued_load() {
        let mut cache = ImageCache::default();
        let source = ImageSource::File("plan.png".into());
        cache.request(&source);

        cache.evict(&source);

        assert!(cache.take_pending().is_empty());
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut cache = ImageCache::default();
        let source = ImageSource::Url("http://example.com/a.png".to_string());
        cache.request(&source);
        cache.take_pending();
        cache.fail(source.clone(), "boom".to_string());

        assert!(cache.clear().is_empty());
        assert_eq!(cache.request(&source), ImageState::Loading);
    }

    #[test]
    fn test_rgba_to_image_size() {
        let image = rgba_to_image(image::RgbaImage::new(3, 5));
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 5);
    }
}
