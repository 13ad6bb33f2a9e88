//! Full-size viewer for a permit scan.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::blueprint::ImageSource;
use crate::images::{ImageCache, ImageState, ReleaseImages};
use crate::theme;

const DEFAULT_TITLE: &str = "Permit Image";

#[derive(Resource, Default)]
pub struct PermitViewerState {
    open: Option<ViewedPermit>,
}

struct ViewedPermit {
    source: ImageSource,
    title: String,
}

impl PermitViewerState {
    pub fn open(&mut self, image_url: &str, title: Option<&str>) {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        self.open = Some(ViewedPermit {
            source: ImageSource::Url(image_url.to_string()),
            title: title.to_string(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

pub fn permit_viewer_ui(
    mut contexts: EguiContexts,
    mut viewer: ResMut<PermitViewerState>,
    mut cache: ResMut<ImageCache>,
    mut release: MessageWriter<ReleaseImages>,
) -> Result {
    let Some(ref permit) = viewer.open else {
        return Ok(());
    };
    let source = permit.source.clone();
    let title = permit.title.clone();

    let ctx = contexts.ctx_mut()?;
    let mut should_close = false;
    let mut should_retry = false;
    let state = cache.request(&source);
    let max_size = ctx.available_rect().size() * 0.85;

    // Modal draws the backdrop and handles Escape / click-outside
    let response = egui::Modal::new(egui::Id::new("permit_viewer")).show(ctx, |ui| {
        ui.heading(title.as_str());
        ui.add_space(8.0);

        match state {
            ImageState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading image...");
                });
            }
            ImageState::Ready { texture_id, size } => {
                let scale = (max_size.x / size.x).min(max_size.y / size.y).min(1.0);
                ui.add(egui::Image::new(egui::load::SizedTexture::new(
                    texture_id,
                    egui::vec2(size.x * scale, size.y * scale),
                )));
            }
            ImageState::Failed(ref message) => {
                ui.colored_label(theme::ui::ERROR_TEXT, "Failed to load image");
                ui.label(egui::RichText::new(source.display()).weak().small());
                ui.label(egui::RichText::new(message).weak().small());
                ui.horizontal(|ui| {
                    if ui.button("Retry").clicked() {
                        should_retry = true;
                    }
                    if let ImageSource::Url(ref url) = source
                        && ui.button("Open in Browser").clicked()
                        && let Err(e) = open::that(url)
                    {
                        warn!("Failed to open {}: {}", url, e);
                    }
                });
            }
        }

        ui.add_space(8.0);
        if ui.button("Close").clicked() {
            should_close = true;
        }
    });
    if response.should_close() {
        should_close = true;
    }

    if should_retry {
        cache.retry(&source);
    }
    if should_close {
        viewer.close();
        release.write(ReleaseImages::One(source));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_uses_default_title() {
        let mut viewer = PermitViewerState::default();
        viewer.open("https://example.com/p.png", None);
        assert!(viewer.is_open());
        assert_eq!(viewer.open.as_ref().map(|p| p.title.as_str()), Some(DEFAULT_TITLE));

        viewer.open("https://example.com/p.png", Some("  "));
        assert_eq!(viewer.open.as_ref().map(|p| p.title.as_str()), Some(DEFAULT_TITLE));

        viewer.open("https://example.com/p.png", Some("Permit 1"));
        assert_eq!(viewer.open.as_ref().map(|p| p.title.as_str()), Some("Permit 1"));

        viewer.close();
        assert!(!viewer.is_open());
    }
}
