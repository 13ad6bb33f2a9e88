//! egui painting of a blueprint surface.

use bevy::prelude::*;
use bevy_egui::egui;

use super::{SurfaceFrame, SurfaceLayout, region_fill};
use crate::blueprint::ViewMode;
use crate::blueprint::collection::BlueprintEntry;
use crate::capture::PhotoAssociations;
use crate::constants::{PREVIEW_DASH_LENGTH, PREVIEW_GAP_LENGTH, REGION_STROKE_WIDTH};
use crate::images::ImageState;
use crate::theme::{self, bevy_to_egui};

/// Follow-up the caller should perform after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    None,
    RetryImage,
}

fn to_egui_rect(min: Vec2, max: Vec2) -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(min.x, min.y), egui::pos2(max.x, max.y))
}

/// Draw one surface. Returns the frame to register for input routing (only
/// when the image is ready) plus any follow-up action.
pub fn show_surface(
    ui: &mut egui::Ui,
    entry: &BlueprintEntry,
    image: &ImageState,
    mode: ViewMode,
    photos: &PhotoAssociations,
    display_width: f32,
) -> (Option<SurfaceFrame>, SurfaceAction) {
    let (texture_id, image_size) = match image {
        ImageState::Ready { texture_id, size } => (*texture_id, *size),
        ImageState::Loading => {
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(display_width, display_width * 0.5),
                egui::Sense::hover(),
            );
            ui.painter()
                .rect_filled(rect, 2.0, theme::ui::IMAGE_PLACEHOLDER);
            ui.put(rect, egui::Spinner::new());
            return (None, SurfaceAction::None);
        }
        ImageState::Failed(message) => {
            let mut action = SurfaceAction::None;
            ui.group(|ui| {
                ui.set_width(display_width);
                ui.colored_label(theme::ui::ERROR_TEXT, "Failed to load image");
                ui.label(egui::RichText::new(entry.image.display()).weak().small());
                ui.label(egui::RichText::new(message).weak().small());
                if ui.button("Retry").clicked() {
                    action = SurfaceAction::RetryImage;
                }
            });
            return (None, action);
        }
    };

    // Sense drags so egui never treats the image as draggable content
    // (no scroll-by-drag while drawing).
    let layout_size = SurfaceLayout::new(Vec2::ZERO, display_width, image_size).size;
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(layout_size.x, layout_size.y),
        egui::Sense::click_and_drag(),
    );
    let layout = SurfaceLayout::new(
        Vec2::new(rect.min.x, rect.min.y),
        display_width,
        image_size,
    );

    let painter = ui.painter_at(rect);
    painter.image(
        texture_id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let stroke = egui::Stroke::new(REGION_STROKE_WIDTH, bevy_to_egui(theme::REGION_STROKE));
    for mapping in entry.store.mappings() {
        let (min, max) = layout.to_screen(mapping.coords);
        let region = to_egui_rect(min, max);
        let hovered = entry.hovered == Some(mapping.id);
        let has_photo = photos.has_photo(&entry.id, mapping.id);
        painter.rect_filled(region, 0.0, bevy_to_egui(region_fill(mode, hovered, has_photo)));
        painter.rect_stroke(region, 0.0, stroke, egui::StrokeKind::Inside);
    }

    // Paint only: the preview is not a widget and never takes input
    if let Some(preview) = entry.interaction.preview() {
        let (min, max) = layout.to_screen(preview);
        let outline = to_egui_rect(min, max);
        painter.rect_filled(outline, 0.0, bevy_to_egui(theme::PREVIEW_FILL));
        let corners = [
            outline.left_top(),
            outline.right_top(),
            outline.right_bottom(),
            outline.left_bottom(),
            outline.left_top(),
        ];
        painter.extend(egui::Shape::dashed_line(
            &corners,
            egui::Stroke::new(REGION_STROKE_WIDTH, bevy_to_egui(theme::PREVIEW_OUTLINE)),
            PREVIEW_DASH_LENGTH,
            PREVIEW_GAP_LENGTH,
        ));
    }

    let pointer_over = response.contains_pointer();
    if let Some(mapping) = entry.hovered.and_then(|id| entry.store.get(id)) {
        response.on_hover_text(&mapping.title);
    }

    (
        Some(SurfaceFrame {
            layout,
            pointer_over,
        }),
        SurfaceAction::None,
    )
}
