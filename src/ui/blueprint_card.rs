//! One blueprint in the project detail view: header, surface, photo list.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::blueprint::surface::{SurfaceAction, SurfaceFrame};
use crate::blueprint::{BlueprintEntry, DeleteBlueprintRequest, ViewMode, show_surface};
use crate::capture::PhotoAssociations;
use crate::images::ImageState;
use crate::theme;

/// What the user asked for on a card this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum CardAction {
    Rename(String),
    SetEditing(bool),
    Undo,
    Delete,
    RetryImage,
}

/// Read-only inputs shared by every card.
pub struct CardView<'a> {
    pub mode: ViewMode,
    pub photos: &'a PhotoAssociations,
    pub display_width: f32,
}

/// Blueprint awaiting delete confirmation
#[derive(Resource, Default)]
pub struct DeleteConfirmation {
    pub blueprint_id: Option<String>,
    pub name: String,
}

impl DeleteConfirmation {
    pub fn ask(&mut self, entry: &BlueprintEntry) {
        self.blueprint_id = Some(entry.id.clone());
        self.name = entry.name.clone();
    }
}

pub fn show_blueprint_card(
    ui: &mut egui::Ui,
    entry: &mut BlueprintEntry,
    image: &ImageState,
    view: &CardView,
) -> (Option<SurfaceFrame>, Vec<CardAction>) {
    let mut actions = Vec::new();
    let admin = view.mode == ViewMode::Admin;
    let editing = entry.interaction.is_editing();

    ui.horizontal(|ui| {
        if let Some(ref mut draft) = entry.name_draft {
            let response = ui.add(egui::TextEdit::singleline(draft).desired_width(220.0));
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Save").clicked() || submitted {
                actions.push(CardAction::Rename(draft.clone()));
            }
            if ui.button("Cancel").clicked() {
                entry.name_draft = None;
            }
        } else {
            ui.label(egui::RichText::new(&entry.name).size(16.0).strong());
            if admin && ui.small_button("Rename").clicked() {
                entry.name_draft = Some(entry.name.clone());
            }
        }

        if editing {
            ui.label(
                egui::RichText::new("EDITING")
                    .small()
                    .strong()
                    .color(theme::ui::EDITING_BADGE),
            );
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !admin {
                return;
            }
            if ui.button("Delete").clicked() {
                actions.push(CardAction::Delete);
            }
            if editing
                && ui
                    .add_enabled(!entry.store.is_empty(), egui::Button::new("Undo"))
                    .on_hover_text("Remove the last mapping")
                    .clicked()
            {
                actions.push(CardAction::Undo);
            }
            let toggle = if editing { "Done" } else { "Edit Mappings" };
            if ui.button(toggle).clicked() {
                actions.push(CardAction::SetEditing(!editing));
            }
        });
    });

    let count = entry.store.len();
    let hint = match (view.mode, editing) {
        (ViewMode::Admin, true) => "Drag on the blueprint to draw a mapping.",
        (ViewMode::Admin, false) => "Click a mapping to identify it.",
        (ViewMode::User, _) => "Click a mapping to attach a photo.",
    };
    ui.label(
        egui::RichText::new(format!(
            "{} mapping{} | {}",
            count,
            if count == 1 { "" } else { "s" },
            hint
        ))
        .small()
        .color(theme::ui::HINT_TEXT),
    );
    ui.add_space(4.0);

    let (frame, surface_action) = show_surface(
        ui,
        entry,
        image,
        view.mode,
        view.photos,
        view.display_width,
    );
    if surface_action == SurfaceAction::RetryImage {
        actions.push(CardAction::RetryImage);
    }

    if !admin {
        photo_list(ui, entry, view.photos);
    }

    (frame, actions)
}

fn photo_list(ui: &mut egui::Ui, entry: &BlueprintEntry, photos: &PhotoAssociations) {
    ui.add_space(6.0);
    ui.label(egui::RichText::new("Photo Associations").strong());

    let associated = photos.for_blueprint(&entry.id);
    if associated.is_empty() {
        ui.label(
            egui::RichText::new("No photos yet")
                .italics()
                .color(theme::ui::HINT_TEXT),
        );
        return;
    }

    for photo in associated {
        let title = entry
            .store
            .get(photo.mapping_id)
            .map(|m| m.title.as_str())
            .unwrap_or("Unknown mapping");
        ui.horizontal(|ui| {
            ui.label(title);
            ui.label(egui::RichText::new(photo.label()).weak());
            ui.label(
                egui::RichText::new(photo.captured_at.format("%Y-%m-%d %H:%M").to_string())
                    .small()
                    .color(theme::ui::HINT_TEXT),
            );
        });
    }
}

/// Confirm before a blueprint and its mappings are removed
pub fn delete_confirmation_ui(
    mut contexts: EguiContexts,
    mut confirmation: ResMut<DeleteConfirmation>,
    mut delete_events: MessageWriter<DeleteBlueprintRequest>,
) -> Result {
    let Some(blueprint_id) = confirmation.blueprint_id.clone() else {
        return Ok(());
    };

    let mut close = false;

    egui::Window::new("Delete Blueprint")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(format!(
                "Delete \"{}\" and all of its mappings?",
                confirmation.name
            ));
            ui.label(egui::RichText::new("This cannot be undone.").weak());
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    delete_events.write(DeleteBlueprintRequest {
                        blueprint_id: blueprint_id.clone(),
                    });
                    close = true;
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    if close {
        *confirmation = DeleteConfirmation::default();
    }

    Ok(())
}
