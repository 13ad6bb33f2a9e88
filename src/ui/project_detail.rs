//! Central panel: the open project, its blueprints and its permits.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{EguiContexts, egui};
use chrono::NaiveDateTime;
use futures_lite::future;
use std::path::PathBuf;

use super::blueprint_card::{CardAction, CardView, DeleteConfirmation, show_blueprint_card};
use super::permit_viewer::PermitViewerState;
use super::project_form::ProjectFormState;
use crate::api::{CurrentProject, OpenProjectRequest, Permit, Project, ProjectsState};
use crate::blueprint::{
    AddBlueprintRequest, BlueprintCollection, ImageSource, RenameBlueprintRequest,
    SurfaceRegistry, UndoMappingRequest, ViewMode,
};
use crate::capture::{PHOTO_EXTENSIONS, PhotoAssociations};
use crate::config::AppConfig;
use crate::images::ImageCache;
use crate::theme;

/// Blueprint image chooser state
#[derive(Resource, Default)]
pub struct BlueprintPicker {
    /// Pending async file dialog
    pending: Option<Task<Option<PathBuf>>>,
    /// Typed-in image URL
    url: String,
}

/// Message writers used by the detail view
#[derive(SystemParam)]
pub struct DetailRequests<'w> {
    pub open: MessageWriter<'w, OpenProjectRequest>,
    pub add: MessageWriter<'w, AddBlueprintRequest>,
    pub rename: MessageWriter<'w, RenameBlueprintRequest>,
    pub undo: MessageWriter<'w, UndoMappingRequest>,
}

/// Dialog resources the detail view opens
#[derive(SystemParam)]
pub struct DetailDialogs<'w> {
    pub form: ResMut<'w, ProjectFormState>,
    pub viewer: ResMut<'w, PermitViewerState>,
    pub confirm_delete: ResMut<'w, DeleteConfirmation>,
}

#[allow(clippy::too_many_arguments)]
pub fn project_detail_ui(
    mut contexts: EguiContexts,
    state: Res<ProjectsState>,
    mut collection: ResMut<BlueprintCollection>,
    mut cache: ResMut<ImageCache>,
    mut registry: ResMut<SurfaceRegistry>,
    mut picker: ResMut<BlueprintPicker>,
    mut dialogs: DetailDialogs,
    mut requests: DetailRequests,
    mode: Res<ViewMode>,
    photos: Res<PhotoAssociations>,
    config: Res<AppConfig>,
) -> Result {
    // Poll pending file dialog (before rendering so the result lands this frame)
    if let Some(ref mut task) = picker.pending
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        picker.pending = None;
        if let Some(path) = result {
            requests.add.write(AddBlueprintRequest {
                image: ImageSource::File(path),
            });
        }
    }

    egui::CentralPanel::default().show(contexts.ctx_mut()?, |ui| match &state.current {
        CurrentProject::None => {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Select a project to see its blueprints and permits.")
                        .color(theme::ui::HINT_TEXT),
                );
            });
        }
        CurrentProject::Loading { .. } => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading project...");
            });
        }
        CurrentProject::NotFound { id } => {
            ui.heading("Project Not Found");
            ui.label(format!("No project with id {} exists.", id));
            ui.add_space(8.0);
            if ui.button("Back to Projects").clicked() {
                requests.open.write(OpenProjectRequest { project_id: None });
            }
        }
        CurrentProject::Failed { id, message } => {
            ui.colored_label(theme::ui::ERROR_TEXT, "Failed to load project");
            ui.label(egui::RichText::new(message).weak().small());
            ui.add_space(8.0);
            if ui.button("Retry").clicked() {
                requests.open.write(OpenProjectRequest {
                    project_id: Some(id.clone()),
                });
            }
        }
        CurrentProject::Loaded(project) => {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    project_header(ui, project, &mut dialogs.form, &mut requests);
                    ui.add_space(12.0);
                    ui.separator();

                    let view = CardView {
                        mode: *mode,
                        photos: &photos,
                        display_width: config.data.display_width(),
                    };
                    blueprints_section(
                        ui,
                        &project.id,
                        &mut collection,
                        &mut cache,
                        &mut registry,
                        &mut picker,
                        &mut dialogs.confirm_delete,
                        &mut requests,
                        &view,
                    );

                    ui.add_space(12.0);
                    ui.separator();
                    permits_section(ui, &project.permits, &mut dialogs.viewer);
                });
        }
    });

    Ok(())
}

fn project_header(
    ui: &mut egui::Ui,
    project: &Project,
    form: &mut ProjectFormState,
    requests: &mut DetailRequests,
) {
    ui.horizontal(|ui| {
        ui.heading(project.name.as_str());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Close").clicked() {
                requests.open.write(OpenProjectRequest { project_id: None });
            }
            if ui.button("Edit").clicked() {
                form.open_edit(project);
            }
        });
    });
    ui.add_space(6.0);

    egui::Grid::new("project_details_grid")
        .num_columns(2)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for (label, value) in [
                ("Address", &project.address),
                ("Manager", &project.manager_name),
                ("Contact", &project.manager_phone),
            ] {
                ui.label(egui::RichText::new(label).color(theme::ui::LABEL_TEXT));
                ui.label(value.as_str());
                ui.end_row();
            }
        });
}

#[allow(clippy::too_many_arguments)]
fn blueprints_section(
    ui: &mut egui::Ui,
    project_id: &str,
    collection: &mut BlueprintCollection,
    cache: &mut ImageCache,
    registry: &mut SurfaceRegistry,
    picker: &mut BlueprintPicker,
    confirm_delete: &mut DeleteConfirmation,
    requests: &mut DetailRequests,
    view: &CardView,
) {
    let ready = collection.is_current(project_id) && !collection.loading;

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Blueprints").size(18.0).strong());
        if view.mode != ViewMode::Admin {
            return;
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let picking = picker.pending.is_some();
            if ui
                .add_enabled(ready && !picking, egui::Button::new("Add Blueprint"))
                .on_hover_text("Choose a blueprint image file")
                .clicked()
            {
                picker.pending = Some(AsyncComputeTaskPool::get().spawn(async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Images", PHOTO_EXTENSIONS)
                        .set_title("Select Blueprint Image")
                        .pick_file()
                        .await
                        .map(|h| h.path().to_path_buf())
                }));
            }
            let url = picker.url.trim().to_string();
            if ui
                .add_enabled(ready && !url.is_empty(), egui::Button::new("Add from URL"))
                .clicked()
            {
                requests.add.write(AddBlueprintRequest {
                    image: ImageSource::Url(url),
                });
                picker.url.clear();
            }
            ui.add(
                egui::TextEdit::singleline(&mut picker.url)
                    .hint_text("https://...")
                    .desired_width(220.0),
            );
        });
    });
    ui.add_space(8.0);

    if !ready {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading blueprints...");
        });
        return;
    }
    if let Some(ref error) = collection.load_error {
        ui.colored_label(theme::ui::ERROR_TEXT, error);
        ui.add_space(4.0);
    }
    if collection.is_empty() {
        ui.label(
            egui::RichText::new("No blueprints added yet. Click the button above to add one.")
                .color(theme::ui::HINT_TEXT),
        );
        return;
    }

    for entry in collection.entries_mut() {
        let image = cache.request(&entry.image);
        let (frame, actions) = ui
            .group(|ui| show_blueprint_card(ui, entry, &image, view))
            .inner;
        if let Some(frame) = frame {
            registry.register(&entry.id, frame);
        }

        for action in actions {
            match action {
                CardAction::Rename(name) => {
                    requests.rename.write(RenameBlueprintRequest {
                        blueprint_id: entry.id.clone(),
                        name,
                    });
                }
                CardAction::SetEditing(editing) => entry.interaction.set_editing(editing),
                CardAction::Undo => {
                    requests.undo.write(UndoMappingRequest {
                        blueprint_id: entry.id.clone(),
                    });
                }
                CardAction::Delete => confirm_delete.ask(entry),
                CardAction::RetryImage => cache.retry(&entry.image),
            }
        }
        ui.add_space(10.0);
    }
}

fn permits_section(ui: &mut egui::Ui, permits: &[Permit], viewer: &mut PermitViewerState) {
    ui.label(egui::RichText::new("Permits").size(18.0).strong());
    ui.add_space(8.0);

    if permits.is_empty() {
        ui.label(
            egui::RichText::new("No permits found for this project.").color(theme::ui::HINT_TEXT),
        );
        return;
    }

    egui::Grid::new("permits_grid")
        .num_columns(6)
        .striped(true)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            for header in ["Permit ID", "Issued", "Expires", "Image", "Created", "Last Updated"] {
                ui.label(egui::RichText::new(header).strong());
            }
            ui.end_row();

            for permit in permits {
                ui.label(permit.id.as_str());
                ui.label(format_timestamp(&permit.issued_at));
                ui.label(format_timestamp(&permit.expires_at));
                if ui
                    .add_enabled(
                        !permit.image_url.is_empty(),
                        egui::Button::new("View Image"),
                    )
                    .clicked()
                {
                    viewer.open(&permit.image_url, None);
                }
                ui.label(format_timestamp(&permit.created_at));
                ui.label(format_timestamp(&permit.last_updated));
                ui.end_row();
            }
        });
}

/// Service timestamps are ISO 8601 without zone; anything else is shown as-is.
fn format_timestamp(raw: &str) -> String {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2025-09-18T19:56:54.121075"), "2025-09-18 19:56");
        assert_eq!(format_timestamp("2025-09-18T19:56:54"), "2025-09-18 19:56");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
