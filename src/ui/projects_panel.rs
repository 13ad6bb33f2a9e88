//! Left panel: every project, plus the "+ New Project" entry point.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::project_form::ProjectFormState;
use crate::api::{OpenProjectRequest, ProjectsState};
use crate::theme;

pub fn projects_panel_ui(
    mut contexts: EguiContexts,
    state: Res<ProjectsState>,
    mut form: ResMut<ProjectFormState>,
    mut open: MessageWriter<OpenProjectRequest>,
) -> Result {
    let current_id = state.current.id().map(str::to_string);

    egui::SidePanel::left("projects_panel")
        .resizable(true)
        .default_width(460.0)
        .min_width(320.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading("Projects");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+ New Project").clicked() {
                        form.open_create();
                    }
                });
            });
            ui.separator();

            if state.list_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading projects...");
                });
                return;
            }

            if let Some(ref error) = state.list_error {
                ui.colored_label(theme::ui::ERROR_TEXT, error);
                return;
            }

            if state.projects.is_empty() {
                ui.label(
                    egui::RichText::new("No projects yet.")
                        .color(theme::ui::HINT_TEXT)
                        .italics(),
                );
                return;
            }

            egui::ScrollArea::both().show(ui, |ui| {
                egui::Grid::new("projects_table")
                    .striped(true)
                    .num_columns(4)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        for header in ["Name", "Address", "Manager", "Phone"] {
                            ui.label(egui::RichText::new(header).strong());
                        }
                        ui.end_row();

                        for project in &state.projects {
                            let selected = current_id.as_deref() == Some(project.id.as_str());
                            let clicked = ui.selectable_label(selected, &project.name).clicked();
                            ui.label(&project.address);
                            ui.label(&project.manager_name);
                            ui.label(&project.manager_phone);
                            ui.end_row();

                            if clicked && !selected {
                                open.write(OpenProjectRequest {
                                    project_id: Some(project.id.clone()),
                                });
                            }
                        }
                    });
            });
        });

    Ok(())
}
