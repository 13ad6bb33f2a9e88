//! Create/edit project dialog.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::api::{
    CreateProjectRequest, NewProject, Project, ProjectSaved, ProjectsState, UpdateProjectRequest,
};
use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormMode {
    Create,
    Edit { project_id: String },
}

#[derive(Resource, Default)]
pub struct ProjectFormState {
    mode: Option<FormMode>,
    fields: NewProject,
    /// Local validation message
    error: Option<String>,
    /// A request from this form is in flight
    submitted: bool,
}

impl ProjectFormState {
    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    pub fn open_create(&mut self) {
        *self = Self {
            mode: Some(FormMode::Create),
            ..Default::default()
        };
    }

    pub fn open_edit(&mut self, project: &Project) {
        *self = Self {
            mode: Some(FormMode::Edit {
                project_id: project.id.clone(),
            }),
            fields: NewProject::from_project(project),
            ..Default::default()
        };
    }

    fn close(&mut self) {
        *self = Self::default();
    }
}

/// Close the form once the service accepted it
pub fn close_on_saved(mut events: MessageReader<ProjectSaved>, mut form: ResMut<ProjectFormState>) {
    if events.read().count() > 0 && form.submitted {
        form.close();
    }
}

pub fn project_form_ui(
    mut contexts: EguiContexts,
    mut form: ResMut<ProjectFormState>,
    state: Res<ProjectsState>,
    mut creates: MessageWriter<CreateProjectRequest>,
    mut updates: MessageWriter<UpdateProjectRequest>,
) -> Result {
    let Some(mode) = form.mode.clone() else {
        return Ok(());
    };

    let (title, submit_label, failure) = match mode {
        FormMode::Create => ("New Project", "Create", "Failed to create project"),
        FormMode::Edit { .. } => ("Edit Project", "Save", "Failed to update project"),
    };

    let mut should_submit = false;
    let mut should_close = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.set_min_width(360.0);

            egui::Grid::new("project_form_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    let fields = &mut form.fields;
                    for (label, value) in [
                        ("Project Name", &mut fields.name),
                        ("Address", &mut fields.address),
                        ("Manager Name", &mut fields.manager_name),
                        ("Manager Phone", &mut fields.manager_phone),
                    ] {
                        ui.label(format!("{} *", label));
                        ui.add(egui::TextEdit::singleline(value).desired_width(240.0));
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);

            if let Some(ref error) = form.error {
                ui.colored_label(theme::ui::ERROR_TEXT, error);
            } else if form.submitted
                && !state.saving
                && let Some(ref error) = state.save_error
            {
                ui.colored_label(theme::ui::ERROR_TEXT, failure);
                ui.label(egui::RichText::new(error).weak().small());
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let busy = form.submitted && state.saving;
                if ui
                    .add_enabled(!busy, egui::Button::new(submit_label))
                    .clicked()
                {
                    should_submit = true;
                }
                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
                if busy {
                    ui.spinner();
                }
            });
        });

    if should_close {
        form.close();
        return Ok(());
    }

    if should_submit {
        if let Err(e) = form.fields.validate() {
            form.error = Some(e.to_string());
            return Ok(());
        }
        form.error = None;
        form.submitted = true;
        let fields = form.fields.clone();
        match mode {
            FormMode::Create => {
                creates.write(CreateProjectRequest { fields });
            }
            FormMode::Edit { project_id } => {
                updates.write(UpdateProjectRequest { project_id, fields });
            }
        }
    }

    Ok(())
}
