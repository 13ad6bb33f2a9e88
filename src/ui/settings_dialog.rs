use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::{AppConfig, AppConfigData, SaveConfigRequest};
use crate::constants::{API_URL_ENV, MAX_DISPLAY_WIDTH, MIN_DISPLAY_WIDTH};

/// State for the settings dialog
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is open
    pub is_open: bool,
    /// Edited copy of the config, applied on Save
    pub draft: AppConfigData,
    /// Whether changes have been made
    pub has_changes: bool,
}

impl SettingsDialogState {
    /// Open the dialog with a fresh copy of the current config
    pub fn open(&mut self, config: &AppConfig) {
        self.draft = config.data.clone();
        self.has_changes = false;
        self.is_open = true;
    }

    /// Copy the draft into `config`. Returns true when the service settings
    /// changed (those only take effect after a restart).
    fn apply(&self, config: &mut AppConfig) -> bool {
        let needs_restart = self.draft.api_base_url != config.data.api_base_url
            || self.draft.use_remote_api != config.data.use_remote_api;
        // Keep the project bookkeeping written by the app itself
        let last_project_id = config.data.last_project_id.clone();
        config.data = AppConfigData {
            last_project_id,
            ..self.draft.clone()
        };
        config.dirty = true;
        needs_restart
    }
}

/// Renders the settings dialog
pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
    mut toasts: ResMut<super::Toasts>,
) -> Result {
    if !dialog_state.is_open {
        return Ok(());
    }

    let mut should_close = false;
    let mut should_save = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .min_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading("Application Settings");
            ui.add_space(12.0);

            let state = &mut *dialog_state;

            ui.group(|ui| {
                ui.label(egui::RichText::new("Project Service").strong());
                ui.add_space(8.0);

                if ui
                    .checkbox(&mut state.draft.use_remote_api, "Use remote service")
                    .changed()
                {
                    state.has_changes = true;
                }

                ui.horizontal(|ui| {
                    ui.label("URL:");
                    let response = ui.add_enabled(
                        state.draft.use_remote_api,
                        egui::TextEdit::singleline(&mut state.draft.api_base_url)
                            .desired_width(280.0),
                    );
                    if response.changed() {
                        state.has_changes = true;
                    }
                });

                ui.add_space(4.0);
                if let Ok(url) = std::env::var(API_URL_ENV) {
                    ui.label(
                        egui::RichText::new(format!("Overridden by {}={}", API_URL_ENV, url))
                            .weak()
                            .small(),
                    );
                }
                ui.label(
                    egui::RichText::new("Service changes apply after a restart.")
                        .weak()
                        .small(),
                );
            });

            ui.add_space(12.0);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Blueprints").strong());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("Display width:");
                    let response = ui.add(
                        egui::Slider::new(
                            &mut state.draft.display_width,
                            MIN_DISPLAY_WIDTH..=MAX_DISPLAY_WIDTH,
                        )
                        .suffix(" px"),
                    );
                    if response.changed() {
                        state.has_changes = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Minimum mapping area:");
                    let response = ui.add(
                        egui::DragValue::new(&mut state.draft.min_mapping_area)
                            .range(0.0..=10_000.0)
                            .speed(1.0),
                    );
                    if response.changed() {
                        state.has_changes = true;
                    }
                });
                ui.label(
                    egui::RichText::new("Smaller drags are discarded. 0 keeps every drag.")
                        .weak()
                        .small(),
                );
            });

            ui.add_space(12.0);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Startup").strong());
                ui.add_space(8.0);

                if ui
                    .checkbox(&mut state.draft.start_in_user_view, "Start in User View")
                    .changed()
                {
                    state.has_changes = true;
                }
            });

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(state.has_changes, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }

                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    if should_save {
        if dialog_state.apply(&mut config) {
            toasts.push("Restart to apply service settings");
        }
        save_events.write(SaveConfigRequest);
        should_close = true;
    }

    if should_close {
        dialog_state.is_open = false;
        dialog_state.has_changes = false;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_last_project() {
        let mut config = AppConfig::default();
        config.data.last_project_id = Some("3".to_string());

        let mut state = SettingsDialogState::default();
        state.open(&config);
        state.draft.display_width = 1000.0;
        state.draft.last_project_id = None;

        let needs_restart = state.apply(&mut config);

        assert!(!needs_restart);
        assert!(config.dirty);
        assert_eq!(config.data.display_width, 1000.0);
        assert_eq!(config.data.last_project_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_apply_flags_service_changes() {
        let mut config = AppConfig::default();
        let mut state = SettingsDialogState::default();
        state.open(&config);
        state.draft.use_remote_api = false;

        assert!(state.apply(&mut config));
        assert!(!config.data.use_remote_api);
    }
}
