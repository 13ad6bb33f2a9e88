mod blueprint_card;
mod dialogs;
mod permit_viewer;
mod project_detail;
mod project_form;
mod projects_panel;
mod settings_dialog;
mod toasts;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;

pub use toasts::Toasts;

/// All egui systems of the app. Registry clearing runs before this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct UiSystems;

/// Resource that tracks whether any modal dialog is currently open.
/// Surface input handlers check this to avoid drawing behind a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block surface input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    project_form: Res<project_form::ProjectFormState>,
    permit_viewer: Res<permit_viewer::PermitViewerState>,
    settings: Res<settings_dialog::SettingsDialogState>,
    config_reset: Res<ConfigResetNotification>,
    confirm_delete: Res<blueprint_card::DeleteConfirmation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = project_form.is_open()
        || permit_viewer.is_open()
        || settings.is_open
        || config_reset.show
        || confirm_delete.blueprint_id.is_some();
}

/// egui renders through the primary camera
fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<project_form::ProjectFormState>()
            .init_resource::<permit_viewer::PermitViewerState>()
            .init_resource::<settings_dialog::SettingsDialogState>()
            .init_resource::<blueprint_card::DeleteConfirmation>()
            .init_resource::<Toasts>()
            .init_resource::<project_detail::BlueprintPicker>()
            .add_systems(Startup, spawn_camera)
            // Top and side panels must render before the central panel
            .add_systems(
                EguiPrimaryContextPass,
                (
                    toolbar::toolbar_ui,
                    projects_panel::projects_panel_ui,
                    project_detail::project_detail_ui,
                )
                    .chain()
                    .in_set(UiSystems),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    project_form::project_form_ui,
                    permit_viewer::permit_viewer_ui,
                    settings_dialog::settings_dialog_ui,
                    blueprint_card::delete_confirmation_ui,
                    dialogs::config_reset_notification_ui,
                    toasts::toasts_ui,
                )
                    .in_set(UiSystems)
                    .after(project_detail::project_detail_ui),
            )
            .add_systems(Update, (project_form::close_on_saved, toasts::expire_toasts))
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
