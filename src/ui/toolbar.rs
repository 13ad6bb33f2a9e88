use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::settings_dialog::SettingsDialogState;
use crate::api::RefreshProjectsRequest;
use crate::blueprint::ViewMode;
use crate::collaborators::Collaborators;
use crate::config::AppConfig;
use crate::theme;

/// Main toolbar: view switch, refresh, settings
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut view_mode: ResMut<ViewMode>,
    mut settings: ResMut<SettingsDialogState>,
    config: Res<AppConfig>,
    collaborators: Option<Res<Collaborators>>,
    mut refresh: MessageWriter<RefreshProjectsRequest>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    egui::TopBottomPanel::top("main_toolbar")
        .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(12, 8)))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                ui.label(egui::RichText::new("Sitemark").size(16.0).strong());
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(8.0);

                for mode in [ViewMode::Admin, ViewMode::User] {
                    let button = egui::Button::new(egui::RichText::new(mode.label()).size(14.0))
                        .min_size(egui::vec2(0.0, 26.0))
                        .selected(*view_mode == mode);
                    if ui.add(button).clicked() && *view_mode != mode {
                        info!("Switched to {}", mode.label());
                        *view_mode = mode;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        settings.open(&config);
                    }
                    if ui.button("Refresh").on_hover_text("Reload projects").clicked() {
                        refresh.write(RefreshProjectsRequest);
                    }
                    if let Some(collaborators) = collaborators
                        && !collaborators.online
                    {
                        ui.colored_label(theme::ui::WARNING_TEXT, "Offline")
                            .on_hover_text("Remote API disabled in settings");
                    }
                });
            });
        });
    Ok(())
}
