//! Short-lived notifications in the bottom-right corner.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::TOAST_DURATION_SECS;

#[derive(Debug, Clone)]
struct Toast {
    text: String,
    remaining: f32,
}

#[derive(Resource, Default)]
pub struct Toasts {
    toasts: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, text: impl Into<String>) {
        self.toasts.push(Toast {
            text: text.into(),
            remaining: TOAST_DURATION_SECS,
        });
    }

    /// Messages currently showing, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.toasts.iter().map(|t| t.text.as_str()).collect()
    }

    fn tick(&mut self, delta: f32) {
        for toast in &mut self.toasts {
            toast.remaining -= delta;
        }
        self.toasts.retain(|t| t.remaining > 0.0);
    }
}

pub fn expire_toasts(time: Res<Time>, mut toasts: ResMut<Toasts>) {
    if !toasts.toasts.is_empty() {
        toasts.tick(time.delta_secs());
    }
}

pub fn toasts_ui(mut contexts: EguiContexts, toasts: Res<Toasts>) -> Result {
    if toasts.toasts.is_empty() {
        return Ok(());
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .interactable(false)
        .show(contexts.ctx_mut()?, |ui| {
            for text in toasts.texts() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(text);
                });
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let mut toasts = Toasts::default();
        toasts.push("Clicked on area 1");
        toasts.tick(1.0);
        assert_eq!(toasts.toasts.len(), 1);
        toasts.tick(TOAST_DURATION_SECS);
        assert!(toasts.toasts.is_empty());
    }
}
