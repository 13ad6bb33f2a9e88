//! Pointer routing for blueprint surfaces.
//!
//! Mouse and touch input are reduced to one [`PointerFrame`] per frame, then
//! [`route_pointer`] decides which surface's state machine sees it.

use bevy::input::touch::Touch;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::SurfaceRegistry;
use crate::blueprint::collection::BlueprintCollection;
use crate::blueprint::mapping::Mapping;
use crate::blueprint::{MappingAppended, RegionClicked};
use crate::config::AppConfig;
use crate::ui::DialogState;

/// Raw pointer position in window coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse(Vec2),
    /// Contacts of the gesture, the first one is read
    Touch(Vec<Vec2>),
}

impl PointerInput {
    /// The point used for hit testing: the mouse, or the first contact.
    pub fn primary(&self) -> Option<Vec2> {
        match self {
            PointerInput::Mouse(position) => Some(*position),
            PointerInput::Touch(contacts) => contacts.first().copied(),
        }
    }
}

/// Pointer state for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    /// `None` when the pointer is outside the window or input is blocked
    pub input: Option<PointerInput>,
    pub just_pressed: bool,
    pub just_released: bool,
}

/// Region a read-only press started on; a click needs press and release on
/// the same region.
#[derive(Resource, Default, Debug)]
pub struct SurfacePointer {
    pressed_region: Option<(String, u32)>,
    /// Touch contact that started the current gesture
    touch_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Appended { blueprint_id: String, mapping: Mapping },
    Clicked { blueprint_id: String, mapping_id: u32 },
}

/// Apply one pointer frame to the collection.
pub fn route_pointer(
    frame: &PointerFrame,
    registry: &SurfaceRegistry,
    collection: &mut BlueprintCollection,
    pointer: &mut SurfacePointer,
    min_area: f32,
) -> Vec<SurfaceEvent> {
    let mut events = Vec::new();

    // A drag in progress owns the pointer until it ends or leaves its surface
    if let Some(id) = collection.dragging_id().map(str::to_string) {
        let sample = match (&frame.input, registry.get(&id)) {
            (Some(input), Some(surface))
                if input.primary().is_some_and(|p| surface.layout.contains(p)) =>
            {
                surface.layout.sample(input)
            }
            _ => None,
        };

        let Some(entry) = collection.entry_mut(&id) else {
            return events;
        };
        match sample {
            Some(sample) => {
                entry.interaction.update(sample);
                if frame.just_released
                    && let Some(mapping) = collection.commit_drag(&id, min_area)
                {
                    events.push(SurfaceEvent::Appended {
                        blueprint_id: id,
                        mapping,
                    });
                }
            }
            None => {
                debug!("Pointer left blueprint {}, drag cancelled", id);
                entry.interaction.cancel();
            }
        }
        return events;
    }

    let target = frame.input.as_ref().and_then(|input| {
        let (id, surface) = registry.surface_at(input.primary()?)?;
        Some((id.to_string(), surface.layout.sample(input)?))
    });

    for entry in collection.entries_mut() {
        entry.hovered = match &target {
            Some((id, sample)) if *id == entry.id => {
                entry.store.hit_test(sample.as_vec2()).map(|m| m.id)
            }
            _ => None,
        };
    }

    let Some((id, sample)) = target else {
        if frame.just_released {
            pointer.pressed_region = None;
        }
        return events;
    };
    let Some(entry) = collection.entry_mut(&id) else {
        return events;
    };

    if frame.just_pressed {
        if entry.interaction.is_editing() {
            entry.interaction.begin(sample);
            entry.hovered = None;
        } else {
            pointer.pressed_region = entry.hovered.map(|mapping_id| (id.clone(), mapping_id));
        }
    }

    if frame.just_released {
        if entry.interaction.is_dragging() {
            // Press and release landed in the same frame
            if let Some(mapping) = collection.commit_drag(&id, min_area) {
                events.push(SurfaceEvent::Appended {
                    blueprint_id: id,
                    mapping,
                });
            }
        } else if let Some((pressed_id, mapping_id)) = pointer.pressed_region.take()
            && pressed_id == id
            && entry.hovered == Some(mapping_id)
        {
            events.push(SurfaceEvent::Clicked {
                blueprint_id: id,
                mapping_id,
            });
        }
    }

    events
}

/// One touch contact as seen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: u64,
    pub position: Vec2,
}

impl From<&Touch> for Contact {
    fn from(touch: &Touch) -> Self {
        Self {
            id: touch.id(),
            position: touch.position(),
        }
    }
}

/// Touch state for one frame. A contact that started and ended within the
/// frame is in both `just_pressed` and `just_released`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchSnapshot {
    pub active: Vec<Contact>,
    pub just_pressed: Vec<Contact>,
    pub just_released: Vec<Contact>,
}

impl TouchSnapshot {
    fn from_touches(touches: &Touches) -> Self {
        Self {
            active: touches.iter().map(Contact::from).collect(),
            just_pressed: touches.iter_just_pressed().map(Contact::from).collect(),
            just_released: touches.iter_just_released().map(Contact::from).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.active.is_empty() && self.just_pressed.is_empty() && self.just_released.is_empty()
    }

    fn find(contacts: &[Contact], id: u64) -> Option<Vec2> {
        contacts.iter().find(|c| c.id == id).map(|c| c.position)
    }
}

/// Reduce touches to one gesture. The contact that started the gesture
/// (`tracked`) is the only one read; lifting it ends the gesture and losing
/// it without a lift leaves the frame without a pointer.
pub fn gesture_frame(
    snapshot: &TouchSnapshot,
    tracked: &mut Option<u64>,
) -> Option<PointerFrame> {
    if let Some(id) = *tracked {
        if let Some(position) = TouchSnapshot::find(&snapshot.just_released, id) {
            *tracked = None;
            return Some(PointerFrame {
                input: Some(PointerInput::Touch(vec![position])),
                just_pressed: false,
                just_released: true,
            });
        }
        if let Some(position) = TouchSnapshot::find(&snapshot.active, id) {
            return Some(PointerFrame {
                input: Some(PointerInput::Touch(vec![position])),
                ..Default::default()
            });
        }
        // Cancelled by the platform
        *tracked = None;
        return Some(PointerFrame::default());
    }

    if snapshot.is_empty() {
        return None;
    }

    let Some(first) = snapshot.just_pressed.iter().min_by_key(|c| c.id) else {
        // Fingers that are down but not part of a gesture only hover
        let hover = snapshot.active.iter().min_by_key(|c| c.id)?;
        return Some(PointerFrame {
            input: Some(PointerInput::Touch(vec![hover.position])),
            ..Default::default()
        });
    };

    // A tap can start and end within one frame
    let released = TouchSnapshot::find(&snapshot.just_released, first.id);
    let position = released
        .or_else(|| TouchSnapshot::find(&snapshot.active, first.id))
        .unwrap_or(first.position);
    if released.is_none() {
        *tracked = Some(first.id);
    }

    Some(PointerFrame {
        input: Some(PointerInput::Touch(vec![position])),
        just_pressed: true,
        just_released: released.is_some(),
    })
}

/// Touch input takes over whenever a finger is down or just lifted.
fn touch_frame(touches: &Touches, tracked: &mut Option<u64>) -> Option<PointerFrame> {
    gesture_frame(&TouchSnapshot::from_touches(touches), tracked)
}

fn mouse_frame(mouse: &ButtonInput<MouseButton>, window: Option<&Window>) -> PointerFrame {
    PointerFrame {
        input: window
            .and_then(|w| w.cursor_position())
            .map(PointerInput::Mouse),
        just_pressed: mouse.just_pressed(MouseButton::Left),
        just_released: mouse.just_released(MouseButton::Left),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn drive_surface_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    registry: Res<SurfaceRegistry>,
    dialogs: Res<DialogState>,
    config: Res<AppConfig>,
    mut collection: ResMut<BlueprintCollection>,
    mut pointer: ResMut<SurfacePointer>,
    mut appended: MessageWriter<MappingAppended>,
    mut clicked: MessageWriter<RegionClicked>,
) {
    let Some(project_id) = collection.project_id().map(str::to_string) else {
        return;
    };

    let mut frame = touch_frame(&touches, &mut pointer.touch_id)
        .unwrap_or_else(|| mouse_frame(&mouse, windows.single().ok()));
    if dialogs.any_modal_open {
        frame.input = None;
    }

    let events = route_pointer(
        &frame,
        &registry,
        &mut collection,
        &mut pointer,
        config.data.min_mapping_area(),
    );

    for event in events {
        match event {
            SurfaceEvent::Appended {
                blueprint_id,
                mapping,
            } => {
                info!(
                    "Added {} to blueprint {} at {:?}",
                    mapping.title,
                    blueprint_id,
                    mapping.coords.to_array()
                );
                appended.write(MappingAppended {
                    project_id: project_id.clone(),
                    blueprint_id,
                    mapping,
                });
            }
            SurfaceEvent::Clicked {
                blueprint_id,
                mapping_id,
            } => {
                clicked.write(RegionClicked {
                    blueprint_id,
                    mapping_id,
                });
            }
        }
    }
}
