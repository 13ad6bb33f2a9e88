//! Blueprint annotation: drawing rectangular mappings on blueprint images.
//!
//! ## Module Structure
//!
//! - `geometry` - Rectangle normalization and pointer samples
//! - `mapping` - Mapping and blueprint records
//! - `store` - Ordered mapping collection of one blueprint
//! - `interaction` - Drag state machine that commits into a store
//! - `surface` - Layout, tints, pointer routing and painting
//! - `collection` - Blueprints of the open project
//! - `persistence` - Systems syncing the collection with the repository

pub mod collection;
pub mod geometry;
pub mod interaction;
pub mod mapping;
mod persistence;
pub mod store;
pub mod surface;


use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

// Re-exports - Core types
pub use collection::{BlueprintCollection, BlueprintEntry};
pub use geometry::{CanonicalRect, PointerSample};
pub use mapping::{Blueprint, ImageSource, Mapping, Shape, sanitize_name};
pub use store::MappingStore;
pub use surface::{SurfaceRegistry, show_surface};

/// Which face of the app is showing.
///
/// Admin draws and manages mappings. User is read-only and attaches photos
/// to mappings.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Admin,
    User,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Admin => "Admin View",
            ViewMode::User => "User View",
        }
    }
}

// Messages

/// A drag was committed as a new mapping.
#[derive(Message, Debug, Clone)]
pub struct MappingAppended {
    pub project_id: String,
    pub blueprint_id: String,
    pub mapping: Mapping,
}

/// The last mapping of a blueprint was undone.
#[derive(Message, Debug, Clone)]
pub struct MappingRemoved {
    pub project_id: String,
    pub blueprint_id: String,
    pub mapping: Mapping,
}

/// A committed region was clicked (press and release on the same region).
#[derive(Message, Debug, Clone)]
pub struct RegionClicked {
    pub blueprint_id: String,
    pub mapping_id: u32,
}

#[derive(Message)]
pub struct AddBlueprintRequest {
    pub image: ImageSource,
}

#[derive(Message)]
pub struct RenameBlueprintRequest {
    pub blueprint_id: String,
    pub name: String,
}

#[derive(Message)]
pub struct DeleteBlueprintRequest {
    pub blueprint_id: String,
}

#[derive(Message)]
pub struct UndoMappingRequest {
    pub blueprint_id: String,
}

/// Clear last frame's surfaces before the UI pass registers this frame's.
fn clear_surface_registry(mut registry: ResMut<SurfaceRegistry>) {
    registry.clear();
}

/// Pick the starting view from config.
fn init_view_mode(config: Res<crate::config::AppConfig>, mut mode: ResMut<ViewMode>) {
    if config.data.start_in_user_view {
        *mode = ViewMode::User;
    }
}

/// Read-only view never draws.
fn apply_view_mode(mode: Res<ViewMode>, mut collection: ResMut<BlueprintCollection>) {
    if *mode == ViewMode::User {
        collection.stop_all_editing();
    }
}

pub struct BlueprintPlugin;

impl Plugin for BlueprintPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BlueprintCollection>()
            .init_resource::<SurfaceRegistry>()
            .init_resource::<surface::SurfacePointer>()
            .init_resource::<ViewMode>()
            .add_message::<MappingAppended>()
            .add_message::<MappingRemoved>()
            .add_message::<RegionClicked>()
            .add_message::<AddBlueprintRequest>()
            .add_message::<RenameBlueprintRequest>()
            .add_message::<DeleteBlueprintRequest>()
            .add_message::<UndoMappingRequest>()
            .add_systems(
                Update,
                (
                    apply_view_mode.run_if(resource_changed::<ViewMode>),
                    surface::drive_surface_input,
                    persistence::undo_mapping_system.run_if(on_message::<UndoMappingRequest>),
                    persistence::persist_mappings_system
                        .run_if(resource_exists::<crate::collaborators::Collaborators>),
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    persistence::start_blueprint_listing
                        .run_if(on_message::<crate::api::OpenProjectRequest>),
                    persistence::poll_blueprint_listing,
                    persistence::add_blueprint_system.run_if(on_message::<AddBlueprintRequest>),
                    persistence::rename_blueprint_system
                        .run_if(on_message::<RenameBlueprintRequest>),
                    persistence::delete_blueprint_system
                        .run_if(on_message::<DeleteBlueprintRequest>),
                )
                    .run_if(resource_exists::<crate::collaborators::Collaborators>),
            )
            .add_systems(
                Startup,
                init_view_mode.after(crate::config::ConfigLoaded),
            )
            .add_systems(
                EguiPrimaryContextPass,
                clear_surface_registry.before(crate::ui::UiSystems),
            );
    }
}
