//! Keeps the blueprint collection and the repository in step.

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;
use std::collections::BTreeSet;

use super::collection::BlueprintCollection;
use super::mapping::Blueprint;
use super::{
    AddBlueprintRequest, DeleteBlueprintRequest, MappingAppended, MappingRemoved,
    RenameBlueprintRequest, UndoMappingRequest,
};
use crate::api::{ApiError, OpenProjectRequest};
use crate::capture::PhotoAssociations;
use crate::collaborators::Collaborators;
use crate::images::ReleaseImages;

/// Blueprint listing for one project.
#[derive(Component)]
pub struct ListBlueprintsTask {
    project_id: String,
    task: Task<Result<Vec<Blueprint>, ApiError>>,
}

pub fn start_blueprint_listing(
    mut commands: Commands,
    mut events: MessageReader<OpenProjectRequest>,
    mut collection: ResMut<BlueprintCollection>,
    mut photos: ResMut<PhotoAssociations>,
    mut release: MessageWriter<ReleaseImages>,
    collaborators: Res<Collaborators>,
) {
    let Some(request) = events.read().last().cloned() else {
        return;
    };

    photos.clear();
    if collection.project_id() != request.project_id.as_deref() {
        release.write(ReleaseImages::All);
    }
    let Some(project_id) = request.project_id else {
        collection.close();
        return;
    };

    collection.open_project(&project_id);
    let repository = collaborators.blueprints.clone();
    let task_project = project_id.clone();
    let task = IoTaskPool::get().spawn(async move { repository.list_blueprints(&task_project) });
    commands.spawn(ListBlueprintsTask { project_id, task });
}

pub fn poll_blueprint_listing(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ListBlueprintsTask)>,
    mut collection: ResMut<BlueprintCollection>,
) {
    for (entity, mut listing) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut listing.task)) else {
            continue;
        };

        let applied = match result {
            Ok(blueprints) => {
                let count = blueprints.len();
                let applied = collection.load(&listing.project_id, blueprints);
                if applied {
                    info!(
                        "Loaded {} blueprint(s) for project {}",
                        count, listing.project_id
                    );
                }
                applied
            }
            Err(e) => {
                error!(
                    "Failed to load blueprints for project {}: {}",
                    listing.project_id, e
                );
                collection.load_failed(&listing.project_id, "Failed to load blueprints".to_string())
            }
        };
        if !applied {
            debug!(
                "Discarding stale blueprint listing for project {}",
                listing.project_id
            );
        }

        commands.entity(entity).despawn();
    }
}

pub fn add_blueprint_system(
    mut events: MessageReader<AddBlueprintRequest>,
    mut collection: ResMut<BlueprintCollection>,
    collaborators: Res<Collaborators>,
) {
    for event in events.read() {
        let Some(project_id) = collection.project_id().map(str::to_string) else {
            warn!("Add blueprint requested with no open project");
            continue;
        };
        match collaborators
            .blueprints
            .create_blueprint(&project_id, event.image.clone())
        {
            Ok(blueprint) => {
                info!("Added blueprint {} to project {}", blueprint.id, project_id);
                collection.add(blueprint);
            }
            Err(e) => error!("Failed to add blueprint: {}", e),
        }
    }
}

pub fn rename_blueprint_system(
    mut events: MessageReader<RenameBlueprintRequest>,
    mut collection: ResMut<BlueprintCollection>,
    collaborators: Res<Collaborators>,
) {
    for event in events.read() {
        let Some(project_id) = collection.project_id().map(str::to_string) else {
            continue;
        };
        let name = match collaborators.blueprints.rename_blueprint(
            &project_id,
            &event.blueprint_id,
            &event.name,
        ) {
            Ok(stored) => stored,
            Err(e) => {
                // Keep the local name in step even if the repository refused
                warn!("Failed to persist blueprint name: {}", e);
                event.name.clone()
            }
        };
        collection.rename(&event.blueprint_id, &name);
    }
}

pub fn delete_blueprint_system(
    mut events: MessageReader<DeleteBlueprintRequest>,
    mut collection: ResMut<BlueprintCollection>,
    mut photos: ResMut<PhotoAssociations>,
    mut release: MessageWriter<ReleaseImages>,
    collaborators: Res<Collaborators>,
) {
    for event in events.read() {
        let Some(project_id) = collection.project_id().map(str::to_string) else {
            continue;
        };
        if let Err(e) = collaborators
            .blueprints
            .delete_blueprint(&project_id, &event.blueprint_id)
        {
            warn!("Failed to delete blueprint {}: {}", event.blueprint_id, e);
        }
        if let Some(entry) = collection.remove(&event.blueprint_id) {
            info!("Deleted blueprint {}", event.blueprint_id);
            release.write(ReleaseImages::One(entry.image));
        }
        photos.remove_blueprint(&event.blueprint_id);
    }
}

pub fn undo_mapping_system(
    mut events: MessageReader<UndoMappingRequest>,
    mut collection: ResMut<BlueprintCollection>,
    mut removed: MessageWriter<MappingRemoved>,
) {
    let Some(project_id) = collection.project_id().map(str::to_string) else {
        return;
    };
    for event in events.read() {
        if let Some(mapping) = collection.undo(&event.blueprint_id) {
            info!("Undid {} on blueprint {}", mapping.title, event.blueprint_id);
            removed.write(MappingRemoved {
                project_id: project_id.clone(),
                blueprint_id: event.blueprint_id.clone(),
                mapping,
            });
        }
    }
}

/// Push the mapping snapshot of every blueprint changed this frame.
pub fn persist_mappings_system(
    mut appended: MessageReader<MappingAppended>,
    mut removed: MessageReader<MappingRemoved>,
    collection: Res<BlueprintCollection>,
    mut photos: ResMut<PhotoAssociations>,
    collaborators: Res<Collaborators>,
) {
    let mut changed: BTreeSet<(String, String)> = BTreeSet::new();

    for event in appended.read() {
        changed.insert((event.project_id.clone(), event.blueprint_id.clone()));
    }
    for event in removed.read() {
        // A later mapping may reuse this id
        photos.remove(&event.blueprint_id, event.mapping.id);
        changed.insert((event.project_id.clone(), event.blueprint_id.clone()));
    }

    for (project_id, blueprint_id) in changed {
        if !collection.is_current(&project_id) {
            continue;
        }
        let Some(entry) = collection.entry(&blueprint_id) else {
            continue;
        };
        if let Err(e) = collaborators.blueprints.save_mappings(
            &project_id,
            &blueprint_id,
            entry.store.mappings(),
        ) {
            error!("Failed to save mappings for blueprint {}: {}", blueprint_id, e);
        }
    }
}
