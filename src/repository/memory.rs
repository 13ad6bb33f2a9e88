use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::BlueprintRepository;
use crate::api::ApiError;
use crate::blueprint::{Blueprint, ImageSource, Mapping, sanitize_name};

type ProjectBlueprints = HashMap<String, Vec<Blueprint>>;

/// Blueprints keyed by project id, kept for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryBlueprintRepository {
    projects: RwLock<ProjectBlueprints>,
}

impl InMemoryBlueprintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ProjectBlueprints>, ApiError> {
        self.projects
            .read()
            .map_err(|_| ApiError::Invalid("blueprint store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ProjectBlueprints>, ApiError> {
        self.projects
            .write()
            .map_err(|_| ApiError::Invalid("blueprint store lock poisoned".to_string()))
    }

    fn with_blueprint<T>(
        &self,
        project_id: &str,
        blueprint_id: &str,
        f: impl FnOnce(&mut Blueprint) -> T,
    ) -> Result<T, ApiError> {
        let mut projects = self.write()?;
        projects
            .get_mut(project_id)
            .and_then(|list| list.iter_mut().find(|bp| bp.id == blueprint_id))
            .map(f)
            .ok_or_else(|| unknown_blueprint(project_id, blueprint_id))
    }

    /// Fold a freshly listed set of remote blueprints into the local store.
    ///
    /// Blueprints already known keep their local name and mappings. Local-only
    /// blueprints are kept after the remote ones.
    pub fn merge_remote(
        &self,
        project_id: &str,
        remote: Vec<Blueprint>,
    ) -> Result<Vec<Blueprint>, ApiError> {
        let mut projects = self.write()?;
        let local = projects.remove(project_id).unwrap_or_default();

        let mut merged: Vec<Blueprint> = remote
            .into_iter()
            .map(|incoming| {
                local
                    .iter()
                    .find(|known| known.id == incoming.id)
                    .cloned()
                    .unwrap_or(incoming)
            })
            .collect();

        for known in local {
            if !merged.iter().any(|bp| bp.id == known.id) {
                merged.push(known);
            }
        }

        projects.insert(project_id.to_string(), merged.clone());
        Ok(merged)
    }
}

fn unknown_blueprint(project_id: &str, blueprint_id: &str) -> ApiError {
    ApiError::Invalid(format!(
        "Blueprint {} does not exist in project {}",
        blueprint_id, project_id
    ))
}

impl BlueprintRepository for InMemoryBlueprintRepository {
    fn list_blueprints(&self, project_id: &str) -> Result<Vec<Blueprint>, ApiError> {
        Ok(self.read()?.get(project_id).cloned().unwrap_or_default())
    }

    fn create_blueprint(
        &self,
        project_id: &str,
        image: ImageSource,
    ) -> Result<Blueprint, ApiError> {
        let blueprint = Blueprint::new(uuid::Uuid::new_v4().to_string(), image);
        self.write()?
            .entry(project_id.to_string())
            .or_default()
            .push(blueprint.clone());
        Ok(blueprint)
    }

    fn rename_blueprint(
        &self,
        project_id: &str,
        blueprint_id: &str,
        name: &str,
    ) -> Result<String, ApiError> {
        let name = sanitize_name(name);
        self.with_blueprint(project_id, blueprint_id, |bp| {
            bp.name = name.clone();
        })?;
        Ok(name)
    }

    fn delete_blueprint(&self, project_id: &str, blueprint_id: &str) -> Result<(), ApiError> {
        let mut projects = self.write()?;
        let list = projects
            .get_mut(project_id)
            .ok_or_else(|| unknown_blueprint(project_id, blueprint_id))?;
        let before = list.len();
        list.retain(|bp| bp.id != blueprint_id);
        if list.len() == before {
            return Err(unknown_blueprint(project_id, blueprint_id));
        }
        Ok(())
    }

    fn save_mappings(
        &self,
        project_id: &str,
        blueprint_id: &str,
        mappings: &[Mapping],
    ) -> Result<(), ApiError> {
        self.with_blueprint(project_id, blueprint_id, |bp| {
            bp.mappings = mappings.to_vec();
        })
    }
}
