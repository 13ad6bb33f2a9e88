use bevy::log::warn;
use serde::Deserialize;

use super::{BlueprintRepository, InMemoryBlueprintRepository};
use crate::api::{ApiError, HttpClient};
use crate::blueprint::{Blueprint, ImageSource, Mapping};

/// Image record returned by `GET /v1/projects/{id}/images`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BlueprintImageRead {
    pub id: String,
    pub image_url: String,
}

impl From<BlueprintImageRead> for Blueprint {
    fn from(image: BlueprintImageRead) -> Self {
        Blueprint::new(image.id, ImageSource::Url(image.image_url))
    }
}

/// Lists blueprint images from the service. The service has no notion of
/// blueprint names or mappings, so those stay in the local store.
pub struct RemoteBlueprintRepository {
    http: HttpClient,
    local: InMemoryBlueprintRepository,
}

impl RemoteBlueprintRepository {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            local: InMemoryBlueprintRepository::new(),
        }
    }

    fn images_path(project_id: &str) -> String {
        format!("/v1/projects/{}/images?image_type=blueprint", project_id)
    }
}

impl BlueprintRepository for RemoteBlueprintRepository {
    fn list_blueprints(&self, project_id: &str) -> Result<Vec<Blueprint>, ApiError> {
        match self
            .http
            .get_json::<Vec<BlueprintImageRead>>(&Self::images_path(project_id))
        {
            Ok(images) => {
                let remote = images.into_iter().map(Blueprint::from).collect();
                self.local.merge_remote(project_id, remote)
            }
            Err(e) => {
                warn!(
                    "Failed to fetch blueprints for project {}, using local copies: {}",
                    project_id, e
                );
                self.local.list_blueprints(project_id)
            }
        }
    }

    fn create_blueprint(
        &self,
        project_id: &str,
        image: ImageSource,
    ) -> Result<Blueprint, ApiError> {
        self.local.create_blueprint(project_id, image)
    }

    fn rename_blueprint(
        &self,
        project_id: &str,
        blueprint_id: &str,
        name: &str,
    ) -> Result<String, ApiError> {
        self.local.rename_blueprint(project_id, blueprint_id, name)
    }

    fn delete_blueprint(&self, project_id: &str, blueprint_id: &str) -> Result<(), ApiError> {
        self.local.delete_blueprint(project_id, blueprint_id)
    }

    fn save_mappings(
        &self,
        project_id: &str,
        blueprint_id: &str,
        mappings: &[Mapping],
    ) -> Result<(), ApiError> {
        self.local.save_mappings(project_id, blueprint_id, mappings)
    }
}
