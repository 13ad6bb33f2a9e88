//! The external collaborators the app talks to, bundled as one resource.

use bevy::prelude::*;
use std::sync::Arc;

use crate::api::{HttpClient, InMemoryProjectApi, ProjectApi, RemoteProjectApi, sample_projects};
use crate::capture::{FilePickerCapture, PhotoCapture};
use crate::config::{AppConfig, ConfigLoaded};
use crate::repository::{
    BlueprintRepository, InMemoryBlueprintRepository, RemoteBlueprintRepository,
};

/// Handles to every collaborator. Cloning is cheap; background tasks take a
/// clone of the handle they need.
#[derive(Resource, Clone)]
pub struct Collaborators {
    pub projects: Arc<dyn ProjectApi>,
    pub blueprints: Arc<dyn BlueprintRepository>,
    pub capture: Arc<dyn PhotoCapture>,
    pub http: HttpClient,
    /// False when running against the in-memory backends
    pub online: bool,
}

impl Collaborators {
    pub fn remote(base_url: &str) -> Self {
        let http = HttpClient::new(base_url);
        Self {
            projects: Arc::new(RemoteProjectApi::new(http.clone())),
            blueprints: Arc::new(RemoteBlueprintRepository::new(http.clone())),
            capture: Arc::new(FilePickerCapture),
            http,
            online: true,
        }
    }

    /// Sample projects and volatile blueprints, no network except image URLs.
    pub fn offline() -> Self {
        Self {
            projects: Arc::new(InMemoryProjectApi::with_projects(sample_projects())),
            blueprints: Arc::new(InMemoryBlueprintRepository::new()),
            capture: Arc::new(FilePickerCapture),
            http: HttpClient::new(crate::constants::DEFAULT_API_BASE_URL),
            online: false,
        }
    }
}

fn install_collaborators(mut commands: Commands, config: Res<AppConfig>) {
    let collaborators = if config.data.use_remote_api {
        let url = config.data.effective_api_base_url();
        info!("Using project service at {}", url);
        Collaborators::remote(&url)
    } else {
        info!("Remote API disabled, using in-memory data");
        Collaborators::offline()
    };
    commands.insert_resource(collaborators);
}

pub struct CollaboratorsPlugin;

impl Plugin for CollaboratorsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, install_collaborators.after(ConfigLoaded));
    }
}
