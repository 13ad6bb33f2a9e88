//! Project and permit collaborators.
//!
//! The remote service owns projects and permits. Everything here is consumed
//! through the [`ProjectApi`] trait so the UI never knows whether it talks to
//! the HTTP backend or the in-memory one.
//!
//! ## Module Structure
//!
//! - `http` - Thin ureq wrapper shared by every remote collaborator
//! - `remote` - [`ProjectApi`] over the HTTP service
//! - `memory` - In-memory [`ProjectApi`] (tests, offline mode)
//! - `samples` - Built-in sample projects used when the service is unreachable
//! - `tasks` - Background tasks and the systems that poll them

mod http;
mod memory;
mod remote;
mod samples;
mod tasks;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpClient;
pub use memory::InMemoryProjectApi;
pub use remote::RemoteProjectApi;
pub use samples::sample_projects;
pub use tasks::{
    ApiTasksPlugin, CreateProjectRequest, CurrentProject, OpenProjectRequest, ProjectSaved,
    ProjectsState, RefreshProjectsRequest, UpdateProjectRequest,
};

/// Failure talking to an external collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// A construction permit attached to a project. Timestamps are kept as the
/// service sends them (ISO 8601 without zone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    pub id: String,
    pub project_id: String,
    pub issued_at: String,
    pub expires_at: String,
    pub image_url: String,
    pub created_at: String,
    pub last_updated: String,
}

/// A project as shown in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub address: String,
    pub manager_name: String,
    pub manager_phone: String,
    pub permits: Vec<Permit>,
}

/// User-entered project fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub address: String,
    pub manager_name: String,
    pub manager_phone: String,
}

impl NewProject {
    /// Every field is required.
    pub fn validate(&self) -> Result<(), ApiError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("address", &self.address),
            ("manager name", &self.manager_name),
            ("manager phone", &self.manager_phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Invalid(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            address: project.address.clone(),
            manager_name: project.manager_name.clone(),
            manager_phone: project.manager_phone.clone(),
        }
    }
}

/// Project lookup and mutation.
pub trait ProjectApi: Send + Sync {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
    /// `Ok(None)` when the project does not exist.
    fn get_project(&self, id: &str) -> Result<Option<Project>, ApiError>;
    fn create_project(&self, fields: &NewProject) -> Result<Project, ApiError>;
    fn update_project(&self, id: &str, fields: &NewProject) -> Result<Project, ApiError>;
}

// Wire format of the project service

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProjectManagerWire {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProjectRead {
    pub id: String,
    pub project_name: String,
    pub location: String,
    pub project_manager: ProjectManagerWire,
    #[serde(default)]
    pub permits: Option<Vec<Permit>>,
}

impl From<ProjectRead> for Project {
    fn from(read: ProjectRead) -> Self {
        Self {
            id: read.id,
            name: read.project_name,
            address: read.location,
            manager_name: read.project_manager.name,
            manager_phone: read.project_manager.phone,
            permits: read.permits.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProjectWrite {
    pub project_name: String,
    pub location: String,
    pub project_manager: ProjectManagerWire,
}

impl From<&NewProject> for ProjectWrite {
    fn from(fields: &NewProject) -> Self {
        Self {
            project_name: fields.name.trim().to_string(),
            location: fields.address.trim().to_string(),
            project_manager: ProjectManagerWire {
                name: fields.manager_name.trim().to_string(),
                phone: fields.manager_phone.trim().to_string(),
                email: None,
            },
        }
    }
}
