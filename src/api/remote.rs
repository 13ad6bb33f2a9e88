use bevy::log::warn;

use super::{
    ApiError, HttpClient, NewProject, Project, ProjectApi, ProjectRead, ProjectWrite,
    sample_projects,
};

const PROJECTS_ENDPOINT: &str = "/v1/projects/";

/// [`ProjectApi`] backed by the project service.
pub struct RemoteProjectApi {
    http: HttpClient,
}

impl RemoteProjectApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn project_path(id: &str) -> String {
        format!("{}{}/", PROJECTS_ENDPOINT, id)
    }
}

impl ProjectApi for RemoteProjectApi {
    /// Falls back to the built-in samples when the service is unreachable so
    /// the app stays usable offline.
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        match self.http.get_json::<Vec<ProjectRead>>(PROJECTS_ENDPOINT) {
            Ok(projects) => Ok(projects.into_iter().map(Project::from).collect()),
            Err(e) => {
                warn!("Failed to fetch projects, showing samples: {}", e);
                Ok(sample_projects())
            }
        }
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>, ApiError> {
        match self.http.get_json::<ProjectRead>(&Self::project_path(id)) {
            Ok(project) => Ok(Some(project.into())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create_project(&self, fields: &NewProject) -> Result<Project, ApiError> {
        fields.validate()?;
        let body = ProjectWrite::from(fields);
        let created: ProjectRead = self.http.post_json(PROJECTS_ENDPOINT, &body)?;
        Ok(created.into())
    }

    fn update_project(&self, id: &str, fields: &NewProject) -> Result<Project, ApiError> {
        fields.validate()?;
        let body = ProjectWrite::from(fields);
        let updated: ProjectRead = self.http.put_json(&Self::project_path(id), &body)?;
        Ok(updated.into())
    }
}
