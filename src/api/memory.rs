use std::sync::RwLock;

use super::{ApiError, NewProject, Project, ProjectApi};

/// Volatile [`ProjectApi`] used in offline mode and in tests.
#[derive(Default)]
pub struct InMemoryProjectApi {
    projects: RwLock<Vec<Project>>,
}

impl InMemoryProjectApi {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: RwLock::new(projects),
        }
    }

    fn next_id(projects: &[Project]) -> String {
        let max = projects
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

fn poisoned() -> ApiError {
    ApiError::Invalid("project store lock poisoned".to_string())
}

impl ProjectApi for InMemoryProjectApi {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self.projects.read().map_err(|_| poisoned())?.clone())
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>, ApiError> {
        let projects = self.projects.read().map_err(|_| poisoned())?;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    fn create_project(&self, fields: &NewProject) -> Result<Project, ApiError> {
        fields.validate()?;
        let mut projects = self.projects.write().map_err(|_| poisoned())?;
        let project = Project {
            id: Self::next_id(&projects),
            name: fields.name.trim().to_string(),
            address: fields.address.trim().to_string(),
            manager_name: fields.manager_name.trim().to_string(),
            manager_phone: fields.manager_phone.trim().to_string(),
            permits: Vec::new(),
        };
        projects.push(project.clone());
        Ok(project)
    }

    fn update_project(&self, id: &str, fields: &NewProject) -> Result<Project, ApiError> {
        fields.validate()?;
        let mut projects = self.projects.write().map_err(|_| poisoned())?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::Invalid(format!("Project {} does not exist", id)))?;
        project.name = fields.name.trim().to_string();
        project.address = fields.address.trim().to_string();
        project.manager_name = fields.manager_name.trim().to_string();
        project.manager_phone = fields.manager_phone.trim().to_string();
        Ok(project.clone())
    }
}
