//! Background project requests and the state the UI renders from.

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use super::{ApiError, NewProject, Project};
use crate::collaborators::Collaborators;
use crate::config::{AppConfig, UpdateLastProjectRequest};

/// The project shown in the detail view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CurrentProject {
    #[default]
    None,
    Loading {
        id: String,
    },
    Loaded(Project),
    NotFound {
        id: String,
    },
    Failed {
        id: String,
        message: String,
    },
}

impl CurrentProject {
    pub fn id(&self) -> Option<&str> {
        match self {
            CurrentProject::None => None,
            CurrentProject::Loading { id }
            | CurrentProject::NotFound { id }
            | CurrentProject::Failed { id, .. } => Some(id),
            CurrentProject::Loaded(project) => Some(&project.id),
        }
    }
}

#[derive(Resource, Default)]
pub struct ProjectsState {
    pub projects: Vec<Project>,
    pub list_loading: bool,
    pub list_error: Option<String>,
    pub current: CurrentProject,
    /// A create/update request is in flight
    pub saving: bool,
    pub save_error: Option<String>,
}

impl ProjectsState {
    fn upsert(&mut self, project: &Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => self.projects.push(project.clone()),
        }
        if self.current.id() == Some(project.id.as_str()) {
            self.current = CurrentProject::Loaded(project.clone());
        }
    }
}

#[derive(Message)]
pub struct RefreshProjectsRequest;

/// Open a project in the detail view (`None` goes back to the list).
#[derive(Message, Clone)]
pub struct OpenProjectRequest {
    pub project_id: Option<String>,
}

#[derive(Message)]
pub struct CreateProjectRequest {
    pub fields: NewProject,
}

#[derive(Message)]
pub struct UpdateProjectRequest {
    pub project_id: String,
    pub fields: NewProject,
}

/// Written when a create or update succeeds, so open forms can close.
#[derive(Message)]
pub struct ProjectSaved {
    pub project: Project,
}

#[derive(Component)]
pub struct ListProjectsTask(Task<Result<Vec<Project>, ApiError>>);

#[derive(Component)]
pub struct GetProjectTask {
    project_id: String,
    task: Task<Result<Option<Project>, ApiError>>,
}

#[derive(Component)]
pub struct SaveProjectTask(Task<Result<Project, ApiError>>);

fn request_initial_data(
    config: Res<AppConfig>,
    mut refresh: MessageWriter<RefreshProjectsRequest>,
    mut open: MessageWriter<OpenProjectRequest>,
) {
    refresh.write(RefreshProjectsRequest);
    if let Some(ref id) = config.data.last_project_id {
        info!("Reopening last project {}", id);
        open.write(OpenProjectRequest {
            project_id: Some(id.clone()),
        });
    }
}

fn start_list_projects(
    mut commands: Commands,
    mut events: MessageReader<RefreshProjectsRequest>,
    mut state: ResMut<ProjectsState>,
    collaborators: Res<Collaborators>,
) {
    if events.read().count() == 0 || state.list_loading {
        return;
    }
    state.list_loading = true;
    state.list_error = None;

    let projects = collaborators.projects.clone();
    let task = IoTaskPool::get().spawn(async move { projects.list_projects() });
    commands.spawn(ListProjectsTask(task));
}

fn start_get_project(
    mut commands: Commands,
    mut events: MessageReader<OpenProjectRequest>,
    mut state: ResMut<ProjectsState>,
    collaborators: Res<Collaborators>,
    mut last_project: MessageWriter<UpdateLastProjectRequest>,
) {
    // Only the newest request matters
    let Some(request) = events.read().last().cloned() else {
        return;
    };

    last_project.write(UpdateLastProjectRequest {
        project_id: request.project_id.clone(),
    });

    let Some(id) = request.project_id else {
        state.current = CurrentProject::None;
        return;
    };

    state.current = CurrentProject::Loading { id: id.clone() };
    let projects = collaborators.projects.clone();
    let task_id = id.clone();
    let task = IoTaskPool::get().spawn(async move { projects.get_project(&task_id) });
    commands.spawn(GetProjectTask {
        project_id: id,
        task,
    });
}

fn start_save_project(
    mut commands: Commands,
    mut creates: MessageReader<CreateProjectRequest>,
    mut updates: MessageReader<UpdateProjectRequest>,
    mut state: ResMut<ProjectsState>,
    collaborators: Res<Collaborators>,
) {
    let pool = IoTaskPool::get();

    for request in creates.read() {
        state.saving = true;
        state.save_error = None;
        let projects = collaborators.projects.clone();
        let fields = request.fields.clone();
        let task = pool.spawn(async move { projects.create_project(&fields) });
        commands.spawn(SaveProjectTask(task));
    }

    for request in updates.read() {
        state.saving = true;
        state.save_error = None;
        let projects = collaborators.projects.clone();
        let fields = request.fields.clone();
        let id = request.project_id.clone();
        let task = pool.spawn(async move { projects.update_project(&id, &fields) });
        commands.spawn(SaveProjectTask(task));
    }
}

fn poll_list_projects(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ListProjectsTask)>,
    mut state: ResMut<ProjectsState>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            state.list_loading = false;
            match result {
                Ok(projects) => {
                    info!("Loaded {} project(s)", projects.len());
                    state.projects = projects;
                }
                Err(e) => {
                    error!("Failed to load projects: {}", e);
                    state.list_error = Some("Failed to load projects".to_string());
                }
            }
            commands.entity(entity).despawn();
        }
    }
}

/// Apply a finished lookup unless the user has since opened something else.
pub(crate) fn apply_project_lookup(
    current: &mut CurrentProject,
    project_id: &str,
    result: Result<Option<Project>, ApiError>,
) -> bool {
    if !matches!(&*current, CurrentProject::Loading { id } if id.as_str() == project_id) {
        return false;
    }
    *current = match result {
        Ok(Some(project)) => CurrentProject::Loaded(project),
        Ok(None) => CurrentProject::NotFound {
            id: project_id.to_string(),
        },
        Err(e) => CurrentProject::Failed {
            id: project_id.to_string(),
            message: e.to_string(),
        },
    };
    true
}

fn poll_get_project(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut GetProjectTask)>,
    mut state: ResMut<ProjectsState>,
) {
    for (entity, mut lookup) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut lookup.task)) {
            if let Err(ref e) = result {
                warn!("Failed to load project {}: {}", lookup.project_id, e);
            }
            if !apply_project_lookup(&mut state.current, &lookup.project_id, result) {
                debug!("Discarding stale lookup for project {}", lookup.project_id);
            }
            commands.entity(entity).despawn();
        }
    }
}

fn poll_save_project(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveProjectTask)>,
    mut state: ResMut<ProjectsState>,
    mut saved: MessageWriter<ProjectSaved>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.0)) {
            state.saving = false;
            match result {
                Ok(project) => {
                    info!("Saved project {} ({})", project.name, project.id);
                    state.upsert(&project);
                    saved.write(ProjectSaved { project });
                }
                Err(e) => {
                    error!("Failed to save project: {}", e);
                    state.save_error = Some(match e {
                        ApiError::Invalid(message) => message,
                        _ => "Failed to save project".to_string(),
                    });
                }
            }
            commands.entity(entity).despawn();
        }
    }
}

pub struct ApiTasksPlugin;

impl Plugin for ApiTasksPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProjectsState>()
            .add_message::<RefreshProjectsRequest>()
            .add_message::<OpenProjectRequest>()
            .add_message::<CreateProjectRequest>()
            .add_message::<UpdateProjectRequest>()
            .add_message::<ProjectSaved>()
            .add_systems(PostStartup, request_initial_data)
            .add_systems(
                Update,
                (
                    start_list_projects.run_if(on_message::<RefreshProjectsRequest>),
                    start_get_project.run_if(on_message::<OpenProjectRequest>),
                    start_save_project,
                    poll_list_projects,
                    poll_get_project,
                    poll_save_project,
                )
                    .run_if(resource_exists::<Collaborators>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::sample_projects;

    #[test]
    fn test_lookup_applies_to_matching_request() {
        let mut current = CurrentProject::Loading {
            id: "1".to_string(),
        };
        let project = sample_projects().remove(0);

        assert!(apply_project_lookup(&mut current, "1", Ok(Some(project.clone()))));
        assert_eq!(current, CurrentProject::Loaded(project));
    }

    #[test]
    fn test_stale_lookup_is_discarded() {
        let mut current = CurrentProject::Loading {
            id: "2".to_string(),
        };
        let project = sample_projects().remove(0);

        assert!(!apply_project_lookup(&mut current, "1", Ok(Some(project))));
        assert_eq!(current.id(), Some("2"));
    }

    #[test]
    fn test_missing_project_is_not_found() {
        let mut current = CurrentProject::Loading {
            id: "9".to_string(),
        };
        apply_project_lookup(&mut current, "9", Ok(None));
        assert_eq!(
            current,
            CurrentProject::NotFound {
                id: "9".to_string()
            }
        );
    }

    #[test]
    fn test_upsert_refreshes_current() {
        let mut state = ProjectsState {
            projects: sample_projects(),
            current: CurrentProject::Loaded(sample_projects().remove(1)),
            ..Default::default()
        };
        let mut renamed = sample_projects().remove(1);
        renamed.name = "Riverside Mall Phase 2".to_string();

        state.upsert(&renamed);

        assert_eq!(state.projects.len(), 5);
        assert_eq!(state.projects[1].name, "Riverside Mall Phase 2");
        assert_eq!(state.current, CurrentProject::Loaded(renamed));
    }
}
