use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    API_URL_ENV, DEFAULT_API_BASE_URL, DEFAULT_DISPLAY_WIDTH, MAX_DISPLAY_WIDTH,
    MIN_DISPLAY_WIDTH,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_display_width() -> f32 {
    DEFAULT_DISPLAY_WIDTH
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Base URL of the project service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Talk to the project service; when false everything stays in memory
    #[serde(default = "default_true")]
    pub use_remote_api: bool,

    /// On-screen width of blueprint surfaces in logical pixels
    #[serde(default = "default_display_width")]
    pub display_width: f32,

    /// Drags enclosing less area than this (reference pixels squared) are
    /// discarded instead of becoming mappings. 0 accepts point mappings.
    #[serde(default)]
    pub min_mapping_area: f32,

    /// Open in the read-only photo view instead of the admin view
    #[serde(default)]
    pub start_in_user_view: bool,

    /// Last opened project, reopened on startup
    #[serde(default)]
    pub last_project_id: Option<String>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            use_remote_api: true,
            display_width: DEFAULT_DISPLAY_WIDTH,
            min_mapping_area: 0.0,
            start_in_user_view: false,
            last_project_id: None,
        }
    }
}

impl AppConfigData {
    /// Service URL, honoring the environment override.
    pub fn effective_api_base_url(&self) -> String {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.api_base_url.clone(),
        }
    }

    pub fn display_width(&self) -> f32 {
        if self.display_width.is_finite() {
            self.display_width.clamp(MIN_DISPLAY_WIDTH, MAX_DISPLAY_WIDTH)
        } else {
            DEFAULT_DISPLAY_WIDTH
        }
    }

    pub fn min_mapping_area(&self) -> f32 {
        if self.min_mapping_area.is_finite() {
            self.min_mapping_area.max(0.0)
        } else {
            0.0
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to remember (or forget) the last opened project
#[derive(Message)]
pub struct UpdateLastProjectRequest {
    pub project_id: Option<String>,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from `path`
fn load_config(path: &Path) -> LoadConfigResult {
    if !path.exists() {
        info!("No config file found, using defaults");
        return LoadConfigResult {
            data: AppConfigData::default(),
            reset_reason: None,
        };
    }

    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", path);
                LoadConfigResult {
                    data,
                    reset_reason: None,
                }
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                LoadConfigResult {
                    data: AppConfigData::default(),
                    reset_reason: Some(format!("Configuration file was corrupted: {}", e)),
                }
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            LoadConfigResult {
                data: AppConfigData::default(),
                reset_reason: Some(format!("Could not read configuration file: {}", e)),
            }
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&config.data)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&config.config_path, json)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    info!("Config saved to {:?}", config.config_path);
    Ok(())
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;
    config.dirty = false;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(mut events: MessageReader<SaveConfigRequest>, mut config: ResMut<AppConfig>) {
    // Several requests in one frame still mean a single write
    if events.read().count() > 0 && config.dirty {
        if let Err(e) = save_config(&config) {
            error!("{}", e);
        }
        config.dirty = false;
    }
}

/// System to update the last opened project
fn update_last_project_system(
    mut events: MessageReader<UpdateLastProjectRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.last_project_id != event.project_id {
            config.data.last_project_id = event.project_id.clone();
            config.dirty = true;
            save_events.write(SaveConfigRequest);
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastProjectRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    update_last_project_system.run_if(on_message::<UpdateLastProjectRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.api_base_url, "http://127.0.0.1:8000");
        assert!(data.use_remote_api);
        assert_eq!(data.display_width, 800.0);
        assert_eq!(data.min_mapping_area, 0.0);
        assert!(data.last_project_id.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let data: AppConfigData = serde_json::from_str(r#"{"last_project_id":"3"}"#).unwrap();
        assert_eq!(data.last_project_id.as_deref(), Some("3"));
        assert_eq!(data.api_base_url, "http://127.0.0.1:8000");
        assert!(data.use_remote_api);
        assert_eq!(data.display_width, 800.0);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            api_base_url: "https://api.example.com".to_string(),
            use_remote_api: false,
            display_width: 1024.0,
            min_mapping_area: 16.0,
            start_in_user_view: true,
            last_project_id: Some("42".to_string()),
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_display_width_clamped() {
        let mut data = AppConfigData {
            display_width: 10.0,
            ..Default::default()
        };
        assert_eq!(data.display_width(), 400.0);
        data.display_width = f32::NAN;
        assert_eq!(data.display_width(), 800.0);
        data.display_width = 5000.0;
        assert_eq!(data.display_width(), 1600.0);
    }

    #[test]
    fn test_negative_min_area_treated_as_zero() {
        let data = AppConfigData {
            min_mapping_area: -3.0,
            ..Default::default()
        };
        assert_eq!(data.min_mapping_area(), 0.0);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("config.json"));
        assert_eq!(result.data, AppConfigData::default());
        assert!(result.reset_reason.is_none());
    }

    #[test]
    fn test_load_config_corrupt_file_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = load_config(&path);
        assert_eq!(result.data, AppConfigData::default());
        assert!(
            result
                .reset_reason
                .unwrap()
                .starts_with("Configuration file was corrupted")
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data: AppConfigData {
                last_project_id: Some("7".to_string()),
                ..Default::default()
            },
            config_path: dir.path().join("config.json"),
            dirty: true,
        };

        save_config(&config).unwrap();
        let result = load_config(&config.config_path);
        assert_eq!(result.data, config.data);
    }
}
