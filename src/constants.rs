//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1400.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Width of the coordinate space mappings are stored in. A blueprint is laid
/// out at this width regardless of its pixel size.
pub const REFERENCE_WIDTH: f32 = 800.0;

/// Default on-screen width of a blueprint surface in logical pixels
pub const DEFAULT_DISPLAY_WIDTH: f32 = 800.0;

/// Bounds for the configurable display width
pub const MIN_DISPLAY_WIDTH: f32 = 400.0;
pub const MAX_DISPLAY_WIDTH: f32 = 1600.0;

/// Name given to blueprints that have none (and to blank renames)
pub const DEFAULT_BLUEPRINT_NAME: &str = "Unnamed Blueprint";

/// Default project service address
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the configured service address
pub const API_URL_ENV: &str = "SITEMARK_API_URL";

/// Timeout applied to every HTTP request
pub const HTTP_TIMEOUT_SECS: u64 = 15;

/// Upper bound on a single downloaded image
pub const MAX_IMAGE_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Region outline width in logical pixels
pub const REGION_STROKE_WIDTH: f32 = 2.0;

/// Dash and gap lengths of the drag preview outline
pub const PREVIEW_DASH_LENGTH: f32 = 6.0;
pub const PREVIEW_GAP_LENGTH: f32 = 4.0;

/// Seconds a toast stays on screen
pub const TOAST_DURATION_SECS: f32 = 2.5;
