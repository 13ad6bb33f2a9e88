//! Blueprint persistence.
//!
//! Blueprints and their mappings live behind [`BlueprintRepository`]. The
//! app holds one repository handle (see [`Collaborators`](crate::collaborators::Collaborators))
//! and every system reaches it through that handle.
//!
//! ## Module Structure
//!
//! - `memory` - Volatile per-project store
//! - `remote` - Lists blueprint images from the service, keeps names and
//!   mappings in the volatile store

mod memory;
mod remote;

#[cfg(test)]
mod tests;

use crate::api::ApiError;
use crate::blueprint::{Blueprint, ImageSource, Mapping};

pub use memory::InMemoryBlueprintRepository;
pub use remote::RemoteBlueprintRepository;

pub trait BlueprintRepository: Send + Sync {
    fn list_blueprints(&self, project_id: &str) -> Result<Vec<Blueprint>, ApiError>;

    fn create_blueprint(&self, project_id: &str, image: ImageSource)
    -> Result<Blueprint, ApiError>;

    /// Returns the name actually stored (blank names fall back to the default).
    fn rename_blueprint(
        &self,
        project_id: &str,
        blueprint_id: &str,
        name: &str,
    ) -> Result<String, ApiError>;

    fn delete_blueprint(&self, project_id: &str, blueprint_id: &str) -> Result<(), ApiError>;

    fn save_mappings(
        &self,
        project_id: &str,
        blueprint_id: &str,
        mappings: &[Mapping],
    ) -> Result<(), ApiError>;
}
