//! Blueprints of the open project, each with its own store and drag state.

use bevy::prelude::*;

use super::geometry::PointerSample;
use super::interaction::DrawInteraction;
use super::mapping::{Blueprint, ImageSource, Mapping, sanitize_name};
use super::store::MappingStore;

/// One blueprint surface.
#[derive(Debug, Clone)]
pub struct BlueprintEntry {
    pub id: String,
    pub name: String,
    pub image: ImageSource,
    pub store: MappingStore,
    pub interaction: DrawInteraction,
    /// Mapping currently under the pointer.
    pub hovered: Option<u32>,
    /// Name being edited, `None` when not renaming.
    pub name_draft: Option<String>,
}

impl BlueprintEntry {
    pub fn new(blueprint: Blueprint) -> Self {
        Self {
            id: blueprint.id,
            name: sanitize_name(&blueprint.name),
            image: blueprint.image,
            store: MappingStore::from_mappings(blueprint.mappings),
            interaction: DrawInteraction::default(),
            hovered: None,
            name_draft: None,
        }
    }

    /// Snapshot as a plain record.
    pub fn to_blueprint(&self) -> Blueprint {
        Blueprint {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            mappings: self.store.mappings().to_vec(),
        }
    }
}

/// Blueprint collection for the currently open project.
#[derive(Resource, Default, Debug)]
pub struct BlueprintCollection {
    project_id: Option<String>,
    entries: Vec<BlueprintEntry>,
    pub loading: bool,
    pub load_error: Option<String>,
}

impl BlueprintCollection {
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn is_current(&self, project_id: &str) -> bool {
        self.project_id.as_deref() == Some(project_id)
    }

    /// Switch to another project and wait for its blueprints.
    pub fn open_project(&mut self, project_id: &str) {
        self.project_id = Some(project_id.to_string());
        self.entries.clear();
        self.loading = true;
        self.load_error = None;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Install a listing. Listings for any project other than the open one
    /// are stale and dropped; returns whether the listing was applied.
    pub fn load(&mut self, project_id: &str, blueprints: Vec<Blueprint>) -> bool {
        if !self.is_current(project_id) {
            return false;
        }
        self.entries = blueprints.into_iter().map(BlueprintEntry::new).collect();
        self.loading = false;
        true
    }

    /// Record a failed listing for the open project.
    pub fn load_failed(&mut self, project_id: &str, message: String) -> bool {
        if !self.is_current(project_id) {
            return false;
        }
        self.loading = false;
        self.load_error = Some(message);
        true
    }

    pub fn add(&mut self, blueprint: Blueprint) {
        self.entries.push(BlueprintEntry::new(blueprint));
    }

    /// Returns the stored name, or `None` if the blueprint is unknown.
    pub fn rename(&mut self, id: &str, name: &str) -> Option<String> {
        let entry = self.entry_mut(id)?;
        entry.name = sanitize_name(name);
        entry.name_draft = None;
        Some(entry.name.clone())
    }

    pub fn remove(&mut self, id: &str) -> Option<BlueprintEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn set_editing(&mut self, id: &str, editing: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.interaction.set_editing(editing);
        }
    }

    /// Leave edit mode on every surface (switching to the read-only view).
    pub fn stop_all_editing(&mut self) {
        for entry in &mut self.entries {
            entry.interaction.set_editing(false);
        }
    }

    /// Remove the last mapping of a blueprint, returning it.
    pub fn undo(&mut self, id: &str) -> Option<Mapping> {
        self.entry_mut(id)?.store.pop()
    }

    pub fn begin_drag(&mut self, id: &str, sample: PointerSample) {
        if let Some(entry) = self.entry_mut(id) {
            entry.interaction.begin(sample);
        }
    }

    /// Finish the drag on `id`, committing it if large enough.
    pub fn commit_drag(&mut self, id: &str, min_area: f32) -> Option<Mapping> {
        let entry = self.entry_mut(id)?;
        entry.interaction.end(&mut entry.store, min_area)
    }

    /// The surface with a drag in progress, if any.
    pub fn dragging_id(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.interaction.is_dragging())
            .map(|e| e.id.as_str())
    }

    pub fn entries(&self) -> &[BlueprintEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut BlueprintEntry> {
        self.entries.iter_mut()
    }

    pub fn entry(&self, id: &str) -> Option<&BlueprintEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entry_mut(&mut self, id: &str) -> Option<&mut BlueprintEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
