//! Ordered mapping collection for a single blueprint.

use bevy::log::warn;
use bevy::math::Vec2;

use super::geometry::CanonicalRect;
use super::mapping::Mapping;

/// Append-ordered mappings owned by one blueprint.
///
/// Insertion order is creation order is display order. The only deletion
/// primitive is [`MappingStore::undo`], which removes the tail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingStore {
    mappings: Vec<Mapping>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mappings(mappings: Vec<Mapping>) -> Self {
        let mut store = Self::new();
        store.replace(mappings);
        store
    }

    /// Append a new rectangle and return the stored mapping.
    pub fn append(&mut self, coords: CanonicalRect) -> Mapping {
        let mapping = Mapping::new(self.next_id(), coords);
        self.mappings.push(mapping.clone());
        mapping
    }

    /// Remove the most recently appended mapping.
    ///
    /// Returns `false` (and does nothing) when the store is empty.
    pub fn undo(&mut self) -> bool {
        self.pop().is_some()
    }

    /// Like [`MappingStore::undo`] but hands back the removed mapping.
    pub fn pop(&mut self) -> Option<Mapping> {
        self.mappings.pop()
    }

    /// Wholesale replacement, used when syncing with a repository.
    pub fn replace(&mut self, mappings: Vec<Mapping>) {
        self.mappings = mappings;
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.id == id)
    }

    /// Topmost mapping under `point` (image coordinates). Later mappings are
    /// drawn above earlier ones, so the search runs back to front.
    pub fn hit_test(&self, point: Vec2) -> Option<&Mapping> {
        self.mappings.iter().rev().find(|m| m.coords.contains(point))
    }

    /// Highest id in use plus one. Equal to `len + 1` whenever mappings were
    /// only appended and undone, and never reuses an id after a `replace`
    /// that left gaps. Past `u32::MAX` the lowest free id is used instead.
    fn next_id(&self) -> u32 {
        let highest = self.mappings.iter().map(|m| m.id).max().unwrap_or(0);
        highest.checked_add(1).unwrap_or_else(|| {
            warn!("Mapping ids exhausted, reusing the lowest free id");
            (1..=u32::MAX)
                .find(|id| self.get(*id).is_none())
                .unwrap_or(u32::MAX)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> CanonicalRect {
        CanonicalRect::from_coords([x1, y1, x2, y2])
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut store = MappingStore::new();
        for _ in 0..5 {
            store.append(rect(0.0, 0.0, 1.0, 1.0));
        }
        let ids: Vec<u32> = store.mappings().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.mappings()[2].title, "Mapping 3");
    }

    #[test]
    fn test_append_then_undo_restores_previous_state() {
        let mut store = MappingStore::new();
        store.append(rect(0.0, 0.0, 10.0, 10.0));
        store.append(rect(5.0, 5.0, 20.0, 20.0));
        let before = store.clone();

        store.append(rect(1.0, 1.0, 2.0, 2.0));
        assert!(store.undo());

        assert_eq!(store, before);
    }

    #[test]
    fn test_undo_on_empty_store() {
        let mut store = MappingStore::new();
        assert!(!store.undo());
        assert!(store.is_empty());
    }

    #[test]
    fn test_id_reused_after_tail_undo() {
        let mut store = MappingStore::new();
        store.append(rect(0.0, 0.0, 1.0, 1.0));
        store.append(rect(0.0, 0.0, 1.0, 1.0));
        store.undo();
        let mapping = store.append(rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(mapping.id, 2);
    }

    #[test]
    fn test_replace_with_gap_does_not_collide() {
        let mut store = MappingStore::new();
        store.replace(vec![
            Mapping::new(1, rect(0.0, 0.0, 1.0, 1.0)),
            Mapping::new(3, rect(0.0, 0.0, 1.0, 1.0)),
        ]);
        let mapping = store.append(rect(2.0, 2.0, 3.0, 3.0));
        assert_eq!(mapping.id, 4);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_next_id_after_max_id_does_not_overflow() {
        let mut store = MappingStore::new();
        store.replace(vec![
            Mapping::new(1, rect(0.0, 0.0, 1.0, 1.0)),
            Mapping::new(u32::MAX, rect(0.0, 0.0, 1.0, 1.0)),
        ]);

        let mapping = store.append(rect(2.0, 2.0, 3.0, 3.0));

        assert_eq!(mapping.id, 2);
        assert_eq!(mapping.title, "Mapping 2");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut store = MappingStore::new();
        store.append(rect(0.0, 0.0, 100.0, 100.0));
        store.append(rect(40.0, 40.0, 60.0, 60.0));

        assert_eq!(store.hit_test(Vec2::new(50.0, 50.0)).map(|m| m.id), Some(2));
        assert_eq!(store.hit_test(Vec2::new(10.0, 10.0)).map(|m| m.id), Some(1));
        assert!(store.hit_test(Vec2::new(150.0, 10.0)).is_none());
    }

    #[test]
    fn test_get_by_id() {
        let mut store = MappingStore::new();
        store.append(rect(0.0, 0.0, 1.0, 1.0));
        assert!(store.get(1).is_some());
        assert!(store.get(2).is_none());
    }
}
