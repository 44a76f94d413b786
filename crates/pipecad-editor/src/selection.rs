//! Selected component ids, with assembly auto-expansion.

use pipecad_ir::{ComponentId, ComponentInstance};
use std::collections::BTreeSet;

/// The set of selected component ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ComponentId>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `ids`, replacing the current selection unless `additive`.
    ///
    /// Ids absent from `scene` are ignored. Selecting a part that belongs to
    /// an assembly selects every part sharing its assembly id.
    pub fn select<S: AsRef<str>>(&mut self, ids: &[S], additive: bool, scene: &[ComponentInstance]) {
        if !additive {
            self.ids.clear();
        }
        for id in ids {
            let Some(instance) = scene.iter().find(|c| c.id == id.as_ref()) else {
                continue;
            };
            match &instance.assembly_id {
                Some(assembly) => {
                    let siblings = scene
                        .iter()
                        .filter(|c| c.assembly_id.as_ref() == Some(assembly))
                        .map(|c| c.id.clone());
                    self.ids.extend(siblings);
                }
                None => {
                    self.ids.insert(instance.id.clone());
                }
            }
        }
    }

    /// Replace the selection with exactly `ids`, without expansion.
    pub fn set<I: IntoIterator<Item = ComponentId>>(&mut self, ids: I) {
        self.ids = ids.into_iter().collect();
    }

    /// Drop `ids` from the selection.
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) {
        for id in ids {
            self.ids.remove(id.as_ref());
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.ids.iter()
    }

    /// Selected ids in scene order.
    pub fn ordered_ids(&self, scene: &[ComponentInstance]) -> Vec<ComponentId> {
        scene
            .iter()
            .filter(|c| self.ids.contains(&c.id))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
