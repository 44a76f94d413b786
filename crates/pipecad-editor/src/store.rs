//! The scene store: sole owner of the scene and everything that mutates it.
//!
//! Every mutation goes through a `SceneStore` method, which applies the
//! change and then commits a history snapshot of the resulting scene. A
//! [`SceneStore::batch`] scope folds several mutations into one snapshot.

use pipecad_ir::{
    new_component_id, ComponentId, ComponentInstance, ComponentType, Properties, SavedDesign,
    Template, TemplateShape, Vec3,
};
use pipecad_math::{Pose, Ray};
use pipecad_snap::{compute_snap_proposal, Placing, SnapProposal, ViewMode};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info};

use crate::archive::{ArchiveEntry, DesignArchive};
use crate::assembly::{capture_template, instantiate_template};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::history::History;
use crate::library::PartLibrary;
use crate::selection::Selection;

/// Name given to a fresh, unsaved design.
pub const UNTITLED_DESIGN: &str = "Untitled";

/// Authoritative editor state.
#[derive(Debug)]
pub struct SceneStore {
    config: EditorConfig,
    design_name: String,
    components: Vec<ComponentInstance>,
    selection: Selection,
    placing: Option<Placing>,
    history: History,
    archive: DesignArchive,
    library: PartLibrary,
    clipboard: Vec<ComponentInstance>,
    last_placement: Option<Instant>,
    batch_depth: usize,
    batch_dirty: bool,
}

impl SceneStore {
    /// Empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Empty store with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            design_name: UNTITLED_DESIGN.to_string(),
            components: Vec::new(),
            selection: Selection::new(),
            placing: None,
            history: History::new(),
            archive: DesignArchive::new(),
            library: PartLibrary::new(),
            clipboard: Vec::new(),
            last_placement: None,
            batch_depth: 0,
            batch_dirty: false,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // -- reads --

    /// The live scene, in insertion order.
    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    /// An owned point-in-time copy of the scene.
    pub fn snapshot(&self) -> Vec<ComponentInstance> {
        self.components.clone()
    }

    /// Look up an instance by id.
    pub fn get(&self, id: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current design name.
    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    /// Saved templates.
    pub fn library(&self) -> &PartLibrary {
        &self.library
    }

    /// Display tag of an instance, e.g. `"valve #2"`.
    pub fn tag_for(&self, id: &str) -> Option<String> {
        crate::bom::tag_for(&self.components, id)
    }

    // -- placing mode --

    /// Enter placing mode for `item`.
    pub fn start_placing(&mut self, item: Placing) {
        self.placing = Some(item);
    }

    /// Leave placing mode without placing anything.
    pub fn cancel_placing(&mut self) {
        self.placing = None;
    }

    /// The item being placed, if any.
    pub fn placing(&self) -> Option<&Placing> {
        self.placing.as_ref()
    }

    /// This frame's placement proposal for the active item.
    ///
    /// Invalid when not in placing mode.
    pub fn snap_proposal(&self, ray: &Ray, view: ViewMode) -> SnapProposal {
        match &self.placing {
            Some(placing) => compute_snap_proposal(ray, &self.components, placing, view, &self.config.snap),
            None => SnapProposal::invalid(),
        }
    }

    // -- placement --

    /// Place a part (or the active multi-part template) now.
    ///
    /// See [`SceneStore::place_at`].
    pub fn place(
        &mut self,
        component_type: ComponentType,
        position: Vec3,
        rotation: Vec3,
        extra_properties: Properties,
    ) -> Vec<ComponentId> {
        self.place_at(Instant::now(), component_type, position, rotation, extra_properties)
    }

    /// Place at time `now`.
    ///
    /// When the active placing item is a multi-part template the whole
    /// assembly is placed with its origin at the given pose. Otherwise one
    /// instance of `component_type` is appended, carrying the placing item's
    /// properties overlaid with `extra_properties`. Placing mode ends.
    ///
    /// Returns the new ids; empty when suppressed by the placement debounce.
    pub fn place_at(
        &mut self,
        now: Instant,
        component_type: ComponentType,
        position: Vec3,
        rotation: Vec3,
        extra_properties: Properties,
    ) -> Vec<ComponentId> {
        if let Some(Placing::Template(template)) = &self.placing {
            if template.part_count() > 1 {
                let template = template.clone();
                let pose = Pose::from_degrees(position.to_point(), rotation.into());
                return self.place_template_at(now, &template, &pose);
            }
        }

        if self.suppress_placement(now) {
            return Vec::new();
        }

        let mut properties = match self.placing.as_ref().and_then(Placing::lead) {
            Some((ty, props)) if ty == component_type => props.clone(),
            _ => Properties::new(),
        };
        properties.merge(&extra_properties);

        let instance = ComponentInstance::new(component_type, position, rotation).with_properties(properties);
        let id = instance.id.clone();
        info!("Placed {} at ({:.3}, {:.3}, {:.3})", component_type, position.x, position.y, position.z);
        self.components.push(instance);
        self.placing = None;
        self.commit();
        vec![id]
    }

    /// Place `template` with its origin at `pose`, now.
    pub fn place_template(&mut self, template: &Template, pose: &Pose) -> Vec<ComponentId> {
        self.place_template_at(Instant::now(), template, pose)
    }

    /// Place `template` with its origin at `pose`, at time `now`.
    pub fn place_template_at(&mut self, now: Instant, template: &Template, pose: &Pose) -> Vec<ComponentId> {
        if self.suppress_placement(now) {
            return Vec::new();
        }
        let placed = instantiate_template(template, pose);
        let ids: Vec<ComponentId> = placed.iter().map(|c| c.id.clone()).collect();
        info!("Placed template '{}' ({} parts)", template.name, ids.len());
        self.components.extend(placed);
        self.placing = None;
        self.commit();
        ids
    }

    /// Commit the active placing item at `proposal`.
    ///
    /// Invalid proposals, or no active item, place nothing.
    pub fn commit_proposal(&mut self, proposal: &SnapProposal) -> Vec<ComponentId> {
        self.commit_proposal_at(Instant::now(), proposal)
    }

    /// [`SceneStore::commit_proposal`] at time `now`.
    pub fn commit_proposal_at(&mut self, now: Instant, proposal: &SnapProposal) -> Vec<ComponentId> {
        if !proposal.valid {
            debug!("Ignoring invalid placement proposal");
            return Vec::new();
        }
        let Some(placing) = &self.placing else {
            return Vec::new();
        };
        match placing {
            Placing::Template(template) => {
                let template = template.clone();
                self.place_template_at(now, &template, &proposal.pose())
            }
            Placing::Component { component_type, .. } => {
                let ty = *component_type;
                self.place_at(now, ty, proposal.position, proposal.rotation, Properties::new())
            }
        }
    }

    /// Rate limiter for placement commits. Records `now` when it lets one through.
    fn suppress_placement(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_placement {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.config.placement_debounce() {
                debug!("Suppressed duplicate placement {} ms after the previous one", elapsed.as_millis());
                return true;
            }
        }
        self.last_placement = Some(now);
        false
    }

    // -- edits --

    /// Replace the instance with the same id. Returns whether one matched.
    pub fn update_one(&mut self, updated: ComponentInstance) -> bool {
        self.update_many(vec![updated]) == 1
    }

    /// Replace every instance whose id matches one of `updated`.
    ///
    /// Ids not in the scene are ignored. Returns the number replaced.
    pub fn update_many(&mut self, updated: Vec<ComponentInstance>) -> usize {
        let mut replaced = 0;
        for instance in updated {
            if let Some(slot) = self.components.iter_mut().find(|c| c.id == instance.id) {
                *slot = instance;
                replaced += 1;
            }
        }
        if replaced > 0 {
            self.commit();
        }
        replaced
    }

    /// Remove every instance in `ids`. Returns the number removed.
    pub fn delete_many<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let doomed: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let before = self.components.len();
        self.components.retain(|c| !doomed.contains(c.id.as_str()));
        let removed = before - self.components.len();
        self.selection.remove_many(ids);
        if removed > 0 {
            info!("Deleted {} component(s)", removed);
            self.commit();
        }
        removed
    }

    /// Copy every instance in `ids`, offset on X and Z; the copies become
    /// the selection.
    pub fn duplicate_many<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<ComponentId> {
        let wanted: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let sources: Vec<ComponentInstance> = self
            .components
            .iter()
            .filter(|c| wanted.contains(c.id.as_str()))
            .cloned()
            .collect();
        self.insert_copies(&sources, self.config.duplicate_offset)
    }

    /// Move every selected instance by `delta`. Returns the number moved.
    pub fn translate_selection(&mut self, delta: Vec3) -> usize {
        let mut moved = 0;
        for instance in self.components.iter_mut() {
            if self.selection.contains(&instance.id) {
                instance.translate(delta);
                moved += 1;
            }
        }
        if moved > 0 {
            self.commit();
        }
        moved
    }

    /// Put copies of the selected instances on the clipboard.
    pub fn copy_selection(&mut self) -> usize {
        self.clipboard = self
            .components
            .iter()
            .filter(|c| self.selection.contains(&c.id))
            .cloned()
            .collect();
        self.clipboard.len()
    }

    /// Paste the clipboard, offset from the previous paste; the pasted
    /// copies become the selection.
    pub fn paste(&mut self) -> Vec<ComponentId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = self.config.paste_offset;
        for instance in self.clipboard.iter_mut() {
            instance.translate(Vec3::new(offset, 0.0, offset));
        }
        let sources = self.clipboard.clone();
        self.insert_copies(&sources, 0.0)
    }

    fn insert_copies(&mut self, sources: &[ComponentInstance], offset: f64) -> Vec<ComponentId> {
        if sources.is_empty() {
            return Vec::new();
        }
        let mut assemblies: HashMap<String, String> = HashMap::new();
        let copies: Vec<ComponentInstance> = sources
            .iter()
            .map(|source| {
                let mut copy = source.fresh_copy();
                copy.translate(Vec3::new(offset, 0.0, offset));
                copy.assembly_id = source
                    .assembly_id
                    .as_ref()
                    .map(|old| assemblies.entry(old.clone()).or_insert_with(new_component_id).clone());
                copy
            })
            .collect();
        let ids: Vec<ComponentId> = copies.iter().map(|c| c.id.clone()).collect();
        info!("Copied {} component(s)", ids.len());
        self.components.extend(copies);
        self.selection.set(ids.iter().cloned());
        self.commit();
        ids
    }

    // -- selection --

    /// Select `ids`, expanding assemblies; replaces unless `additive`.
    pub fn select<S: AsRef<str>>(&mut self, ids: &[S], additive: bool) {
        self.selection.select(ids, additive, &self.components);
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Capture `ids` (first id is the origin) as a template and add it to
    /// the parts library.
    ///
    /// Ids not in the scene are skipped; `None` if none remain.
    pub fn save_selection_as_template<S: AsRef<str>>(&mut self, ids: &[S], name: &str) -> Option<Template> {
        let instances: Vec<&ComponentInstance> = ids.iter().filter_map(|id| self.get(id.as_ref())).collect();
        let template = capture_template(name, &instances)?;
        let kind = match template.shape {
            TemplateShape::Single { .. } => "part",
            TemplateShape::Assembly { .. } => "assembly",
        };
        info!("Saved {} template '{}' ({} parts)", kind, template.name, template.part_count());
        self.library.add(template.clone());
        Some(template)
    }

    // -- history --

    /// Run `f` with history commits folded into one snapshot at the end.
    ///
    /// Undo and redo are refused inside the scope. If `f` panics the scope
    /// is still closed, so the store keeps committing afterwards.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.batch_dirty {
            self.batch_dirty = false;
            self.commit();
        }
        match result {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    fn commit(&mut self) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        if self.history.commit(&self.components) {
            debug!("History snapshot {} of {}", self.history.index() + 1, self.history.len());
        }
    }

    /// Step back one snapshot. Returns `false` at the oldest or inside a
    /// batch.
    pub fn undo(&mut self) -> bool {
        if self.batch_depth > 0 {
            debug!("Undo refused inside a batch");
            return false;
        }
        let Some(scene) = self.history.undo().map(<[ComponentInstance]>::to_vec) else {
            return false;
        };
        self.components = scene;
        self.selection.clear();
        debug!("Undo to snapshot {}", self.history.index());
        true
    }

    /// Step forward one snapshot. Returns `false` at the newest or inside a
    /// batch.
    pub fn redo(&mut self) -> bool {
        if self.batch_depth > 0 {
            debug!("Redo refused inside a batch");
            return false;
        }
        let Some(scene) = self.history.redo().map(<[ComponentInstance]>::to_vec) else {
            return false;
        };
        self.components = scene;
        self.selection.clear();
        debug!("Redo to snapshot {}", self.history.index());
        true
    }

    /// Whether [`SceneStore::undo`] would do anything.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`SceneStore::redo`] would do anything.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    // -- design lifecycle and archive --

    /// Rename the current design.
    pub fn rename_design(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
    }

    /// Start an empty design. Undoable.
    pub fn new_design(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
        self.components.clear();
        self.selection.clear();
        self.placing = None;
        info!("Started new design '{}'", self.design_name);
        self.commit();
    }

    /// Archive the current scene under `name`. Returns the entry id.
    pub fn archive_current_design(&mut self, name: impl Into<String>) -> String {
        let entry = self.archive.push(name, &self.components);
        info!("Archived design '{}' ({} components)", entry.name, entry.components.len());
        entry.id.clone()
    }

    /// Archived designs, newest first.
    pub fn list_archive(&self) -> &[ArchiveEntry] {
        self.archive.entries()
    }

    /// Replace the scene with an archived design. Undoable.
    ///
    /// Returns `false` if no entry has `id`.
    pub fn load_archive_entry(&mut self, id: &str) -> bool {
        let Some(entry) = self.archive.get(id) else {
            return false;
        };
        self.components = entry.components.clone();
        self.design_name = entry.name.clone();
        self.selection.clear();
        self.placing = None;
        info!("Loaded archived design '{}'", self.design_name);
        self.commit();
        true
    }

    /// Delete an archived design. Returns whether it existed.
    pub fn delete_archive_entry(&mut self, id: &str) -> bool {
        let removed = self.archive.remove(id).is_some();
        if removed {
            info!("Deleted archived design {}", id);
        }
        removed
    }

    /// The archive, for persistence.
    pub fn archive(&self) -> &DesignArchive {
        &self.archive
    }

    /// Replace the archive with persisted entries.
    ///
    /// Fails without touching the store if any entry holds a duplicate id
    /// or a non-finite transform.
    pub fn restore_archive(&mut self, archive: DesignArchive) -> Result<()> {
        for entry in archive.entries() {
            validate_components(&entry.components)?;
        }
        info!("Restored {} archived designs", archive.len());
        self.archive = archive;
        Ok(())
    }

    // -- persistence --

    /// Current scene and name in persisted form.
    pub fn to_saved_design(&self) -> SavedDesign {
        SavedDesign::new(self.design_name.clone(), self.components.clone())
    }

    /// Replace all editor state with a saved design.
    ///
    /// History restarts from the loaded scene. Fails without touching the
    /// store if two components share an id or any transform is not finite.
    pub fn load_saved_design(&mut self, design: SavedDesign) -> Result<()> {
        validate_components(&design.components)?;

        info!("Loaded design '{}' ({} components)", design.name, design.components.len());
        self.design_name = design.name;
        self.components = design.components;
        self.selection.clear();
        self.placing = None;
        self.clipboard.clear();
        self.history.reset(&self.components);
        Ok(())
    }

    /// Parse and load a saved design from JSON.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let design = SavedDesign::from_json(json)?;
        self.load_saved_design(design)
    }
}

fn validate_components(components: &[ComponentInstance]) -> Result<()> {
    let mut seen = HashSet::new();
    for c in components {
        if !seen.insert(c.id.as_str()) {
            return Err(EditorError::DuplicateId(c.id.clone()));
        }
        if !c.position.is_finite() || !c.rotation.is_finite() {
            return Err(EditorError::NonFiniteTransform(c.id.clone()));
        }
    }
    Ok(())
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pipecad_math::{Point3, Tolerance, Vec3 as MVec3};
    use pipecad_sockets::world_sockets;
    use crate::archive::ARCHIVE_LIMIT;
    use std::time::Duration;

    fn instant_store() -> SceneStore {
        SceneStore::with_config(EditorConfig {
            placement_debounce_ms: 0,
            ..EditorConfig::default()
        })
    }

    fn place(store: &mut SceneStore, ty: ComponentType, x: f64, y: f64, z: f64) -> ComponentId {
        store
            .place(ty, Vec3::new(x, y, z), Vec3::zero(), Properties::new())
            .remove(0)
    }

    #[test]
    fn test_place_appends_and_commits() {
        let mut store = instant_store();
        store.start_placing(Placing::component(ComponentType::Valve));
        let id = place(&mut store, ComponentType::Valve, 1.0, 0.0, 2.0);
        assert_eq!(store.components().len(), 1);
        assert_eq!(store.get(&id).unwrap().position, Vec3::new(1.0, 0.0, 2.0));
        assert!(store.placing().is_none());
        assert!(store.can_undo());
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_place_carries_placing_properties() {
        let mut store = instant_store();
        store.start_placing(Placing::Component {
            component_type: ComponentType::Straight,
            properties: Properties::new().with("length", 5.0).with("material", "pvc"),
        });
        let ids = store.place(
            ComponentType::Straight,
            Vec3::zero(),
            Vec3::zero(),
            Properties::new().with("material", "copper"),
        );
        let placed = store.get(&ids[0]).unwrap();
        assert_eq!(placed.properties.get_f64("length"), Some(5.0));
        assert_eq!(placed.properties.material(), "copper");
    }

    #[test]
    fn test_debounce_drops_rapid_second_placement() {
        let mut store = SceneStore::new();
        let t0 = Instant::now();
        let first = store.place_at(t0, ComponentType::Valve, Vec3::zero(), Vec3::zero(), Properties::new());
        let second = store.place_at(
            t0 + Duration::from_millis(100),
            ComponentType::Valve,
            Vec3::zero(),
            Vec3::zero(),
            Properties::new(),
        );
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(store.components().len(), 1);
        assert_eq!(store.history().len(), 2);

        let third = store.place_at(
            t0 + Duration::from_millis(400),
            ComponentType::Valve,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zero(),
            Properties::new(),
        );
        assert_eq!(third.len(), 1);
        assert_eq!(store.components().len(), 2);
    }

    #[test]
    fn test_template_and_proposal_share_debounce() {
        let mut store = SceneStore::new();
        let template = Template::new(
            "valve",
            TemplateShape::Single {
                component_type: ComponentType::Valve,
                properties: Properties::new(),
            },
        );
        let t0 = Instant::now();
        assert_eq!(store.place_template_at(t0, &template, &Pose::identity()).len(), 1);

        store.start_placing(Placing::component(ComponentType::Tank));
        let ray = Ray::new(Point3::new(3.0, 10.0, 0.0), MVec3::new(0.0, -1.0, 0.0));
        let proposal = store.snap_proposal(&ray, ViewMode::Perspective);
        assert!(proposal.valid);

        assert!(store
            .commit_proposal_at(t0 + Duration::from_millis(100), &proposal)
            .is_empty());
        assert_eq!(store.components().len(), 1);
        assert!(store.placing().is_some());

        let ids = store.commit_proposal_at(t0 + Duration::from_millis(400), &proposal);
        assert_eq!(ids.len(), 1);
        assert_eq!(store.get(&ids[0]).unwrap().component_type, ComponentType::Tank);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = instant_store();
        place(&mut store, ComponentType::Tank, 0.0, 0.0, 0.0);
        let before = store.snapshot();
        let history_len = store.history().len();
        assert_eq!(store.delete_many(&["not-there"]), 0);
        assert_eq!(store.components(), before.as_slice());
        assert_eq!(store.history().len(), history_len);
        assert_eq!(store.delete_many::<&str>(&[]), 0);
        assert_eq!(store.history().len(), history_len);
    }

    #[test]
    fn test_delete_drops_from_selection() {
        let mut store = instant_store();
        let a = place(&mut store, ComponentType::Tank, 0.0, 0.0, 0.0);
        let b = place(&mut store, ComponentType::Valve, 2.0, 0.0, 0.0);
        store.select(&[&a, &b], false);
        assert_eq!(store.delete_many(&[&a]), 1);
        assert!(!store.selection().contains(&a));
        assert!(store.selection().contains(&b));
        assert!(store.get(&a).is_none());
    }

    #[test]
    fn test_update_many_ignores_unknown() {
        let mut store = instant_store();
        let id = place(&mut store, ComponentType::Straight, 0.0, 0.0, 0.0);
        let mut edited = store.get(&id).unwrap().clone();
        edited.properties.set("length", 6.0);
        let stranger = ComponentInstance::new(ComponentType::Cap, Vec3::zero(), Vec3::zero());
        assert_eq!(store.update_many(vec![edited, stranger]), 1);
        assert_eq!(store.components().len(), 1);
        assert_eq!(store.get(&id).unwrap().properties.get_f64("length"), Some(6.0));

        let unchanged = store.get(&id).unwrap().clone();
        let history_len = store.history().len();
        assert!(store.update_one(unchanged));
        assert_eq!(store.history().len(), history_len);
    }

    #[test]
    fn test_duplicate_offsets_and_selects_copies() {
        let mut store = instant_store();
        let a = place(&mut store, ComponentType::Elbow, 1.0, 0.0, 1.0);
        let copies = store.duplicate_many(&[&a]);
        assert_eq!(copies.len(), 1);
        assert_ne!(copies[0], a);
        let copy = store.get(&copies[0]).unwrap();
        assert_eq!(copy.position, Vec3::new(1.5, 0.0, 1.5));
        assert_eq!(store.selection().ordered_ids(store.components()), copies);
        assert!(store.duplicate_many(&["nope"]).is_empty());
    }

    #[test]
    fn test_duplicate_remaps_assembly_ids() {
        let mut store = instant_store();
        let a = ComponentInstance::new(ComponentType::Valve, Vec3::zero(), Vec3::zero()).with_assembly("asm");
        let b = ComponentInstance::new(ComponentType::Valve, Vec3::new(1.0, 0.0, 0.0), Vec3::zero())
            .with_assembly("asm");
        let ids = [a.id.clone(), b.id.clone()];
        store
            .load_saved_design(SavedDesign::new("pair", vec![a, b]))
            .unwrap();

        let copies = store.duplicate_many(&ids);
        let tags: Vec<_> = copies
            .iter()
            .map(|id| store.get(id).unwrap().assembly_id.clone().unwrap())
            .collect();
        assert_eq!(tags[0], tags[1]);
        assert_ne!(tags[0], "asm");
    }

    #[test]
    fn test_select_expands_assembly() {
        let mut store = instant_store();
        let parts: Vec<ComponentInstance> = (0..3)
            .map(|i| {
                ComponentInstance::new(ComponentType::Valve, Vec3::new(i as f64, 0.0, 0.0), Vec3::zero())
                    .with_assembly("asm")
            })
            .collect();
        let template = capture_template("row", &parts.iter().collect::<Vec<_>>()).unwrap();
        let ids = store.place_template(&template, &Pose::identity());
        place(&mut store, ComponentType::Tank, 9.0, 0.0, 0.0);

        store.select(&[&ids[1]], false);
        assert_eq!(store.selection().len(), 3);
        for id in &ids {
            assert!(store.selection().contains(id));
        }
    }

    #[test]
    fn test_undo_redo_restores_and_clears_selection() {
        let mut store = instant_store();
        let a = place(&mut store, ComponentType::Valve, 0.0, 0.0, 0.0);
        place(&mut store, ComponentType::Valve, 1.0, 0.0, 0.0);
        let before_undo = store.snapshot();
        store.select(&[&a], false);

        assert!(store.undo());
        assert!(store.selection().is_empty());
        assert_eq!(store.components().len(), 1);
        assert!(store.redo());
        assert_eq!(store.components(), before_undo.as_slice());
        assert!(!store.redo());

        assert!(store.undo());
        assert!(store.undo());
        assert!(store.components().is_empty());
        assert!(!store.undo());
    }

    #[test]
    fn test_batch_commits_once() {
        let mut store = instant_store();
        let len_before = store.history().len();
        store.batch(|s| {
            place(s, ComponentType::Valve, 0.0, 0.0, 0.0);
            place(s, ComponentType::Valve, 1.0, 0.0, 0.0);
            s.batch(|s| place(s, ComponentType::Valve, 2.0, 0.0, 0.0));
        });
        assert_eq!(store.components().len(), 3);
        assert_eq!(store.history().len(), len_before + 1);
        assert!(store.undo());
        assert!(store.components().is_empty());
    }

    #[test]
    fn test_undo_inside_batch_is_refused() {
        let mut store = instant_store();
        place(&mut store, ComponentType::Valve, 0.0, 0.0, 0.0);
        let len_before = store.history().len();
        let b = store.batch(|s| {
            let b = place(s, ComponentType::Tank, 1.0, 0.0, 0.0);
            assert!(!s.undo());
            assert!(!s.redo());
            b
        });
        assert_eq!(store.components().len(), 2);
        assert!(store.get(&b).is_some());
        assert_eq!(store.history().len(), len_before + 1);
        assert!(store.undo());
        assert!(store.get(&b).is_none());
    }

    #[test]
    fn test_batch_panic_restores_depth() {
        let mut store = instant_store();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            store.batch(|s| {
                place(s, ComponentType::Valve, 0.0, 0.0, 0.0);
                panic!("aborted edit");
            })
        }));
        assert!(outcome.is_err());
        // The partial edit is committed when the scope unwinds.
        assert_eq!(store.history().len(), 2);

        place(&mut store, ComponentType::Tank, 1.0, 0.0, 0.0);
        assert_eq!(store.history().len(), 3);
        assert!(store.undo());
        assert_eq!(store.components().len(), 1);
    }

    #[test]
    fn test_translate_selection() {
        let mut store = instant_store();
        let a = place(&mut store, ComponentType::Valve, 0.0, 0.0, 0.0);
        let b = place(&mut store, ComponentType::Valve, 5.0, 0.0, 0.0);
        store.select(&[&a], false);
        assert_eq!(store.translate_selection(Vec3::new(0.0, 1.0, 0.0)), 1);
        assert_eq!(store.get(&a).unwrap().position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(store.get(&b).unwrap().position, Vec3::new(5.0, 0.0, 0.0));

        store.clear_selection();
        let history_len = store.history().len();
        assert_eq!(store.translate_selection(Vec3::new(1.0, 0.0, 0.0)), 0);
        assert_eq!(store.history().len(), history_len);
    }

    #[test]
    fn test_copy_paste_cascades() {
        let mut store = instant_store();
        let a = place(&mut store, ComponentType::Flange, 0.0, 0.0, 0.0);
        assert!(store.paste().is_empty());

        store.select(&[&a], false);
        assert_eq!(store.copy_selection(), 1);
        let first = store.paste();
        let second = store.paste();
        assert_eq!(store.get(&first[0]).unwrap().position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(store.get(&second[0]).unwrap().position, Vec3::new(2.0, 0.0, 2.0));
        assert_ne!(first[0], second[0]);
        assert_eq!(store.selection().ordered_ids(store.components()), second);
        assert_eq!(store.components().len(), 3);
    }

    #[test]
    fn test_snap_then_commit_docks_sockets() {
        let mut store = instant_store();
        place(&mut store, ComponentType::Straight, 0.0, 0.0, 0.0);
        store.start_placing(Placing::component(ComponentType::Straight));

        // Aimed through the existing pipe's top socket at (0, 1, 0).
        let ray = Ray::new(Point3::new(0.0, 5.0, 5.0), MVec3::new(0.0, -4.0, -5.0));
        let proposal = store.snap_proposal(&ray, ViewMode::Perspective);
        assert!(proposal.valid);
        assert_relative_eq!(proposal.position.y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(proposal.position.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(proposal.rotation.x, 0.0, epsilon = 1e-9);

        let target_id = proposal.target_component_id().unwrap().to_string();
        let target_socket = proposal.target.as_ref().unwrap().socket_index;
        let ids = store.commit_proposal(&proposal);
        assert_eq!(ids.len(), 1);
        assert!(store.placing().is_none());

        let placed = world_sockets(store.get(&ids[0]).unwrap());
        let target = world_sockets(store.get(&target_id).unwrap());
        let tol = Tolerance::DEFAULT;
        assert!(tol.points_equal(&placed[0].position, &target[target_socket].position));
        assert!(tol.vectors_equal(&placed[0].direction, &(-target[target_socket].direction)));
    }

    #[test]
    fn test_invalid_proposal_places_nothing() {
        let mut store = instant_store();
        store.start_placing(Placing::component(ComponentType::Valve));
        assert!(store.commit_proposal(&SnapProposal::invalid()).is_empty());
        assert!(store.components().is_empty());
        assert!(store.placing().is_some());
    }

    #[test]
    fn test_snap_proposal_without_placing_is_invalid() {
        let store = instant_store();
        let ray = Ray::new(Point3::new(0.0, 10.0, 0.0), MVec3::new(0.0, -1.0, 0.0));
        assert!(!store.snap_proposal(&ray, ViewMode::Perspective).valid);
    }

    fn archived(i: i64, components: Vec<ComponentInstance>) -> ArchiveEntry {
        ArchiveEntry {
            id: format!("a{i}"),
            name: format!("plant {i}"),
            saved_at: chrono::Utc::now() + chrono::Duration::seconds(i),
            components,
        }
    }

    #[test]
    fn test_restore_archive_from_json_keeps_bound() {
        let entries: Vec<ArchiveEntry> = (0..30).map(|i| archived(i, Vec::new())).collect();
        let json = serde_json::to_string(&entries).unwrap();
        let mut store = instant_store();
        store.restore_archive(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(store.list_archive().len(), ARCHIVE_LIMIT);
        assert_eq!(store.list_archive()[0].id, "a29");

        assert!(store.load_archive_entry("a20"));
        assert_eq!(store.design_name(), "plant 20");
    }

    #[test]
    fn test_restore_archive_rejects_bad_entry() {
        let mut store = instant_store();
        let kept = store.archive_current_design("kept");
        let bad = ComponentInstance::new(ComponentType::Cap, Vec3::new(0.0, f64::INFINITY, 0.0), Vec3::zero());
        let archive = DesignArchive::from_entries(vec![
            archived(0, Vec::new()),
            archived(1, vec![bad]),
        ]);
        let err = store.restore_archive(archive).unwrap_err();
        assert!(matches!(err, EditorError::NonFiniteTransform(_)));
        assert_eq!(store.list_archive().len(), 1);
        assert_eq!(store.list_archive()[0].id, kept);

        let pipe = ComponentInstance::new(ComponentType::Straight, Vec3::zero(), Vec3::zero());
        let archive = DesignArchive::from_entries(vec![archived(2, vec![pipe.clone(), pipe])]);
        assert!(matches!(
            store.restore_archive(archive),
            Err(EditorError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_save_selection_and_place_assembly() {
        let mut store = instant_store();
        let a = place(&mut store, ComponentType::Valve, 0.0, 0.0, 0.0);
        let b = place(&mut store, ComponentType::Valve, 1.0, 0.0, 0.0);
        let template = store.save_selection_as_template(&[&a, &b], "pair").unwrap();
        assert_eq!(store.library().len(), 1);
        assert!(store.save_selection_as_template::<&str>(&[], "empty").is_none());

        store.start_placing(Placing::Template(template));
        let ids = store.place(
            ComponentType::Valve,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 90.0, 0.0),
            Properties::new(),
        );
        assert_eq!(ids.len(), 2);
        let b_copy = store.get(&ids[1]).unwrap();
        assert_relative_eq!(b_copy.position.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(b_copy.position.z, -1.0, epsilon = 1e-9);
        assert!(b_copy.assembly_id.is_some());
        assert!(store.placing().is_none());
    }

    #[test]
    fn test_archive_load_is_undoable() {
        let mut store = instant_store();
        place(&mut store, ComponentType::Tank, 0.0, 0.0, 0.0);
        let id = store.archive_current_design("tank farm");
        store.new_design("scratch");
        assert!(store.components().is_empty());
        assert_eq!(store.design_name(), "scratch");

        assert!(store.load_archive_entry(&id));
        assert_eq!(store.design_name(), "tank farm");
        assert_eq!(store.components().len(), 1);
        assert!(store.undo());
        assert!(store.components().is_empty());

        assert!(!store.load_archive_entry("missing"));
        assert!(store.delete_archive_entry(&id));
        assert!(store.list_archive().is_empty());
    }

    #[test]
    fn test_saved_design_roundtrip_resets_history() {
        let mut store = instant_store();
        place(&mut store, ComponentType::Straight, 0.0, 0.0, 0.0);
        store.rename_design("loop");
        let json = store.to_saved_design().to_json().unwrap();

        let mut other = SceneStore::new();
        other.load_json(&json).unwrap();
        assert_eq!(other.design_name(), "loop");
        assert_eq!(other.components(), store.components());
        assert!(!other.can_undo());
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let a = ComponentInstance::new(ComponentType::Cap, Vec3::zero(), Vec3::zero());
        let b = a.clone();
        let mut store = SceneStore::new();
        let err = store.load_saved_design(SavedDesign::new("dup", vec![a, b])).unwrap_err();
        assert!(matches!(err, EditorError::DuplicateId(_)));
        assert_eq!(store.design_name(), UNTITLED_DESIGN);
    }

    #[test]
    fn test_load_rejects_non_finite() {
        let a = ComponentInstance::new(ComponentType::Cap, Vec3::new(f64::NAN, 0.0, 0.0), Vec3::zero());
        let mut store = SceneStore::new();
        let err = store.load_saved_design(SavedDesign::new("nan", vec![a])).unwrap_err();
        assert!(matches!(err, EditorError::NonFiniteTransform(_)));
    }

    #[test]
    fn test_load_corrupt_json() {
        let mut store = SceneStore::new();
        let err = store.load_json("{ not json").unwrap_err();
        assert!(matches!(err, EditorError::CorruptState(_)));
    }

    #[test]
    fn test_tag_for() {
        let mut store = instant_store();
        place(&mut store, ComponentType::Straight, 0.0, 0.0, 0.0);
        let b = place(&mut store, ComponentType::Straight, 3.0, 0.0, 0.0);
        assert_eq!(store.tag_for(&b).as_deref(), Some("straight #2"));
    }
}
