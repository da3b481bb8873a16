use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use lienzo_events::EventTree;
use lienzo_variant::VariableStore;

use crate::{
    DocumentError, GameObject, Instance, ObjectContainer, ResourceManager, Result, Scene,
};

/// Default window size for new projects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Which object container a call addresses: the document's global one or a
/// named scene's local one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectScope<'a> {
    Global,
    Scene(&'a str),
}

/// The root aggregate: the full in-memory representation of one game
/// project. Pure data plus the structural mutation surface; persistence
/// lives with the session layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub package_name: String,

    #[serde(default)]
    pub window: WindowSize,

    #[serde(default = "default_min_fps")]
    pub min_fps: u32,

    #[serde(default = "default_max_fps")]
    pub max_fps: u32,

    /// Name of the scene to load first. Validated when set; a later scene
    /// deletion may leave it stale (tolerated, see delete_scene).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_scene: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<Scene>,

    #[serde(default, skip_serializing_if = "ObjectContainer::is_empty")]
    pub global_objects: ObjectContainer,

    #[serde(default, skip_serializing_if = "VariableStore::is_empty")]
    pub global_variables: VariableStore,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub external_events: IndexMap<String, EventTree>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub used_extensions: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "ResourceManager::is_empty")]
    pub resources: ResourceManager,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_min_fps() -> u32 {
    20
}

fn default_max_fps() -> u32 {
    60
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            description: String::new(),
            author: String::new(),
            package_name: String::new(),
            window: WindowSize::default(),
            min_fps: default_min_fps(),
            max_fps: default_max_fps(),
            first_scene: None,
            scenes: Vec::new(),
            global_objects: ObjectContainer::new(),
            global_variables: VariableStore::new(),
            external_events: IndexMap::new(),
            used_extensions: BTreeSet::new(),
            resources: ResourceManager::new(),
        }
    }

    // ======================================================
    // ===================== Scenes =========================
    // ======================================================

    #[inline]
    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.iter().any(|s| s.name == name)
    }

    #[inline]
    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.name.as_str())
    }

    pub fn scene(&self, name: &str) -> Result<&Scene> {
        self.scenes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DocumentError::not_found("scene", name))
    }

    pub fn scene_mut(&mut self, name: &str) -> Result<&mut Scene> {
        self.scenes
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| DocumentError::not_found("scene", name))
    }

    pub fn scene_at(&self, index: usize) -> Result<&Scene> {
        self.scenes.get(index).ok_or(DocumentError::IndexOutOfRange {
            index,
            len: self.scenes.len(),
        })
    }

    /// Create an empty scene, appending or inserting at `index`.
    pub fn create_scene(&mut self, name: impl Into<String>, index: Option<usize>) -> Result<&mut Scene> {
        let name = name.into();
        if self.has_scene(&name) {
            return Err(DocumentError::duplicate("scene", name));
        }
        let position = match index {
            Some(i) if i > self.scenes.len() => {
                return Err(DocumentError::IndexOutOfRange {
                    index: i,
                    len: self.scenes.len(),
                });
            }
            Some(i) => i,
            None => self.scenes.len(),
        };
        self.scenes.insert(position, Scene::new(name));
        Ok(&mut self.scenes[position])
    }

    /// Delete a scene. A stale first-scene reference is left in place;
    /// dependents are not validated eagerly.
    pub fn delete_scene(&mut self, name: &str) -> Result<Scene> {
        match self.scenes.iter().position(|s| s.name == name) {
            Some(i) => Ok(self.scenes.remove(i)),
            None => Err(DocumentError::not_found("scene", name)),
        }
    }

    /// Rename a scene. If it was the first scene, the reference follows.
    pub fn rename_scene(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if old != new && self.has_scene(&new) {
            return Err(DocumentError::duplicate("scene", new));
        }
        let scene = self.scene_mut(old)?;
        scene.name = new.clone();
        if self.first_scene.as_deref() == Some(old) {
            self.first_scene = Some(new);
        }
        Ok(())
    }

    pub fn move_scene(&mut self, name: &str, to_index: usize) -> Result<()> {
        let from = self
            .scenes
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| DocumentError::not_found("scene", name))?;
        if to_index >= self.scenes.len() {
            return Err(DocumentError::IndexOutOfRange {
                index: to_index,
                len: self.scenes.len(),
            });
        }
        let scene = self.scenes.remove(from);
        self.scenes.insert(to_index, scene);
        Ok(())
    }

    /// Point the document at its first scene; validated eagerly.
    pub fn set_first_scene(&mut self, name: Option<String>) -> Result<()> {
        if let Some(ref name) = name {
            if !self.has_scene(name) {
                return Err(DocumentError::not_found("scene", name.clone()));
            }
        }
        self.first_scene = name;
        Ok(())
    }

    // ======================================================
    // ===================== Objects ========================
    // ======================================================

    fn container(&self, scope: ObjectScope<'_>) -> Result<&ObjectContainer> {
        match scope {
            ObjectScope::Global => Ok(&self.global_objects),
            ObjectScope::Scene(name) => Ok(&self.scene(name)?.objects),
        }
    }

    fn container_mut(&mut self, scope: ObjectScope<'_>) -> Result<&mut ObjectContainer> {
        match scope {
            ObjectScope::Global => Ok(&mut self.global_objects),
            ObjectScope::Scene(name) => Ok(&mut self.scene_mut(name)?.objects),
        }
    }

    pub fn object(&self, scope: ObjectScope<'_>, name: &str) -> Result<&GameObject> {
        self.container(scope)?
            .get(name)
            .ok_or_else(|| DocumentError::not_found("object", name))
    }

    pub fn object_mut(&mut self, scope: ObjectScope<'_>, name: &str) -> Result<&mut GameObject> {
        self.container_mut(scope)?
            .get_mut(name)
            .ok_or_else(|| DocumentError::not_found("object", name))
    }

    pub fn create_object(
        &mut self,
        scope: ObjectScope<'_>,
        name: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Result<()> {
        self.container_mut(scope)?
            .insert(GameObject::new(name, object_type))
    }

    /// Delete an object definition. Instances naming it are NOT removed;
    /// the returned count reports how many references now dangle so the
    /// caller can request cleanup explicitly.
    pub fn delete_object(&mut self, scope: ObjectScope<'_>, name: &str) -> Result<usize> {
        self.container_mut(scope)?.remove(name)?;
        let dangling = match scope {
            ObjectScope::Global => self
                .scenes
                .iter()
                .map(|s| s.instances.count_for_object(name))
                .sum(),
            ObjectScope::Scene(scene) => {
                self.scene(scene)?.instances.count_for_object(name)
            }
        };
        Ok(dangling)
    }

    /// Rename an object and cascade the new name into instance references.
    /// A global rename sweeps every scene's instance container; a
    /// scene-local rename sweeps only that scene. Returns the number of
    /// rewritten instances.
    pub fn rename_object(
        &mut self,
        scope: ObjectScope<'_>,
        old: &str,
        new: impl Into<String>,
    ) -> Result<usize> {
        let new = new.into();
        self.container_mut(scope)?.rename(old, new.clone())?;
        let rewritten = match scope {
            ObjectScope::Global => self
                .scenes
                .iter_mut()
                .map(|s| s.instances.retarget_object(old, &new))
                .sum(),
            ObjectScope::Scene(scene) => self
                .scene_mut(scene)?
                .instances
                .retarget_object(old, &new),
        };
        Ok(rewritten)
    }

    /// True when the name resolves scene-locally or globally.
    pub fn resolves_object(&self, scene: &Scene, name: &str) -> bool {
        scene.objects.contains(name) || self.global_objects.contains(name)
    }

    // ======================================================
    // ==================== Instances =======================
    // ======================================================

    /// Place one instance; the referenced object must exist scene-locally
    /// or globally at creation time.
    pub fn create_instance(&mut self, scene_name: &str, instance: Instance) -> Result<()> {
        let scene = self.scene(scene_name)?;
        if !self.resolves_object(scene, &instance.object_name) {
            return Err(DocumentError::ObjectNotFound(instance.object_name));
        }
        self.scene_mut(scene_name)?.instances.push(instance);
        Ok(())
    }

    /// Place a batch of instances with per-item outcomes; one item's
    /// failure does not abort the rest.
    pub fn create_instances(
        &mut self,
        scene_name: &str,
        batch: Vec<Instance>,
    ) -> Result<Vec<std::result::Result<(), DocumentError>>> {
        // scene existence is a precondition for the whole batch
        self.scene(scene_name)?;
        Ok(batch
            .into_iter()
            .map(|instance| self.create_instance(scene_name, instance))
            .collect())
    }

    pub fn delete_instances_by_object(&mut self, scene_name: &str, object: &str) -> Result<usize> {
        Ok(self.scene_mut(scene_name)?.instances.remove_by_object(object))
    }

    pub fn delete_instances_by_layer(&mut self, scene_name: &str, layer: &str) -> Result<usize> {
        Ok(self.scene_mut(scene_name)?.instances.remove_by_layer(layer))
    }

    // ======================================================
    // ================= External events ====================
    // ======================================================

    pub fn create_external_events(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.external_events.contains_key(&name) {
            return Err(DocumentError::duplicate("external events", name));
        }
        self.external_events.insert(name, EventTree::new());
        Ok(())
    }

    pub fn delete_external_events(&mut self, name: &str) -> Result<EventTree> {
        self.external_events
            .shift_remove(name)
            .ok_or_else(|| DocumentError::not_found("external events", name))
    }

    pub fn rename_external_events(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if old != new && self.external_events.contains_key(&new) {
            return Err(DocumentError::duplicate("external events", new));
        }
        let tree = self
            .external_events
            .shift_remove(old)
            .ok_or_else(|| DocumentError::not_found("external events", old))?;
        self.external_events.insert(new, tree);
        Ok(())
    }

    pub fn external_events_mut(&mut self, name: &str) -> Result<&mut EventTree> {
        self.external_events
            .get_mut(name)
            .ok_or_else(|| DocumentError::not_found("external events", name))
    }

    // ======================================================
    // ==================== Extensions ======================
    // ======================================================

    /// Idempotent; returns whether the name was newly registered.
    #[inline]
    pub fn register_extension(&mut self, name: impl Into<String>) -> bool {
        self.used_extensions.insert(name.into())
    }

    #[inline]
    pub fn unregister_extension(&mut self, name: &str) -> bool {
        self.used_extensions.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with_scenes(names: &[&str]) -> Project {
        let mut project = Project::new("Game");
        for name in names {
            project.create_scene(*name, None).unwrap();
        }
        project
    }

    #[test]
    fn scene_names_stay_unique_through_mutations() {
        let mut project = project_with_scenes(&["A", "B"]);
        assert_eq!(
            project.create_scene("A", None).unwrap_err(),
            DocumentError::duplicate("scene", "A")
        );
        project.delete_scene("A").unwrap();
        project.create_scene("A", Some(0)).unwrap();
        assert_eq!(
            project.rename_scene("B", "A").unwrap_err(),
            DocumentError::duplicate("scene", "A")
        );
        let names: Vec<&str> = project.scene_names().collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn rename_scene_follows_first_scene_reference() {
        let mut project = project_with_scenes(&["Menu", "Level1"]);
        project.set_first_scene(Some("Menu".to_string())).unwrap();
        project.rename_scene("Menu", "Title").unwrap();
        assert_eq!(project.first_scene.as_deref(), Some("Title"));
    }

    #[test]
    fn set_first_scene_validates_eagerly_but_delete_leaves_it_stale() {
        let mut project = project_with_scenes(&["Menu"]);
        assert_eq!(
            project
                .set_first_scene(Some("Nope".to_string()))
                .unwrap_err(),
            DocumentError::not_found("scene", "Nope")
        );
        project.set_first_scene(Some("Menu".to_string())).unwrap();
        project.delete_scene("Menu").unwrap();
        // stale reference is tolerated, not cleaned up
        assert_eq!(project.first_scene.as_deref(), Some("Menu"));
    }

    #[test]
    fn move_scene_reorders() {
        let mut project = project_with_scenes(&["A", "B", "C"]);
        project.move_scene("C", 0).unwrap();
        let names: Vec<&str> = project.scene_names().collect();
        assert_eq!(names, ["C", "A", "B"]);
        assert_eq!(
            project.move_scene("A", 5).unwrap_err(),
            DocumentError::IndexOutOfRange { index: 5, len: 3 }
        );
    }

    #[test]
    fn global_rename_cascades_across_every_scene() {
        let mut project = project_with_scenes(&["S1", "S2"]);
        project
            .create_object(ObjectScope::Global, "Coin", "sprite")
            .unwrap();
        project
            .create_object(ObjectScope::Global, "Gem", "sprite")
            .unwrap();
        for scene in ["S1", "S2"] {
            project
                .create_instance(scene, Instance::new("Coin", 0.0, 0.0))
                .unwrap();
            project
                .create_instance(scene, Instance::new("Gem", 1.0, 1.0))
                .unwrap();
        }

        let rewritten = project
            .rename_object(ObjectScope::Global, "Coin", "GoldCoin")
            .unwrap();
        assert_eq!(rewritten, 2);

        for scene in ["S1", "S2"] {
            let scene = project.scene(scene).unwrap();
            let names: Vec<&str> = scene
                .instances
                .iter()
                .map(|i| i.object_name.as_str())
                .collect();
            assert_eq!(names, ["GoldCoin", "Gem"]);
        }
    }

    #[test]
    fn scene_local_rename_touches_only_that_scene() {
        let mut project = project_with_scenes(&["S1", "S2"]);
        project
            .create_object(ObjectScope::Scene("S1"), "Door", "sprite")
            .unwrap();
        // same-named object in the other scene's container
        project
            .create_object(ObjectScope::Scene("S2"), "Door", "sprite")
            .unwrap();
        project
            .create_instance("S1", Instance::new("Door", 0.0, 0.0))
            .unwrap();
        project
            .create_instance("S2", Instance::new("Door", 0.0, 0.0))
            .unwrap();

        let rewritten = project
            .rename_object(ObjectScope::Scene("S1"), "Door", "ExitDoor")
            .unwrap();
        assert_eq!(rewritten, 1);
        assert_eq!(
            project.scene("S2").unwrap().instances.iter().next().unwrap().object_name,
            "Door"
        );
    }

    #[test]
    fn delete_object_reports_dangling_instances() {
        let mut project = project_with_scenes(&["S1", "S2"]);
        project
            .create_object(ObjectScope::Global, "Coin", "sprite")
            .unwrap();
        project
            .create_instance("S1", Instance::new("Coin", 0.0, 0.0))
            .unwrap();
        project
            .create_instance("S2", Instance::new("Coin", 0.0, 0.0))
            .unwrap();

        let dangling = project.delete_object(ObjectScope::Global, "Coin").unwrap();
        assert_eq!(dangling, 2);
        // references still present until cleanup is requested
        assert_eq!(project.scene("S1").unwrap().instances.len(), 1);
        assert_eq!(project.delete_instances_by_object("S1", "Coin").unwrap(), 1);
        assert_eq!(project.scene("S1").unwrap().instances.len(), 0);
    }

    #[test]
    fn instance_creation_resolves_scene_then_global() {
        let mut project = project_with_scenes(&["S1"]);
        project
            .create_object(ObjectScope::Global, "Coin", "sprite")
            .unwrap();
        project
            .create_object(ObjectScope::Scene("S1"), "Door", "sprite")
            .unwrap();

        project
            .create_instance("S1", Instance::new("Coin", 0.0, 0.0))
            .unwrap();
        project
            .create_instance("S1", Instance::new("Door", 0.0, 0.0))
            .unwrap();
        let err = project
            .create_instance("S1", Instance::new("Ghost", 0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, DocumentError::ObjectNotFound("Ghost".to_string()));
    }

    #[test]
    fn batch_instance_creation_is_per_item() {
        let mut project = project_with_scenes(&["S1"]);
        project
            .create_object(ObjectScope::Global, "Coin", "sprite")
            .unwrap();

        let outcomes = project
            .create_instances(
                "S1",
                vec![
                    Instance::new("Coin", 0.0, 0.0),
                    Instance::new("Ghost", 1.0, 1.0),
                ],
            )
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_ok());
        assert_eq!(
            outcomes[1],
            Err(DocumentError::ObjectNotFound("Ghost".to_string()))
        );
        assert_eq!(project.scene("S1").unwrap().instances.len(), 1);
    }

    #[test]
    fn external_events_lifecycle() {
        let mut project = Project::new("Game");
        project.create_external_events("Shared").unwrap();
        assert_eq!(
            project.create_external_events("Shared").unwrap_err(),
            DocumentError::duplicate("external events", "Shared")
        );
        project.rename_external_events("Shared", "Common").unwrap();
        assert!(project.external_events_mut("Common").is_ok());
        project.delete_external_events("Common").unwrap();
        assert_eq!(
            project.delete_external_events("Common").unwrap_err(),
            DocumentError::not_found("external events", "Common")
        );
    }

    #[test]
    fn extension_registry_is_a_set() {
        let mut project = Project::new("Game");
        assert!(project.register_extension("physics"));
        assert!(!project.register_extension("physics"));
        assert!(project.unregister_extension("physics"));
        assert!(!project.unregister_extension("physics"));
    }

    #[test]
    fn serde_round_trip_is_semantically_stable() {
        let mut project = project_with_scenes(&["Menu", "Level1"]);
        project.set_first_scene(Some("Menu".to_string())).unwrap();
        project
            .create_object(ObjectScope::Global, "Coin", "sprite")
            .unwrap();
        project
            .create_instance("Level1", Instance::new("Coin", 4.0, 2.0))
            .unwrap();
        project.register_extension("physics");
        project
            .global_variables
            .insert("score", lienzo_variant::Variable::from(0.0))
            .unwrap();

        let json = serde_json::to_string_pretty(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, project);
    }
}
