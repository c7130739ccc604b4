use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::names::NO_INHERIT;

/// Highest level of detail an entity mesh may declare.
pub const MAX_LOD: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("object [{object}] has unknown parent [{parent}]")]
    UnknownParent { object: String, parent: String },

    #[error("object [{0}] is its own ancestor")]
    ParentCycle(String),

    #[error("object name [{0}] is used more than once")]
    DuplicateName(String),

    #[error("object [{object}] has LOD {lod}, LODs range from 1 to 5")]
    LodOutOfRange { object: String, lod: u32 },
}

/// Stable handle of an object within one [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectKind {
    Mesh,
    Armature,
    Curve,
    Empty,
    #[serde(other)]
    Other,
}

impl ObjectKind {
    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::Mesh => "MESH",
            ObjectKind::Armature => "ARMATURE",
            ObjectKind::Curve => "CURVE",
            ObjectKind::Empty => "EMPTY",
            ObjectKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Collision,
    Walk,
    BlockPass,
    Height,
    HexShape,
    Build,
    Selection,
    TerrainHole,
    Terrain,
}

impl SurfaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::Collision => "Collision",
            SurfaceKind::Walk => "Walk",
            SurfaceKind::BlockPass => "BlockPass",
            SurfaceKind::Height => "Height",
            SurfaceKind::HexShape => "HexShape",
            SurfaceKind::Build => "Build",
            SurfaceKind::Selection => "Selection",
            SurfaceKind::TerrainHole => "TerrainHole",
            SurfaceKind::Terrain => "Terrain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum ColliderKind {
    CollisionBox,
    CollisionSphere,
    CollisionCapsule,
    /// Arbitrary mesh collider.
    #[default]
    Collision,
}

impl ColliderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColliderKind::CollisionBox => "CollisionBox",
            ColliderKind::CollisionSphere => "CollisionSphere",
            ColliderKind::CollisionCapsule => "CollisionCapsule",
            ColliderKind::Collision => "Collision",
        }
    }
}

/// Collider flags of a collision surface. Declaration order is the order their letters
/// appear in the exported surface name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColliderFlags {
    pub terrain: bool,
    pub passability: bool,
    pub visibility: bool,
    pub obstruction: bool,
    pub action_camera: bool,
    pub interaction: bool,
}

impl Default for ColliderFlags {
    fn default() -> Self {
        ColliderFlags {
            terrain: false,
            passability: true,
            visibility: true,
            obstruction: true,
            action_camera: false,
            interaction: false,
        }
    }
}

impl ColliderFlags {
    /// The letters of the set flags, e.g. `PVS` for the defaults.
    pub fn letters(&self) -> String {
        [
            (self.terrain, 'T'),
            (self.passability, 'P'),
            (self.visibility, 'V'),
            (self.obstruction, 'S'),
            (self.action_camera, 'A'),
            (self.interaction, 'I'),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, letter)| *letter)
        .collect()
    }

    fn any(&self) -> bool {
        !self.letters().is_empty()
    }
}

/// The export metadata an artist enters on an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ObjectSettings {
    pub ignore: bool,
    pub entity: String,
    pub mesh: String,
    pub state: String,
    pub lod: u32,
    pub lod_distance: u32,
    pub inherit_animation: String,
    pub surface: SurfaceKind,
    pub surface_collider_kind: ColliderKind,
    pub collider_flags: ColliderFlags,
    pub spot_name: String,
    pub spot_annotation: String,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        ObjectSettings {
            ignore: false,
            entity: String::new(),
            mesh: String::new(),
            state: "idle".to_owned(),
            lod: 1,
            lod_distance: 0,
            inherit_animation: NO_INHERIT.to_owned(),
            surface: SurfaceKind::Collision,
            surface_collider_kind: ColliderKind::Collision,
            collider_flags: ColliderFlags::default(),
            spot_name: String::new(),
            spot_annotation: String::new(),
        }
    }
}

impl ObjectSettings {
    /// Inheriting meshes carry the reserved `_mesh` state; going back to no inheritance
    /// restores `idle`.
    pub fn set_inherit_animation(&mut self, inherit: &str) {
        self.inherit_animation = inherit.to_owned();
        self.state = if inherit != NO_INHERIT {
            "_mesh".to_owned()
        } else {
            "idle".to_owned()
        };
    }

    /// A collision surface always keeps at least one flag: clearing all of them
    /// brings back passability, visibility and obstruction.
    pub fn set_collider_flags(&mut self, flags: ColliderFlags) {
        self.collider_flags = flags;
        if !self.collider_flags.any() {
            self.collider_flags.passability = true;
            self.collider_flags.visibility = true;
            self.collider_flags.obstruction = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::Int(i) => *i != 0,
            PropertyValue::Text(t) => !t.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub parent: Option<ObjectId>,
    pub parent_bone: Option<String>,
    pub settings: ObjectSettings,
    /// The mesh has vertex groups.
    pub skinned: bool,
    /// Custom properties, which hold the animation keys of armatures.
    pub properties: IndexMap<String, PropertyValue>,
}

impl SceneObject {
    pub fn new(name: &str, kind: ObjectKind) -> Self {
        SceneObject {
            name: name.to_owned(),
            kind,
            parent: None,
            parent_bone: None,
            settings: ObjectSettings::default(),
            skinned: false,
            properties: IndexMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_parent_bone(mut self, bone: &str) -> Self {
        self.parent_bone = Some(bone.to_owned());
        self
    }

    pub fn with_settings(mut self, settings: ObjectSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn skinned(mut self) -> Self {
        self.skinned = true;
        self
    }

    pub fn has_parent_bone(&self) -> bool {
        self.parent_bone.as_deref().map_or(false, |b| !b.is_empty())
    }
}

/// Snapshot of the authoring scene. Objects live in an arena and refer to their parent by id,
/// so the graph holds no ownership between nodes.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// Adds an object. Its parent has to be in the scene already, which keeps the graph acyclic.
    pub fn add(&mut self, object: SceneObject) -> Result<ObjectId, SceneError> {
        if let Some(parent) = object.parent {
            if parent.0 >= self.objects.len() {
                return Err(SceneError::UnknownParent {
                    object: object.name,
                    parent: format!("#{}", parent.0),
                });
            }
        }
        if self.find(&object.name).is_some() {
            return Err(SceneError::DuplicateName(object.name));
        }
        self.objects.push(object);
        Ok(ObjectId(self.objects.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id.0]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut SceneObject {
        &mut self.objects[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len()).map(ObjectId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i), o))
    }

    pub fn children(&self, parent: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        self.iter()
            .filter(move |(_, o)| o.parent == Some(parent))
            .map(|(id, _)| id)
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, o)| o.name == name).map(|(id, _)| id)
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id).parent
    }

    pub fn load(path: &Path) -> anyhow::Result<Scene> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Scene::from_toml_str(&contents)
            .with_context(|| format!("Failed to load scene {}", path.display()))
    }

    /// Reads a snapshot written as a list of `[[object]]` tables. Parents are referenced by
    /// name and may be declared after their children.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Scene> {
        let file: SceneFile = toml::from_str(contents)?;

        let mut index = HashMap::new();
        for (i, entry) in file.objects.iter().enumerate() {
            if index.insert(entry.name.as_str(), i).is_some() {
                return Err(SceneError::DuplicateName(entry.name.clone()).into());
            }
            if !(1..=MAX_LOD).contains(&entry.settings.lod) {
                return Err(SceneError::LodOutOfRange {
                    object: entry.name.clone(),
                    lod: entry.settings.lod,
                }
                .into());
            }
        }

        let mut objects = Vec::with_capacity(file.objects.len());
        for entry in &file.objects {
            let parent = match &entry.parent {
                None => None,
                Some(p) => Some(ObjectId(*index.get(p.as_str()).ok_or_else(|| {
                    SceneError::UnknownParent {
                        object: entry.name.clone(),
                        parent: p.clone(),
                    }
                })?)),
            };
            objects.push(SceneObject {
                name: entry.name.clone(),
                kind: entry.kind,
                parent,
                parent_bone: entry.parent_bone.clone(),
                settings: entry.settings.clone(),
                skinned: entry.skinned,
                properties: entry.properties.clone(),
            });
        }

        let scene = Scene { objects };
        scene.check_acyclic()?;
        Ok(scene)
    }

    fn check_acyclic(&self) -> Result<(), SceneError> {
        for (id, object) in self.iter() {
            let mut current = object.parent;
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if p == id || steps > self.objects.len() {
                    return Err(SceneError::ParentCycle(object.name.clone()));
                }
                current = self.parent(p);
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(rename = "object", default)]
    objects: Vec<ObjectEntry>,
}

#[derive(Deserialize)]
struct ObjectEntry {
    name: String,
    #[serde(rename = "type")]
    kind: ObjectKind,
    parent: Option<String>,
    parent_bone: Option<String>,
    #[serde(default)]
    skinned: bool,
    #[serde(default)]
    settings: ObjectSettings,
    #[serde(default)]
    properties: IndexMap<String, PropertyValue>,
}
