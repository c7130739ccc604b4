use indexmap::IndexMap;
use std::collections::HashSet;

use crate::animations::marked_animations;
use crate::names::{AnimationName, EntityName};
use crate::roles::Role;
use crate::scene::{ObjectId, ObjectKind, PropertyValue, Scene};
use crate::settings::Settings;
use crate::utils::object_name;
use crate::validator::Validator;

/// Decides the export name of every object that has one. A name already taken in this pass is
/// retried with an increasing comment until it is unique.
pub fn plan_export_names(validator: &Validator) -> Vec<(ObjectId, String)> {
    let mut taken = HashSet::new();
    let mut names = vec![];

    for id in validator.scene().ids() {
        let mut name = match validator.get_hge_name(id, None) {
            Some(name) => name,
            None => continue,
        };

        let mut idx = 1;
        while taken.contains(&name) {
            match validator.get_hge_name(id, Some(&idx.to_string())) {
                Some(n) => name = n,
                None => break,
            }
            idx += 1;
        }

        taken.insert(name.clone());
        names.push((id, name));
    }

    names
}

/// Scene renamed to its export names for the duration of an export. The original names are
/// put back when this is dropped, including when the export bails out early.
pub struct ExportNames<'s> {
    scene: &'s mut Scene,
    old_names: Vec<(ObjectId, String)>,
}

impl<'s> ExportNames<'s> {
    pub fn assign(scene: &'s mut Scene, settings: &Settings) -> Self {
        log::info!("Assigning export names");
        let planned = plan_export_names(&Validator::new(scene, settings));

        let mut old_names = Vec::with_capacity(planned.len());
        for (id, name) in planned {
            let object = scene.get_mut(id);
            log::debug!("Rename [{}] to [{}]", object.name, name);
            old_names.push((id, std::mem::replace(&mut object.name, name)));
        }

        ExportNames { scene, old_names }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Number of renamed objects.
    pub fn len(&self) -> usize {
        self.old_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_names.is_empty()
    }
}

impl Drop for ExportNames<'_> {
    fn drop(&mut self) {
        log::info!("Reverting export names");
        for (id, name) in self.old_names.drain(..) {
            self.scene.get_mut(id).name = name;
        }
    }
}

/// One entity mesh (entity, mesh and LOD) and the objects it is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshExport {
    pub label: String,
    pub entity: String,
    pub mesh: String,
    pub lod: String,
    pub export: bool,
    pub objects: Vec<ObjectId>,
}

impl MeshExport {
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.entity, self.mesh, self.lod)
    }

    pub fn matches_entity_name(&self, entity_name: &EntityName) -> bool {
        self.entity == entity_name.name
            && self.mesh == entity_name.mesh
            && self.lod == entity_name.lod.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationExport {
    pub label: String,
    pub armature: String,
    pub property: String,
    pub export: bool,
}

/// What an export pass would produce, for the artist to pick from.
#[derive(Debug, Clone, Default)]
pub struct ExportManifest {
    pub meshes: IndexMap<String, MeshExport>,
    pub animations: Vec<AnimationExport>,
}

/// Adds the missing export marker of every animation key on armatures. Markers default to
/// enabled; existing ones keep their value.
pub fn ensure_export_markers(scene: &mut Scene) {
    let armatures: Vec<ObjectId> = scene
        .iter()
        .filter(|(_, o)| o.kind == ObjectKind::Armature)
        .map(|(id, _)| id)
        .collect();

    for armature in armatures {
        let properties = &mut scene.get_mut(armature).properties;
        let missing: Vec<String> = properties
            .keys()
            .filter_map(|key| AnimationName::parse(key))
            .map(|anim| anim.get_export_name())
            .filter(|export| !properties.contains_key(export))
            .collect();
        for export in missing {
            properties.insert(export, PropertyValue::Bool(true));
        }
    }
}

/// Lists the valid entity meshes and the marked animations of the scene.
pub fn collect_manifest(validator: &Validator) -> ExportManifest {
    let mut manifest = ExportManifest::default();
    let scene = validator.scene();

    for (id, object) in scene.iter() {
        match object.kind {
            ObjectKind::Mesh => {
                if validator.role(id) != Role::Mesh || !validator.is_valid(id) {
                    continue;
                }
                let entity_name = validator.entity_name(id, None);
                let entry = manifest
                    .meshes
                    .entry(entity_name.key())
                    .or_insert_with(|| MeshExport {
                        label: format!(
                            "{} {} (LOD {})",
                            entity_name.name, entity_name.mesh, entity_name.lod
                        ),
                        entity: entity_name.name.clone(),
                        mesh: entity_name.mesh.clone(),
                        lod: entity_name.lod.to_string(),
                        export: true,
                        objects: vec![],
                    });
                entry.objects.push(id);
            }
            ObjectKind::Armature => {
                for marked in marked_animations(scene, id) {
                    let property = marked.export_prop_name();
                    let export = object
                        .properties
                        .get(&property)
                        .map_or(true, PropertyValue::is_truthy);
                    manifest.animations.push(AnimationExport {
                        label: [
                            format!("State:{}", marked.name.state),
                            format!("Entity:{}", marked.name.entity),
                            format!("Mesh:{}", marked.name.mesh),
                            format!("Motion:{}", marked.props.root_motion.as_str()),
                            format!("Start:{}", marked.props.frame_start),
                            format!("End:{}", marked.props.frame_end),
                        ]
                        .join("; "),
                        armature: object_name(scene, id).to_owned(),
                        property,
                        export,
                    });
                }
            }
            _ => {}
        }
    }

    manifest
}
