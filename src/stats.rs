use std::collections::BTreeSet;
use std::fmt;

use crate::names::AnimationName;
use crate::roles::Role;
use crate::scene::{ObjectId, ObjectKind};
use crate::utils::object_name;
use crate::validator::Validator;

/// Overview of what a scene would export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStatistics {
    pub entities: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub meshes: Vec<String>,
    pub meshes_with_errors: Vec<String>,
    pub spots: Vec<String>,
    pub spots_with_errors: Vec<String>,
    pub surfaces: Vec<String>,
    pub surfaces_with_errors: Vec<String>,
    pub ignored: Vec<String>,
    /// Armature and animation key of every marked animation.
    pub animations: Vec<(String, String)>,
}

impl SceneStatistics {
    pub fn collect(validator: &Validator) -> SceneStatistics {
        let mut stats = SceneStatistics::default();
        let scene = validator.scene();

        for (id, object) in scene.iter() {
            let name = || object_name(scene, id).to_owned();
            let role = validator.role(id);

            // Invalid meshes don't count towards entities and states.
            match role {
                Role::Mesh => {
                    stats.meshes.push(name());
                    if !validator.is_valid(id) {
                        stats.meshes_with_errors.push(name());
                    } else {
                        let settings = &object.settings;
                        if !settings.entity.is_empty() {
                            stats.entities.insert(settings.entity.clone());
                        }
                        if !settings.state.is_empty() {
                            stats.states.insert(settings.state.clone());
                        }
                    }
                }
                Role::Spot => {
                    stats.spots.push(name());
                    if !validator.is_valid(id) {
                        stats.spots_with_errors.push(name());
                    }
                }
                Role::Surface => {
                    stats.surfaces.push(name());
                    if !validator.is_valid(id) {
                        stats.surfaces_with_errors.push(name());
                    }
                }
                _ if object.kind == ObjectKind::Armature => {
                    stats.collect_animations(validator, id);
                }
                Role::Ignored => stats.ignored.push(name()),
                _ => {}
            }
        }

        stats
    }

    fn collect_animations(&mut self, validator: &Validator, armature: ObjectId) {
        let object = validator.object(armature);
        for key in object.properties.keys() {
            if let Some(anim) = AnimationName::parse(key) {
                self.animations.push((object.name.clone(), key.clone()));
                self.states.insert(anim.state);
            }
        }
    }
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    all: &[String],
    with_errors: &[String],
) -> fmt::Result {
    writeln!(f, "{}: {} ({} errors)", title, all.len(), with_errors.len())?;
    for (i, name) in with_errors.iter().enumerate() {
        writeln!(f, "  {}) {}", i + 1, name)?;
    }
    Ok(())
}

impl fmt::Display for SceneStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Entities: {}", self.entities.len())?;
        writeln!(f, "States: {}", self.states.len())?;
        write_section(f, "Mesh objects", &self.meshes, &self.meshes_with_errors)?;
        write_section(f, "Spot objects", &self.spots, &self.spots_with_errors)?;
        write_section(f, "Surface objects", &self.surfaces, &self.surfaces_with_errors)?;
        writeln!(f, "Ignored objects: {}", self.ignored.len())?;
        for (i, name) in self.ignored.iter().enumerate() {
            writeln!(f, "  {}) {}", i + 1, name)?;
        }
        write!(f, "Animations: {}", self.animations.len())
    }
}
