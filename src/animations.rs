use itertools::Itertools;
use thiserror::Error;

use crate::names::{AnimationName, AnimationProps};
use crate::roles::Role;
use crate::scene::{ObjectId, ObjectKind, PropertyValue, Scene};
use crate::settings::Settings;
use crate::utils::is_identifier;
use crate::validator::Validator;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkError {
    #[error("Before you can add an animation you need to:{}", numbered(.0))]
    Invalid(Vec<String>),

    #[error("This animation already exists")]
    AlreadyExists(String),
}

fn numbered(errors: &[String]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("\n{}) {}", i + 1, e))
        .join("")
}

/// What the artist picked to mark a new animated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkRequest {
    pub mesh: Option<ObjectId>,
    pub armature: Option<ObjectId>,
    pub state: String,
    pub frame_start: u32,
    pub frame_end: u32,
}

/// An animation stored on an armature: the `hga` key, its value, and the `hgx` export marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedAnimation {
    pub armature: ObjectId,
    pub name: AnimationName,
    pub props: AnimationProps,
}

impl MarkedAnimation {
    pub fn label(&self) -> String {
        format!("{} {}", self.name.entity, self.name.state)
    }

    pub fn prop_name(&self) -> String {
        self.name.to_string()
    }

    pub fn export_prop_name(&self) -> String {
        self.name.get_export_name()
    }

    /// Writes the current props back to the armature.
    pub fn store(&self, scene: &mut Scene) {
        scene
            .get_mut(self.armature)
            .properties
            .insert(self.prop_name(), PropertyValue::Text(self.props.to_string()));
    }
}

/// Everything that has to be fixed before the request can be marked, in the order the
/// artist should go through it.
pub fn mark_errors(validator: &Validator, request: &MarkRequest) -> Vec<String> {
    let mut errors = vec![];

    match request.mesh {
        None => errors.push("Select the animated mesh".to_owned()),
        Some(mesh) if validator.object(mesh).kind != ObjectKind::Mesh => {
            errors.push("Select an entity mesh (selected object is not a mesh)".to_owned())
        }
        Some(mesh) => {
            let object = validator.object(mesh);
            if validator.role(mesh) != Role::Mesh || object.settings.mesh.is_empty() {
                errors.push(
                    "Select an properly set up entity mesh (check the Object tab)".to_owned(),
                );
            } else if !object.skinned {
                errors.push("Skin the mesh before marking for animation".to_owned());
            }
        }
    }

    match request.armature {
        None => errors.push("Select the animating armature".to_owned()),
        Some(armature) if validator.object(armature).kind != ObjectKind::Armature => errors
            .push("Select an armature object (selected object is not an armature)".to_owned()),
        Some(_) => {}
    }

    if request.state.is_empty() {
        errors.push("Enter a name for the animated state".to_owned());
    } else if !is_identifier(&request.state) {
        errors.push("Remove illegal characters from the state name".to_owned());
    } else if let Some(mesh) = request.mesh {
        // Reusing the selection's own state is fine, any other known state is taken.
        let settings = &validator.object(mesh).settings;
        let states = validator.find_states(&settings.entity, None, true, true);
        if states.contains(&request.state) && request.state != settings.state {
            errors.push("Enter a unique state name".to_owned());
        }
    }

    errors
}

/// Marks an animated state: stores its key and value on the armature and enables its export.
pub fn mark_animation(
    scene: &mut Scene,
    settings: &Settings,
    request: &MarkRequest,
) -> Result<MarkedAnimation, MarkError> {
    let (mesh, armature, name) = {
        let validator = Validator::new(scene, settings);
        let errors = mark_errors(&validator, request);
        match (request.mesh, request.armature) {
            (Some(mesh), Some(armature)) if errors.is_empty() => {
                let entity_name = validator.entity_name(mesh, None);
                let name =
                    AnimationName::new(&entity_name.name, &request.state, &entity_name.mesh);
                (mesh, armature, name)
            }
            _ => return Err(MarkError::Invalid(errors)),
        }
    };

    let key = name.to_string();
    if scene.get(armature).properties.contains_key(&key) {
        return Err(MarkError::AlreadyExists(key));
    }

    let marked = MarkedAnimation {
        armature,
        name,
        props: AnimationProps {
            frame_start: request.frame_start,
            frame_end: request.frame_end,
            ..Default::default()
        },
    };
    marked.store(scene);
    scene
        .get_mut(armature)
        .properties
        .insert(marked.export_prop_name(), PropertyValue::Bool(true));

    log::info!(
        "Marked animation [{}] of [{}] on [{}]",
        marked.label(),
        scene.get(mesh).name,
        scene.get(armature).name
    );
    Ok(marked)
}

/// Removes an animation and its export marker from an armature. Returns whether anything
/// was removed.
pub fn unmark_animation(scene: &mut Scene, armature: ObjectId, name: &AnimationName) -> bool {
    let properties = &mut scene.get_mut(armature).properties;
    let removed = properties.shift_remove(&name.to_string()).is_some();
    let removed_export = properties.shift_remove(&name.get_export_name()).is_some();
    removed || removed_export
}

/// The animations stored on an armature, with their values. A short or damaged value keeps
/// its readable fields and defaults the rest, so every key is listed.
pub fn marked_animations(scene: &Scene, armature: ObjectId) -> Vec<MarkedAnimation> {
    let object = scene.get(armature);
    object
        .properties
        .iter()
        .filter_map(|(key, value)| {
            let name = AnimationName::parse(key)?;
            let text = value.as_text().unwrap_or_default();
            let props = AnimationProps::parse(text).unwrap_or_else(|| {
                log::warn!(
                    "The animation [{}] on [{}] has an incomplete value: {:?}",
                    key,
                    object.name,
                    value
                );
                AnimationProps::parse_partial(text)
            });
            Some(MarkedAnimation {
                armature,
                name,
                props,
            })
        })
        .collect()
}
