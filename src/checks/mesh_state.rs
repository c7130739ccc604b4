use crate::names::NO_INHERIT;
use crate::scene::ObjectId;
use crate::validator::Validator;

/// The state of an entity mesh must be unique among the entity's LOD 1 meshes, and a skinned
/// mesh needs an animation for its state unless it inherits animations from elsewhere.
pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let mut errors = vec![];
    let object = validator.object(id);
    let settings = &object.settings;

    if settings.state.is_empty() {
        errors.push("State name is empty".to_owned());
        return errors;
    }
    if settings.entity.is_empty() {
        return errors;
    }

    let states = validator.find_states(&settings.entity, Some(id), true, false);
    if states.contains(&settings.state) && settings.lod == 1 {
        errors.push("State name is not unique".to_owned());
    }

    if object.skinned
        && !validator.has_animated_state(&settings.state)
        && settings.inherit_animation == NO_INHERIT
    {
        errors.push("State of skinned mesh is not animated".to_owned());
    }

    errors
}
