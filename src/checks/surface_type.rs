use crate::roles::Role;
use crate::scene::ObjectId;
use crate::validator::Validator;

/// A mesh may only have one surface of each type. With colliders enabled, collision surfaces
/// are told apart by their collider kind and flags, so any number of them is fine.
pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let mesh = match validator.parent_with_role(id, Role::Mesh) {
        Some(mesh) => mesh,
        None => return vec![],
    };
    if validator.uses_colliders(id) {
        return vec![];
    }

    let surface = validator.object(id).settings.surface;
    let duplicated = validator.scene().children(mesh).any(|sibling| {
        sibling != id
            && validator.role(sibling) == Role::Surface
            && validator.object(sibling).settings.surface == surface
    });

    if duplicated {
        vec!["Multiple surfaces of the same type".to_owned()]
    } else {
        vec![]
    }
}
