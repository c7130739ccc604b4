use crate::roles::Role;
use crate::scene::ObjectId;
use crate::validator::Validator;

/// Every entity mesh needs an origin, and all objects of one entity mesh share it.
pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let origin = match validator.origin(id) {
        Some(origin) => origin,
        None => return vec!["There's no origin object".to_owned()],
    };

    let settings = &validator.object(id).settings;
    let conflicting = validator.scene().iter().any(|(other, object)| {
        other != id
            && validator.role(other) == Role::Mesh
            && object.settings.entity == settings.entity
            && object.settings.mesh == settings.mesh
            && validator.origin(other) != Some(origin)
    });

    if conflicting {
        vec!["Multiple origins for the same mesh".to_owned()]
    } else {
        vec![]
    }
}
