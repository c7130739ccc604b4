use crate::scene::ObjectId;
use crate::utils::is_identifier;
use crate::validator::Validator;

pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let mut errors: Vec<String> = vec![];
    let settings = &validator.object(id).settings;

    if settings.entity.is_empty() {
        errors.push("Entity name is empty".into());
    } else if !is_identifier(&settings.entity) {
        errors.push("Entity name contains illegal characters".into());
    }

    if settings.mesh.is_empty() {
        errors.push("Mesh name is empty".into());
    }

    errors
}
