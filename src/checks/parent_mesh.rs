use crate::roles::Role;
use crate::scene::ObjectId;
use crate::validator::Validator;

/// Spots and surfaces hang off an entity mesh (spots may use a bone instead), and are only
/// exported when that mesh is valid itself.
pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let mut errors = vec![];

    match validator.parent_with_role(id, Role::Mesh) {
        None => {
            if !validator.object(id).has_parent_bone() {
                errors.push("There is no parent mesh object".to_owned());
            }
        }
        Some(mesh) => {
            if !validator.is_valid(mesh) {
                errors.push("The mesh object has errors".to_owned());
            }
        }
    }

    errors
}
