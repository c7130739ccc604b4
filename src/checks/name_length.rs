use crate::scene::ObjectId;
use crate::validator::Validator;

/// Longest export name the asset pipeline accepts.
pub const MAX_NAME_LENGTH: usize = 55;

pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    match validator.get_hge_name(id, None) {
        Some(name) if name.chars().count() > MAX_NAME_LENGTH => {
            vec!["The combined length of all names is too long".to_owned()]
        }
        _ => vec![],
    }
}
