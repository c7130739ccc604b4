use crate::scene::ObjectId;
use crate::utils::is_spot_identifier;
use crate::validator::Validator;

pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let spot_name = &validator.object(id).settings.spot_name;

    if spot_name.is_empty() {
        vec!["Spot name is empty".to_owned()]
    } else if !is_spot_identifier(spot_name) {
        vec!["Spot name contains illegal characters".to_owned()]
    } else {
        vec![]
    }
}
