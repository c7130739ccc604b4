use crate::scene::ObjectId;
use crate::validator::Validator;

/// LOD 1 is shown from distance zero; every further LOD needs the distance it switches at.
pub fn verify(validator: &Validator, id: ObjectId) -> Vec<String> {
    let settings = &validator.object(id).settings;

    if settings.lod == 1 && settings.lod_distance > 0 {
        vec!["LOD distance for LOD 1 must be 0".to_owned()]
    } else if settings.lod > 1 && settings.lod_distance < 1 {
        vec!["Distance should be more than 0".to_owned()]
    } else {
        vec![]
    }
}
