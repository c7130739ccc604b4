use lazy_static::lazy_static;
use regex::Regex;

use crate::scene::{ObjectId, Scene};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
    static ref SPOT_IDENTIFIER: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Entity and animated state names only allow ascii letters, digits and underscores.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Spot names additionally allow dashes.
pub fn is_spot_identifier(name: &str) -> bool {
    SPOT_IDENTIFIER.is_match(name)
}

/// Name of an object for log output.
pub fn object_name(scene: &Scene, id: ObjectId) -> &str {
    let name = scene.get(id).name.as_str();
    if name.is_empty() {
        "(no name)"
    } else {
        name
    }
}
