use crate::names::EntityName;
use crate::scene::Scene;

/// Objects brought back from an earlier export still carry their entity names. Those must
/// parse; a tagged name with broken LOD numbers is corrupt data.
pub fn verify(scene: &Scene) -> Vec<String> {
    let mut errors = vec![];

    for (_, object) in scene.iter() {
        if let Err(e) = EntityName::parse(&object.name) {
            errors.push(format!("The object [{}] has a {}", object.name, e));
        }
    }

    errors
}
