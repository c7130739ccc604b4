pub mod animations;
pub mod checks;
pub mod export;
pub mod names;
pub mod roles;
pub mod scene;
pub mod settings;
pub mod stats;
pub mod utils;
pub mod validator;

pub use names::{AnimationName, EntityName, NameError};
pub use roles::{resolve_role, Role};
pub use scene::{ObjectId, ObjectKind, ObjectSettings, Scene, SceneObject};
pub use settings::Settings;
pub use validator::Validator;
