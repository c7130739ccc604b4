use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::checks::{
    lod_distance, mesh_naming, mesh_origin, mesh_state, name_length, parent_mesh, spot_naming,
    surface_type,
};
use crate::names::{AnimationName, EntityName};
use crate::roles::{Role, RoleMap};
use crate::scene::{ObjectId, ObjectKind, Scene, SceneObject, SurfaceKind};
use crate::settings::Settings;

/// Resolves roles and export names of a scene snapshot and reports what is wrong with them.
/// Roles are resolved once when the validator is built, so build a new one after editing the
/// scene.
pub struct Validator<'a> {
    scene: &'a Scene,
    settings: &'a Settings,
    roles: RoleMap,
}

impl<'a> Validator<'a> {
    pub fn new(scene: &'a Scene, settings: &'a Settings) -> Self {
        Validator {
            scene,
            settings,
            roles: RoleMap::resolve(scene),
        }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn object(&self, id: ObjectId) -> &'a SceneObject {
        self.scene.get(id)
    }

    pub fn role(&self, id: ObjectId) -> Role {
        self.roles.role(id)
    }

    pub fn parent_with_role(&self, id: ObjectId, role: Role) -> Option<ObjectId> {
        self.roles.parent_with_role(self.scene, id, role)
    }

    pub fn origin(&self, id: ObjectId) -> Option<ObjectId> {
        self.parent_with_role(id, Role::Origin)
    }

    /// A spot made from a curve, exported as a chain of waypoints.
    pub fn is_spot_path(&self, id: ObjectId) -> bool {
        self.role(id) == Role::Spot && self.object(id).kind == ObjectKind::Curve
    }

    /// Colliders are only composed from kind and flags when the game supports them.
    pub fn uses_colliders(&self, id: ObjectId) -> bool {
        self.object(id).settings.surface == SurfaceKind::Collision && self.settings.enable_colliders
    }

    /// Runs every check that applies to the object's role, grouped by issue.
    pub fn categorized_errors(&self, id: ObjectId) -> IndexMap<&'static str, Vec<String>> {
        let mut errors = IndexMap::<&'static str, Vec<String>>::new();

        match self.role(id) {
            Role::Spot | Role::Surface => {
                errors
                    .entry("No parent mesh")
                    .or_insert(vec![])
                    .extend(parent_mesh::verify(self, id));
                if self.role(id) == Role::Spot {
                    errors
                        .entry("Bad spot name")
                        .or_insert(vec![])
                        .extend(spot_naming::verify(self, id));
                } else {
                    errors
                        .entry("Duplicate surface")
                        .or_insert(vec![])
                        .extend(surface_type::verify(self, id));
                }
            }
            Role::Mesh => {
                errors
                    .entry("Bad origin")
                    .or_insert(vec![])
                    .extend(mesh_origin::verify(self, id));
                errors
                    .entry("Bad mesh naming")
                    .or_insert(vec![])
                    .extend(mesh_naming::verify(self, id));
                errors
                    .entry("Bad state")
                    .or_insert(vec![])
                    .extend(mesh_state::verify(self, id));
                errors
                    .entry("Bad LOD distance")
                    .or_insert(vec![])
                    .extend(lod_distance::verify(self, id));
            }
            _ => {}
        }

        errors
            .entry("Name too long")
            .or_insert(vec![])
            .extend(name_length::verify(self, id));

        errors.retain(|_, e| !e.is_empty());
        errors
    }

    pub fn get_errors(&self, id: ObjectId) -> Vec<String> {
        self.categorized_errors(id)
            .into_iter()
            .flat_map(|(_, errors)| errors)
            .collect()
    }

    pub fn is_valid(&self, id: ObjectId) -> bool {
        self.get_errors(id).is_empty()
    }

    pub fn get_ignored(&self, id: ObjectId) -> Vec<String> {
        if self.role(id) == Role::Ignored {
            vec![format!("{} is ignored", self.object(id).name)]
        } else {
            vec![]
        }
    }

    /// States in use by an entity. `static_meshes` collects the states of its entity meshes
    /// (except `ignore`), `animated` adds the states of every animation key on armatures.
    pub fn find_states(
        &self,
        entity: &str,
        ignore: Option<ObjectId>,
        static_meshes: bool,
        animated: bool,
    ) -> BTreeSet<String> {
        let mut states = BTreeSet::new();
        for (id, object) in self.scene.iter() {
            if Some(id) == ignore {
                continue;
            }
            match object.kind {
                ObjectKind::Mesh if static_meshes => {
                    let settings = &object.settings;
                    if self.role(id) != Role::Mesh || settings.entity != entity {
                        continue;
                    }
                    if !settings.state.is_empty() {
                        states.insert(settings.state.clone());
                    }
                }
                ObjectKind::Armature if animated => {
                    states.extend(
                        object
                            .properties
                            .keys()
                            .filter_map(|key| AnimationName::parse(key))
                            .map(|anim| anim.state),
                    );
                }
                _ => {}
            }
        }
        states
    }

    /// Whether any armature in the scene carries an animation of `state`.
    pub fn has_animated_state(&self, state: &str) -> bool {
        self.scene
            .iter()
            .filter(|(_, o)| o.kind == ObjectKind::Armature)
            .flat_map(|(_, o)| o.properties.keys())
            .filter_map(|key| AnimationName::parse(key))
            .any(|anim| anim.state == state)
    }

    /// The entity name of a mesh object built from its settings.
    pub fn entity_name(&self, id: ObjectId, comment: Option<&str>) -> EntityName {
        let settings = &self.object(id).settings;
        EntityName {
            name: settings.entity.clone(),
            mesh: settings.mesh.clone(),
            lod: settings.lod.into(),
            lod_distance: settings.lod_distance.into(),
            state: Some(settings.state.clone()),
            inherit: Some(settings.inherit_animation.clone()),
            comment: comment.map(str::to_owned),
        }
    }

    /// The name the object is exported under, if its role is exported under a synthetic name.
    /// `comment` disambiguates objects that would otherwise end up with the same name.
    pub fn get_hge_name(&self, id: ObjectId, comment: Option<&str>) -> Option<String> {
        match self.role(id) {
            Role::Spot => self.get_spot_name(id, comment),
            Role::Surface => Some(self.get_surface_name(id, comment)),
            Role::Mesh => Some(self.entity_name(id, comment).to_string()),
            _ => None,
        }
    }

    pub fn get_spot_name(&self, id: ObjectId, comment: Option<&str>) -> Option<String> {
        let settings = &self.object(id).settings;
        if settings.spot_name.is_empty() {
            return None;
        }

        let mut name = settings.spot_name.clone();
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            name = format!("{}^{}", name, comment);
        }

        if !settings.spot_annotation.is_empty() && !self.is_spot_path(id) {
            Some(format!("-{};{}", name, settings.spot_annotation))
        } else {
            Some(format!("-{}", name))
        }
    }

    pub fn get_surface_name(&self, id: ObjectId, comment: Option<&str>) -> String {
        let settings = &self.object(id).settings;
        let mut name = if self.uses_colliders(id) {
            format!(
                "{}:{}",
                settings.surface_collider_kind.as_str(),
                settings.collider_flags.letters()
            )
        } else {
            settings.surface.as_str().to_owned()
        };

        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            name = format!("{}^{}", name, comment);
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ColliderFlags, ColliderKind, ObjectSettings};

    fn mesh_settings(entity: &str, mesh: &str) -> ObjectSettings {
        ObjectSettings {
            entity: entity.into(),
            mesh: mesh.into(),
            ..Default::default()
        }
    }

    fn soldier() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let origin = scene.add(SceneObject::new("Origin", ObjectKind::Empty)).unwrap();
        let body = scene
            .add(
                SceneObject::new("Body", ObjectKind::Mesh)
                    .with_parent(origin)
                    .with_settings(mesh_settings("Soldier", "body")),
            )
            .unwrap();
        (scene, origin, body)
    }

    #[test]
    fn valid_mesh_has_entity_name() {
        let (scene, origin, body) = soldier();
        let settings = Settings::default();
        let validator = Validator::new(&scene, &settings);
        assert!(validator.is_valid(body));
        assert!(validator.is_valid(origin));
        assert_eq!(
            validator.get_hge_name(body, None).as_deref(),
            Some("hgm:Soldier:body:1:0:s=idle")
        );
        assert_eq!(
            validator.get_hge_name(body, Some("1")).as_deref(),
            Some("hgm:Soldier:body:1:0:s=idle:1")
        );
        assert_eq!(validator.get_hge_name(origin, None), None);
    }

    #[test]
    fn get_errors_is_repeatable() {
        let (mut scene, _, body) = soldier();
        scene.get_mut(body).settings.lod_distance = 5;
        scene.get_mut(body).settings.entity = "Sol dier".into();
        let settings = Settings::default();
        let validator = Validator::new(&scene, &settings);
        let first = validator.get_errors(body);
        assert_eq!(first.len(), 2);
        assert_eq!(first, validator.get_errors(body));
    }

    #[test]
    fn spot_names() {
        let (mut scene, _, body) = soldier();
        let spot = scene
            .add(
                SceneObject::new("Hand", ObjectKind::Empty)
                    .with_parent(body)
                    .with_settings(ObjectSettings {
                        spot_name: "Hand".into(),
                        spot_annotation: "weapon".into(),
                        ..Default::default()
                    }),
            )
            .unwrap();
        let path = scene
            .add(
                SceneObject::new("Patrol", ObjectKind::Curve)
                    .with_parent(body)
                    .with_settings(ObjectSettings {
                        spot_name: "Patrol".into(),
                        spot_annotation: "loop".into(),
                        ..Default::default()
                    }),
            )
            .unwrap();
        let unnamed = scene
            .add(SceneObject::new("Empty", ObjectKind::Empty).with_parent(body))
            .unwrap();

        let settings = Settings::default();
        let validator = Validator::new(&scene, &settings);
        assert_eq!(validator.get_hge_name(spot, None).as_deref(), Some("-Hand;weapon"));
        assert_eq!(
            validator.get_hge_name(spot, Some("2")).as_deref(),
            Some("-Hand^2;weapon")
        );
        assert!(validator.is_spot_path(path));
        assert_eq!(validator.get_hge_name(path, None).as_deref(), Some("-Patrol"));
        assert_eq!(validator.get_hge_name(unnamed, None), None);
    }

    #[test]
    fn surface_names() {
        let (mut scene, _, body) = soldier();
        let collider = scene
            .add(
                SceneObject::new("Collider", ObjectKind::Mesh)
                    .with_parent(body)
                    .with_settings(ObjectSettings {
                        surface_collider_kind: ColliderKind::CollisionBox,
                        collider_flags: ColliderFlags {
                            terrain: true,
                            passability: false,
                            visibility: true,
                            obstruction: false,
                            action_camera: false,
                            interaction: true,
                        },
                        ..Default::default()
                    }),
            )
            .unwrap();
        let walk = scene
            .add(
                SceneObject::new("Walkable", ObjectKind::Mesh)
                    .with_parent(body)
                    .with_settings(ObjectSettings {
                        surface: SurfaceKind::Walk,
                        ..Default::default()
                    }),
            )
            .unwrap();

        let mut settings = Settings::default();
        {
            let validator = Validator::new(&scene, &settings);
            assert_eq!(
                validator.get_hge_name(collider, None).as_deref(),
                Some("CollisionBox:TVI")
            );
            assert_eq!(validator.get_hge_name(walk, Some("1")).as_deref(), Some("Walk^1"));
        }

        settings.enable_colliders = false;
        let validator = Validator::new(&scene, &settings);
        assert_eq!(validator.get_hge_name(collider, None).as_deref(), Some("Collision"));
    }

    #[test]
    fn ignored_objects_are_listed() {
        let (mut scene, origin, body) = soldier();
        scene.get_mut(body).settings.ignore = true;
        let settings = Settings::default();
        let validator = Validator::new(&scene, &settings);
        assert_eq!(validator.get_ignored(body), vec!["Body is ignored".to_owned()]);
        assert!(validator.get_ignored(origin).is_empty());
        assert!(validator.is_valid(body));
    }

    #[test]
    fn find_states_by_source() {
        let (mut scene, origin, body) = soldier();
        let mut walk = mesh_settings("Soldier", "body_walk");
        walk.state = "walk".into();
        scene
            .add(
                SceneObject::new("Walk", ObjectKind::Mesh)
                    .with_parent(origin)
                    .with_settings(walk),
            )
            .unwrap();
        let mut rig = SceneObject::new("Rig", ObjectKind::Armature);
        rig.properties.insert(
            "hga:Soldier:run:body".into(),
            crate::scene::PropertyValue::Text("None:1:2:False:True".into()),
        );
        scene.add(rig).unwrap();

        let settings = Settings::default();
        let validator = Validator::new(&scene, &settings);
        let all = validator.find_states("Soldier", None, true, true);
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec!["idle", "run", "walk"]);
        let static_only = validator.find_states("Soldier", Some(body), true, false);
        assert_eq!(static_only.into_iter().collect::<Vec<_>>(), vec!["walk"]);
        assert!(validator.has_animated_state("run"));
        assert!(!validator.has_animated_state("walk"));
    }
}
