use hge_scene_check::scene::{ColliderKind, PropertyValue, SurfaceKind};
use hge_scene_check::{
    ObjectId, ObjectKind, ObjectSettings, Role, Scene, SceneObject, Settings, Validator,
};

fn entity_mesh(entity: &str, mesh: &str) -> ObjectSettings {
    ObjectSettings {
        entity: entity.into(),
        mesh: mesh.into(),
        ..Default::default()
    }
}

fn add(scene: &mut Scene, object: SceneObject) -> ObjectId {
    scene.add(object).unwrap()
}

fn tank() -> (Scene, ObjectId, ObjectId) {
    let mut scene = Scene::new();
    let origin = add(&mut scene, SceneObject::new("Origin", ObjectKind::Empty));
    let hull = add(
        &mut scene,
        SceneObject::new("Hull", ObjectKind::Mesh)
            .with_parent(origin)
            .with_settings(entity_mesh("Tank", "hull")),
    );
    (scene, origin, hull)
}

fn two_collision_surfaces() -> (Scene, ObjectId, ObjectId) {
    let (mut scene, _, hull) = tank();
    let a = add(
        &mut scene,
        SceneObject::new("A", ObjectKind::Mesh)
            .with_parent(hull)
            .with_settings(ObjectSettings {
                surface_collider_kind: ColliderKind::CollisionSphere,
                ..Default::default()
            }),
    );
    let b = add(&mut scene, SceneObject::new("B", ObjectKind::Mesh).with_parent(hull));
    (scene, a, b)
}

#[test]
fn mesh_without_origin() {
    let mut scene = Scene::new();
    let rig = add(&mut scene, SceneObject::new("Rig", ObjectKind::Armature));
    let nested_rig = add(
        &mut scene,
        SceneObject::new("Nested", ObjectKind::Armature).with_parent(rig),
    );
    let skin = add(
        &mut scene,
        SceneObject::new("Skin", ObjectKind::Mesh)
            .with_parent(nested_rig)
            .with_settings(entity_mesh("Tank", "hull")),
    );
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.role(skin), Role::Mesh);
    assert!(validator
        .get_errors(skin)
        .contains(&"There's no origin object".to_owned()));
}

#[test]
fn lod_one_must_have_zero_distance() {
    let (mut scene, _, hull) = tank();
    let settings = Settings::default();

    scene.get_mut(hull).settings.lod_distance = 5;
    assert_eq!(
        Validator::new(&scene, &settings).get_errors(hull),
        vec!["LOD distance for LOD 1 must be 0"]
    );

    scene.get_mut(hull).settings.lod_distance = 0;
    assert!(Validator::new(&scene, &settings).is_valid(hull));
}

#[test]
fn higher_lods_need_distance() {
    let (mut scene, _, hull) = tank();
    scene.get_mut(hull).settings.lod = 3;
    let settings = Settings::default();
    assert_eq!(
        Validator::new(&scene, &settings).get_errors(hull),
        vec!["Distance should be more than 0"]
    );
}

#[test]
fn duplicate_collision_surfaces_without_colliders() {
    let (scene, a, b) = two_collision_surfaces();
    let settings = Settings {
        enable_colliders: false,
        ..Default::default()
    };
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.role(a), Role::Surface);
    assert_eq!(validator.get_errors(a), vec!["Multiple surfaces of the same type"]);
    assert_eq!(validator.get_errors(b), vec!["Multiple surfaces of the same type"]);
}

#[test]
fn duplicate_collision_surfaces_with_colliders() {
    let (mut scene, a, b) = two_collision_surfaces();
    // Identical kind and flags are still allowed.
    scene.get_mut(a).settings.surface_collider_kind = ColliderKind::Collision;
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert!(validator.is_valid(a));
    assert!(validator.is_valid(b));
}

#[test]
fn duplicate_walk_surfaces_always_fail() {
    let (mut scene, a, b) = two_collision_surfaces();
    scene.get_mut(a).settings.surface = SurfaceKind::Walk;
    scene.get_mut(b).settings.surface = SurfaceKind::Walk;
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert!(!validator.is_valid(a));
    assert!(!validator.is_valid(b));
}

#[test]
fn surface_of_broken_mesh() {
    let (mut scene, a, _) = two_collision_surfaces();
    let hull = scene.parent(a).unwrap();
    scene.get_mut(hull).settings.mesh.clear();
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.get_errors(hull), vec!["Mesh name is empty"]);
    assert_eq!(validator.get_errors(a), vec!["The mesh object has errors"]);
}

#[test]
fn ignored_origin() {
    let (mut scene, origin, hull) = tank();
    scene.get_mut(origin).settings.ignore = true;
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.role(origin), Role::Ignored);
    assert_eq!(validator.role(hull), Role::Unclassified);
    assert!(validator.get_errors(hull).is_empty());
}

#[test]
fn spots_need_a_mesh_or_bone() {
    let mut scene = Scene::new();
    let rig = add(&mut scene, SceneObject::new("Rig", ObjectKind::Armature));
    let bone_spot = add(
        &mut scene,
        SceneObject::new("Muzzle", ObjectKind::Curve)
            .with_parent(rig)
            .with_parent_bone("gun")
            .with_settings(ObjectSettings {
                spot_name: "Muzzle".into(),
                ..Default::default()
            }),
    );
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.role(bone_spot), Role::Spot);
    assert!(validator.is_valid(bone_spot));
}

#[test]
fn empty_spot_name() {
    let (mut scene, _, hull) = tank();
    let spot = add(&mut scene, SceneObject::new("Spot", ObjectKind::Empty).with_parent(hull));
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.get_errors(spot), vec!["Spot name is empty"]);
    assert_eq!(validator.get_hge_name(spot, None), None);
}

#[test]
fn multiple_origins_for_one_mesh() {
    let (mut scene, _, hull) = tank();
    let other_origin = add(&mut scene, SceneObject::new("Origin2", ObjectKind::Empty));
    let copy = add(
        &mut scene,
        SceneObject::new("Hull2", ObjectKind::Mesh)
            .with_parent(other_origin)
            .with_settings(ObjectSettings {
                state: "damaged".into(),
                ..entity_mesh("Tank", "hull")
            }),
    );
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.get_errors(hull), vec!["Multiple origins for the same mesh"]);
    assert_eq!(validator.get_errors(copy), vec!["Multiple origins for the same mesh"]);
}

#[test]
fn state_uniqueness_only_applies_to_lod_one() {
    let (mut scene, origin, hull) = tank();
    let far = add(
        &mut scene,
        SceneObject::new("HullFar", ObjectKind::Mesh)
            .with_parent(origin)
            .with_settings(ObjectSettings {
                mesh: "hull_far".into(),
                lod: 2,
                lod_distance: 50,
                ..entity_mesh("Tank", "hull")
            }),
    );
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(validator.get_errors(hull), vec!["State name is not unique"]);
    assert!(validator.is_valid(far));
}

#[test]
fn skinned_state_needs_animation_or_inheritance() {
    let (mut scene, _, hull) = tank();
    scene.get_mut(hull).skinned = true;
    let settings = Settings::default();
    assert_eq!(
        Validator::new(&scene, &settings).get_errors(hull),
        vec!["State of skinned mesh is not animated"]
    );

    scene.get_mut(hull).settings.set_inherit_animation("Male");
    assert!(Validator::new(&scene, &settings).is_valid(hull));

    scene.get_mut(hull).settings.set_inherit_animation("None");
    let mut rig = SceneObject::new("Rig", ObjectKind::Armature);
    rig.properties.insert(
        "hga:Other:idle:body".into(),
        PropertyValue::Text("None:1:2:False:True".into()),
    );
    add(&mut scene, rig);
    assert!(Validator::new(&scene, &settings).is_valid(hull));
}

#[test]
fn empty_names() {
    let (mut scene, _, hull) = tank();
    {
        let settings = &mut scene.get_mut(hull).settings;
        settings.entity.clear();
        settings.mesh.clear();
        settings.state.clear();
    }
    let settings = Settings::default();
    assert_eq!(
        Validator::new(&scene, &settings).get_errors(hull),
        vec!["Entity name is empty", "Mesh name is empty", "State name is empty"]
    );
}

#[test]
fn long_names_are_rejected() {
    let (mut scene, _, hull) = tank();
    scene.get_mut(hull).settings.entity = "A_very_long_entity_name_for_a_tank".into();
    scene.get_mut(hull).settings.mesh = "hull_with_turret".into();
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    assert_eq!(
        validator.get_hge_name(hull, None).unwrap().len(),
        "hgm:A_very_long_entity_name_for_a_tank:hull_with_turret:1:0:s=idle".len()
    );
    assert_eq!(
        validator.get_errors(hull),
        vec!["The combined length of all names is too long"]
    );
}

#[test]
fn errors_accumulate_across_rules() {
    let (mut scene, _, hull) = tank();
    {
        let settings = &mut scene.get_mut(hull).settings;
        settings.entity = "Tank!".into();
        settings.lod = 2;
    }
    scene.get_mut(hull).skinned = true;
    let settings = Settings::default();
    let validator = Validator::new(&scene, &settings);
    let errors = validator.get_errors(hull);
    assert_eq!(
        errors,
        vec![
            "Entity name contains illegal characters",
            "State of skinned mesh is not animated",
            "Distance should be more than 0",
        ]
    );
    assert_eq!(errors, validator.get_errors(hull));
}
