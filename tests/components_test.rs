use cgmath::{Matrix4, Point3, Rotation3, Vector3};
use flow_gltfio::{
    Aabb, Capability, Engine,
    components::{NameComponentManager, TransformManager},
    data_structures::{entity::EntityManager, transform::Transform},
};

#[test]
fn should_invalidate_recycled_entity_handles() {
    let mut entities = EntityManager::new();
    let first = entities.create();
    assert!(entities.destroy(first));
    assert!(!entities.destroy(first));

    let second = entities.create();

    assert_eq!(second.index(), first.index());
    assert_ne!(second, first);
    assert!(entities.is_alive(second));
    assert!(!entities.is_alive(first));
}

#[test]
fn should_report_no_capabilities_for_dead_entities() {
    let mut engine = Engine::new();
    let entity = engine.entities_mut().create();
    engine.names_mut().set_name(entity, "Lamp");
    engine.transforms_mut().create(entity, None, Transform::new());
    assert!(engine.has_capability(entity, Capability::Name));
    assert!(engine.has_capability(entity, Capability::Transform));

    engine.destroy_entity(entity);

    assert!(!engine.has_capability(entity, Capability::Name));
    assert!(!engine.has_capability(entity, Capability::Transform));
}

#[test]
fn should_propagate_world_transforms_to_children() {
    let mut entities = EntityManager::new();
    let mut transforms = TransformManager::new();
    let [parent, child] = [entities.create(), entities.create()];
    transforms.create(parent, None, Transform::from(Vector3::new(1.0, 0.0, 0.0)));
    transforms.create(child, Some(parent), Transform::from(Vector3::new(0.0, 1.0, 0.0)));

    transforms.set_local_transform(parent, Transform::from(Vector3::new(3.0, 0.0, 0.0)));

    let world = transforms.world_matrix(child).expect("child transform");
    assert_eq!(world.w.truncate(), Vector3::new(3.0, 1.0, 0.0));
    assert_eq!(transforms.children(parent), &[child]);
    let relative = transforms.relative_matrix(child, parent).expect("invertible");
    assert_eq!(relative.w.truncate(), Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn should_detach_children_of_destroyed_transforms() {
    let mut entities = EntityManager::new();
    let mut transforms = TransformManager::new();
    let [parent, child] = [entities.create(), entities.create()];
    transforms.create(parent, None, Transform::from(Vector3::new(1.0, 0.0, 0.0)));
    transforms.create(child, Some(parent), Transform::new());

    transforms.destroy(parent);

    assert_eq!(transforms.parent(child), None);
    let world = transforms.world_matrix(child).expect("child transform");
    assert_eq!(world.w.truncate(), Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_attach_to_root_when_parent_has_no_transform() {
    let mut entities = EntityManager::new();
    let mut transforms = TransformManager::new();
    let [orphan_parent, child] = [entities.create(), entities.create()];

    transforms.create(child, Some(orphan_parent), Transform::new());

    assert_eq!(transforms.parent(child), None);
}

#[test]
fn should_find_first_name_in_iteration_order() {
    let mut entities = EntityManager::new();
    let mut names = NameComponentManager::new();
    let list = entities.create_many(3);
    for (entity, name) in list.iter().zip(["Head", "Hand", "Hand"]) {
        names.set_name(*entity, name);
    }

    assert_eq!(names.first_by_name(&list, "Hand"), Some(list[1]));
    assert_eq!(names.first_by_name(list.iter().rev(), "Hand"), Some(list[2]));
    assert_eq!(names.first_by_name(&list, "Foot"), None);
}

#[test]
fn should_union_boxes_and_ignore_empty_ones() {
    let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    let b = Aabb::new(Point3::new(-2.0, 0.5, 0.5), Point3::new(0.5, 3.0, 0.5));

    let union = a.union(&b);

    assert_eq!(union.min, Point3::new(-2.0, 0.0, 0.0));
    assert_eq!(union.max, Point3::new(1.0, 3.0, 1.0));
    assert_eq!(a.union(&Aabb::empty()), a);
    assert!(Aabb::empty().is_empty());
    assert_eq!(a.center(), Point3::new(0.5, 0.5, 0.5));
    assert_eq!(a.extent(), Vector3::new(0.5, 0.5, 0.5));
}

#[test]
fn should_transform_boxes_through_rotation() {
    let unit = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
    let rotation = Matrix4::from(cgmath::Quaternion::from_angle_z(cgmath::Deg(90.0)));

    let rotated = unit.transform(&rotation);

    assert!((rotated.min.x + 1.0).abs() < 1e-5);
    assert!((rotated.max.x - 0.0).abs() < 1e-5);
    assert!((rotated.min.y - 0.0).abs() < 1e-5);
    assert!((rotated.max.y - 2.0).abs() < 1e-5);
}

#[test]
fn should_compose_transforms_like_matrices() {
    let parent = Transform {
        position: Vector3::new(1.0, 0.0, 0.0),
        rotation: cgmath::Quaternion::from_angle_y(cgmath::Deg(90.0)),
        scale: Vector3::new(2.0, 2.0, 2.0),
    };
    let child = Transform::from(Vector3::new(0.0, 0.0, 1.0));

    let composed = (parent * child).to_matrix();
    let expected = parent.to_matrix() * child.to_matrix();

    for col in 0..4 {
        for row in 0..4 {
            assert!((composed[col][row] - expected[col][row]).abs() < 1e-5);
        }
    }
}
