//! Behavioral properties of the ECS core, exercised through the public API.

use std::collections::HashSet;

use voxelgame_core::{
    ComponentArray, Coordinator, EcsError, Entity, EntityManager, Position3D, Signature, System,
    SystemContext, Transform3D,
};
use voxelgame_shared::{
    ENTITY_MAX, LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START, SHARED_ID_RANGE_STOP,
};

#[derive(Default)]
struct NeedsA;

impl System for NeedsA {
    fn update(&mut self, _ctx: SystemContext<'_>, _delta_t: f32) -> bool {
        true
    }
}

#[derive(Default)]
struct NeedsAB;

impl System for NeedsAB {
    fn update(&mut self, _ctx: SystemContext<'_>, _delta_t: f32) -> bool {
        true
    }
}

fn bit0() -> Signature {
    Signature::EMPTY.with(0)
}

#[test]
fn test_allocation_bound() {
    let mut entities = EntityManager::new(LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START);

    let created: Vec<Entity> = (0..ENTITY_MAX)
        .map(|_| entities.create_entity(bit0()).unwrap())
        .collect();
    assert_eq!(
        entities.create_entity(bit0()),
        Err(EcsError::EntityCapacityReached {
            capacity: ENTITY_MAX
        })
    );

    entities.destroy_entity(created[10]).unwrap();
    assert_eq!(entities.create_entity(bit0()), Ok(created[10]));
    assert!(entities.create_entity(bit0()).is_err());
}

#[test]
fn test_range_isolation() {
    let mut local = EntityManager::new(LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START);
    let mut shared = EntityManager::new(SHARED_ID_RANGE_START, SHARED_ID_RANGE_STOP);

    let mut seen = HashSet::new();
    for _ in 0..ENTITY_MAX {
        let l = local.create_entity(bit0()).unwrap();
        let s = shared.create_entity(bit0()).unwrap();
        assert!(l.raw() < SHARED_ID_RANGE_START);
        assert!(s.raw() >= SHARED_ID_RANGE_START);
        assert!(seen.insert(l));
        assert!(seen.insert(s));
    }
}

#[test]
fn test_signature_sentinel() {
    let mut ecs = Coordinator::with_capacity(1, 100, 4);
    let sig = Signature::EMPTY.with(ecs.register_component::<Position3D>().unwrap());

    let e = ecs.create_entity(sig);
    ecs.remove_entity(e).unwrap();
    assert!(ecs.signature(e).is_empty());

    assert_eq!(
        ecs.try_create_entity(Signature::EMPTY),
        Err(EcsError::EmptySignature)
    );
    assert_eq!(ecs.entities().available_count(), 4);
}

#[test]
fn test_dense_array_integrity() {
    let mut array: ComponentArray<Position3D> = ComponentArray::with_capacity(ENTITY_MAX);
    let n = 200_u32;
    for raw in 1..=n {
        array
            .insert(Entity::from_raw(raw), Position3D::new(raw as f32, 0.0, 0.0))
            .unwrap();
    }

    let removed: HashSet<u32> = (1..=n).filter(|raw| raw % 3 == 0 || raw % 7 == 0).collect();
    for &raw in &removed {
        assert!(array.remove(Entity::from_raw(raw)).is_some());
    }

    let live = n as usize - removed.len();
    assert_eq!(array.len(), live);
    assert_eq!(array.entities().len(), live);

    let mut visited = HashSet::new();
    for (entity, pos) in array.iter() {
        assert!(visited.insert(entity), "{entity} visited twice");
        assert!(!removed.contains(&entity.raw()));
        assert_eq!(array.get(entity), Some(pos));
        assert_eq!(pos.0.x, entity.raw() as f32);
    }
    assert_eq!(visited.len(), live);
}

#[test]
fn test_fifo_reuse_scenario() {
    let mut ecs = Coordinator::with_capacity(1, 100, 4);
    let sig = Signature::EMPTY.with(ecs.register_component::<Position3D>().unwrap());

    let e: Vec<Entity> = (0..4).map(|_| ecs.create_entity(sig)).collect();
    assert!(e.iter().all(|entity| !entity.is_null()));

    assert!(ecs.create_entity(sig).is_null());

    ecs.remove_entity(e[1]).unwrap();
    assert_eq!(ecs.components().array_len(0), Some(3));

    // The queue holds only the freed ID
    let e5 = ecs.create_entity(sig);
    assert_eq!(e5, e[1]);
    assert_eq!(ecs.components().array_len(0), Some(4));
}

#[test]
fn test_system_routing_scenario() {
    let mut ecs = Coordinator::new(LOCAL_ID_RANGE_START, SHARED_ID_RANGE_START);
    let a = Signature::EMPTY.with(ecs.register_component::<Position3D>().unwrap());
    let b = Signature::EMPTY.with(ecs.register_component::<Transform3D>().unwrap());

    ecs.register_system::<NeedsA>(a).unwrap();
    ecs.register_system::<NeedsAB>(a | b).unwrap();

    let only_a = ecs.create_entity(a);
    let both = ecs.create_entity(a | b);

    let x = ecs.system_entities::<NeedsA>().unwrap();
    let y = ecs.system_entities::<NeedsAB>().unwrap();
    assert!(x.contains(&only_a) && x.contains(&both));
    assert!(!y.contains(&only_a) && y.contains(&both));

    ecs.remove_entity(both).unwrap();
    assert!(!ecs.system_entities::<NeedsA>().unwrap().contains(&both));
    assert!(!ecs.system_entities::<NeedsAB>().unwrap().contains(&both));
}

#[test]
fn test_failed_creation_leaves_no_trace() {
    let mut ecs = Coordinator::with_capacity(1, 100, 2);
    let a = Signature::EMPTY.with(ecs.register_component::<Position3D>().unwrap());
    ecs.register_system::<NeedsA>(a).unwrap();

    ecs.create_entity(a);
    ecs.create_entity(a);
    let before = ecs.system_entities::<NeedsA>().unwrap().len();

    assert!(ecs.create_entity(a).is_null());
    assert_eq!(ecs.system_entities::<NeedsA>().unwrap().len(), before);
    assert_eq!(ecs.components().array_len(0), Some(2));
}
