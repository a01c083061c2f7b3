//! End-to-end tests for the tick pipeline.

use kiln_core::ecs::{Health, Lifespan, Meta, Motion, Transform};
use kiln_core::glam::Vec2;
use kiln_core::{
    ArchetypeId, ArchetypeManager, ComponentType, EntityLifecycle, EntityMemoryPool, EntityRecord,
    EventPayload, EventType, Logic, LogicContext, MatchMode, Scene, SceneError, Subscriber,
};

/// Integrates motion into position for every moving entity.
struct Movement;

impl Logic for Movement {
    fn requirement(&self) -> ArchetypeId {
        ArchetypeId::from_types(&[ComponentType::Transform, ComponentType::Motion])
    }

    fn update(&mut self, entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError> {
        for &index in entities {
            let velocity = ctx.get::<Motion>(index).velocity;
            ctx.get_mut::<Transform>(index).position += velocity;
        }
        Ok(())
    }
}

/// Counts lifespans down, releasing and announcing expired entities.
struct Expiry;

impl Logic for Expiry {
    fn requirement(&self) -> ArchetypeId {
        ArchetypeId::from_types(&[ComponentType::Lifespan])
    }

    fn update(&mut self, entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError> {
        for &index in entities {
            let lifespan = ctx.get_mut::<Lifespan>(index);
            lifespan.remaining_ticks = lifespan.remaining_ticks.saturating_sub(1);
            if lifespan.remaining_ticks == 0 {
                ctx.release(index);
                ctx.publish(EventType::Despawned, EventPayload::Entity(index))?;
            }
        }
        Ok(())
    }
}

/// Spawns one child per tick while the parent is matched.
struct Spawner;

impl Logic for Spawner {
    fn requirement(&self) -> ArchetypeId {
        ArchetypeId::from_types(&[ComponentType::Meta, ComponentType::Health])
    }

    fn match_mode(&self) -> MatchMode {
        MatchMode::Exact
    }

    fn update(&mut self, _entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError> {
        let child = ctx.acquire()?;
        ctx.get_mut::<Transform>(child).active = true;
        Ok(())
    }
}

#[test]
fn single_component_scenario() {
    let mut pool = EntityMemoryPool::new(2);
    let mut lifecycle = EntityLifecycle::new();

    assert_eq!(lifecycle.acquire(&mut pool).unwrap(), 0);
    lifecycle.flush(&mut pool);
    assert!(lifecycle.is_live(0));

    let meta_only = ArchetypeId::from_types(&[ComponentType::Meta]);
    assert_eq!(ArchetypeManager::generate_archetype_id(&pool, 0), meta_only);
    assert_eq!(ArchetypeManager::generate_archetype_id(&pool, 1), ArchetypeId::EMPTY);

    let mut archetypes = ArchetypeManager::new();
    archetypes.rebuild_pool(&pool);
    assert_eq!(archetypes.bucket_count(), 2);
    assert_eq!(archetypes.exact_match(meta_only), &[0]);
    assert_eq!(archetypes.exact_match(ArchetypeId::EMPTY), &[1]);
}

#[test]
fn inclusive_empty_requirement_returns_all_live_entities() {
    let mut scene = Scene::new(8);
    scene.spawn(&EntityRecord::default()).unwrap();
    scene.spawn(&EntityRecord::default().with(Transform::default())).unwrap();
    scene
        .spawn(&EntityRecord::default().with(Health::default()).with(Motion::default()))
        .unwrap();
    scene.tick().unwrap();

    let mut all = scene.archetypes().inclusive_match(ArchetypeId::EMPTY);
    all.sort_unstable();
    assert_eq!(all, scene.lifecycle().live().collect::<Vec<_>>());
    assert_eq!(all.len(), 3);
}

#[test]
fn logic_sees_previous_tick_classification() {
    let mut scene = Scene::new(4);
    scene.add_logic(Movement);
    let record = EntityRecord::default()
        .with(Transform::default())
        .with(Motion {
            velocity: Vec2::new(1.0, 0.5),
            ..Default::default()
        });
    let index = scene.spawn(&record).unwrap();

    // Tick 0: the entity is only flushed and classified, not moved.
    let report = scene.tick().unwrap();
    assert_eq!(report.logic_runs, 0);
    assert_eq!(scene.pool().get::<Transform>(index).position, Vec2::ZERO);

    scene.tick().unwrap();
    scene.tick().unwrap();
    assert_eq!(scene.pool().get::<Transform>(index).position, Vec2::new(2.0, 1.0));
}

#[test]
fn acquire_inside_logic_is_visible_next_tick() {
    let mut scene = Scene::new(4);
    scene.add_logic(Spawner);
    scene.spawn(&EntityRecord::default().with(Health::default())).unwrap();
    scene.settle();

    let report = scene.tick().unwrap();
    assert_eq!(report.logic_runs, 1);
    assert_eq!(report.flush.added, 1);
    assert_eq!(scene.lifecycle().live_count(), 2);

    let child = ArchetypeId::from_types(&[ComponentType::Meta, ComponentType::Transform]);
    assert_eq!(scene.archetypes().exact_match(child), &[1]);
}

#[test]
fn expiry_releases_entity_and_notifies_once() {
    let mut scene = Scene::new(4);
    scene.add_logic(Expiry);

    let watcher = Subscriber::new(EventType::Despawned).shared();
    scene.register(&watcher, EventType::Despawned);

    let index = scene
        .spawn(&EntityRecord::default().with(Lifespan {
            remaining_ticks: 2,
            ..Default::default()
        }))
        .unwrap();
    scene.settle();

    // First logic pass: 2 -> 1, nothing happens.
    scene.tick().unwrap();
    assert!(!watcher.borrow().is_active());

    // Second pass: 1 -> 0, released and announced.
    let report = scene.tick().unwrap();
    assert_eq!(report.flush.removed, 1);
    assert_eq!(report.activations, 1);
    assert!(!scene.lifecycle().is_live(index));
    assert!(!scene.pool().is_active(ComponentType::Meta, index));
    assert_eq!(
        watcher.borrow_mut().take_activation(),
        Some(EventPayload::Entity(index))
    );

    // With the default lifetime of two the packet is swept on the next tick.
    let report = scene.tick().unwrap();
    assert_eq!(report.events_expired, 1);
    assert_eq!(report.activations, 0);
    assert!(scene.bus().is_empty());
}

#[test]
fn event_published_with_lifetime_two_survives_two_ticks() {
    let mut scene = Scene::new(1);
    let id = scene
        .publish_with_lifetime(EventType::SceneChange, EventPayload::from("menu"), 2)
        .unwrap();

    scene.tick().unwrap();
    assert!(scene.bus().get(id).is_some());
    scene.tick().unwrap();
    assert!(scene.bus().get(id).is_none());
}

#[test]
fn trigger_payload_filters_activation_through_scene() {
    let mut scene = Scene::new(1);
    let play = Subscriber::with_trigger(EventType::Ui, EventPayload::from("play")).shared();
    let any_ui = Subscriber::new(EventType::Ui).shared();
    scene.register(&play, EventType::Ui);
    scene.register(&any_ui, EventType::Ui);

    scene.publish(EventType::Ui, EventPayload::from("quit")).unwrap();
    scene.tick().unwrap();
    assert!(!play.borrow().is_active());
    assert!(any_ui.borrow_mut().take_activation().is_some());

    scene.publish(EventType::Ui, EventPayload::from("play")).unwrap();
    scene.tick().unwrap();
    assert_eq!(play.borrow().last_payload(), Some(&EventPayload::from("play")));
}

#[test]
fn dropped_owner_is_pruned_during_tick() {
    let mut scene = Scene::new(1);
    let owner = Subscriber::new(EventType::Collision).shared();
    scene.register(&owner, EventType::Collision);
    drop(owner);

    scene.publish(EventType::Collision, EventPayload::None).unwrap();
    let report = scene.tick().unwrap();
    assert_eq!(report.activations, 0);
    assert_eq!(report.subscribers_pruned, 1);
    assert!(scene.registry().is_empty());
}

#[test]
fn component_swap_moves_entity_between_buckets() {
    let mut scene = Scene::new(2);
    let index = scene
        .spawn(&EntityRecord::default().with(Transform::default()))
        .unwrap();
    scene.tick().unwrap();
    let before = ArchetypeId::from_types(&[ComponentType::Meta, ComponentType::Transform]);
    assert_eq!(scene.archetypes().exact_match(before), &[index]);

    scene.pool_mut().get_mut::<Transform>(index).active = false;
    scene.pool_mut().get_mut::<Health>(index).active = true;
    // Stale until the next rebuild.
    assert_eq!(scene.archetypes().exact_match(before), &[index]);

    scene.tick().unwrap();
    let after = ArchetypeId::from_types(&[ComponentType::Meta, ComponentType::Health]);
    assert!(scene.archetypes().exact_match(before).is_empty());
    assert_eq!(scene.archetypes().exact_match(after), &[index]);
    assert!(scene.pool().get::<Meta>(index).active);
}
