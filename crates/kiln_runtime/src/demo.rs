//! Demo scene content: a handful of drifting bodies and the logic that
//! moves, damages and expires them.

use kiln_core::ecs::{Collider, Health, Lifespan, Meta, Motion, Sprite, Transform};
use glam::Vec2;
use kiln_core::{
    ArchetypeId, ComponentType, EntityRecord, EventPayload, EventType, Logic, LogicContext,
    SceneError,
};

/// Half-width of the square play area.
pub const ARENA_HALF_EXTENT: f32 = 10.0;

/// Integrates acceleration and velocity, then applies damping.
pub struct Movement;

impl Logic for Movement {
    fn name(&self) -> &str {
        "movement"
    }

    fn requirement(&self) -> ArchetypeId {
        ArchetypeId::from_types(&[ComponentType::Transform, ComponentType::Motion])
    }

    fn update(&mut self, entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError> {
        for &index in entities {
            let motion = ctx.get_mut::<Motion>(index);
            motion.velocity += motion.acceleration;
            motion.velocity *= 1.0 - motion.damping;
            let velocity = motion.velocity;
            ctx.get_mut::<Transform>(index).position += velocity;
        }
        Ok(())
    }
}

/// Counts lifespans down; expired entities are released and announced.
pub struct Expiry;

impl Logic for Expiry {
    fn name(&self) -> &str {
        "expiry"
    }

    fn requirement(&self) -> ArchetypeId {
        ArchetypeId::from_types(&[ComponentType::Lifespan])
    }

    fn update(&mut self, entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError> {
        for &index in entities {
            let lifespan = ctx.get_mut::<Lifespan>(index);
            if lifespan.remaining_ticks == 0 {
                continue;
            }
            lifespan.remaining_ticks -= 1;
            if lifespan.remaining_ticks == 0 {
                ctx.release(index);
                ctx.publish(EventType::Despawned, EventPayload::Entity(index))?;
            }
        }
        Ok(())
    }
}

/// Bodies outside the arena lose one point of health per tick and are
/// released once depleted.
pub struct Damage {
    pub amount: i32,
}

impl Logic for Damage {
    fn name(&self) -> &str {
        "damage"
    }

    fn requirement(&self) -> ArchetypeId {
        ArchetypeId::from_types(&[ComponentType::Transform, ComponentType::Health])
    }

    fn update(&mut self, entities: &[usize], ctx: &mut LogicContext<'_>) -> Result<(), SceneError> {
        for &index in entities {
            let position = ctx.get::<Transform>(index).position;
            if position.abs().max_element() <= ARENA_HALF_EXTENT {
                continue;
            }
            let health = ctx.get_mut::<Health>(index);
            if health.is_depleted() {
                continue;
            }
            health.current -= self.amount;
            let depleted = health.is_depleted();
            ctx.publish(EventType::Damage, EventPayload::Int(i64::from(self.amount)))?;
            if depleted {
                tracing::debug!(index, "health depleted");
                ctx.release(index);
                ctx.publish(EventType::Despawned, EventPayload::Entity(index))?;
            }
        }
        Ok(())
    }
}

/// Initial population: drifting bodies with health, and short-lived sparks.
pub fn records() -> Vec<EntityRecord> {
    let mut records = Vec::new();
    for i in 0..4u8 {
        let direction = Vec2::from_angle(f32::from(i) * std::f32::consts::FRAC_PI_2);
        records.push(
            EntityRecord::default()
                .with(Meta {
                    name: format!("drifter-{i}"),
                    group: 1,
                    ..Default::default()
                })
                .with(Transform::default())
                .with(Motion {
                    velocity: direction * 0.25,
                    ..Default::default()
                })
                .with(Collider {
                    half_extents: Vec2::splat(0.5),
                    ..Default::default()
                })
                .with(Health {
                    current: 5,
                    max: 5,
                    ..Default::default()
                }),
        );
    }
    for i in 0..3u32 {
        records.push(
            EntityRecord::default()
                .with(Meta {
                    name: format!("spark-{i}"),
                    group: 2,
                    ..Default::default()
                })
                .with(Transform::default())
                .with(Motion {
                    acceleration: Vec2::new(0.0, -0.01),
                    damping: 0.05,
                    ..Default::default()
                })
                .with(Sprite {
                    texture: "spark".to_string(),
                    z_order: 1,
                    ..Default::default()
                })
                .with(Lifespan {
                    remaining_ticks: 20 * (i + 1),
                    ..Default::default()
                }),
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::{Scene, Subscriber};

    fn demo_scene() -> Scene {
        let mut scene = Scene::new(16);
        scene.spawn_all(&records()).unwrap();
        scene.add_logic(Movement);
        scene.add_logic(Expiry);
        scene.add_logic(Damage { amount: 1 });
        scene.settle();
        scene
    }

    #[test]
    fn demo_population_classifies_into_two_archetypes() {
        let scene = demo_scene();
        assert_eq!(scene.lifecycle().live_count(), 7);
        assert_eq!(scene.archetypes().bucket_count(), 2);
    }

    #[test]
    fn every_entity_eventually_leaves() {
        let mut scene = demo_scene();
        let despawns = Subscriber::new(EventType::Despawned).shared();
        scene.register(&despawns, EventType::Despawned);

        for _ in 0..200 {
            scene.tick().unwrap();
            if scene.lifecycle().live_count() == 0 {
                break;
            }
        }
        assert_eq!(scene.lifecycle().live_count(), 0);
        assert!(despawns.borrow().is_active());
    }

    #[test]
    fn damage_only_applies_outside_the_arena() {
        let mut scene = Scene::new(2);
        let inside = scene
            .spawn(
                &EntityRecord::default()
                    .with(Transform::default())
                    .with(Health { current: 3, max: 3, ..Default::default() }),
            )
            .unwrap();
        let outside = scene
            .spawn(
                &EntityRecord::default()
                    .with(Transform {
                        position: Vec2::new(ARENA_HALF_EXTENT + 1.0, 0.0),
                        ..Default::default()
                    })
                    .with(Health { current: 3, max: 3, ..Default::default() }),
            )
            .unwrap();
        scene.add_logic(Damage { amount: 1 });
        scene.settle();

        scene.tick().unwrap();
        assert_eq!(scene.pool().get::<Health>(inside).current, 3);
        assert_eq!(scene.pool().get::<Health>(outside).current, 2);
        assert_eq!(scene.bus().events_of(EventType::Damage).count(), 1);
    }
}
