//! Scene: the scope that owns a pool, its classification and its events,
//! and runs the tick pipeline over them.
//!
//! Every tick executes the same fixed phases, in order:
//!
//! 1. logic units read and write the pool, acquire/release entities and
//!    publish events, seeing last tick's archetype map;
//! 2. the lifecycle waiting rooms are flushed;
//! 3. the archetype map is rebuilt from the live entities;
//! 4. the event bus ages and sweeps its packets;
//! 5. subscribers are notified of the surviving packets.
//!
//! There is no locking anywhere; correctness rests on this ordering.

mod logic;

pub use logic::{Logic, LogicContext, MatchMode};

use crate::ecs::{
    ArchetypeManager, EntityLifecycle, EntityMemoryPool, EntityRecord, FlushSummary, PoolError,
};
use crate::events::{
    EventBus, EventError, EventId, EventPayload, EventType, SharedSubscriber, SubscriberRegistry,
};
use crate::time::{TickClock, DEFAULT_TICK_RATE_HZ};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("default event lifetime must be at least one tick")]
    ZeroDefaultLifetime,
}

/// Construction parameters for a [`Scene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    pub capacity: usize,
    /// Lifetime given to packets published without an explicit one.
    pub default_event_lifetime: u8,
    pub tick_rate_hz: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            default_event_lifetime: 2,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

/// What happened during one call to [`Scene::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub logic_runs: usize,
    pub logic_skipped: usize,
    pub flush: FlushSummary,
    pub live_entities: usize,
    pub archetypes: usize,
    pub events_expired: usize,
    pub events_pending: usize,
    pub activations: usize,
    pub subscribers_pruned: usize,
}

pub struct Scene {
    config: SceneConfig,
    pool: EntityMemoryPool,
    lifecycle: EntityLifecycle,
    archetypes: ArchetypeManager,
    bus: EventBus,
    registry: SubscriberRegistry,
    logic: Vec<Box<dyn Logic>>,
    clock: TickClock,
}

impl Scene {
    /// Scene with `capacity` slots and default settings otherwise.
    pub fn new(capacity: usize) -> Self {
        let config = SceneConfig {
            capacity,
            ..SceneConfig::default()
        };
        Self::build(config)
    }

    pub fn with_config(config: SceneConfig) -> Result<Self, SceneError> {
        if config.default_event_lifetime == 0 {
            return Err(SceneError::ZeroDefaultLifetime);
        }
        Ok(Self::build(config))
    }

    fn build(config: SceneConfig) -> Self {
        tracing::info!(
            capacity = config.capacity,
            default_event_lifetime = config.default_event_lifetime,
            tick_rate_hz = config.tick_rate_hz,
            "creating scene"
        );
        Self {
            pool: EntityMemoryPool::new(config.capacity),
            lifecycle: EntityLifecycle::new(),
            archetypes: ArchetypeManager::new(),
            bus: EventBus::new(),
            registry: SubscriberRegistry::new(),
            logic: Vec::new(),
            clock: TickClock::new(config.tick_rate_hz),
            config,
        }
    }

    /// Acquire a slot and populate it from a loader record.
    ///
    /// Like any acquisition, the entity becomes live at the next flush.
    pub fn spawn(&mut self, record: &EntityRecord) -> Result<usize, SceneError> {
        let index = self.lifecycle.acquire(&mut self.pool)?;
        self.pool.apply_record(index, record)?;
        Ok(index)
    }

    pub fn spawn_all<'r, I>(&mut self, records: I) -> Result<Vec<usize>, SceneError>
    where
        I: IntoIterator<Item = &'r EntityRecord>,
    {
        records.into_iter().map(|record| self.spawn(record)).collect()
    }

    /// Queue `index` for removal at the next flush.
    pub fn despawn(&mut self, index: usize) {
        self.lifecycle.release(index);
    }

    /// Resize the pool. Shrinking over a live slot is refused.
    pub fn grow(&mut self, new_capacity: usize) -> Result<(), SceneError> {
        self.pool.resize(new_capacity)?;
        self.config.capacity = new_capacity;
        Ok(())
    }

    pub fn add_logic<L: Logic + 'static>(&mut self, logic: L) {
        tracing::debug!(name = logic.name(), requirement = %logic.requirement(), "logic registered");
        self.logic.push(Box::new(logic));
    }

    pub fn register(&mut self, subscriber: &SharedSubscriber, event_type: EventType) {
        self.registry.register(subscriber, event_type);
    }

    pub fn try_register(
        &mut self,
        subscriber: &SharedSubscriber,
        event_type: EventType,
    ) -> Result<(), SceneError> {
        Ok(self.registry.try_register(subscriber, event_type)?)
    }

    pub fn publish(&mut self, event_type: EventType, payload: EventPayload) -> Result<EventId, SceneError> {
        self.publish_with_lifetime(event_type, payload, self.config.default_event_lifetime)
    }

    /// Publish a packet that survives `lifetime` bus ticks.
    ///
    /// The bus ages packets before subscribers are notified, so a packet is
    /// delivered `lifetime - 1` times. A lifetime of 1 is accepted but never
    /// reaches a subscriber.
    pub fn publish_with_lifetime(
        &mut self,
        event_type: EventType,
        payload: EventPayload,
        lifetime: u8,
    ) -> Result<EventId, SceneError> {
        if lifetime == 1 {
            tracing::warn!(?event_type, "event with lifetime 1 expires before subscribers are notified");
        }
        Ok(self.bus.publish(event_type, payload, lifetime)?)
    }

    /// Flush pending lifecycle changes and reclassify without running logic
    /// or touching events. Used after loading so the first tick's logic
    /// already sees the loaded entities.
    pub fn settle(&mut self) -> FlushSummary {
        let summary = self.lifecycle.flush(&mut self.pool);
        self.archetypes.rebuild_all(&self.pool, self.lifecycle.live());
        summary
    }

    /// Run one full tick of the pipeline.
    ///
    /// If a logic unit fails, the remaining units are skipped but phases 2-5
    /// still run and the clock advances, so the work already done this tick
    /// is committed exactly once. The first error is then returned.
    pub fn tick(&mut self) -> Result<TickReport, SceneError> {
        let tick = self.clock.tick_count();
        let span = tracing::debug_span!("scene.tick", tick);
        let _entered = span.enter();
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        let mut failure = None;
        {
            let _phase = tracing::trace_span!("logic").entered();
            for logic in &mut self.logic {
                let requirement = logic.requirement();
                let entities: Cow<'_, [usize]> = match logic.match_mode() {
                    MatchMode::Exact => Cow::Borrowed(self.archetypes.exact_match(requirement)),
                    MatchMode::Inclusive => Cow::Owned(self.archetypes.inclusive_match(requirement)),
                };
                if entities.is_empty() {
                    tracing::trace!(name = logic.name(), %requirement, "no matching entities; skipping");
                    report.logic_skipped += 1;
                    continue;
                }

                let mut ctx = LogicContext {
                    pool: &mut self.pool,
                    lifecycle: &mut self.lifecycle,
                    bus: &mut self.bus,
                    registry: &mut self.registry,
                    archetypes: &self.archetypes,
                    default_event_lifetime: self.config.default_event_lifetime,
                    tick,
                };
                if let Err(err) = logic.update(&entities, &mut ctx) {
                    tracing::error!(name = logic.name(), error = %err, "logic failed; ending logic phase");
                    failure = Some(err);
                    break;
                }
                report.logic_runs += 1;
            }
        }

        {
            let _phase = tracing::trace_span!("flush").entered();
            report.flush = self.lifecycle.flush(&mut self.pool);
            report.live_entities = self.lifecycle.live_count();
        }

        {
            let _phase = tracing::trace_span!("classify").entered();
            self.archetypes.rebuild_all(&self.pool, self.lifecycle.live());
            report.archetypes = self.archetypes.bucket_count();
        }

        {
            let _phase = tracing::trace_span!("events").entered();
            report.events_expired = self.bus.tick();
            report.events_pending = self.bus.len();
        }

        {
            let _phase = tracing::trace_span!("notify").entered();
            report.activations = self.registry.notify_subscribers(&self.bus);
            report.subscribers_pruned = self.registry.prune_expired();
        }

        self.clock.advance();
        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn pool(&self) -> &EntityMemoryPool {
        &self.pool
    }

    /// Direct pool access. Toggling components leaves the archetype map
    /// stale until the next tick or [`Self::settle`].
    pub fn pool_mut(&mut self) -> &mut EntityMemoryPool {
        &mut self.pool
    }

    pub fn lifecycle(&self) -> &EntityLifecycle {
        &self.lifecycle
    }

    pub fn archetypes(&self) -> &ArchetypeManager {
        &self.archetypes
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn logic_count(&self) -> usize {
        self.logic.len()
    }
}
