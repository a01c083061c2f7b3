//! Kiln Engine Runtime
//!
//! Boots a demo scene from an optional settings file and runs the tick
//! pipeline at a fixed rate.
//!
//! Usage: `kiln [settings.json]`

mod demo;

use anyhow::{Context, Result};
use kiln_core::{EventPayload, EventType, Scene, Subscriber};
use kiln_services::SceneSettings;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const GAME_OVER: &str = "game_over";

fn main() -> Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => SceneSettings::load(&path)
            .with_context(|| format!("loading settings from {path}"))?,
        None => SceneSettings::default(),
    };

    // RUST_LOG wins over the settings file.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Kiln Engine v{}", kiln_core::VERSION);

    let mut scene = Scene::with_config(settings.scene_config())?;
    let spawned = scene.spawn_all(&demo::records())?;
    tracing::info!(count = spawned.len(), "spawned demo entities");

    scene.add_logic(demo::Movement);
    scene.add_logic(demo::Expiry);
    scene.add_logic(demo::Damage { amount: 1 });

    let game_over = Subscriber::with_trigger(EventType::SceneChange, EventPayload::from(GAME_OVER)).shared();
    let despawns = Subscriber::new(EventType::Despawned).shared();
    scene.register(&game_over, EventType::SceneChange);
    scene.register(&despawns, EventType::Despawned);

    scene.settle();

    let tick_duration = scene.clock().tick_duration();
    let mut announced = false;
    loop {
        let started = Instant::now();
        let report = scene.tick()?;
        tracing::debug!(?report, "tick");

        if let Some(payload) = despawns.borrow_mut().take_activation() {
            tracing::info!(tick = report.tick, ?payload, live = report.live_entities, "entity despawned");
        }
        if game_over.borrow_mut().take_activation().is_some() {
            tracing::info!(tick = report.tick, "scene finished");
            break;
        }
        if !announced && scene.lifecycle().live_count() == 0 {
            scene.publish(EventType::SceneChange, EventPayload::from(GAME_OVER))?;
            announced = true;
        }
        if settings.max_ticks != 0 && scene.clock().tick_count() >= settings.max_ticks {
            tracing::info!(ticks = settings.max_ticks, "tick limit reached");
            break;
        }

        if let Some(remaining) = tick_duration.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    tracing::info!(
        elapsed = ?scene.clock().elapsed(),
        live = scene.lifecycle().live_count(),
        "shutting down"
    );
    Ok(())
}
