//! Concrete component payloads.
//!
//! Every component carries its own `active` flag. A default-constructed value
//! is always inactive, which is what a recycled slot is reset to.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identity data. This is the liveness component: a slot is in use exactly
/// when its `Meta` is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip)]
    pub active: bool,
    pub name: String,
    pub group: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    #[serde(skip)]
    pub active: bool,
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            active: false,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

/// Linear motion integrated once per tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Motion {
    #[serde(skip)]
    pub active: bool,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Fraction of velocity lost per tick, in `[0, 1]`.
    pub damping: f32,
}

/// Axis-aligned box centred on the entity's transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collider {
    #[serde(skip)]
    pub active: bool,
    pub half_extents: Vec2,
    pub layer: u32,
    pub is_trigger: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sprite {
    #[serde(skip)]
    pub active: bool,
    pub texture: String,
    pub tint: [f32; 4],
    pub z_order: i32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            active: false,
            texture: String::new(),
            tint: [1.0; 4],
            z_order: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Health {
    #[serde(skip)]
    pub active: bool,
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// Countdown after which the entity is expected to be released.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifespan {
    #[serde(skip)]
    pub active: bool,
    pub remaining_ticks: u32,
}
