//! Game Module
//!
//! Top-down arena shooter on a small entity arena:
//! - Entity: generational ids, so cameras can hold stale-safe references
//! - Component: sparse per-type storage indexed by entity
//! - World: owns players and bullets, deferred despawn
//! - Player / Weapon / Bullet: the gameplay objects
//! - Runtime: per-frame glue between input, world and window

pub mod entity;
pub mod component;
pub mod timer;
pub mod sprite;
pub mod physics;
pub mod cursor;
pub mod bullet;
pub mod weapon;
pub mod player;
pub mod world;
pub mod runtime;
pub mod renderer;

pub use entity::Entity;
pub use runtime::Runtime;
pub use renderer::ScreenSink;
