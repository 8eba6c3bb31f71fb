//! Session simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn/fire order)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{Body, Enemy, Entity, HeldKeys, Player, Projectile, Session};
pub use tick::{GameEvent, GameOverCause, TickInput, TickOutcome, tick};
