//! Galactic Defender - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Session simulation (entities, spawning, collisions, scoring)
//! - `game`: Mode state machine driving the session and the leaderboard
//! - `persistence`: SQLite-backed ranking store
//! - `highscores`: Leaderboard facade that degrades when storage is missing
//! - `presenter`: Presentation collaborator interface (draw + sound cues)
//! - `platform`: Input mapping, scripted input and frame pacing

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod presenter;
pub mod settings;
pub mod sim;

pub use game::{Game, Mode};
pub use highscores::HighScores;
pub use settings::Settings;

/// Default tuning constants, used to build `Settings::default()`
pub mod consts {
    /// Target frame rate of the game loop
    pub const FPS: u32 = 60;
    /// Highest frame rate a settings file may ask for
    pub const MAX_FPS: u32 = 240;

    /// Play area dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Distance from the bottom edge to the player's top
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;
    pub const PLAYER_LIVES: u32 = 3;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 3.0;
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    /// Spawn height, above the visible area
    pub const ENEMY_SPAWN_Y: f32 = -40.0;
    /// Frames between enemy spawns (one second at 60 FPS)
    pub const SPAWN_INTERVAL: u32 = 60;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 7.0;
    pub const PROJECTILE_WIDTH: f32 = 5.0;
    pub const PROJECTILE_HEIGHT: f32 = 10.0;

    /// Points per destroyed enemy
    pub const KILL_REWARD: u32 = 10;

    /// Leaderboard rows shown
    pub const DISPLAY_CAP: usize = 10;
    /// Rows kept on disk
    pub const RETENTION_CAP: usize = 100;
    pub const MAX_NAME_LENGTH: usize = 10;
    /// Stored when a blank name reaches the store
    pub const PLACEHOLDER_NAME: &str = "AAA";
}
