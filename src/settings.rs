//! Game settings and tuning
//!
//! Built once at startup and passed by reference to the session and the
//! ranking store. Persisted as JSON next to the executable's working dir.

use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::RankingLimits;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play area ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Target frames per second
    pub fps: u32,

    // === Player ===
    /// Horizontal pixels per frame
    pub player_speed: f32,
    pub player_size: Vec2,
    /// Distance from the bottom edge to the top of the ship
    pub player_bottom_offset: f32,
    /// Lives at the start of a round
    pub player_lives: u32,

    // === Enemies ===
    /// Downward pixels per frame
    pub enemy_speed: f32,
    pub enemy_size: Vec2,
    pub enemy_spawn_y: f32,
    /// Frames between spawns
    pub spawn_interval: u32,

    // === Projectiles ===
    /// Upward pixels per frame
    pub projectile_speed: f32,
    pub projectile_size: Vec2,

    // === Scoring ===
    pub kill_reward: u32,

    // === Ranking ===
    pub display_cap: usize,
    pub retention_cap: usize,
    pub max_name_length: usize,

    // === Audio ===
    pub master_volume: f32,
    pub shoot_volume: f32,
    pub explosion_volume: f32,
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fps: FPS,

            player_speed: PLAYER_SPEED,
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            player_lives: PLAYER_LIVES,

            enemy_speed: ENEMY_SPEED,
            enemy_size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            enemy_spawn_y: ENEMY_SPAWN_Y,
            spawn_interval: SPAWN_INTERVAL,

            projectile_speed: PROJECTILE_SPEED,
            projectile_size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),

            kill_reward: KILL_REWARD,

            display_cap: DISPLAY_CAP,
            retention_cap: RETENTION_CAP,
            max_name_length: MAX_NAME_LENGTH,

            // Music sits under the effects so it doesn't drown them
            master_volume: 1.0,
            shoot_volume: 0.3,
            explosion_volume: 0.5,
            music_volume: 0.2,
        }
    }
}

impl Settings {
    /// Clamp values a hand-edited file could break the game with
    pub fn sanitized(mut self) -> Self {
        self.fps = self.fps.clamp(1, MAX_FPS);
        self.max_name_length = self.max_name_length.max(1);
        self
    }

    /// Store limits derived from these settings
    pub fn ranking_limits(&self) -> RankingLimits {
        RankingLimits {
            display_cap: self.display_cap,
            retention_cap: self.retention_cap.max(self.display_cap),
            max_name_length: self.max_name_length.max(1),
        }
    }

    /// Largest x an enemy can spawn at while staying on screen
    pub fn max_enemy_x(&self) -> f32 {
        (self.screen_width - self.enemy_size.x).max(0.0)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    Self::sanitized(settings)
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}
