//! Sound cues
//!
//! The core only names the sound; playing it is the presenter's job.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Projectile destroyed an enemy
    Explosion,
    /// Enemy got past the bottom edge
    EnemyEscaped,
    /// Round ended without a qualifying score
    GameOver,
    /// Round ended with a qualifying score
    HighScore,
    /// Looping background track, started once
    Music,
}

impl SoundEffect {
    /// Cue name the presentation layer looks up
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Explosion => "explosion",
            SoundEffect::EnemyEscaped => "enemy_escaped",
            SoundEffect::GameOver => "game_over",
            SoundEffect::HighScore => "high_score",
            SoundEffect::Music => "music",
        }
    }

    pub fn is_looping(&self) -> bool {
        matches!(self, SoundEffect::Music)
    }

    /// Playback volume (0.0 - 1.0), master volume applied
    pub fn volume(&self, settings: &Settings) -> f32 {
        let base = match self {
            SoundEffect::Shoot => settings.shoot_volume,
            SoundEffect::Explosion => settings.explosion_volume,
            SoundEffect::Music => settings.music_volume,
            SoundEffect::EnemyEscaped | SoundEffect::GameOver | SoundEffect::HighScore => 1.0,
        };
        (base * settings.master_volume).clamp(0.0, 1.0)
    }
}
