//! Session state and entity types
//!
//! A `Session` is one play-through. It is replaced wholesale on restart, so
//! no entity outlives the round it was created in.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::settings::Settings;

/// Position, size and liveness shared by every entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pos: Vec2,
    size: Vec2,
    active: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            active: true,
        }
    }

    /// Top-left corner
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Derived from the current position every time
    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Idempotent
    pub fn destroy(&mut self) {
        self.active = false;
    }

    fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    fn set_x(&mut self, x: f32) {
        self.pos.x = x;
    }
}

/// A moving, collidable, destructible screen object
pub trait Entity {
    fn body(&self) -> &Body;

    fn destroy(&mut self);

    fn bounding_box(&self) -> Rect {
        self.body().bounding_box()
    }

    fn is_active(&self) -> bool {
        self.body().is_active()
    }

    fn pos(&self) -> Vec2 {
        self.body().pos()
    }
}

/// Movement keys held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
}

/// The player's ship: horizontal movement only, never self-destructs
#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    speed: f32,
    max_x: f32,
}

impl Player {
    /// Centered horizontally near the bottom edge
    pub fn new(settings: &Settings) -> Self {
        let pos = Vec2::new(
            settings.screen_width / 2.0,
            settings.screen_height - settings.player_bottom_offset,
        );
        Self {
            body: Body::new(pos, settings.player_size),
            speed: settings.player_speed,
            max_x: (settings.screen_width - settings.player_size.x).max(0.0),
        }
    }

    /// Move by one frame; holding both directions cancels out
    pub fn update(&mut self, held: HeldKeys) {
        let mut x = self.body.pos().x;
        if held.left {
            x -= self.speed;
        }
        if held.right {
            x += self.speed;
        }
        self.body.set_x(x.clamp(0.0, self.max_x));
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn destroy(&mut self) {
        self.body.destroy();
    }
}

/// A descending enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    body: Body,
    speed: f32,
    floor: f32,
    escaped: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, settings: &Settings) -> Self {
        Self {
            body: Body::new(pos, settings.enemy_size),
            speed: settings.enemy_speed,
            floor: settings.screen_height,
            escaped: false,
        }
    }

    /// Descend; past the bottom edge the enemy is flagged escaped, then destroyed
    pub fn update(&mut self) {
        self.body.translate(Vec2::new(0.0, self.speed));
        if self.body.pos().y > self.floor {
            self.escaped = true;
            self.destroy();
        }
    }

    pub fn escaped(&self) -> bool {
        self.escaped
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn destroy(&mut self) {
        self.body.destroy();
    }
}

/// A player shot travelling upward
#[derive(Debug, Clone)]
pub struct Projectile {
    body: Body,
    speed: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, settings: &Settings) -> Self {
        Self {
            body: Body::new(pos, settings.projectile_size),
            speed: settings.projectile_speed,
        }
    }

    /// Ascend; destroyed once above the top edge
    pub fn update(&mut self) {
        self.body.translate(Vec2::new(0.0, -self.speed));
        if self.body.pos().y < 0.0 {
            self.destroy();
        }
    }
}

impl Entity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn destroy(&mut self) {
        self.body.destroy();
    }
}

/// Mutable state of one play-through
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed this round's RNG was built from
    pub seed: u64,
    pub player: Player,
    /// Active enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Active projectiles, in firing order
    pub projectiles: Vec<Projectile>,
    pub score: u32,
    pub lives: u32,
    /// Frames since the last spawn
    pub frame_count: u32,
    /// Frames simulated this round
    pub time_ticks: u64,
    rng: Pcg32,
}

impl Session {
    /// Start a fresh round
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            seed,
            player: Player::new(settings),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            lives: settings.player_lives,
            frame_count: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Launch a projectile from the top-center of the ship
    pub fn fire(&mut self, settings: &Settings) {
        let ship = self.player.bounding_box();
        let pos = Vec2::new(
            ship.center_x() - settings.projectile_size.x / 2.0,
            ship.top(),
        );
        self.projectiles.push(Projectile::new(pos, settings));
    }

    /// Spawn one enemy at a uniformly random column above the screen
    pub fn spawn_enemy(&mut self, settings: &Settings) {
        let x = self.rng.random_range(0.0..=settings.max_enemy_x());
        self.enemies
            .push(Enemy::new(Vec2::new(x, settings.enemy_spawn_y), settings));
    }

    /// Drop destroyed entities
    pub fn retain_active(&mut self) {
        self.enemies.retain(|e| e.is_active());
        self.projectiles.retain(|p| p.is_active());
    }
}
