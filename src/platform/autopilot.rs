//! Demo autopilot
//!
//! Produces commands the way a player would: start a round, chase and shoot
//! the lowest enemy, sign the leaderboard, glance at the ranking, quit.

use crate::game::{Game, Mode};
use crate::platform::Command;
use crate::sim::Entity;

/// Name the autopilot signs with
pub const DEMO_NAME: &str = "DEMO";

/// Frames between shots
const FIRE_COOLDOWN: u32 = 12;

/// Scripted input source
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Rounds to play before leaving
    rounds: u32,
    rounds_played: u32,
    /// Frames of shooting per round, after which it holds fire
    patience: u32,
    /// Frames to linger on menu-like screens
    linger: u32,
    cooldown: u32,
    viewed_ranking: bool,
    last_mode: Option<Mode>,
    frames_in_mode: u32,
}

impl Autopilot {
    pub fn new(rounds: u32, patience: u32, linger: u32) -> Self {
        Self {
            rounds,
            rounds_played: 0,
            patience,
            linger,
            cooldown: 0,
            viewed_ranking: false,
            last_mode: None,
            frames_in_mode: 0,
        }
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Commands for the next frame
    pub fn commands(&mut self, game: &Game) -> Vec<Command> {
        let mode = game.mode();
        if self.last_mode == Some(mode) {
            self.frames_in_mode += 1;
        } else {
            if self.last_mode == Some(Mode::Playing) {
                self.rounds_played += 1;
            }
            self.last_mode = Some(mode);
            self.frames_in_mode = 0;
        }

        match mode {
            Mode::Playing => self.play(game),
            Mode::EnterName => {
                let typed = game.name().chars().count();
                match DEMO_NAME.chars().nth(typed) {
                    Some(c) if typed < game.settings().max_name_length => {
                        vec![Command::Character(c)]
                    }
                    _ => vec![Command::Confirm],
                }
            }
            _ if self.frames_in_mode < self.linger => Vec::new(),
            Mode::Menu if self.rounds_played < self.rounds => vec![Command::Confirm],
            Mode::Menu if !self.viewed_ranking => {
                self.viewed_ranking = true;
                vec![Command::ViewRanking]
            }
            Mode::Menu => vec![Command::Quit],
            Mode::GameOver | Mode::Ranking => vec![Command::Back],
        }
    }

    fn play(&mut self, game: &Game) -> Vec<Command> {
        let session = game.session();
        let settings = game.settings();
        let ship = session.player.bounding_box();
        let mut commands = Vec::new();

        // Lowest active enemy is the most urgent
        let target = session
            .enemies
            .iter()
            .filter(|e| e.is_active())
            .max_by(|a, b| {
                a.pos()
                    .y
                    .partial_cmp(&b.pos().y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(enemy) = target else {
            return commands;
        };

        let dx = enemy.bounding_box().center_x() - ship.center_x();
        if dx < -settings.player_speed {
            commands.push(Command::MoveLeft);
        } else if dx > settings.player_speed {
            commands.push(Command::MoveRight);
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        let aligned = dx.abs() < settings.enemy_size.x / 2.0;
        if aligned && self.cooldown == 0 && self.frames_in_mode < self.patience {
            commands.push(Command::Fire);
            self.cooldown = FIRE_COOLDOWN;
        }
        commands
    }
}
