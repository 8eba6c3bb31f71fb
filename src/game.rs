//! Game controller
//!
//! Owns the current mode, the running session and the leaderboard, and turns
//! each frame's commands into transitions:
//!
//! | From       | Command / trigger           | To                        |
//! |------------|-----------------------------|---------------------------|
//! | Menu       | Confirm                     | Playing (fresh session)   |
//! | Menu       | ViewRanking                 | Ranking                   |
//! | Playing    | round ends                  | EnterName or GameOver     |
//! | EnterName  | Confirm, name not empty     | GameOver (score saved)    |
//! | GameOver   | Restart                     | Playing (fresh session)   |
//! | GameOver   | Back                        | Menu                      |
//! | Ranking    | Back or Confirm             | Menu                      |
//!
//! Anything else is ignored. Quit stops the loop from any mode.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::highscores::HighScores;
use crate::persistence::RankingRow;
use crate::platform::Command;
use crate::presenter::{ModeSnapshot, Presenter};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameOverCause, HeldKeys, Session, TickInput, tick};

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
    /// Qualifying score, typing a name
    EnterName,
    GameOver,
    Ranking,
}

/// The frame-driven game controller
pub struct Game {
    settings: Settings,
    mode: Mode,
    session: Session,
    /// Name typed in EnterName mode
    name: String,
    /// Rank from the last saved score, if it made the board
    last_rank: Option<usize>,
    high_scores: HighScores,
    /// Rows fetched on entering Ranking mode
    leaderboard: Vec<RankingRow>,
    /// Seeds each new session
    rng: Pcg32,
    running: bool,
}

impl Game {
    pub fn new(settings: Settings, high_scores: HighScores, seed: u64) -> Self {
        let settings = settings.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let session = Session::new(&settings, rng.random());
        Self {
            settings,
            mode: Mode::Menu,
            session,
            name: String::new(),
            last_rank: None,
            high_scores,
            leaderboard: Vec::new(),
            rng,
            running: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Name typed so far in EnterName mode
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame: dispatch commands, advance play, render
    pub fn frame(&mut self, commands: &[Command], presenter: &mut dyn Presenter) {
        let held = held_keys(commands);
        for &command in commands {
            self.handle_command(command, presenter);
            if !self.running {
                return;
            }
        }

        if self.mode == Mode::Playing {
            self.update(held, presenter);
        }
        presenter.render_frame(&self.snapshot());
    }

    /// Apply one command to the current mode
    pub fn handle_command(&mut self, command: Command, presenter: &mut dyn Presenter) {
        match (self.mode, command) {
            (_, Command::Quit) => {
                log::info!("Quit requested");
                self.running = false;
            }

            (Mode::Menu, Command::Confirm) | (Mode::GameOver, Command::Restart) => {
                self.start_session();
                self.set_mode(Mode::Playing);
            }
            (Mode::Menu, Command::ViewRanking) => {
                self.leaderboard = self.high_scores.top_scores();
                self.set_mode(Mode::Ranking);
            }

            (Mode::Playing, Command::Fire) => {
                self.session.fire(&self.settings);
                presenter.play_sound(SoundEffect::Shoot);
            }

            (Mode::EnterName, Command::Confirm) if !self.name.is_empty() => {
                self.last_rank = self.high_scores.add_score(&self.name, self.session.score);
                self.set_mode(Mode::GameOver);
            }
            (Mode::EnterName, Command::Backspace) => {
                self.name.pop();
            }
            (Mode::EnterName, Command::Character(c)) => self.push_name_char(c),

            (Mode::GameOver, Command::Back) | (Mode::Ranking, Command::Back | Command::Confirm) => {
                self.set_mode(Mode::Menu);
            }

            _ => {}
        }
    }

    /// Current mode plus whatever the view needs to draw it
    pub fn snapshot(&self) -> ModeSnapshot<'_> {
        match self.mode {
            Mode::Menu => ModeSnapshot::Menu,
            Mode::Playing => ModeSnapshot::Playing {
                session: &self.session,
            },
            Mode::EnterName => ModeSnapshot::EnterName {
                score: self.session.score,
                name: &self.name,
                max_len: self.settings.max_name_length,
            },
            Mode::GameOver => ModeSnapshot::GameOver {
                score: self.session.score,
                rank: self.last_rank,
            },
            Mode::Ranking => ModeSnapshot::Ranking {
                rows: &self.leaderboard,
                available: self.high_scores.is_available(),
            },
        }
    }

    fn update(&mut self, held: HeldKeys, presenter: &mut dyn Presenter) {
        let outcome = tick(&mut self.session, &TickInput { held }, &self.settings);

        for event in &outcome.events {
            match event {
                GameEvent::Explosion => presenter.play_sound(SoundEffect::Explosion),
                GameEvent::EnemyEscaped { lives_left } => {
                    log::debug!("Enemy escaped, {lives_left} lives left");
                    presenter.play_sound(SoundEffect::EnemyEscaped);
                }
            }
        }

        if let Some(cause) = outcome.game_over {
            self.end_round(cause, presenter);
        }
    }

    /// Route a finished round to name entry or straight to game over
    fn end_round(&mut self, cause: GameOverCause, presenter: &mut dyn Presenter) {
        let score = self.session.score;
        log::info!(
            "Round over ({cause:?}) with score {score} after {} frames",
            self.session.time_ticks
        );

        self.last_rank = None;
        if self.high_scores.qualifies(score) {
            self.name.clear();
            presenter.play_sound(SoundEffect::HighScore);
            self.set_mode(Mode::EnterName);
        } else {
            presenter.play_sound(SoundEffect::GameOver);
            self.set_mode(Mode::GameOver);
        }
    }

    fn start_session(&mut self) {
        let seed = self.rng.random();
        self.session = Session::new(&self.settings, seed);
        log::info!("New session (seed {seed})");
    }

    /// Uppercased alphanumerics only, up to the configured length
    fn push_name_char(&mut self, c: char) {
        if !c.is_alphanumeric() {
            return;
        }
        for upper in c.to_uppercase() {
            if self.name.chars().count() >= self.settings.max_name_length {
                break;
            }
            self.name.push(upper);
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            log::info!("Mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

/// Fold held-movement commands into key state
fn held_keys(commands: &[Command]) -> HeldKeys {
    commands.iter().fold(HeldKeys::default(), |held, command| match command {
        Command::MoveLeft => HeldKeys { left: true, ..held },
        Command::MoveRight => HeldKeys {
            right: true,
            ..held
        },
        _ => held,
    })
}
