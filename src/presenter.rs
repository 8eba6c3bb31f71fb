//! Presentation boundary
//!
//! The controller hands each frame's snapshot and any sound cues to a
//! [`Presenter`]. Windowing, drawing and audio playback live behind it.

use crate::audio::SoundEffect;
use crate::game::Mode;
use crate::persistence::RankingRow;
use crate::settings::Settings;
use crate::sim::{Entity, Session};

/// Everything a view needs to draw the current mode
#[derive(Debug, Clone, Copy)]
pub enum ModeSnapshot<'a> {
    Menu,
    Playing {
        session: &'a Session,
    },
    EnterName {
        score: u32,
        name: &'a str,
        max_len: usize,
    },
    GameOver {
        score: u32,
        /// Rank achieved by the saved score, if any
        rank: Option<usize>,
    },
    Ranking {
        rows: &'a [RankingRow],
        /// False when the ranking store couldn't be opened
        available: bool,
    },
}

impl ModeSnapshot<'_> {
    pub fn mode(&self) -> Mode {
        match self {
            ModeSnapshot::Menu => Mode::Menu,
            ModeSnapshot::Playing { .. } => Mode::Playing,
            ModeSnapshot::EnterName { .. } => Mode::EnterName,
            ModeSnapshot::GameOver { .. } => Mode::GameOver,
            ModeSnapshot::Ranking { .. } => Mode::Ranking,
        }
    }
}

pub trait Presenter {
    fn render_frame(&mut self, snapshot: &ModeSnapshot<'_>);
    fn play_sound(&mut self, effect: SoundEffect);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_frame(&mut self, _snapshot: &ModeSnapshot<'_>) {}

    fn play_sound(&mut self, _effect: SoundEffect) {}
}

/// Headless presenter that narrates frames through the log
pub struct LogPresenter {
    settings: Settings,
    last_mode: Option<Mode>,
    frames: u64,
    cues: u64,
}

impl LogPresenter {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            last_mode: None,
            frames: 0,
            cues: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cues(&self) -> u64 {
        self.cues
    }

    fn describe(snapshot: &ModeSnapshot<'_>) -> String {
        match snapshot {
            ModeSnapshot::Menu => "Galactic Defender: Enter to play, R for ranking".to_string(),
            ModeSnapshot::Playing { session } => format!(
                "score {} lives {} enemies {} shots {}",
                session.score,
                session.lives,
                session.enemies.iter().filter(|e| e.is_active()).count(),
                session.projectiles.len()
            ),
            ModeSnapshot::EnterName {
                score,
                name,
                max_len,
            } => format!("New high score {score}! Name: [{name:<max_len$}]"),
            ModeSnapshot::GameOver { score, rank } => match rank {
                Some(rank) => format!("Game over, score {score} (rank #{rank})"),
                None => format!("Game over, score {score}"),
            },
            ModeSnapshot::Ranking { rows, available } => {
                if !available {
                    return "Ranking unavailable".to_string();
                }
                if rows.is_empty() {
                    return "No scores yet".to_string();
                }
                rows.iter()
                    .map(|r| format!("{:>2}. {:<10} {:>6} {}", r.rank, r.name, r.score, r.date))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

impl Presenter for LogPresenter {
    fn render_frame(&mut self, snapshot: &ModeSnapshot<'_>) {
        self.frames += 1;
        let mode = snapshot.mode();
        if self.last_mode != Some(mode) {
            self.last_mode = Some(mode);
            log::info!("{}", Self::describe(snapshot));
        } else {
            log::trace!("{}", Self::describe(snapshot));
        }
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.cues += 1;
        log::debug!(
            "sound {} vol={:.2}{}",
            effect.as_str(),
            effect.volume(&self.settings),
            if effect.is_looping() { " (loop)" } else { "" }
        );
    }
}
