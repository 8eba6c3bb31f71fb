//! Galactic Defender - headless demo
//!
//! Plays a few scripted rounds against the real ranking database and
//! narrates them through the log. Set `RUST_LOG=debug` to hear the sound cues.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use galactic_defender::audio::SoundEffect;
use galactic_defender::platform::{Autopilot, FrameClock};
use galactic_defender::presenter::{LogPresenter, Presenter};
use galactic_defender::{Game, HighScores, Settings};

const SETTINGS_FILE: &str = "settings.json";
const RANKING_DB: &str = "ranking.db";

const DEMO_ROUNDS: u32 = 2;
/// Seconds of shooting per demo round
const DEMO_PATIENCE_SECS: u32 = 20;

/// Hard stop for the demo, in seconds
const FRAME_CAP_SECS: u32 = 180;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Galactic Defender starting...");

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let high_scores = HighScores::open(Path::new(RANKING_DB), settings.ranking_limits());
    if let Some(best) = high_scores.top_score() {
        log::info!("Best score so far: {best}");
    }

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    log::info!("Game initialized with seed: {seed}");

    let fps = settings.fps;
    let mut clock = FrameClock::new(fps);
    let mut presenter = LogPresenter::new(settings.clone());
    let mut pilot = Autopilot::new(DEMO_ROUNDS, DEMO_PATIENCE_SECS.saturating_mul(fps), fps);
    let mut game = Game::new(settings, high_scores, seed);

    presenter.play_sound(SoundEffect::Music);

    let frame_cap = u64::from(FRAME_CAP_SECS) * u64::from(fps);
    while game.is_running() {
        if clock.frames() >= frame_cap {
            log::warn!("Frame cap reached, stopping demo");
            break;
        }
        let commands = pilot.commands(&game);
        game.frame(&commands, &mut presenter);
        clock.wait();
    }

    log::info!(
        "Galactic Defender exiting after {} frames ({} rounds, {} sound cues)",
        presenter.frames(),
        pilot.rounds_played(),
        presenter.cues()
    );
}
