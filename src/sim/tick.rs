//! Per-frame session advance
//!
//! Order within a frame: player, spawn, movement, projectile/enemy hits,
//! player hits, escapes, then filtering.

use std::cmp::Ordering;

use glam::Vec2;

use super::state::{Entity, HeldKeys, Session};
use crate::settings::Settings;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub held: HeldKeys,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A projectile destroyed an enemy
    Explosion,
    /// An enemy slipped past the bottom edge; `lives_left` after the loss
    EnemyEscaped { lives_left: u32 },
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// An enemy touched the ship
    PlayerHit,
    /// Escapes used up every life
    OutOfLives,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    pub game_over: Option<GameOverCause>,
}

/// Advance the session by one frame
pub fn tick(session: &mut Session, input: &TickInput, settings: &Settings) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    session.time_ticks += 1;

    session.player.update(input.held);

    session.frame_count += 1;
    if session.frame_count >= settings.spawn_interval {
        session.spawn_enemy(settings);
        session.frame_count = 0;
    }

    for enemy in session.enemies.iter_mut().filter(|e| e.is_active()) {
        enemy.update();
    }
    for shot in session.projectiles.iter_mut().filter(|p| p.is_active()) {
        shot.update();
    }

    resolve_hits(session, settings, &mut outcome);
    outcome.game_over = check_player_hit(session);
    if outcome.game_over.is_none() {
        outcome.game_over = check_escapes(session, &mut outcome.events);
    }

    session.retain_active();
    outcome
}

/// Projectile vs enemy. Shots are resolved leading edge first (smallest y,
/// then x) and each takes the overlapping enemy closest to its line of fire.
/// Destruction is applied on the spot, so a projectile takes out at most one
/// enemy per frame, and the outcome doesn't depend on collection order.
fn resolve_hits(session: &mut Session, settings: &Settings, outcome: &mut TickOutcome) {
    let mut order: Vec<usize> = (0..session.projectiles.len())
        .filter(|&i| session.projectiles[i].is_active())
        .collect();
    order.sort_by(|&a, &b| {
        position_order(session.projectiles[a].pos(), session.projectiles[b].pos())
    });

    for i in order {
        let shot_box = session.projectiles[i].bounding_box();
        let line = shot_box.center_x();
        let target = session
            .enemies
            .iter_mut()
            .filter(|e| e.is_active() && e.bounding_box().intersects(&shot_box))
            .min_by(|a, b| {
                let da = (a.bounding_box().center_x() - line).abs();
                let db = (b.bounding_box().center_x() - line).abs();
                da.total_cmp(&db)
                    .then_with(|| position_order(a.pos(), b.pos()))
            });
        if let Some(enemy) = target {
            enemy.destroy();
            session.projectiles[i].destroy();
            session.score += settings.kill_reward;
            outcome.events.push(GameEvent::Explosion);
        }
    }
}

/// Total order on positions: top to bottom, then left to right
fn position_order(a: Vec2, b: Vec2) -> Ordering {
    a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x))
}

/// Direct contact with any live enemy ends the round
fn check_player_hit(session: &Session) -> Option<GameOverCause> {
    let ship = session.player.bounding_box();
    session
        .enemies
        .iter()
        .any(|e| e.is_active() && e.bounding_box().intersects(&ship))
        .then_some(GameOverCause::PlayerHit)
}

/// Escaped enemies are already inactive but still in the collection until
/// filtering, so each is counted exactly once.
fn check_escapes(session: &mut Session, events: &mut Vec<GameEvent>) -> Option<GameOverCause> {
    let escaped = session.enemies.iter().filter(|e| e.escaped()).count();
    for _ in 0..escaped {
        session.lives = session.lives.saturating_sub(1);
        events.push(GameEvent::EnemyEscaped {
            lives_left: session.lives,
        });
        if session.lives == 0 {
            return Some(GameOverCause::OutOfLives);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, Projectile};
    use proptest::prelude::*;

    /// Settings where nothing spawns on its own
    fn quiet_settings() -> Settings {
        Settings {
            spawn_interval: u32::MAX,
            ..Settings::default()
        }
    }

    #[test]
    fn test_spawn_on_interval() {
        let settings = Settings::default();
        let mut session = Session::new(&settings, 12345);
        let input = TickInput::default();

        for _ in 0..settings.spawn_interval - 1 {
            tick(&mut session, &input, &settings);
        }
        assert!(session.enemies.is_empty());

        tick(&mut session, &input, &settings);
        assert_eq!(session.enemies.len(), 1);
        assert_eq!(session.frame_count, 0);
    }

    #[test]
    fn test_projectile_kills_enemy() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &settings));
        session
            .projectiles
            .push(Projectile::new(Vec2::new(110.0, 140.0), &settings));

        let outcome = tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(outcome.events, vec![GameEvent::Explosion]);
        assert_eq!(outcome.game_over, None);
        assert_eq!(session.score, 10);
        assert!(session.enemies.is_empty());
        assert!(session.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_kills_only_one_enemy() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        // Two stacked enemies both overlapping the same shot
        session.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &settings));
        session.enemies.push(Enemy::new(Vec2::new(105.0, 110.0), &settings));
        session
            .projectiles
            .push(Projectile::new(Vec2::new(115.0, 130.0), &settings));

        let outcome = tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(session.score, 10);
        assert_eq!(session.enemies.len(), 1);
    }

    #[test]
    fn test_two_projectiles_two_kills() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &settings));
        session.enemies.push(Enemy::new(Vec2::new(105.0, 110.0), &settings));
        session
            .projectiles
            .push(Projectile::new(Vec2::new(115.0, 130.0), &settings));
        session
            .projectiles
            .push(Projectile::new(Vec2::new(118.0, 132.0), &settings));

        tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(session.score, 20);
        assert!(session.enemies.is_empty());
    }

    /// One shot overlaps both enemies, the other only the left one
    fn crossfire(shots: [(f32, f32); 2]) -> (u32, usize) {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &settings));
        session.enemies.push(Enemy::new(Vec2::new(135.0, 100.0), &settings));
        for (x, y) in shots {
            session.projectiles.push(Projectile::new(Vec2::new(x, y), &settings));
        }
        tick(&mut session, &TickInput::default(), &settings);
        (session.score, session.enemies.len())
    }

    #[test]
    fn test_hits_independent_of_shot_order() {
        let wide = (136.0, 120.0);
        let narrow = (110.0, 120.0);
        assert_eq!(crossfire([wide, narrow]), (20, 0));
        assert_eq!(crossfire([narrow, wide]), (20, 0));
    }

    #[test]
    fn test_shot_takes_enemy_nearest_its_line() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &settings));
        session.enemies.push(Enemy::new(Vec2::new(135.0, 100.0), &settings));
        session
            .projectiles
            .push(Projectile::new(Vec2::new(136.0, 120.0), &settings));

        tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(session.enemies.len(), 1);
        assert_eq!(session.enemies[0].pos().x, 100.0);
    }

    #[test]
    fn test_enemy_touching_player_ends_round() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        let ship = session.player.bounding_box();
        session
            .enemies
            .push(Enemy::new(Vec2::new(ship.left(), ship.top() - 20.0), &settings));

        let outcome = tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(outcome.game_over, Some(GameOverCause::PlayerHit));
        assert_eq!(session.lives, settings.player_lives);
    }

    #[test]
    fn test_shot_enemy_cannot_hit_player() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        let ship = session.player.bounding_box();
        session
            .enemies
            .push(Enemy::new(Vec2::new(ship.left(), ship.top() - 20.0), &settings));
        // Shot sits inside the enemy after both move this frame
        session.projectiles.push(Projectile::new(
            Vec2::new(ship.left() + 10.0, ship.top() - 5.0),
            &settings,
        ));

        let outcome = tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(outcome.game_over, None);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn test_escape_costs_a_life() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session
            .enemies
            .push(Enemy::new(Vec2::new(0.0, settings.screen_height), &settings));

        let outcome = tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(session.lives, settings.player_lives - 1);
        assert_eq!(
            outcome.events,
            vec![GameEvent::EnemyEscaped {
                lives_left: settings.player_lives - 1
            }]
        );
        assert_eq!(outcome.game_over, None);
        assert!(session.enemies.is_empty());
    }

    #[test]
    fn test_last_life_ends_round_and_stops_counting() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session.lives = 1;
        for x in [0.0, 100.0, 200.0] {
            session
                .enemies
                .push(Enemy::new(Vec2::new(x, settings.screen_height), &settings));
        }

        let outcome = tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(outcome.game_over, Some(GameOverCause::OutOfLives));
        assert_eq!(session.lives, 0);
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn test_escape_counted_once() {
        let settings = quiet_settings();
        let mut session = Session::new(&settings, 1);
        session
            .enemies
            .push(Enemy::new(Vec2::new(0.0, settings.screen_height), &settings));

        tick(&mut session, &TickInput::default(), &settings);
        tick(&mut session, &TickInput::default(), &settings);
        assert_eq!(session.lives, settings.player_lives - 1);
    }

    #[test]
    fn test_determinism() {
        let settings = Settings {
            spawn_interval: 5,
            ..Settings::default()
        };
        let mut a = Session::new(&settings, 99999);
        let mut b = Session::new(&settings, 99999);
        let input = TickInput::default();

        for _ in 0..50 {
            tick(&mut a, &input, &settings);
            tick(&mut b, &input, &settings);
        }

        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos(), eb.pos());
        }
    }

    proptest! {
        #[test]
        fn prop_no_enemies_no_change(
            frames in 1usize..300,
            shots in proptest::collection::vec(any::<bool>(), 1..300),
            moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..300),
        ) {
            let settings = quiet_settings();
            let mut session = Session::new(&settings, 3);
            for i in 0..frames {
                if shots[i % shots.len()] {
                    session.fire(&settings);
                }
                let (left, right) = moves[i % moves.len()];
                let outcome = tick(&mut session, &TickInput { held: HeldKeys { left, right } }, &settings);
                prop_assert_eq!(outcome.game_over, None);
            }
            prop_assert_eq!(session.score, 0);
            prop_assert_eq!(session.lives, settings.player_lives);
        }

        #[test]
        fn prop_hits_ignore_collection_order(
            (enemies, shuffled_enemies) in proptest::collection::vec((0.0f32..200.0, 0.0f32..200.0), 0..10)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
            (shots, shuffled_shots) in proptest::collection::vec((0.0f32..200.0, 0.0f32..250.0), 0..10)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        ) {
            let settings = quiet_settings();
            let run = |enemies: &[(f32, f32)], shots: &[(f32, f32)]| {
                let mut session = Session::new(&settings, 5);
                for (x, y) in enemies {
                    session.enemies.push(Enemy::new(Vec2::new(*x, *y), &settings));
                }
                for (x, y) in shots {
                    session.projectiles.push(Projectile::new(Vec2::new(*x, *y), &settings));
                }
                tick(&mut session, &TickInput::default(), &settings);
                let mut survivors: Vec<Vec2> = session.enemies.iter().map(|e| e.pos()).collect();
                survivors.sort_by(|a, b| position_order(*a, *b));
                let mut shots_left: Vec<Vec2> = session.projectiles.iter().map(|p| p.pos()).collect();
                shots_left.sort_by(|a, b| position_order(*a, *b));
                (session.score, survivors, shots_left)
            };

            prop_assert_eq!(run(&enemies, &shots), run(&shuffled_enemies, &shuffled_shots));
        }

        #[test]
        fn prop_kills_never_exceed_projectiles(
            enemies in proptest::collection::vec((0.0f32..200.0, 0.0f32..200.0), 0..12),
            shots in proptest::collection::vec((0.0f32..200.0, 0.0f32..250.0), 0..12),
        ) {
            let settings = quiet_settings();
            let mut session = Session::new(&settings, 5);
            for (x, y) in &enemies {
                session.enemies.push(Enemy::new(Vec2::new(*x, *y), &settings));
            }
            for (x, y) in &shots {
                session.projectiles.push(Projectile::new(Vec2::new(*x, *y), &settings));
            }

            let outcome = tick(&mut session, &TickInput::default(), &settings);
            let kills = outcome.events.iter().filter(|e| **e == GameEvent::Explosion).count();
            prop_assert!(kills <= shots.len());
            prop_assert!(kills <= enemies.len());
            prop_assert_eq!(session.enemies.len(), enemies.len() - kills);
            prop_assert_eq!(session.score as usize, kills * settings.kill_reward as usize);
            // Every survivor is live
            prop_assert!(session.enemies.iter().all(|e| e.is_active()));
            prop_assert!(session.projectiles.iter().all(|p| p.is_active()));
        }
    }
}
