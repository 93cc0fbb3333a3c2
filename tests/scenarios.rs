//! End-to-end gameplay scenarios driven through the public API

use std::sync::Arc;

use space_invaders::sim::{
    GameEvent, GameplaySession, Intent, MenuAction, ModifierKind, NullSink, PhaseController,
    PhaseId, RecordingSink, TickInput, TickOutcome, tick,
};
use space_invaders::{Game, Tuning};

/// A single stationary alien straight above the ship
fn lone_alien() -> Tuning {
    Tuning {
        alien_rows: 1,
        alien_columns: 1,
        alien_start_x: 400,
        alien_start_y: 300,
        formation_speed: 0,
        ..Tuning::default()
    }
}

fn fire() -> TickInput {
    TickInput {
        fire: true,
        ..Default::default()
    }
}

fn won_count(sink: &RecordingSink) -> usize {
    sink.count(|e| {
        matches!(
            e,
            GameEvent::PhaseChanged {
                to: PhaseId::Won,
                ..
            }
        )
    })
}

#[test]
fn test_round_trip_kill_wins_once() {
    let sink = Arc::new(RecordingSink::new());
    let mut controller = PhaseController::new(lone_alien(), 1, sink.clone()).unwrap();
    assert!(controller.handle(MenuAction::Start));

    controller.tick(&fire());
    let mut ticks = 1;
    while controller.phase() == PhaseId::Playing && ticks < 200 {
        controller.tick(&TickInput::default());
        ticks += 1;
    }

    assert_eq!(controller.phase(), PhaseId::Won);
    assert_eq!(controller.score(), 10);
    assert_eq!(won_count(&sink), 1);
    assert_eq!(
        sink.count(|e| matches!(e, GameEvent::EnemyHit { score: 10, remaining: 0 })),
        1
    );

    // No duplicate transition on later ticks
    for _ in 0..10 {
        controller.tick(&fire());
    }
    assert_eq!(won_count(&sink), 1);
    assert_eq!(controller.phase(), PhaseId::Won);
}

#[test]
fn test_one_unlock_per_multiple() {
    // Twelve aliens stacked on one spot: every shot that lands kills
    let tuning = Tuning {
        alien_rows: 1,
        alien_columns: 12,
        alien_spacing: 0,
        alien_start_x: 400,
        alien_start_y: 300,
        formation_speed: 0,
        ..Tuning::default()
    };
    let mut session = GameplaySession::new(tuning, 11, Arc::new(NullSink));

    let mut outcome = TickOutcome::Running;
    for _ in 0..5_000 {
        outcome = tick(&mut session, &fire());
        if outcome != TickOutcome::Running {
            break;
        }
        // 50 grants one, 60 and 90 grant nothing more, 100 grants the second
        assert_eq!(session.chain().depth() as u64, session.score() / 50);
    }
    assert_eq!(outcome, TickOutcome::Won);
    assert_eq!(session.score(), 120);
}

#[test]
fn test_loss_when_aliens_land() {
    let tuning = Tuning {
        alien_rows: 1,
        alien_columns: 3,
        alien_start_y: 475,
        formation_speed: 100,
        ..Tuning::default()
    };
    let sink = Arc::new(RecordingSink::new());
    let mut controller = PhaseController::new(tuning, 2, sink.clone()).unwrap();
    controller.handle(MenuAction::Start);

    let mut ticks = 0;
    while controller.phase() == PhaseId::Playing && ticks < 500 {
        controller.tick(&TickInput::default());
        ticks += 1;
    }

    assert_eq!(controller.phase(), PhaseId::Lost);
    assert!(sink.count(|e| matches!(e, GameEvent::FormationDropped { .. })) >= 1);
    assert_eq!(
        controller.history().last(),
        Some(&(PhaseId::Playing, PhaseId::Lost))
    );
}

#[test]
fn test_loss_ignores_score() {
    let tuning = Tuning {
        alien_rows: 1,
        alien_columns: 2,
        alien_start_x: 400,
        alien_start_y: 300,
        alien_spacing: 100,
        formation_speed: 0,
        ..Tuning::default()
    };
    let mut session = GameplaySession::new(tuning, 0, Arc::new(NullSink));

    tick(&mut session, &fire());
    for _ in 0..100 {
        if session.score() > 0 {
            break;
        }
        assert_eq!(tick(&mut session, &TickInput::default()), TickOutcome::Running);
    }
    assert_eq!(session.score(), 10);
    assert_eq!(session.remaining_enemies(), 1);

    // The survivor walks past the line
    let survivor = session.formation().active_leaves(session.scene_root())[0];
    session.formation_mut().enemy_mut(survivor).pos.y = 501;
    assert_eq!(tick(&mut session, &TickInput::default()), TickOutcome::Lost);
}

#[test]
fn test_firing_patterns() {
    let mut session = GameplaySession::new(Tuning::default(), 0, Arc::new(NullSink));
    assert_eq!(session.request_fire(), 1);
    // Cooldown still running
    assert_eq!(session.request_fire(), 0);
    assert_eq!(session.projectiles().len(), 1);

    session.push_modifier(ModifierKind::TripleShot);
    for _ in 0..19 {
        tick(&mut session, &TickInput::default());
    }
    assert!(session.time_ms() >= 300);

    let before = session.projectiles().len();
    assert_eq!(session.request_fire(), 3);
    let x = session.player_pos().x;
    let mut xs: Vec<i32> = session.projectiles()[before..]
        .iter()
        .map(|p| p.pos.x - x)
        .collect();
    xs.sort();
    assert_eq!(xs, vec![-15, 0, 15]);
}

#[test]
fn test_play_again_starts_fresh() {
    let sink = Arc::new(RecordingSink::new());
    let mut controller = PhaseController::new(lone_alien(), 1, sink.clone()).unwrap();
    controller.handle(MenuAction::Start);
    controller.tick(&fire());
    for _ in 0..200 {
        if controller.phase() != PhaseId::Playing {
            break;
        }
        controller.tick(&TickInput::default());
    }
    assert_eq!(controller.phase(), PhaseId::Won);

    assert!(!controller.handle(MenuAction::TryAgain));
    assert!(controller.handle(MenuAction::PlayAgain));
    let session = controller.session().expect("playing");
    assert_eq!(session.score(), 0);
    assert_eq!(session.remaining_enemies(), 1);
    assert_eq!(session.time_ms(), 0);
    assert_eq!(controller.sessions_started(), 2);
    assert_eq!(
        sink.count(|e| matches!(e, GameEvent::FormationCreated { .. })),
        2
    );
}

#[test]
fn test_invalid_request_in_menu() {
    let sink = Arc::new(RecordingSink::new());
    let mut controller = PhaseController::new(Tuning::default(), 0, sink.clone()).unwrap();
    assert!(!controller.handle(MenuAction::TryAgain));
    assert_eq!(controller.phase(), PhaseId::Menu);
    assert!(controller.history().is_empty());
    assert_eq!(
        sink.count(|e| matches!(
            e,
            GameEvent::InvalidTransition {
                phase: PhaseId::Menu,
                action: MenuAction::TryAgain
            }
        )),
        1
    );
}

#[test]
fn test_empty_formation_wins_on_first_tick() {
    let tuning = Tuning {
        alien_columns: 0,
        ..Tuning::default()
    };
    let sink = Arc::new(RecordingSink::new());
    let mut controller = PhaseController::new(tuning, 0, sink.clone()).unwrap();
    controller.handle(MenuAction::Start);
    assert_eq!(controller.snapshot().remaining, 0);
    assert_eq!(controller.tick(&TickInput::default()), PhaseId::Won);
    controller.tick(&TickInput::default());
    assert_eq!(won_count(&sink), 1);
}

#[test]
fn test_pause_through_input_queue() {
    let (mut game, input) = Game::new(Tuning::default(), 0, Arc::new(NullSink)).unwrap();
    input.send(Intent::MenuSelect(MenuAction::Start));
    game.step();
    let before = game.snapshot();

    input.send(Intent::TogglePause);
    for _ in 0..30 {
        input.send(Intent::Fire);
        input.send(Intent::MoveLeft);
        game.step();
    }
    let paused = game.snapshot();
    assert!(paused.paused);
    assert_eq!(paused.player, before.player);
    assert_eq!(paused.enemies, before.enemies);
    assert!(paused.projectiles.is_empty());
    assert_eq!(game.controller().session().map(|s| s.time_ms()), Some(16));

    input.send(Intent::TogglePause);
    game.step();
    assert!(!game.snapshot().paused);
    assert_eq!(game.controller().session().map(|s| s.time_ms()), Some(32));
}

#[test]
fn test_modifier_expiry_is_reported() {
    let sink = Arc::new(RecordingSink::new());
    let tuning = Tuning {
        speed_boost_ms: 160,
        ..Tuning::default()
    };
    let mut session = GameplaySession::new(tuning, 0, sink.clone());
    session.push_modifier(ModifierKind::SpeedBoost);
    assert_eq!(session.chain().effective_speed(session.time_ms()), 16);

    for _ in 0..12 {
        tick(&mut session, &TickInput::default());
    }
    assert_eq!(session.chain().effective_speed(session.time_ms()), 8);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            GameEvent::ModifierExpired {
                kind: ModifierKind::SpeedBoost
            }
        )),
        1
    );
    assert_eq!(session.chain().depth(), 1);
}
