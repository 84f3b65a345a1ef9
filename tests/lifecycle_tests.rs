//! Puzzle lifecycle integration tests.
//!
//! These drive whole puzzles through the controller and its logical clock,
//! checking the lifecycle contract shared by every kind.

use heist_puzzles::controller::{ControllerPhase, PuzzleController};
use heist_puzzles::core::{PuzzleConfig, PuzzleKind, PuzzleStatus, Role};
use heist_puzzles::events::RandomEvent;
use heist_puzzles::host::HostEvent;
use heist_puzzles::puzzles::{
    Cell, ChargeId, CircuitLayout, InputOutcome, PuzzleInput, SeedData, WireColor,
    TIME_UP_TEXT,
};

fn mounted(config: PuzzleConfig) -> PuzzleController {
    let mut controller = PuzzleController::default();
    controller.mount(config).unwrap();
    controller
}

fn five_wires(correct: &[usize]) -> PuzzleController {
    let colors = vec![
        WireColor::Red,
        WireColor::Blue,
        WireColor::Yellow,
        WireColor::Green,
        WireColor::White,
    ];
    mounted(PuzzleConfig::new(PuzzleKind::Wires).with_seed_data(SeedData::wires(colors, correct)))
}

fn type_code(controller: &mut PuzzleController, code: &str) -> InputOutcome {
    for digit in code.bytes() {
        controller.handle_input(&PuzzleInput::PressDigit(digit - b'0'));
    }
    controller.handle_input(&PuzzleInput::Enter)
}

// =============================================================================
// Wires
// =============================================================================

#[test]
fn test_wires_correct_cuts_succeed() {
    let mut controller = five_wires(&[1, 3]);

    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(1)), InputOutcome::Accepted);
    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(3)), InputOutcome::Solved);

    assert_eq!(controller.phase(), ControllerPhase::Succeeded);
    let host = controller.host().unwrap();
    assert_eq!(host.success_calls(), 1);
    assert_eq!(host.reduce_time_calls(), 0);
    assert!(!host.countdown().is_running());
}

#[test]
fn test_wires_two_wrong_cuts_fail() {
    let mut controller = five_wires(&[1, 3]);

    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(0)), InputOutcome::Penalized);
    assert_eq!(controller.phase(), ControllerPhase::Active);
    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(2)), InputOutcome::Failed);

    assert_eq!(controller.phase(), ControllerPhase::Failed);
    let host = controller.host().unwrap();
    assert_eq!(host.reduce_time_calls(), 2);
    assert_eq!(host.success_calls(), 0);
    assert!(!host.submit_enabled());
}

#[test]
fn test_terminal_state_ignores_input() {
    let mut controller = five_wires(&[1, 3]);
    controller.handle_input(&PuzzleInput::CutWire(1));
    controller.handle_input(&PuzzleInput::CutWire(3));
    let events_before = controller.host().unwrap().events().len();

    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(0)), InputOutcome::Ignored);
    controller.inject_event(&RandomEvent::SecurityPatrol, 5);
    controller.advance(10);

    let host = controller.host().unwrap();
    assert_eq!(host.events().len(), events_before);
    assert_eq!(controller.puzzle().unwrap().attempts(), 0);
    assert_eq!(controller.phase(), ControllerPhase::Succeeded);
}

// =============================================================================
// Keypad
// =============================================================================

#[test]
fn test_keypad_wrong_then_right() {
    let mut controller = mounted(
        PuzzleConfig::new(PuzzleKind::Keypad).with_seed_data(SeedData::keypad("4821")),
    );
    let start = controller.remaining_time().unwrap();

    assert_eq!(type_code(&mut controller, "1234"), InputOutcome::Penalized);
    let puzzle = controller.puzzle().unwrap();
    assert_eq!(puzzle.attempts(), 1);
    assert_eq!(puzzle.status(), PuzzleStatus::Active);
    assert_eq!(controller.remaining_time().unwrap(), start - 15);

    assert_eq!(type_code(&mut controller, "4821"), InputOutcome::Solved);
    assert_eq!(controller.phase(), ControllerPhase::Succeeded);
}

#[test]
fn test_keypad_exhausts_attempts() {
    let mut controller = mounted(
        PuzzleConfig::new(PuzzleKind::Keypad).with_seed_data(SeedData::keypad("4821")),
    );

    assert_eq!(type_code(&mut controller, "0000"), InputOutcome::Penalized);
    assert_eq!(type_code(&mut controller, "1111"), InputOutcome::Penalized);
    assert_eq!(type_code(&mut controller, "2222"), InputOutcome::Failed);
    assert_eq!(controller.phase(), ControllerPhase::Failed);

    // Terminal: the right code no longer helps.
    assert_eq!(type_code(&mut controller, "4821"), InputOutcome::Ignored);
    assert_eq!(controller.puzzle().unwrap().attempts(), 3);
}

// =============================================================================
// Seed data
// =============================================================================

#[test]
fn test_seed_data_used_verbatim() {
    let seeds = [
        SeedData::keypad("90210"),
        SeedData::wires(vec![WireColor::Black; 4], &[2]),
        SeedData::Circuit(CircuitLayout::classic()),
        SeedData::Detonator {
            order: vec![ChargeId(2), ChargeId(0), ChargeId(1)],
        },
    ];
    for seed in seeds {
        for rng_seed in [0, 1, 99] {
            let controller = mounted(
                PuzzleConfig::new(seed.kind())
                    .with_seed_data(seed.clone())
                    .with_rng_seed(rng_seed)
                    .with_difficulty(4),
            );
            assert_eq!(controller.puzzle().unwrap().solution(), Some(seed.clone()));
        }
    }
}

#[test]
fn test_team_seed_data_used_verbatim() {
    let seed = SeedData::vault(&[
        (Role::Hacker, 7),
        (Role::Lookout, 2),
        (Role::SafeCracker, 0),
        (Role::Demolitions, 9),
    ]);
    let controller = mounted(
        PuzzleConfig::new(PuzzleKind::VaultLock)
            .with_role(Role::Lookout)
            .with_seed_data(seed.clone())
            .with_rng_seed(1234),
    );
    assert_eq!(controller.puzzle().unwrap().solution(), Some(seed));
}

#[test]
fn test_generation_is_deterministic_per_seed() {
    for kind in PuzzleKind::ALL {
        let config = PuzzleConfig::new(kind).with_role(Role::Hacker).with_rng_seed(77);
        let a = mounted(config.clone());
        let b = mounted(config);
        assert_eq!(a.puzzle().unwrap().solution(), b.puzzle().unwrap().solution());
        assert!(a.puzzle().unwrap().solution().is_some(), "{kind} generated nothing");
    }
}

// =============================================================================
// Countdown
// =============================================================================

#[test]
fn test_countdown_monotonic_with_floor() {
    let mut controller = mounted(
        PuzzleConfig::new(PuzzleKind::Keypad).with_seed_data(SeedData::keypad("4821")),
    );
    let floor = i64::from(controller.host().unwrap().countdown().floor());

    let mut last = controller.remaining_time().unwrap();
    for _ in 0..80 {
        controller.tick();
        let now = controller.remaining_time().unwrap();
        assert!(now <= last);
        last = now;
    }

    // The clock is now below the first penalty: the penalty clamps at the
    // floor instead of expiring the puzzle.
    assert_eq!(last, 10);
    type_code(&mut controller, "1234");
    assert_eq!(controller.remaining_time().unwrap(), floor);
    assert_eq!(controller.phase(), ControllerPhase::Active);
}

#[test]
fn test_expiry_fails_with_time_up() {
    let mut controller = five_wires(&[1, 3]);
    controller.advance(60);

    assert_eq!(controller.phase(), ControllerPhase::Failed);
    assert_eq!(controller.remaining_time(), Some(0));
    let host = controller.host().unwrap();
    assert_eq!(host.banner().unwrap().text, TIME_UP_TEXT);

    // Expiry is delivered exactly once.
    controller.advance(5);
    let expiries = controller
        .host()
        .unwrap()
        .messages()
        .filter(|b| b.text == TIME_UP_TEXT)
        .count();
    assert_eq!(expiries, 1);
}

// =============================================================================
// Random events and cleanup
// =============================================================================

#[test]
fn test_patrol_blocks_then_reverts() {
    let mut controller = five_wires(&[1, 3]);
    controller.inject_event(&RandomEvent::SecurityPatrol, 3);

    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(1)), InputOutcome::Blocked);
    controller.advance(3);
    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(1)), InputOutcome::Accepted);

    let header = controller.view().unwrap().header().clone();
    assert!(!header.input_locked);
    assert_eq!(header.event, None);
}

#[test]
fn test_camera_sweep_hides_hints() {
    let mut controller = five_wires(&[1, 3]);
    controller.inject_event(&RandomEvent::CameraSweep, 4);

    let view = controller.view().unwrap();
    assert!(view.header().hints_obscured);
    // Input still goes through during a sweep.
    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(1)), InputOutcome::Accepted);

    controller.advance(4);
    assert!(!controller.view().unwrap().header().hints_obscured);
}

#[test]
fn test_unknown_event_ignored() {
    let mut controller = five_wires(&[1, 3]);
    controller.inject_event(&RandomEvent::parse("power_outage"), 5);

    assert!(controller.host().unwrap().timers().is_empty());
    assert_eq!(controller.handle_input(&PuzzleInput::CutWire(1)), InputOutcome::Accepted);
}

#[test]
fn test_cleanup_cancels_pending_revert() {
    let mut controller = five_wires(&[1, 3]);
    controller.inject_event(&RandomEvent::SystemCheck, 5);
    assert!(!controller.host().unwrap().timers().is_empty());

    assert_eq!(controller.unmount(), Some(PuzzleStatus::Active));
    controller.advance(10);
    assert!(!controller.is_mounted());
}

#[test]
fn test_circuit_classic_solution_solves() {
    let layout = CircuitLayout::classic();
    let mut controller =
        mounted(PuzzleConfig::new(PuzzleKind::Circuit).with_seed_data(SeedData::Circuit(layout.clone())));

    let mut last = InputOutcome::Ignored;
    for &cell in layout.solution.iter().skip(1) {
        last = controller.handle_input(&PuzzleInput::ClickCell(cell));
    }
    assert_eq!(last, InputOutcome::Solved);
    assert!(controller
        .host()
        .unwrap()
        .events()
        .iter()
        .any(|e| matches!(e, HostEvent::Success)));

    // The start cell is not clickable once solved.
    assert_eq!(
        controller.handle_input(&PuzzleInput::ClickCell(Cell::new(0, 0))),
        InputOutcome::Ignored
    );
}
