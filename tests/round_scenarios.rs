//! End-to-end rounds driven through `tick` with scripted input

use proptest::prelude::*;

use stick_bridge::Tuning;
use stick_bridge::sim::{GameEvent, GameState, RoundPhase, TickInput, tick};
use stick_bridge::tuning::SpanRange;

const HOLD: TickInput = TickInput {
    holding: true,
    restart: false,
};
const RELEASE: TickInput = TickInput {
    holding: false,
    restart: false,
};
const RESTART: TickInput = TickInput {
    holding: false,
    restart: true,
};

/// First platform 80 wide at x=40, then `gap` px to a `width` px platform
fn fixed_gap(gap: u32, width: u32) -> Tuning {
    Tuning {
        first_platform_width: SpanRange::new(80, 80),
        platform_width: SpanRange::new(width, width),
        gap: SpanRange::new(gap, gap),
        ..Default::default()
    }
}

/// Press, hold for `hold_ms` in `hold_slices` ticks, release
fn grow_and_release(state: &mut GameState, hold_ms: f32, hold_slices: u32) {
    tick(state, &HOLD, 0.0);
    let slice = hold_ms / hold_slices as f32;
    for _ in 0..hold_slices {
        tick(state, &HOLD, slice);
    }
    tick(state, &RELEASE, 0.0);
}

fn wait(state: &mut GameState, total_ms: f32, slices: u32) {
    let slice = total_ms / slices as f32;
    for _ in 0..slices {
        tick(state, &RELEASE, slice);
    }
}

#[test]
fn crossing_scores_and_extends_track() {
    let mut state = GameState::with_tuning(1, fixed_gap(60, 50));
    assert_eq!(state.track().current_index(), 0);

    // 400ms at 0.2px/ms = 80px; gap 60 + width 50 makes [60, 110] reachable
    grow_and_release(&mut state, 400.0, 25);
    assert!((state.stick().length - 80.0).abs() < 1e-3);

    wait(&mut state, 3000.0, 180);
    assert_eq!(*state.phase(), RoundPhase::Idle);
    assert_eq!(state.score(), 1);
    assert_eq!(state.track().len(), 3);
    assert_eq!(state.track().current_index(), 1);
    assert!(state.track().current_index() + 1 < state.track().len());
}

#[test]
fn short_stick_ends_run_and_restart_resets() {
    let mut state = GameState::with_tuning(2, fixed_gap(100, 50));
    let pivot = state.stick().pivot_x;

    // 50ms = 10px, far short of the 100px needed
    grow_and_release(&mut state, 50.0, 1);
    wait(&mut state, 2000.0, 120);

    assert!(state.is_game_over());
    assert_eq!(state.score(), 0);
    assert!((state.hero().pos.x - (pivot + 10.0 - 10.0)).abs() < 1e-3);
    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::BridgeFailed { .. })));

    // Presses are ignored while the latch holds
    grow_and_release(&mut state, 500.0, 5);
    assert!(state.is_game_over());

    tick(&mut state, &RESTART, 16.0);
    assert!(!state.is_game_over());
    assert_eq!(state.score(), 0);
    assert_eq!(state.track().len(), 2);
    assert_eq!(state.track().current_index(), 0);
    assert_eq!(state.camera().offset_x, 0.0);
}

#[test]
fn touching_either_edge_counts() {
    // Exactly the gap: tip lands on the near edge
    let mut state = GameState::with_tuning(3, fixed_gap(60, 50));
    grow_and_release(&mut state, 300.0, 1);
    assert_eq!(state.stick().length, 60.0);
    wait(&mut state, 3000.0, 100);
    assert_eq!(state.score(), 1);

    // Gap + width: tip lands on the far edge
    let mut state = GameState::with_tuning(3, fixed_gap(60, 50));
    grow_and_release(&mut state, 550.0, 1);
    assert_eq!(state.stick().length, 110.0);
    wait(&mut state, 3000.0, 100);
    assert_eq!(state.score(), 1);
}

#[test]
fn overshoot_fails_and_walks_to_tip() {
    let mut state = GameState::with_tuning(4, fixed_gap(60, 50));
    let pivot = state.stick().pivot_x;
    grow_and_release(&mut state, 1000.0, 10); // 200px, well past the far edge
    wait(&mut state, 5000.0, 300);

    assert!(state.is_game_over());
    assert!((state.hero().pos.x - (pivot + 200.0 - 10.0)).abs() < 1e-2);
}

#[test]
fn max_length_drops_without_release() {
    let mut state = GameState::with_tuning(5, fixed_gap(60, 50));
    tick(&mut state, &HOLD, 0.0);
    let mut last = 0.0;
    for _ in 0..200 {
        tick(&mut state, &HOLD, 16.0);
        assert!(state.stick().length >= last);
        assert!(state.stick().length <= 300.0);
        last = state.stick().length;
    }
    assert_eq!(state.stick().length, 300.0);
    let events = state.drain_events();
    assert!(events.contains(&GameEvent::MaxLengthReached));
    // Still holding, and the round carried on without a release
    assert!(!matches!(state.phase(), RoundPhase::Growing));
}

#[test]
fn several_crossings_accumulate_score() {
    let mut state = GameState::with_tuning(6, fixed_gap(60, 50));
    for expected in 1..=5u32 {
        grow_and_release(&mut state, 400.0, 4);
        wait(&mut state, 3000.0, 60);
        assert_eq!(state.score(), expected);
        assert_eq!(state.track().len(), 2 + expected as usize);
        assert_eq!(state.track().current_index(), expected as usize);
        // Camera keeps the new current platform 30px from the left
        let current = state.track().current().position_x;
        assert!((state.camera().offset_x + (current - 30.0)).abs() < 1e-3);
    }
    assert_eq!(state.best_score(), 5);
}

#[test]
fn best_score_survives_restart() {
    let mut state = GameState::with_tuning(7, fixed_gap(60, 50));
    grow_and_release(&mut state, 400.0, 4);
    wait(&mut state, 3000.0, 60);
    grow_and_release(&mut state, 0.0, 1);
    wait(&mut state, 3000.0, 60);
    assert!(state.is_game_over());

    tick(&mut state, &RESTART, 0.0);
    assert_eq!(state.score(), 0);
    assert_eq!(state.best_score(), 1);
}

#[test]
fn restart_while_held_waits_for_new_press() {
    let mut state = GameState::with_tuning(10, fixed_gap(100, 50));
    grow_and_release(&mut state, 50.0, 1);
    wait(&mut state, 2000.0, 60);
    assert!(state.is_game_over());

    // Hold down across the restart: no round until the hold is pressed afresh
    tick(&mut state, &HOLD, 16.0);
    tick(
        &mut state,
        &TickInput {
            holding: true,
            restart: true,
        },
        16.0,
    );
    assert_eq!(*state.phase(), RoundPhase::Idle);
    tick(&mut state, &HOLD, 100.0);
    assert_eq!(*state.phase(), RoundPhase::Idle);
    assert_eq!(state.rounds(), 0);

    tick(&mut state, &RELEASE, 16.0);
    tick(&mut state, &HOLD, 16.0);
    assert_eq!(*state.phase(), RoundPhase::Growing);
}

/// State after scripted play, with time sliced differently
fn play_sliced(hold_slices: u32, wait_slices: u32) -> GameState {
    let mut state = GameState::with_tuning(8, fixed_gap(60, 50));
    grow_and_release(&mut state, 400.0, hold_slices);
    wait(&mut state, 1000.0, wait_slices);
    state
}

proptest! {
    #[test]
    fn outcome_independent_of_tick_rate(hold_slices in 1u32..40, wait_slices in 1u32..200) {
        let coarse = play_sliced(1, 1);
        let fine = play_sliced(hold_slices, wait_slices);

        // 1000ms after release: mid-walk in both cases
        prop_assert_eq!(coarse.phase().name(), fine.phase().name());
        prop_assert!((coarse.stick().length - fine.stick().length).abs() < 1e-2);
        prop_assert!((coarse.stick().angle_deg - fine.stick().angle_deg).abs() < 1e-2);
        prop_assert!((coarse.hero().pos.x - fine.hero().pos.x).abs() < 1e-2);
    }

    #[test]
    fn score_moves_only_on_success(holds in prop::collection::vec(0.0f32..900.0, 1..8)) {
        let mut state = GameState::with_tuning(9, fixed_gap(60, 50));
        for hold in holds {
            if state.is_game_over() {
                let before = state.score();
                grow_and_release(&mut state, hold, 3);
                prop_assert_eq!(state.score(), before);
                prop_assert!(state.is_game_over());
                continue;
            }
            let before = state.score();
            let len_before = state.track().len();
            grow_and_release(&mut state, hold, 3);
            wait(&mut state, 6000.0, 50);

            if state.is_game_over() {
                prop_assert_eq!(state.score(), before);
                prop_assert_eq!(state.track().len(), len_before);
            } else {
                prop_assert_eq!(state.score(), before + 1);
                prop_assert_eq!(state.track().len(), len_before + 1);
            }
        }
    }
}
