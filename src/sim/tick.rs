//! Round state machine driver
//!
//! `tick` is called once per scheduler frame with the wall-clock time since
//! the previous frame. Input edges are applied first, then stages run one
//! after another: each either suspends (waiting for time or release) or
//! resolves and hands its unused time to the next stage.

use rand::Rng;

use super::bridge::{self, Bridge, Verdict};
use super::state::{GameEvent, GameState, RoundPhase, SoundCue};
use super::stick::{GrowStep, Stick};
use super::timeline::Tween;
use crate::consts::MAX_STAGE_STEPS;
use crate::{ease_out_cubic, lerp};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Hold signal level (pointer/touch/key down)
    pub holding: bool,
    /// Restart request; only honoured once the run is over
    pub restart: bool,
}

/// What a stage wants after consuming time
enum Flow {
    /// Wait for the next tick
    Suspend,
    /// Resolved; carry this much time into the next stage
    Continue(f32),
}

/// Advance the game by `dt_ms` of wall-clock time
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
    state.clock_ms += f64::from(dt_ms);
    state.success_cue_ms = (state.success_cue_ms - dt_ms).max(0.0);

    if input.restart {
        restart(state);
    }
    apply_hold(state, input.holding);

    let mut budget = dt_ms;
    for _ in 0..MAX_STAGE_STEPS {
        match step(state, budget) {
            Flow::Suspend => return,
            Flow::Continue(left) => budget = left,
        }
    }
    log::warn!(
        "Stage chain did not settle within {} steps (phase {})",
        MAX_STAGE_STEPS,
        state.phase.name()
    );
}

/// Turn the hold level into press/release edges
fn apply_hold(state: &mut GameState, holding: bool) {
    let pressed = holding && !state.input_held;
    let released = !holding && state.input_held;
    state.input_held = holding;

    match state.phase {
        RoundPhase::Idle if pressed => start_round(state),
        RoundPhase::Growing if released => release(state),
        phase if pressed => {
            log::debug!("Press ignored while {}", phase.name());
        }
        _ => {}
    }
}

fn restart(state: &mut GameState) {
    if !state.is_game_over() {
        log::debug!("Restart ignored while {}", state.phase.name());
        return;
    }
    state.reset_world();
    state.emit(GameEvent::Restarted);
    state.note(format_args!("Restarted"));
}

fn start_round(state: &mut GameState) {
    let pivot = state.track.current().right();
    state.stick = Stick::new(pivot);
    state.rounds += 1;
    state.phase = RoundPhase::Growing;
    state.emit(GameEvent::RoundStarted);
    state.note(format_args!(
        "Round {} started on platform {} (pivot x={})",
        state.rounds,
        state.track.current_index(),
        pivot
    ));
}

fn release(state: &mut GameState) {
    let length = state.stick.length;
    state.emit(GameEvent::Released { length });
    state.note(format_args!("Released at length {:.1}", length));
    begin_drop(state);
}

fn begin_drop(state: &mut GameState) {
    state.emit(GameEvent::Sound(SoundCue::Drop));
    state.phase = RoundPhase::Dropping {
        tween: Tween::new(state.tuning.drop_duration_ms),
    };
}

/// Run the current stage with `budget` ms available
fn step(state: &mut GameState, budget: f32) -> Flow {
    match state.phase {
        RoundPhase::Idle | RoundPhase::GameOver => Flow::Suspend,

        RoundPhase::Growing => {
            let grow_rate = state.tuning.grow_rate;
            let max_length = state.tuning.max_stick_length;
            let grown = state.stick.grow(budget, grow_rate, max_length);
            roll_grow_cue(state, budget);
            match grown {
                GrowStep::Growing => Flow::Suspend,
                GrowStep::Capped { leftover_ms } => {
                    log::warn!("Max length reached ({max_length}px), dropping");
                    state.emit(GameEvent::MaxLengthReached);
                    state.emit(GameEvent::Released { length: max_length });
                    begin_drop(state);
                    Flow::Continue(leftover_ms)
                }
            }
        }

        RoundPhase::Dropping { mut tween } => {
            let left = tween.advance(budget);
            state.stick.set_drop_progress(tween.progress());
            if tween.is_finished() {
                state.emit(GameEvent::Dropped);
                state.note(format_args!("Stick dropped"));
                state.phase = RoundPhase::Evaluating;
                Flow::Continue(left)
            } else {
                state.phase = RoundPhase::Dropping { tween };
                Flow::Suspend
            }
        }

        RoundPhase::Evaluating => {
            evaluate(state);
            Flow::Continue(budget)
        }

        RoundPhase::Walking {
            mut tween,
            from_x,
            to_x,
            bridge,
            mut next_cue_ms,
        } => {
            let left = tween.advance(budget);
            state.hero.pos.x = lerp(from_x, to_x, tween.progress());

            let interval = state.tuning.walk_cue_interval_ms;
            while next_cue_ms < tween.duration_ms() && tween.elapsed_ms() >= next_cue_ms {
                state.emit(GameEvent::Sound(SoundCue::Walk));
                next_cue_ms += interval;
            }

            if !tween.is_finished() {
                state.phase = RoundPhase::Walking {
                    tween,
                    from_x,
                    to_x,
                    bridge,
                    next_cue_ms,
                };
                return Flow::Suspend;
            }

            state.emit(GameEvent::WalkFinished);
            state.note(format_args!("Walk finished at x={:.1}", to_x));
            match bridge.verdict {
                Verdict::Crossed => begin_pan(state),
                Verdict::Missed => begin_fall(state),
            }
            Flow::Continue(left)
        }

        RoundPhase::Panning {
            mut tween,
            from_x,
            to_x,
        } => {
            let left = tween.advance(budget);
            state.camera.offset_x = lerp(from_x, to_x, ease_out_cubic(tween.progress()));
            if tween.is_finished() {
                state.phase = RoundPhase::Settling;
                Flow::Continue(left)
            } else {
                state.phase = RoundPhase::Panning { tween, from_x, to_x };
                Flow::Suspend
            }
        }

        RoundPhase::Settling => {
            settle_success(state);
            Flow::Continue(budget)
        }

        RoundPhase::Falling { mut tween } => {
            let left = tween.advance(budget);
            let t = tween.progress();
            state.hero.pos.y = state.tuning.fall_depth * crate::ease_in_quad(t);
            state.stick.set_tip_progress(t);
            if tween.is_finished() {
                enter_game_over(state);
                Flow::Continue(left)
            } else {
                state.phase = RoundPhase::Falling { tween };
                Flow::Suspend
            }
        }
    }
}

/// Occasional creak while the stick grows, proportional to time grown
fn roll_grow_cue(state: &mut GameState, dt_ms: f32) {
    let chance = (state.tuning.grow_cue_chance_per_ms * dt_ms).clamp(0.0, 1.0);
    if chance > 0.0 && state.cue_rng.random_bool(f64::from(chance)) {
        state.emit(GameEvent::Sound(SoundCue::Grow));
    }
}

/// The branch point: judge the bridge and start the matching walk
fn evaluate(state: &mut GameState) {
    let to = match state.track.next() {
        Some(to) => *to,
        None => {
            // Settling always appends; only a hand-built track can get here
            log::error!("No platform ahead of index {}, spawning one", state.track.current_index());
            state.track.spawn_next(&mut state.rng, &state.tuning);
            match state.track.next() {
                Some(to) => *to,
                None => return,
            }
        }
    };

    let judged = bridge::evaluate(state.stick.length, state.stick.pivot_x, &to);
    match judged.verdict {
        Verdict::Crossed => {
            state.emit(GameEvent::BridgeSucceeded { end_x: judged.end_x });
            state.note(format_args!(
                "Bridge succeeded: tip x={:.1} on [{}, {}]",
                judged.end_x,
                to.position_x,
                to.right()
            ));
        }
        Verdict::Missed => {
            state.emit(GameEvent::BridgeFailed { end_x: judged.end_x });
            state.note(format_args!(
                "Bridge failed: tip x={:.1} outside [{}, {}]",
                judged.end_x,
                to.position_x,
                to.right()
            ));
        }
    }

    let target_x = bridge::walk_target(&judged, &to, &state.tuning);
    begin_walk(state, judged, target_x);
}

fn begin_walk(state: &mut GameState, bridge: Bridge, to_x: f32) {
    let from_x = state.hero.pos.x;
    let duration = (to_x - from_x).abs() / state.tuning.walk_speed;
    state.emit(GameEvent::Sound(SoundCue::Walk));
    state.phase = RoundPhase::Walking {
        tween: Tween::new(duration),
        from_x,
        to_x,
        bridge,
        next_cue_ms: state.tuning.walk_cue_interval_ms,
    };
}

fn begin_pan(state: &mut GameState) {
    let target = state.track.next().map(|p| p.position_x).unwrap_or_default();
    state.phase = RoundPhase::Panning {
        tween: Tween::new(state.tuning.pan_duration_ms),
        from_x: state.camera.offset_x,
        to_x: -(target - state.tuning.camera_lead),
    };
}

fn begin_fall(state: &mut GameState) {
    state.emit(GameEvent::Sound(SoundCue::Failure));
    state.emit(GameEvent::FallStarted);
    state.note(format_args!("Falling"));
    state.phase = RoundPhase::Falling {
        tween: Tween::new(state.tuning.fall_duration_ms),
    };
}

fn settle_success(state: &mut GameState) {
    state.score += 1;
    state.best_score = state.best_score.max(state.score);

    state.track.advance();
    state.track.spawn_next(&mut state.rng, &state.tuning);

    let current = *state.track.current();
    state.hero.pos.x = bridge::stand_x(&current, &state.tuning);
    state.stick = Stick::new(current.right());
    state.success_cue_ms = state.tuning.success_cue_ms;

    state.emit(GameEvent::Sound(SoundCue::Success));
    state.emit(GameEvent::Scored { score: state.score });
    state.phase = RoundPhase::Idle;
    finish_round(state, "crossed");
}

fn enter_game_over(state: &mut GameState) {
    state.best_score = state.best_score.max(state.score);
    state.phase = RoundPhase::GameOver;
    state.emit(GameEvent::GameOver { score: state.score });
    state.note(format_args!("Game over with score {}", state.score));
    finish_round(state, "fell");
}

/// Runs on entry to both terminal states of a round
fn finish_round(state: &mut GameState, outcome: &str) {
    debug_assert!(!state.is_round_active());
    state.note(format_args!(
        "Round {} ended ({}), score {}, {} platforms",
        state.rounds,
        outcome,
        state.score,
        state.track.len()
    ));
}
