//! Fixed timestep simulation tick
//!
//! Advances the game deterministically. The shell calls this at `SIM_DT`
//! through an accumulator; nothing in here reads the clock or the DOM.

use super::probe::{LandingOutcome, classify_landing};
use super::state::{Ball, BallMotion, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Rotate the tower counterclockwise (left key held)
    pub rotate_left: bool,
    /// Rotate the tower clockwise (right key held)
    pub rotate_right: bool,
    /// Begin the run; one-shot, cleared by the shell after each tick
    pub start: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    age_splats(state, dt);

    match state.phase {
        GamePhase::NotPlaying => {
            if input.start {
                state.phase = GamePhase::Playing;
                state.push_event(GameEvent::Started);
            }
        }

        GamePhase::Playing => {
            if input.rotate_left {
                state.tower.rotate_left(ROTATE_STEP);
            }
            if input.rotate_right {
                state.tower.rotate_right(ROTATE_STEP);
            }

            advance_bounce(state, dt);
        }

        GamePhase::GameOver => {
            // After a fall-through the ball keeps dropping behind the panel
            if let BallMotion::Falling { velocity } = &mut state.ball.motion {
                *velocity += FALL_GRAVITY * dt;
                state.ball.height -= *velocity * dt;
            }
        }
    }
}

/// One step of the bounce cycle. The landing check fires once per cycle
/// just before touch-down; a safe touch-down scores and restarts the
/// cycle.
fn advance_bounce(state: &mut GameState, dt: f32) {
    state.ball.progress += dt / BOUNCE_PERIOD;

    if state.ball.progress >= LANDING_CHECK_PROGRESS && !state.ball.landing_checked {
        state.ball.landing_checked = true;
        resolve_landing(state);
        if state.phase != GamePhase::Playing {
            return;
        }
    }

    if state.ball.progress >= 1.0 {
        state.ball.progress -= 1.0;
        state.ball.landing_checked = false;
        state.score += 1;
        if let Some(ring) = state.tower.ring_beneath(state.ball.height) {
            state.spawn_splat(ring);
            state.push_event(GameEvent::BounceLanded { ring });
        }
    }

    state.ball.height = state.ball_rest_height() + Ball::arc_offset(state.ball.progress);
}

/// Classify this cycle's landing and end the run when it is not safe.
/// The contact ring is resolved from the ball's height; below the whole
/// stack nothing can be hit, which reads as a fall-through rather than an
/// error.
fn resolve_landing(state: &mut GameState) {
    let Some(ring) = state.tower.ring_beneath(state.ball.height) else {
        drop_out(state, GameEvent::FellThrough { ring: 0 });
        return;
    };

    match classify_landing(&state.tower, ring, &state.probes).outcome() {
        LandingOutcome::Landed => {}
        LandingOutcome::Kill { section } => {
            state.push_event(GameEvent::KillFieldHit { ring, section });
            end_run(state);
        }
        LandingOutcome::FellThrough => {
            drop_out(state, GameEvent::FellThrough { ring });
        }
    }
}

/// Fall-through: switch the ball to free fall, then end the run
fn drop_out(state: &mut GameState, event: GameEvent) {
    state.ball.motion = BallMotion::Falling { velocity: 0.0 };
    state.push_event(event);
    end_run(state);
}

fn end_run(state: &mut GameState) {
    log::info!(
        "run over at score {} after {} ticks",
        state.score,
        state.time_ticks
    );
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::GameOver { score: state.score });
}

fn age_splats(state: &mut GameState, dt: f32) {
    for splat in &mut state.splats {
        splat.age += dt;
    }
    state.splats.retain(|s| s.age < SPLAT_LIFETIME);
}
