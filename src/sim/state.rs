//! Game state and core simulation types
//!
//! One serializable struct holds everything gameplay. A reset is a fresh
//! `GameState::new` rather than patching fields in place, so no stale
//! rotation or score can leak between runs.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::level::{LevelConfig, LevelId};
use super::probe::ProbeRig;
use super::tower::Tower;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Level select, tower idle behind the menu
    #[default]
    NotPlaying,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// How the ball currently moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallMotion {
    /// Looping hop over the top ring
    Bouncing,
    /// Dropping off the tower after the run ends
    Falling { velocity: f32 },
}

/// The bouncing ball
///
/// The ball never moves laterally: it hops in place at world azimuth 0,
/// `BALL_ORBIT` out from the tower axis, while the tower rotates under it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    /// World-space height of the ball center
    pub height: f32,
    /// Progress through the current bounce cycle, 0..1
    pub progress: f32,
    /// Set once the landing check for this cycle has fired
    pub landing_checked: bool,
    pub motion: BallMotion,
}

impl Ball {
    pub fn new(rest_height: f32) -> Self {
        Self {
            height: rest_height,
            progress: 0.0,
            landing_checked: false,
            motion: BallMotion::Bouncing,
        }
    }

    /// Bounce arc height above the rest point at `progress`: a parabola
    /// with zeros at 0 and 1 and peak `BOUNCE_HEIGHT` at 0.5
    pub fn arc_offset(progress: f32) -> f32 {
        4.0 * BOUNCE_HEIGHT * progress * (1.0 - progress)
    }
}

/// Paint mark left on the top ring by a landing (visual only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Splat {
    /// Ring the mark sits on
    pub ring: usize,
    /// Ring-local angle, so the mark rotates with the tower
    pub angle: f32,
    /// Random orientation of the decal
    pub spin: f32,
    /// Index into the renderer's blue palette
    pub tint: u32,
    /// Seconds since spawn
    pub age: f32,
}

/// One-shot events emitted by the simulation, drained by the shell for
/// audio and HUD updates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    LevelLoaded(LevelId),
    BounceLanded { ring: usize },
    FellThrough { ring: usize },
    KillFieldHit { ring: usize, section: usize },
    GameOver { score: u32 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the current stream
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Generator for one draw. Each call moves to a fresh PCG stream, so
    /// successive draws differ while staying reproducible from the seed.
    pub fn draw(&mut self) -> Pcg32 {
        let rng = self.to_rng();
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Active level config
    pub level: LevelConfig,
    /// The rotating tower
    pub tower: Tower,
    /// Fixed probe offsets for the active section count
    pub probes: ProbeRig,
    /// The bouncing ball
    pub ball: Ball,
    /// Completed bounces this run
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Paint marks on the rings (not gameplay-affecting)
    #[serde(skip)]
    pub splats: Vec<Splat>,
    /// Events queued since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_level(seed, LevelId::default())
    }

    /// Create a new game state on a specific level
    pub fn with_level(seed: u64, level_id: LevelId) -> Self {
        let level = LevelConfig::for_level(level_id);
        let tower = Tower::build(&level);
        let probes = ProbeRig::for_section_count(level.section_count);
        let ball = Ball::new(tower.top_surface() + BALL_RADIUS);

        Self {
            seed,
            rng_state: RngState::new(seed),
            level,
            tower,
            probes,
            ball,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::NotPlaying,
            splats: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Rest height of the ball center when touching the top ring
    pub fn ball_rest_height(&self) -> f32 {
        self.tower.top_surface() + BALL_RADIUS
    }

    /// Switch levels, rebuilding the tower and the probe rig from scratch.
    /// Only honored on the idle screen; mid-run and game-over screens need
    /// a reset first.
    pub fn load_level(&mut self, level_id: LevelId) {
        if self.phase != GamePhase::NotPlaying {
            return;
        }
        *self = Self::with_level(self.seed, level_id);
        self.events.push(GameEvent::LevelLoaded(level_id));
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop a paint mark where the ball touched the given ring. The ball
    /// sits at world azimuth 0, so its ring-local angle is the rotation
    /// itself.
    pub fn spawn_splat(&mut self, ring: usize) {
        let mut rng = self.rng_state.draw();
        let splat = Splat {
            ring,
            angle: self.tower.rotation,
            spin: rng.random_range(0.0..TAU),
            tint: rng.random_range(0..2),
            age: 0.0,
        };
        self.splats.push(splat);
        if self.splats.len() > MAX_SPLATS {
            self.splats.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_fully_reset() {
        let state = GameState::new(7);
        assert_eq!(state.tower.rotation, 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::NotPlaying);
        assert_eq!(state.time_ticks, 0);
        assert!(state.splats.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.level.id, LevelId::One);
        assert_eq!(state.ball.motion, BallMotion::Bouncing);
    }

    #[test]
    fn test_ball_rests_on_top_ring() {
        let state = GameState::new(7);
        // Three rings spaced 12 apart, slab half-height 0.5, ball radius 1
        assert!((state.ball.height - 37.5).abs() < 1e-5);
        assert!((state.ball_rest_height() - state.tower.top_surface() - BALL_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn test_arc_offset_shape() {
        assert_eq!(Ball::arc_offset(0.0), 0.0);
        assert_eq!(Ball::arc_offset(1.0), 0.0);
        assert!((Ball::arc_offset(0.5) - BOUNCE_HEIGHT).abs() < 1e-6);
        // Near the landing check the ball is close to the surface
        assert!(Ball::arc_offset(LANDING_CHECK_PROGRESS) < BOUNCE_HEIGHT * 0.2);
    }

    #[test]
    fn test_load_level_rebuilds_everything() {
        let mut state = GameState::new(7);
        state.tower.rotation = 1.0;
        state.score = 5;
        state.load_level(LevelId::Three);

        assert_eq!(state.level.id, LevelId::Three);
        assert_eq!(state.tower.section_count, 12);
        assert_eq!(state.tower.rotation, 0.0);
        assert_eq!(state.score, 0);
        let expected = ProbeRig::for_section_count(12);
        assert_eq!(state.probes.left, expected.left);
        assert_eq!(state.probes.right, expected.right);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelLoaded(LevelId::Three))
        );
    }

    #[test]
    fn test_load_level_ignored_outside_idle() {
        let mut state = GameState::new(7);
        state.phase = GamePhase::Playing;
        state.score = 3;
        state.load_level(LevelId::Two);
        assert_eq!(state.level.id, LevelId::One);
        assert_eq!(state.score, 3);

        // Same from the game-over screen; only a reset re-arms level select
        state.phase = GamePhase::GameOver;
        state.load_level(LevelId::Two);
        assert_eq!(state.level.id, LevelId::One);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_splat_cap_and_palette() {
        let mut state = GameState::new(7);
        for _ in 0..(MAX_SPLATS + 4) {
            state.spawn_splat(2);
        }
        assert_eq!(state.splats.len(), MAX_SPLATS);
        for splat in &state.splats {
            assert!(splat.tint < 2);
            assert!(splat.spin >= 0.0 && splat.spin < TAU);
        }
    }

    #[test]
    fn test_rng_draws_reproduce_from_seed() {
        let mut a = RngState::new(42);
        let mut b = RngState::new(42);
        let first_a: u32 = a.draw().random_range(0..1000);
        let first_b: u32 = b.draw().random_range(0..1000);
        assert_eq!(first_a, first_b);
        assert_eq!(a.stream, 1);

        // A later draw uses a different stream
        let second_a: u32 = a.draw().random_range(0..1000);
        assert_eq!(a.stream, 2);
        let _ = second_a;
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(7);
        state.push_event(GameEvent::Started);
        state.push_event(GameEvent::GameOver { score: 2 });
        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert!(state.events.is_empty());
        assert!(state.drain_events().is_empty());
    }
}
