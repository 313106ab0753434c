//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod level;
pub mod probe;
pub mod section;
pub mod state;
pub mod tick;
pub mod tower;

pub use level::{LevelConfig, LevelId};
pub use probe::{LandingOutcome, LandingReport, ProbeHit, ProbeRig, classify_landing};
pub use section::{SectionKind, WedgeSlice, wedge_slices};
pub use state::{Ball, BallMotion, GameEvent, GamePhase, GameState, RngState, Splat};
pub use tick::{TickInput, tick};
pub use tower::{Ring, Section, Tower, section_index};
