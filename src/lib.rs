//! Helix Drop - a rotating-tower bounce arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tower model, rotation tracking, landing classification)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural Web Audio sound effects (wasm only)
//! - `settings`: Player preferences with LocalStorage persistence

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth rotation)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Tower rotation per tick while a turn key is held:
    /// 0.07 rad per frame at 60 Hz, expressed at the 120 Hz sim rate.
    pub const ROTATE_STEP: f32 = 0.035;

    /// Platform slice dimensions
    pub const PLATFORM_RADIUS: f32 = 10.0;
    pub const PLATFORM_HEIGHT: f32 = 1.0;
    /// Decorative center pole radius (height comes from the level config)
    pub const POLE_RADIUS: f32 = 2.0;

    /// Ball defaults - the ball bounces in place at a fixed offset from the tower axis
    pub const BALL_RADIUS: f32 = 1.0;
    pub const BALL_ORBIT: f32 = 5.0;
    /// Peak height of the bounce arc above the rest point
    pub const BOUNCE_HEIGHT: f32 = 6.0;
    /// Seconds for one full bounce loop
    pub const BOUNCE_PERIOD: f32 = 1.2;
    /// Cycle progress at which the landing check fires
    pub const LANDING_CHECK_PROGRESS: f32 = 0.97;

    /// Probe spread as a fraction of one section's angular span.
    /// Kept above 1.0 so neither probe samples the excluded current section mid-play.
    pub const PROBE_REACH: f32 = 1.25;

    /// Splat decal lifetime in seconds
    pub const SPLAT_LIFETIME: f32 = 5.0;
    /// Splat cap (matches the renderer's fixed buffer)
    pub const MAX_SPLATS: usize = 16;

    /// Downward acceleration for the game-over fall animation
    pub const FALL_GRAVITY: f32 = 30.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    angle %= TAU;
    if angle < 0.0 {
        angle += TAU;
    }
    // Adding TAU to a tiny negative can round to exactly TAU
    if angle >= TAU { 0.0 } else { angle }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!((wrap_angle(-TAU - 0.5) - (TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_angle_never_reaches_tau() {
        // -1e-8 % TAU stays -1e-8; adding TAU rounds to exactly TAU in f32
        let wrapped = wrap_angle(-1e-8);
        assert!(wrapped < TAU);
        assert!(wrapped >= 0.0);
    }

    #[test]
    fn test_polar_round_trip() {
        let pos = polar_to_cartesian(5.0, 1.2);
        let (r, theta) = cartesian_to_polar(pos);
        assert!((r - 5.0).abs() < 1e-4);
        assert!((theta - 1.2).abs() < 1e-4);
    }
}
