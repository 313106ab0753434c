//! Level definitions
//!
//! Each level is a plain config struct resolved by an explicit lookup on the
//! level id. The tower is rebuilt from the config whenever a level is
//! selected.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Selectable levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LevelId {
    #[default]
    One,
    Two,
    Three,
}

impl LevelId {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::One => "Level 1",
            LevelId::Two => "Level 2",
            LevelId::Three => "Level 3",
        }
    }

    /// One-based level number as shown in the UI
    pub fn number(&self) -> u32 {
        match self {
            LevelId::One => 1,
            LevelId::Two => 2,
            LevelId::Three => 3,
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(LevelId::One),
            2 => Some(LevelId::Two),
            3 => Some(LevelId::Three),
            _ => None,
        }
    }
}

/// Everything the tower build and the presentation shell need to know about
/// a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: LevelId,
    /// Wedges per ring
    pub section_count: usize,
    /// Wedge index hidden on every ring (no collision geometry)
    pub gap_index: usize,
    /// Wedge indices that end the game on contact
    pub kill_indices: Vec<usize>,
    /// Rings in the tower
    pub ring_count: usize,
    /// Vertical distance between rings
    pub ring_spacing: f32,
    /// Decorative center pole height
    pub tower_height: f32,
    /// Sun/ambient light level fed to the renderer
    pub ambient_intensity: f32,
    /// Scene background color (RGB, 0-1)
    pub background: [f32; 3],
}

impl LevelConfig {
    /// Resolve the config for a level. Hazard density ("kill-field
    /// intensity") and section count both step up with the level number.
    pub fn for_level(id: LevelId) -> Self {
        match id {
            LevelId::One => Self {
                id,
                section_count: 8,
                gap_index: 4,
                kill_indices: Vec::new(),
                ring_count: 3,
                ring_spacing: 12.0,
                tower_height: 1000.0,
                ambient_intensity: 0.8,
                // CSS "orange"
                background: [1.0, 0.647, 0.0],
            },
            LevelId::Two => Self {
                id,
                section_count: 10,
                gap_index: 5,
                kill_indices: vec![3],
                ring_count: 3,
                ring_spacing: 12.0,
                tower_height: 1000.0,
                ambient_intensity: 1.2,
                // CSS "green"
                background: [0.0, 0.502, 0.0],
            },
            LevelId::Three => Self {
                id,
                section_count: 12,
                gap_index: 6,
                kill_indices: vec![3, 5, 9],
                ring_count: 3,
                ring_spacing: 12.0,
                tower_height: 1000.0,
                ambient_intensity: 4.0,
                // CSS "blue"
                background: [0.0, 0.0, 1.0],
            },
        }
    }

    /// Angular span of one section
    pub fn section_angle(&self) -> f32 {
        TAU / self.section_count as f32
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::for_level(LevelId::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_lookup() {
        let one = LevelConfig::for_level(LevelId::One);
        assert_eq!(one.section_count, 8);
        assert!(one.kill_indices.is_empty());

        let two = LevelConfig::for_level(LevelId::Two);
        assert_eq!(two.section_count, 10);
        assert_eq!(two.kill_indices, vec![3]);

        let three = LevelConfig::for_level(LevelId::Three);
        assert_eq!(three.section_count, 12);
        assert_eq!(three.kill_indices.len(), 3);
    }

    #[test]
    fn test_level_indices_in_range() {
        for id in [LevelId::One, LevelId::Two, LevelId::Three] {
            let config = LevelConfig::for_level(id);
            assert!(config.gap_index < config.section_count);
            for &k in &config.kill_indices {
                assert!(k < config.section_count);
                assert_ne!(k, config.gap_index);
            }
        }
    }

    #[test]
    fn test_level_number_round_trip() {
        for id in [LevelId::One, LevelId::Two, LevelId::Three] {
            assert_eq!(LevelId::from_number(id.number()), Some(id));
        }
        assert_eq!(LevelId::from_number(0), None);
        assert_eq!(LevelId::from_number(4), None);
    }

    #[test]
    fn test_section_angle() {
        let config = LevelConfig::for_level(LevelId::One);
        assert!((config.section_angle() - TAU / 8.0).abs() < 1e-6);
    }
}
