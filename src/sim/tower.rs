//! Tower model: platform rings stacked at fixed spacing, sharing one
//! rotation angle
//!
//! Rotating the tower rotates every ring identically. Hit-testing happens in
//! ring-local coordinates derived from the shared angle, so there is no
//! separate collision copy of the geometry to keep in sync.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::level::LevelConfig;
use super::section::{SectionKind, WedgeSlice, wedge_slices};
use crate::consts::{PLATFORM_HEIGHT, PLATFORM_RADIUS};
use crate::wrap_angle;

/// Discrete section index for a rotation angle: floor(θ / (2π/N)).
/// The wrap keeps θ in [0, 2π); the min guard covers float rounding at the
/// top of the range.
#[inline]
pub fn section_index(theta: f32, section_count: usize) -> usize {
    let section_angle = TAU / section_count as f32;
    ((wrap_angle(theta) / section_angle) as usize).min(section_count - 1)
}

/// One classified wedge of a ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    pub kind: SectionKind,
    pub wedge: WedgeSlice,
}

/// A full set of sections at one tower level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    /// Center height of the platform slab
    pub elevation: f32,
    pub sections: Vec<Section>,
}

impl Ring {
    fn build(config: &LevelConfig, elevation: f32) -> Self {
        let sections = wedge_slices(config.section_count, PLATFORM_RADIUS)
            .into_iter()
            .enumerate()
            .map(|(index, wedge)| {
                let mut kind = if config.kill_indices.contains(&index) {
                    SectionKind::KillField
                } else {
                    SectionKind::Safe
                };
                // The gap wedge is forced invisible regardless of the
                // color classification lists
                if index == config.gap_index {
                    kind = SectionKind::Gap;
                }
                Section { index, kind, wedge }
            })
            .collect();

        Self { elevation, sections }
    }

    /// Top surface height of the platform slab
    pub fn surface(&self) -> f32 {
        self.elevation + PLATFORM_HEIGHT / 2.0
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Section owning a ring-local angle
    pub fn section_at(&self, local_angle: f32) -> &Section {
        &self.sections[section_index(local_angle, self.sections.len())]
    }
}

/// The whole tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    /// Shared rotation angle θ, kept in [0, 2π)
    pub rotation: f32,
    /// Rings ordered bottom to top
    pub rings: Vec<Ring>,
    pub section_count: usize,
    /// Decorative center pole height
    pub height: f32,
}

impl Tower {
    /// Build a tower from a level config. Classification is fixed here;
    /// nothing reclassifies at runtime.
    pub fn build(config: &LevelConfig) -> Self {
        if config.kill_indices.contains(&config.gap_index) {
            log::warn!(
                "gap index {} also listed as kill field; gap wins",
                config.gap_index
            );
        }

        let rings = (1..=config.ring_count)
            .map(|i| Ring::build(config, i as f32 * config.ring_spacing))
            .collect();

        Self {
            rotation: 0.0,
            rings,
            section_count: config.section_count,
            height: config.tower_height,
        }
    }

    /// Angular span of one section
    pub fn section_angle(&self) -> f32 {
        TAU / self.section_count as f32
    }

    /// Rotate by +step, wrapping into [0, 2π)
    pub fn rotate_left(&mut self, step: f32) {
        self.rotation = wrap_angle(self.rotation + step);
    }

    /// Rotate by -step, wrapping into [0, 2π)
    pub fn rotate_right(&mut self, step: f32) {
        self.rotation = wrap_angle(self.rotation - step);
    }

    /// The section index the current rotation selects
    pub fn current_section_index(&self) -> usize {
        section_index(self.rotation, self.section_count)
    }

    /// Map a world-space point (XZ plane) into the rotating ring frame
    pub fn to_ring_local(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(self.rotation).rotate(world)
    }

    /// Highest ring whose top surface sits at or below `height`, or None
    /// when the point is below the whole stack.
    pub fn ring_beneath(&self, height: f32) -> Option<usize> {
        self.rings
            .iter()
            .enumerate()
            .rev()
            .find(|(_, ring)| ring.surface() <= height)
            .map(|(i, _)| i)
    }

    /// Top surface height of the highest ring
    pub fn top_surface(&self) -> f32 {
        self.rings.last().map(|r| r.surface()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ROTATE_STEP;
    use crate::sim::level::LevelId;

    fn test_config() -> LevelConfig {
        LevelConfig {
            id: LevelId::One,
            section_count: 8,
            gap_index: 4,
            kill_indices: vec![1, 7],
            ring_count: 3,
            ring_spacing: 12.0,
            tower_height: 1000.0,
            ambient_intensity: 0.8,
            background: [1.0, 0.647, 0.0],
        }
    }

    #[test]
    fn test_section_index_n8() {
        use std::f32::consts::PI;
        assert_eq!(section_index(0.0, 8), 0);
        assert_eq!(section_index(PI, 8), 4);
        assert_eq!(section_index(TAU - 1e-4, 8), 7);
    }

    #[test]
    fn test_section_index_in_range() {
        for i in 0..1000 {
            let theta = i as f32 * 0.0123;
            let idx = section_index(theta, 8);
            assert!(idx < 8, "theta {theta} gave index {idx}");
        }
    }

    #[test]
    fn test_build_classification() {
        let tower = Tower::build(&test_config());
        assert_eq!(tower.rings.len(), 3);

        for ring in &tower.rings {
            assert_eq!(ring.section_count(), 8);
            let gaps: Vec<_> = ring
                .sections
                .iter()
                .filter(|s| s.kind == SectionKind::Gap)
                .collect();
            assert_eq!(gaps.len(), 1);
            assert_eq!(gaps[0].index, 4);

            assert_eq!(ring.sections[1].kind, SectionKind::KillField);
            assert_eq!(ring.sections[7].kind, SectionKind::KillField);
            // Unlisted indices default to Safe
            assert_eq!(ring.sections[0].kind, SectionKind::Safe);
            assert_eq!(ring.sections[3].kind, SectionKind::Safe);
        }
    }

    #[test]
    fn test_gap_overrides_kill_listing() {
        let mut config = test_config();
        config.kill_indices = vec![4];
        let tower = Tower::build(&config);
        assert_eq!(tower.rings[0].sections[4].kind, SectionKind::Gap);
    }

    #[test]
    fn test_rotation_wraps_both_directions() {
        let mut tower = Tower::build(&test_config());
        tower.rotate_right(ROTATE_STEP);
        assert!(tower.rotation >= 0.0 && tower.rotation < TAU);
        assert!((tower.rotation - (TAU - ROTATE_STEP)).abs() < 1e-5);
        assert_eq!(tower.current_section_index(), 7);

        tower.rotate_left(2.0 * ROTATE_STEP);
        assert!((tower.rotation - ROTATE_STEP).abs() < 1e-5);
        assert_eq!(tower.current_section_index(), 0);
    }

    #[test]
    fn test_rotation_round_trip() {
        let mut tower = Tower::build(&test_config());
        tower.rotation = 1.0;
        let start_index = tower.current_section_index();

        let step = 0.3; // less than one section span
        tower.rotate_left(step);
        tower.rotate_right(step);

        assert!((tower.rotation - 1.0).abs() < 1e-5);
        assert_eq!(tower.current_section_index(), start_index);
    }

    #[test]
    fn test_ring_beneath() {
        let tower = Tower::build(&test_config());
        // Surfaces at 12.5, 24.5, 36.5
        assert_eq!(tower.ring_beneath(40.0), Some(2));
        assert_eq!(tower.ring_beneath(36.5), Some(2));
        assert_eq!(tower.ring_beneath(30.0), Some(1));
        assert_eq!(tower.ring_beneath(13.0), Some(0));
        assert_eq!(tower.ring_beneath(5.0), None);
        assert!((tower.top_surface() - 36.5).abs() < 1e-5);
    }

    #[test]
    fn test_to_ring_local_applies_rotation() {
        let mut tower = Tower::build(&test_config());
        tower.rotation = TAU / 8.0;

        // A point at world azimuth 0 lands one section over in ring space
        let local = tower.to_ring_local(Vec2::new(5.0, 0.0));
        let (r, theta) = crate::cartesian_to_polar(local);
        assert!((r - 5.0).abs() < 1e-4);
        assert!((crate::wrap_angle(theta) - TAU / 8.0).abs() < 1e-4);
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use crate::consts::ROTATE_STEP;
    use crate::sim::level::LevelId;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_wrap_angle_stays_in_range(angle in -1000.0f32..1000.0f32) {
            let wrapped = wrap_angle(angle);
            prop_assert!((0.0..TAU).contains(&wrapped));
        }

        #[test]
        fn prop_section_index_in_range(theta in -100.0f32..100.0f32, count in 1usize..33) {
            prop_assert!(section_index(theta, count) < count);
        }

        #[test]
        fn prop_rotation_sequences_stay_wrapped(
            steps in proptest::collection::vec(any::<bool>(), 1..200),
        ) {
            let config = LevelConfig::for_level(LevelId::Three);
            let mut tower = Tower::build(&config);
            for left in steps {
                if left {
                    tower.rotate_left(ROTATE_STEP);
                } else {
                    tower.rotate_right(ROTATE_STEP);
                }
                prop_assert!((0.0..TAU).contains(&tower.rotation));
                prop_assert!(tower.current_section_index() < tower.section_count);
            }
        }

        #[test]
        fn prop_ring_beneath_is_the_highest_cover(height in -10.0f32..60.0f32) {
            let tower = Tower::build(&LevelConfig::for_level(LevelId::One));
            match tower.ring_beneath(height) {
                Some(i) => {
                    prop_assert!(tower.rings[i].surface() <= height);
                    for ring in &tower.rings[i + 1..] {
                        prop_assert!(ring.surface() > height);
                    }
                }
                None => {
                    for ring in &tower.rings {
                        prop_assert!(ring.surface() > height);
                    }
                }
            }
        }
    }
}
