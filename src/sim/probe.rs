//! Landing classification
//!
//! At the bounce trigger, two fixed downward probes flanking the ball's
//! ground point are cast against the ring beneath the ball. The ring
//! rotates under the probes; the section selected by the current rotation
//! index is excluded from candidacy before testing, and gap wedges carry no
//! collision geometry. The per-probe intersection counts decide the
//! outcome: an empty probe means nothing under that side of the ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::section::SectionKind;
use super::tower::{Tower, section_index};
use crate::cartesian_to_polar;
use crate::consts::{BALL_ORBIT, PROBE_REACH};

/// Two fixed world-space probe offsets (XZ plane), rays pointing straight
/// down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRig {
    pub left: Vec2,
    pub right: Vec2,
}

impl ProbeRig {
    /// Place the probes at the ball's orbit distance, swung PROBE_REACH
    /// sections to either side of the ball's azimuth. With the reach above
    /// one section span, neither probe can land inside the excluded current
    /// section at any rotation angle, so live fall-throughs come only from
    /// real gaps.
    pub fn for_section_count(section_count: usize) -> Self {
        let spread = PROBE_REACH * TAU / section_count as f32;
        let lateral = BALL_ORBIT * spread.tan();
        Self {
            left: Vec2::new(BALL_ORBIT, -lateral),
            right: Vec2::new(BALL_ORBIT, lateral),
        }
    }
}

/// The section a probe struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeHit {
    pub section: usize,
    pub kind: SectionKind,
}

/// Per-probe intersection counts plus what was struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingReport {
    pub left: u32,
    pub right: u32,
    pub left_hit: Option<ProbeHit>,
    pub right_hit: Option<ProbeHit>,
}

impl LandingReport {
    /// Report for an unresolvable ring: nothing under either probe
    pub fn empty() -> Self {
        Self {
            left: 0,
            right: 0,
            left_hit: None,
            right_hit: None,
        }
    }

    /// Classified outcome: an empty probe is a fall-through, a kill-field
    /// contact on either probe ends the game, otherwise the bounce lands.
    pub fn outcome(&self) -> LandingOutcome {
        if self.left == 0 || self.right == 0 {
            return LandingOutcome::FellThrough;
        }
        for hit in [self.left_hit, self.right_hit].into_iter().flatten() {
            if hit.kind == SectionKind::KillField {
                return LandingOutcome::Kill {
                    section: hit.section,
                };
            }
        }
        LandingOutcome::Landed
    }
}

/// Outcome of one landing check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingOutcome {
    /// Both probes over safe platform - the bounce continues
    Landed,
    /// A probe touched a kill field
    Kill { section: usize },
    /// Nothing under at least one probe
    FellThrough,
}

/// Cast both probes against one ring of the tower.
///
/// Order matters and is fixed:
/// 1. resolve the ring (an out-of-range index yields the empty report, not
///    a panic)
/// 2. exclude the section at the current rotation index from candidacy
/// 3. cast each probe against the remaining sections and count
///    intersections per probe
pub fn classify_landing(tower: &Tower, ring_index: usize, rig: &ProbeRig) -> LandingReport {
    let Some(ring) = tower.rings.get(ring_index) else {
        return LandingReport::empty();
    };
    let excluded = tower.current_section_index();

    let cast = |probe: Vec2| -> Option<ProbeHit> {
        let local = tower.to_ring_local(probe);
        let (_, local_angle) = cartesian_to_polar(local);
        let index = section_index(local_angle, ring.section_count());
        if index == excluded {
            return None;
        }
        let section = &ring.sections[index];
        if !section.kind.is_solid() {
            return None;
        }
        if !section.wedge.contains_point(local) {
            return None;
        }
        Some(ProbeHit {
            section: index,
            kind: section.kind,
        })
    };

    let left_hit = cast(rig.left);
    let right_hit = cast(rig.right);

    LandingReport {
        left: left_hit.is_some() as u32,
        right: right_hit.is_some() as u32,
        left_hit,
        right_hit,
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use crate::sim::level::{LevelConfig, LevelId};
    use proptest::prelude::*;

    proptest! {
        /// The probe geometry itself keeps both probes out of the section
        /// selected by the rotation, at every angle including the wedge
        /// boundaries.
        #[test]
        fn prop_probe_geometry_avoids_the_current_section(
            rotation in 0.0f32..TAU,
            level in 1u32..4,
        ) {
            let id = LevelId::from_number(level).unwrap();
            let config = LevelConfig::for_level(id);
            let mut tower = Tower::build(&config);
            tower.rotation = rotation;
            let rig = ProbeRig::for_section_count(config.section_count);

            let current = tower.current_section_index();
            for probe in [rig.left, rig.right] {
                let local = tower.to_ring_local(probe);
                let (_, local_angle) = cartesian_to_polar(local);
                let index = section_index(local_angle, config.section_count);
                prop_assert_ne!(index, current);
            }
        }

        /// Whatever the rotation, a reported hit is never on the excluded
        /// section and always on solid material.
        #[test]
        fn prop_reported_hits_are_solid_and_not_excluded(
            rotation in 0.0f32..TAU,
            level in 1u32..4,
        ) {
            let id = LevelId::from_number(level).unwrap();
            let config = LevelConfig::for_level(id);
            let mut tower = Tower::build(&config);
            tower.rotation = rotation;
            let rig = ProbeRig::for_section_count(config.section_count);

            let report = classify_landing(&tower, 0, &rig);
            let current = tower.current_section_index();
            for hit in [report.left_hit, report.right_hit].into_iter().flatten() {
                prop_assert_ne!(hit.section, current);
                prop_assert!(hit.kind.is_solid());
            }
        }
    }
}
