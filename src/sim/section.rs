//! Wedge slice geometry for platform rings
//!
//! A platform ring is a disc split into N equal pie slices. Slices live in
//! ring-local polar coordinates with angles in [0, 2π); the tower's rotation
//! maps world angles into this frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::{cartesian_to_polar, wrap_angle};

/// Material classification of one wedge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SectionKind {
    /// Normal platform material - bouncing here scores
    #[default]
    Safe,
    /// Hidden wedge with no collision geometry
    Gap,
    /// Solid but lethal on contact
    KillField,
}

impl SectionKind {
    /// Whether probes can strike this wedge at all
    pub fn is_solid(&self) -> bool {
        !matches!(self, SectionKind::Gap)
    }
}

/// One angular pie slice of a platform ring, from the axis out to `radius`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WedgeSlice {
    /// Start angle (radians, wrapped to [0, 2π))
    pub theta_start: f32,
    /// End angle (radians, wrapped to [0, 2π))
    pub theta_end: f32,
    /// Outer radius of the slice
    pub radius: f32,
}

impl WedgeSlice {
    pub fn new(theta_start: f32, theta_end: f32, radius: f32) -> Self {
        Self {
            theta_start: wrap_angle(theta_start),
            theta_end: wrap_angle(theta_end),
            radius,
        }
    }

    /// Angular span of the slice (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.theta_end - self.theta_start;
        if span <= 0.0 {
            span += TAU;
        }
        span
    }

    /// Check if a ring-local angle falls inside this slice.
    /// Half-open [start, end) so adjacent slices never share an angle.
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = wrap_angle(theta);
        let start = self.theta_start;
        let end = self.theta_end;

        if start < end {
            // No wraparound
            theta >= start && theta < end
        } else {
            // Wraparound case (e.g. the last slice, whose end wraps to 0)
            theta >= start || theta < end
        }
    }

    /// Check if a ring-local point lies on this slice
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (r, theta) = cartesian_to_polar(point);
        r <= self.radius && self.contains_angle(theta)
    }

    /// Mid-span angle of the slice
    pub fn mid_angle(&self) -> f32 {
        wrap_angle(self.theta_start + self.angular_span() / 2.0)
    }
}

/// Produce `count` equal wedge slices covering the full circle.
/// Slice i spans [i·2π/count, (i+1)·2π/count). Pure function, no state.
pub fn wedge_slices(count: usize, radius: f32) -> Vec<WedgeSlice> {
    let angle = TAU / count as f32;
    (0..count)
        .map(|i| WedgeSlice::new(i as f32 * angle, (i + 1) as f32 * angle, radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;

    #[test]
    fn test_wedge_slices_partition_circle() {
        let slices = wedge_slices(8, 10.0);
        assert_eq!(slices.len(), 8);

        let total: f32 = slices.iter().map(|s| s.angular_span()).sum();
        assert!((total - TAU).abs() < 1e-4);

        // Slices are contiguous: each starts where the previous one ends
        for pair in slices.windows(2) {
            assert!((pair[0].theta_end - pair[1].theta_start).abs() < 1e-5);
        }
        // The last slice wraps back to the first
        assert!((slices[7].theta_end - slices[0].theta_start).abs() < 1e-5);
    }

    #[test]
    fn test_contains_angle_half_open() {
        let slices = wedge_slices(8, 10.0);
        let angle = TAU / 8.0;

        // Boundary angle belongs to exactly one slice
        assert!(slices[1].contains_angle(angle));
        assert!(!slices[0].contains_angle(angle));
        assert!(slices[0].contains_angle(0.0));
        assert!(slices[0].contains_angle(angle - 1e-4));
    }

    #[test]
    fn test_contains_angle_wraparound_slice() {
        // Last slice of 8 spans [7π/4, 2π) and its end wraps to 0
        let slices = wedge_slices(8, 10.0);
        let last = &slices[7];
        assert!(last.contains_angle(TAU - 0.01));
        assert!(last.contains_angle(7.0 * TAU / 8.0));
        assert!(!last.contains_angle(0.0));
        assert!(!last.contains_angle(TAU / 2.0));
    }

    #[test]
    fn test_contains_point() {
        let slice = WedgeSlice::new(0.0, TAU / 8.0, 10.0);
        let inside = polar_to_cartesian(8.0, TAU / 16.0);
        assert!(slice.contains_point(inside));

        // Right angle, too far out
        let outside_radius = polar_to_cartesian(11.0, TAU / 16.0);
        assert!(!slice.contains_point(outside_radius));

        // Right radius, wrong angle
        let outside_angle = polar_to_cartesian(8.0, TAU / 4.0);
        assert!(!slice.contains_point(outside_angle));
    }

    #[test]
    fn test_section_kind_solid() {
        assert!(SectionKind::Safe.is_solid());
        assert!(SectionKind::KillField.is_solid());
        assert!(!SectionKind::Gap.is_solid());
    }
}
