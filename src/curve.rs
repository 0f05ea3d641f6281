//! Base space curve of the bolt.
//!
//! The default curve is a cubic Bezier whose interior control points are built
//! from each attachment's axis scaled by the curve sizes, beam-style: zero
//! curve sizes collapse to a straight line, larger sizes bow the bolt outward
//! along the attachment axes. `sample(0)` and `sample(1)` hit the attachment
//! positions exactly, with endpoint tangents along the axes.

use bevy::prelude::*;

use crate::attachment::Attachment;
use crate::config::SpaceCurveFn;

/// The four control points of the bolt's base curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoints {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl ControlPoints {
    /// Build control points from the two attachments and curve sizes.
    ///
    /// `p1` extends from the start along its axis, `p2` pulls back toward the
    /// end along its axis, so the curve leaves attachment 0 along `world_axis`
    /// and arrives at attachment 1 along `world_axis`. A zero curve size puts
    /// that interior point on the chord's nearest third-point instead: with
    /// both sizes zero the cubic reduces to the uniform straight lerp, so
    /// straight bolts get evenly spaced samples.
    pub fn from_attachments(
        a0: &Attachment,
        a1: &Attachment,
        curve_size0: f32,
        curve_size1: f32,
    ) -> Self {
        let p0 = a0.world_position;
        let p3 = a1.world_position;
        let third = (p3 - p0) / 3.0;
        let p1 = if curve_size0 == 0.0 {
            p0 + third
        } else {
            p0 + a0.world_axis * curve_size0
        };
        let p2 = if curve_size1 == 0.0 {
            p3 - third
        } else {
            p3 - a1.world_axis * curve_size1
        };
        Self { p0, p1, p2, p3 }
    }
}

/// Default space curve: cubic Bezier through the four control points.
pub fn default_space_curve(t: f32, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Evaluate the configured space curve (custom function if set, else the
/// default Bezier) at parameter `t`.
pub fn sample(curve_fn: Option<&SpaceCurveFn>, t: f32, cp: &ControlPoints) -> Vec3 {
    match curve_fn {
        Some(f) => f(t, cp.p0, cp.p1, cp.p2, cp.p3),
        None => default_space_curve(t, cp.p0, cp.p1, cp.p2, cp.p3),
    }
}

/// Local tangent of the configured curve at `t`, by central difference.
///
/// Falls back to the chord direction when the difference degenerates (custom
/// curves that are locally constant).
pub fn tangent(curve_fn: Option<&SpaceCurveFn>, t: f32, cp: &ControlPoints) -> Vec3 {
    const H: f32 = 1e-3;
    let a = sample(curve_fn, (t - H).max(0.0), cp);
    let b = sample(curve_fn, (t + H).min(1.0), cp);
    let d = b - a;
    if d.length_squared() > 1e-12 {
        d.normalize()
    } else {
        (cp.p3 - cp.p0).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachments() -> (Attachment, Attachment) {
        (
            Attachment::new(Vec3::ZERO, Vec3::Y).unwrap(),
            Attachment::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Y).unwrap(),
        )
    }

    #[test]
    fn boundary_fidelity() {
        let (a0, a1) = attachments();
        let cp = ControlPoints::from_attachments(&a0, &a1, 3.0, 5.0);
        assert_eq!(sample(None, 0.0, &cp), a0.world_position);
        assert_eq!(sample(None, 1.0, &cp), a1.world_position);
    }

    #[test]
    fn zero_curve_sizes_give_uniform_straight_line() {
        let (a0, a1) = attachments();
        let cp = ControlPoints::from_attachments(&a0, &a1, 0.0, 0.0);
        // Exact uniform lerp: sample t lands at 10t, not at a smoothstepped x.
        for i in 0..=8 {
            let t = i as f32 / 8.0;
            let p = sample(None, t, &cp);
            assert!(p.abs_diff_eq(Vec3::new(10.0 * t, 0.0, 0.0), 1e-4), "t={t}");
        }
    }

    #[test]
    fn zero_size_at_one_end_keeps_boundary_fidelity() {
        let (a0, a1) = attachments();
        let cp = ControlPoints::from_attachments(&a0, &a1, 0.0, 5.0);
        assert_eq!(sample(None, 0.0, &cp), a0.world_position);
        assert_eq!(sample(None, 1.0, &cp), a1.world_position);
        // The bowed end still arrives along its axis.
        assert!(tangent(None, 1.0, &cp).dot(a1.world_axis) > 0.99);
    }

    #[test]
    fn endpoint_tangents_align_with_axes() {
        let (a0, a1) = attachments();
        let cp = ControlPoints::from_attachments(&a0, &a1, 2.0, 2.0);
        let t0 = tangent(None, 0.0, &cp);
        // Tangent at t=0 points along (p1 - p0) = axis0.
        assert!(t0.dot(a0.world_axis) > 0.99);
        let t1 = tangent(None, 1.0, &cp);
        // Tangent at t=1 points along (p3 - p2) = axis1.
        assert!(t1.dot(a1.world_axis) > 0.99);
    }

    #[test]
    fn custom_curve_takes_precedence() {
        let (a0, a1) = attachments();
        let cp = ControlPoints::from_attachments(&a0, &a1, 0.0, 0.0);
        let helix: SpaceCurveFn = std::sync::Arc::new(|t, p0, _, _, p3| {
            let base = p0.lerp(p3, t);
            base + Vec3::new(0.0, (t * 6.0).sin(), (t * 6.0).cos())
        });
        let p = sample(Some(&helix), 0.5, &cp);
        assert!((p.y - 3.0_f32.sin()).abs() < 1e-6);
    }
}
