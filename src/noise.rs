//! Temporally coherent perturbation field.
//!
//! The field is a pure function of `(t * frequency, time * animation_speed)`
//! plus a small set of per-instance phases drawn once at construction, so it
//! never pops between frames and every sampler within a frame sees the same
//! snapshot. Offsets point perpendicular to the local curve tangent, rotated
//! around it by a slowly drifting angle so the jitter never collapses into a
//! plane.

use std::f32::consts::TAU;

use bevy::prelude::*;

/// Fixed per-instance random phases. Drawn once when a bolt is created and
/// never re-drawn, which is what keeps the animation continuous.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct NoisePhases {
    radial: [f32; 3],
    angle: f32,
    thickness: [f32; 3],
}

impl NoisePhases {
    /// Phases from a specific seed. Two bolts with the same seed fluctuate
    /// identically.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut phase = || rng.f32() * TAU;
        Self {
            radial: [phase(), phase(), phase()],
            angle: phase(),
            thickness: [phase(), phase(), phase()],
        }
    }

    /// Phases from fresh entropy, for independently flickering bolts.
    pub fn new() -> Self {
        Self::from_seed(fastrand::u64(..))
    }
}

impl Default for NoisePhases {
    fn default() -> Self {
        Self::new()
    }
}

/// Three-octave sine field over `(x, s)`, remapped to [0, 1].
///
/// Octave weights sum to 1 so the output stays in range without clamping; the
/// mixed spatial/temporal rates keep the wave from looking periodic over a
/// single bolt length.
fn wave(phases: &[f32; 3], x: f32, s: f32) -> f32 {
    let v = 0.5 * (x + s + phases[0]).sin()
        + 0.35 * (x * 2.3 - s * 1.7 + phases[1]).sin()
        + 0.15 * (x * 4.1 + s * 0.6 + phases[2]).sin();
    0.5 * (v + 1.0)
}

/// Normalized radial fluctuation in [0, 1] for sample `t` at elapsed `time`.
/// The caller remaps this into `[min_radius, max_radius]`.
pub fn radial_fluctuation(
    phases: &NoisePhases,
    t: f32,
    time: f32,
    frequency: f32,
    animation_speed: f32,
) -> f32 {
    wave(&phases.radial, t * frequency * TAU, time * animation_speed)
}

/// Thickness fluctuation in [0, 1], independent of the radial field.
/// The caller lerps the thickness multiplier bounds by it.
pub fn thickness_fluctuation(
    phases: &NoisePhases,
    t: f32,
    time: f32,
    frequency: f32,
    animation_speed: f32,
) -> f32 {
    wave(&phases.thickness, t * frequency * TAU, time * animation_speed)
}

/// Unit offset direction for sample `t`: perpendicular to `tangent`, rotated
/// around it by an angle that drifts with `t` and `time`.
pub fn offset_direction(
    phases: &NoisePhases,
    tangent: Vec3,
    t: f32,
    time: f32,
    frequency: f32,
    animation_speed: f32,
) -> Vec3 {
    let d = tangent.normalize_or_zero();
    if d.length_squared() < 1e-6 {
        return Vec3::Y;
    }
    let up = if d.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let n1 = d.cross(up).normalize();
    let n2 = d.cross(n1).normalize();

    let angle =
        phases.angle + t * frequency * TAU * 0.5 + time * (0.3 * animation_speed + 0.2);
    n1 * angle.cos() + n2 * angle.sin()
}
