//! Bolt configuration: every animatable parameter plus the pluggable function
//! slots.
//!
//! All numeric parameters are serializable (serde + RON) and reflectable. The
//! function slots hold code, not data, so they are skipped by both serde and
//! reflection; `None` means the documented default implementation.
//!
//! A configuration write takes effect on the next recomputation, never
//! retroactively.

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::BoltColor;
use crate::error::BoltError;

/// Replacement for the base space curve.
///
/// Called as `(t, p0, p1, p2, p3) -> position` with `t` in [0, 1]. A custom
/// function is expected to honor the boundary contract (`f(0) == p0`,
/// `f(1) == p3`); the kernel does not enforce it.
pub type SpaceCurveFn = Arc<dyn Fn(f32, Vec3, Vec3, Vec3, Vec3) -> Vec3 + Send + Sync>;

/// Replacement for the opacity profile.
///
/// Called as `(t, time_passed, pulse_speed, pulse_length, fade_length,
/// min_opacity, max_opacity) -> opacity`. Output is clamped to [0, 1] by the
/// kernel. Contraction was designed around the default pulse; consider setting
/// `contract_from` above 1 when replacing this.
pub type OpacityProfileFn = Arc<dyn Fn(f32, f32, f32, f32, f32, f32, f32) -> f32 + Send + Sync>;

/// Replacement for the radial thickness envelope, `(t) -> multiplier`.
/// Output is clamped to be non-negative by the kernel.
pub type RadialProfileFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// All animatable bolt parameters.
#[derive(Serialize, Deserialize, Clone, Reflect)]
#[reflect(Default)]
pub struct BoltConfig {
    /// Number of segments the bolt is built from.
    pub part_count: u32,

    /// Curve bow at attachment 0, beam-style: the distance the curve's first
    /// interior control point extends along the attachment axis.
    pub curve_size0: f32,
    /// Curve bow at attachment 1.
    pub curve_size1: f32,

    /// Minimum amplitude of the radial fluctuations along the bolt.
    pub min_radius: f32,
    /// Maximum amplitude of the radial fluctuations along the bolt.
    pub max_radius: f32,
    /// Number of oscillation lobes across the bolt. Lower for less jitter.
    pub frequency: f32,
    /// How fast the fluctuating wave travels along the bolt.
    pub animation_speed: f32,

    /// Base thickness of the bolt.
    pub thickness: f32,
    /// Thickness is multiplied by a fluctuating value between these two
    /// multipliers along the bolt.
    pub min_thickness_multiplier: f32,
    pub max_thickness_multiplier: f32,

    /// Transparency bounds fed to the opacity profile (opacity = 1 -
    /// transparency). Lets the bolt fade in/out over time or act as a
    /// projectile.
    pub min_transparency: f32,
    pub max_transparency: f32,

    /// The opacity wavefront reaches attachment 1 after `1 / pulse_speed`
    /// seconds. Near zero gives a slow "growing projectile" look.
    pub pulse_speed: f32,
    /// Length of the traveling opacity pulse, in bolt-lengths.
    pub pulse_length: f32,
    /// Width of the fade ramps at both edges of the pulse.
    pub fade_length: f32,

    /// Segments contract (shorten and thin) once their transparency exceeds
    /// this value. Set above 1 to disable contraction.
    pub contract_from: f32,

    /// Solid color or traveling gradient.
    pub color: BoltColor,
    /// Speed at which a gradient travels along the bolt. 0 = static.
    pub color_offset_speed: f32,

    /// Custom space curve. `None` = cubic Bezier through the beam-style
    /// control points.
    #[serde(skip)]
    #[reflect(ignore)]
    pub space_curve: Option<SpaceCurveFn>,
    /// Custom opacity profile. `None` = traveling trapezoidal pulse.
    #[serde(skip)]
    #[reflect(ignore)]
    pub opacity_profile: Option<OpacityProfileFn>,
    /// Custom radial envelope. `None` = mild taper toward both ends.
    #[serde(skip)]
    #[reflect(ignore)]
    pub radial_profile: Option<RadialProfileFn>,
}

impl Default for BoltConfig {
    fn default() -> Self {
        Self {
            part_count: 30,
            curve_size0: 0.0,
            curve_size1: 0.0,
            min_radius: 0.0,
            max_radius: 2.4,
            frequency: 1.0,
            animation_speed: 7.0,
            thickness: 1.0,
            min_thickness_multiplier: 0.2,
            max_thickness_multiplier: 1.0,
            min_transparency: 0.0,
            max_transparency: 1.0,
            pulse_speed: 5.0,
            pulse_length: 1000.0,
            fade_length: 0.2,
            contract_from: 0.5,
            color: BoltColor::default(),
            color_offset_speed: 3.0,
            space_curve: None,
            opacity_profile: None,
            radial_profile: None,
        }
    }
}

impl BoltConfig {
    /// Structural validation: fails fast on values that make the bolt
    /// impossible to evaluate. Aesthetic out-of-range values are left for
    /// [`normalized`](Self::normalized).
    pub fn validate(&self) -> Result<(), BoltError> {
        if self.part_count < 1 {
            return Err(BoltError::InvalidPartCount(self.part_count));
        }
        self.color.validate()
    }

    /// A copy with aesthetic out-of-range values clamped to the nearest valid
    /// value: non-finite parameters reset to their defaults, negative sizes to
    /// zero, swapped min/max bounds reordered, transparency bounds into
    /// [0, 1]. These affect only visual output, so they never fail.
    pub fn normalized(&self) -> Self {
        let mut c = self.clone();

        let d = Self::default();
        let mut reset = false;
        let mut finite = |v: f32, fallback: f32| {
            if v.is_finite() {
                v
            } else {
                reset = true;
                fallback
            }
        };
        c.curve_size0 = finite(c.curve_size0, d.curve_size0);
        c.curve_size1 = finite(c.curve_size1, d.curve_size1);
        c.min_radius = finite(c.min_radius, d.min_radius);
        c.max_radius = finite(c.max_radius, d.max_radius);
        c.frequency = finite(c.frequency, d.frequency);
        c.animation_speed = finite(c.animation_speed, d.animation_speed);
        c.thickness = finite(c.thickness, d.thickness);
        c.min_thickness_multiplier = finite(c.min_thickness_multiplier, d.min_thickness_multiplier);
        c.max_thickness_multiplier = finite(c.max_thickness_multiplier, d.max_thickness_multiplier);
        c.min_transparency = finite(c.min_transparency, d.min_transparency);
        c.max_transparency = finite(c.max_transparency, d.max_transparency);
        c.pulse_speed = finite(c.pulse_speed, d.pulse_speed);
        c.pulse_length = finite(c.pulse_length, d.pulse_length);
        c.fade_length = finite(c.fade_length, d.fade_length);
        c.contract_from = finite(c.contract_from, d.contract_from);
        c.color_offset_speed = finite(c.color_offset_speed, d.color_offset_speed);
        if reset {
            debug!("non-finite bolt parameters reset to defaults");
        }

        c.thickness = c.thickness.max(0.0);
        c.frequency = c.frequency.max(0.0);
        c.fade_length = c.fade_length.max(1e-4);
        c.pulse_length = c.pulse_length.max(0.0);

        c.min_radius = c.min_radius.max(0.0);
        c.max_radius = c.max_radius.max(0.0);
        if c.min_radius > c.max_radius {
            debug!("min_radius > max_radius, swapping");
            std::mem::swap(&mut c.min_radius, &mut c.max_radius);
        }
        c.min_thickness_multiplier = c.min_thickness_multiplier.max(0.0);
        c.max_thickness_multiplier = c.max_thickness_multiplier.max(0.0);
        if c.min_thickness_multiplier > c.max_thickness_multiplier {
            debug!("thickness multiplier bounds swapped");
            std::mem::swap(
                &mut c.min_thickness_multiplier,
                &mut c.max_thickness_multiplier,
            );
        }

        c.min_transparency = c.min_transparency.clamp(0.0, 1.0);
        c.max_transparency = c.max_transparency.clamp(0.0, 1.0);
        if c.min_transparency > c.max_transparency {
            debug!("transparency bounds swapped");
            std::mem::swap(&mut c.min_transparency, &mut c.max_transparency);
        }

        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorKey, ColorSequence};

    #[test]
    fn default_config_is_valid() {
        assert!(BoltConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_part_count_fails_fast() {
        let config = BoltConfig {
            part_count: 0,
            ..default()
        };
        assert_eq!(config.validate(), Err(BoltError::InvalidPartCount(0)));
    }

    #[test]
    fn malformed_gradient_fails_fast() {
        let config = BoltConfig {
            color: BoltColor::Gradient(ColorSequence {
                keys: vec![
                    ColorKey {
                        position: 0.0,
                        color: LinearRgba::WHITE,
                    },
                    ColorKey {
                        position: 0.5,
                        color: LinearRgba::WHITE,
                    },
                ],
            }),
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(BoltError::MalformedGradient(_))
        ));
    }

    #[test]
    fn normalization_reorders_swapped_bounds() {
        let config = BoltConfig {
            min_radius: 3.0,
            max_radius: 1.0,
            thickness: -2.0,
            min_transparency: 0.9,
            max_transparency: 0.1,
            ..default()
        };
        let n = config.normalized();
        assert_eq!((n.min_radius, n.max_radius), (1.0, 3.0));
        assert_eq!(n.thickness, 0.0);
        assert!(n.min_transparency <= n.max_transparency);
    }

    #[test]
    fn negative_multiplier_bounds_clamp_to_zero() {
        let config = BoltConfig {
            min_thickness_multiplier: -2.0,
            max_thickness_multiplier: -1.0,
            ..default()
        };
        let n = config.normalized();
        assert_eq!(n.min_thickness_multiplier, 0.0);
        assert_eq!(n.max_thickness_multiplier, 0.0);
    }

    #[test]
    fn non_finite_params_reset_to_defaults() {
        let config = BoltConfig {
            curve_size0: f32::NAN,
            animation_speed: f32::INFINITY,
            min_transparency: f32::NAN,
            ..default()
        };
        let n = config.normalized();
        assert_eq!(n.curve_size0, 0.0);
        assert_eq!(n.animation_speed, 7.0);
        assert_eq!(n.min_transparency, 0.0);
    }

    #[test]
    fn numeric_params_round_trip_through_ron() {
        let config = BoltConfig {
            part_count: 12,
            max_radius: 0.7,
            ..default()
        };
        let text = ron::to_string(&config).unwrap();
        let back: BoltConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.part_count, 12);
        assert_eq!(back.max_radius, 0.7);
        assert!(back.space_curve.is_none());
    }
}
