//! Opacity, radial, and contraction profiles.
//!
//! The opacity and radial profiles are the replaceable defaults behind
//! [`BoltConfig::opacity_profile`] and [`BoltConfig::radial_profile`];
//! contraction is derived from resolved transparency and is not independently
//! pluggable.
//!
//! [`BoltConfig::opacity_profile`]: crate::config::BoltConfig
//! [`BoltConfig::radial_profile`]: crate::config::BoltConfig

/// Default opacity profile: a traveling trapezoidal pulse.
///
/// The wavefront advances at `pulse_speed` bolt-lengths per second; samples
/// within `fade_length` of either pulse edge ramp between `min_opacity` and
/// `max_opacity`, samples inside the pulse hold `max_opacity`, samples outside
/// hold `min_opacity`. `pulse_speed = 0` makes the profile time-invariant.
pub fn discrete_pulse(
    t: f32,
    time_passed: f32,
    pulse_speed: f32,
    pulse_length: f32,
    fade_length: f32,
    min_opacity: f32,
    max_opacity: f32,
) -> f32 {
    let half = 0.5 * pulse_length;
    let center = pulse_speed * time_passed - half;
    let raw = pulse_length / (2.0 * fade_length) - (t - center).abs() / fade_length;
    raw.clamp(min_opacity, max_opacity)
}

/// Default radial envelope: ~1 over the body of the bolt with a mild dip at
/// the extreme ends.
pub fn default_radial_profile(t: f32) -> f32 {
    1.0 - 0.8 * (2.0 * t - 1.0).powi(6)
}

/// Contraction factor for a sample with resolved transparency `transparency`.
///
/// Zero until transparency exceeds `contract_from`, then ramps linearly to 1
/// at full transparency. `contract_from >= 1` disables the effect entirely.
/// Segment length and thickness scale by `1 - contraction`.
pub fn contraction(transparency: f32, contract_from: f32) -> f32 {
    if contract_from >= 1.0 {
        return 0.0;
    }
    ((transparency - contract_from) / (1.0 - contract_from)).clamp(0.0, 1.0)
}
