//! Bolt color: a solid value or a traveling gradient.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::BoltError;

/// Color of a bolt: a single solid color, or an ordered gradient sampled by
/// position along the bolt and optionally animated over time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub enum BoltColor {
    Solid(LinearRgba),
    Gradient(ColorSequence),
}

impl Default for BoltColor {
    fn default() -> Self {
        Self::Solid(LinearRgba::WHITE)
    }
}

impl BoltColor {
    /// Resolve the color for sample parameter `t` at `time_passed`.
    ///
    /// Solid colors are returned unchanged. Gradients are sampled at
    /// `frac(t + offset_speed * time_passed)`, so a nonzero `offset_speed`
    /// makes the gradient appear to travel along the bolt.
    pub fn resolve(&self, t: f32, time_passed: f32, offset_speed: f32) -> LinearRgba {
        match self {
            Self::Solid(c) => *c,
            Self::Gradient(seq) => {
                let u = (t + offset_speed * time_passed).rem_euclid(1.0);
                seq.sample(u)
            }
        }
    }

    /// Validate gradient keyframes. Solid colors are always valid.
    pub fn validate(&self) -> Result<(), BoltError> {
        match self {
            Self::Solid(_) => Ok(()),
            Self::Gradient(seq) => seq.validate(),
        }
    }
}

/// Ordered color keyframes over position [0..1] along the bolt.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct ColorSequence {
    pub keys: Vec<ColorKey>,
}

/// Single color stop in a sequence.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct ColorKey {
    /// Position along the bolt (0.0 - 1.0).
    pub position: f32,
    /// RGBA color at this stop.
    pub color: LinearRgba,
}

impl ColorSequence {
    /// Build a sequence from (position, color) pairs, validating the keyframe
    /// invariants up front.
    pub fn new(keys: Vec<ColorKey>) -> Result<Self, BoltError> {
        let seq = Self { keys };
        seq.validate()?;
        Ok(seq)
    }

    /// Evenly spaced stops from first to last.
    pub fn evenly_spaced(colors: &[LinearRgba]) -> Result<Self, BoltError> {
        if colors.len() < 2 {
            return Err(BoltError::MalformedGradient("needs at least two stops"));
        }
        let last = (colors.len() - 1) as f32;
        Self::new(
            colors
                .iter()
                .enumerate()
                .map(|(i, &color)| ColorKey {
                    position: i as f32 / last,
                    color,
                })
                .collect(),
        )
    }

    /// Keyframe positions must be strictly increasing, start at 0 and end at 1,
    /// and every position must be finite.
    pub fn validate(&self) -> Result<(), BoltError> {
        if self.keys.len() < 2 {
            return Err(BoltError::MalformedGradient("needs at least two stops"));
        }
        if self.keys.iter().any(|k| !k.position.is_finite()) {
            return Err(BoltError::MalformedGradient("non-finite position"));
        }
        if self.keys[0].position != 0.0 {
            return Err(BoltError::MalformedGradient("first position must be 0"));
        }
        if self.keys.last().unwrap().position != 1.0 {
            return Err(BoltError::MalformedGradient("last position must be 1"));
        }
        for window in self.keys.windows(2) {
            if window[1].position <= window[0].position {
                return Err(BoltError::MalformedGradient(
                    "positions must be strictly increasing",
                ));
            }
        }
        Ok(())
    }

    /// Sample the sequence at position `u` (clamped to [0..1]).
    pub fn sample(&self, u: f32) -> LinearRgba {
        let u = u.clamp(0.0, 1.0);

        if self.keys.is_empty() {
            return LinearRgba::WHITE;
        }
        if u <= self.keys[0].position {
            return self.keys[0].color;
        }
        if u >= self.keys.last().unwrap().position {
            return self.keys.last().unwrap().color;
        }

        for window in self.keys.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if u >= a.position && u <= b.position {
                let span = b.position - a.position;
                if span.abs() < 1e-6 {
                    return a.color;
                }
                let frac = (u - a.position) / span;
                return lerp_color(a.color, b.color, frac);
            }
        }

        self.keys.last().unwrap().color
    }
}

/// Linearly interpolate between two colors.
pub(crate) fn lerp_color(a: LinearRgba, b: LinearRgba, t: f32) -> LinearRgba {
    LinearRgba::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}
