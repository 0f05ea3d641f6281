//! Built-in bolt presets.

use bevy::prelude::*;

use crate::color::{BoltColor, ColorSequence};
use crate::config::BoltConfig;

/// Return the built-in bolt presets as `(name, config)` pairs.
pub fn default_presets() -> Vec<(&'static str, BoltConfig)> {
    vec![
        ("Classic", classic()),
        ("Plasma Beam", plasma_beam()),
        ("Projectile", projectile()),
        ("Ember Arc", ember_arc()),
        ("Calm Glow", calm_glow()),
    ]
}

/// Jagged white-blue strike, the default look.
fn classic() -> BoltConfig {
    BoltConfig {
        color: BoltColor::Solid(LinearRgba::new(0.7, 0.8, 2.5, 1.0)),
        ..Default::default()
    }
}

/// Thick, slow-waving beam with a traveling purple-cyan gradient.
fn plasma_beam() -> BoltConfig {
    BoltConfig {
        max_radius: 0.8,
        frequency: 0.6,
        animation_speed: 2.5,
        thickness: 1.8,
        min_thickness_multiplier: 0.8,
        max_thickness_multiplier: 1.0,
        color: BoltColor::Gradient(
            ColorSequence::evenly_spaced(&[
                LinearRgba::new(1.8, 0.4, 2.4, 1.0),
                LinearRgba::new(0.3, 1.6, 2.2, 1.0),
                LinearRgba::new(1.8, 0.4, 2.4, 1.0),
            ])
            .expect("preset gradient is well formed"),
        ),
        color_offset_speed: 1.2,
        ..Default::default()
    }
}

/// Short pulse traveling from start to end; the bolt "arrives" over a second.
/// Animation speed 0 keeps the path steady while the pulse moves.
fn projectile() -> BoltConfig {
    BoltConfig {
        animation_speed: 0.0,
        pulse_speed: 1.0,
        pulse_length: 0.25,
        fade_length: 0.1,
        ..Default::default()
    }
}

/// Drooping orange arc with heavy contraction at the fading tail.
fn ember_arc() -> BoltConfig {
    BoltConfig {
        curve_size0: 4.0,
        curve_size1: 4.0,
        max_radius: 0.6,
        frequency: 2.0,
        thickness: 0.5,
        contract_from: 0.3,
        color: BoltColor::Gradient(
            ColorSequence::evenly_spaced(&[
                LinearRgba::new(2.4, 1.2, 0.2, 1.0),
                LinearRgba::new(1.6, 0.3, 0.05, 1.0),
            ])
            .expect("preset gradient is well formed"),
        ),
        color_offset_speed: 0.6,
        ..Default::default()
    }
}

/// Barely-moving soft white strand.
fn calm_glow() -> BoltConfig {
    BoltConfig {
        max_radius: 0.3,
        frequency: 0.4,
        animation_speed: 1.0,
        thickness: 0.3,
        min_thickness_multiplier: 0.9,
        max_thickness_multiplier: 1.0,
        contract_from: 2.0,
        ..Default::default()
    }
}
