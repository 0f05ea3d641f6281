//! Per-frame segment assembly.
//!
//! Composes the curve, noise, profile, and color samplers into an ordered list
//! of [`Segment`] descriptors. The output is a fresh list each invocation;
//! nothing here persists across frames.

use bevy::prelude::*;

use crate::attachment::Attachment;
use crate::config::BoltConfig;
use crate::curve::{self, ControlPoints};
use crate::noise::{self, NoisePhases};
use crate::profile;

/// One renderable piece of a bolt. Transient: recomputed every frame and
/// consumed immediately by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Segment {
    /// World-space start point.
    pub start: Vec3,
    /// World-space end point.
    pub end: Vec3,
    /// Rotation taking +Y to the segment direction.
    pub orientation: Quat,
    /// Diameter of the segment.
    pub thickness: f32,
    /// 0 = opaque, 1 = invisible.
    pub transparency: f32,
    /// Resolved color for this segment.
    pub color: LinearRgba,
}

impl Segment {
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Extra shaping applied while a bolt is dissipating: noise amplitude grows
/// and opacity decays as the countdown progresses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DissipateShaping {
    pub amplitude_scale: f32,
    pub opacity_scale: f32,
}

impl Default for DissipateShaping {
    fn default() -> Self {
        Self {
            amplitude_scale: 1.0,
            opacity_scale: 1.0,
        }
    }
}

/// Build the segment list for one frame.
///
/// `config` is normalized internally, so aesthetic out-of-range values never
/// reach the samplers. A custom function returning a non-finite value poisons
/// only the segments touching that sample (emitted fully transparent with zero
/// thickness); the rest of the frame is unaffected.
pub fn build_segments(
    config: &BoltConfig,
    a0: &Attachment,
    a1: &Attachment,
    phases: &NoisePhases,
    time_passed: f32,
    shaping: DissipateShaping,
) -> Vec<Segment> {
    let cfg = config.normalized();
    let n = cfg.part_count.max(1) as usize;
    let cp = ControlPoints::from_attachments(a0, a1, cfg.curve_size0, cfg.curve_size1);
    let curve_fn = cfg.space_curve.as_ref();

    let mut poisoned = false;

    // Sample n + 1 perturbed points along the base path.
    let mut points: Vec<Option<Vec3>> = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f32 / n as f32;
        let base = curve::sample(curve_fn, t, &cp);
        if !base.is_finite() {
            poisoned = true;
            points.push(None);
            continue;
        }

        let fluct = noise::radial_fluctuation(phases, t, time_passed, cfg.frequency, cfg.animation_speed);
        let magnitude =
            (cfg.min_radius + (cfg.max_radius - cfg.min_radius) * fluct) * shaping.amplitude_scale;
        let point = if magnitude > 0.0 {
            let tangent = curve::tangent(curve_fn, t, &cp);
            let dir = noise::offset_direction(
                phases,
                tangent,
                t,
                time_passed,
                cfg.frequency,
                cfg.animation_speed,
            );
            base + dir * magnitude
        } else {
            base
        };
        points.push(Some(point));
    }

    let min_opacity = 1.0 - cfg.max_transparency;
    let max_opacity = 1.0 - cfg.min_transparency;

    let mut segments = Vec::with_capacity(n);
    let mut last_good = a0.world_position;

    for i in 0..n {
        let t_mid = (i as f32 + 0.5) / n as f32;

        let opacity = match cfg.opacity_profile.as_ref() {
            Some(f) => {
                let v = f(
                    t_mid,
                    time_passed,
                    cfg.pulse_speed,
                    cfg.pulse_length,
                    cfg.fade_length,
                    min_opacity,
                    max_opacity,
                );
                if v.is_finite() {
                    v
                } else {
                    poisoned = true;
                    0.0
                }
            }
            None => profile::discrete_pulse(
                t_mid,
                time_passed,
                cfg.pulse_speed,
                cfg.pulse_length,
                cfg.fade_length,
                min_opacity,
                max_opacity,
            ),
        };
        let opacity = (opacity * shaping.opacity_scale).clamp(0.0, 1.0);
        let transparency = 1.0 - opacity;

        let radial = match cfg.radial_profile.as_ref() {
            Some(f) => {
                let v = f(t_mid);
                if v.is_finite() {
                    v.max(0.0)
                } else {
                    poisoned = true;
                    0.0
                }
            }
            None => profile::default_radial_profile(t_mid),
        };

        let thickness_fluct = noise::thickness_fluctuation(
            phases,
            t_mid,
            time_passed,
            cfg.frequency,
            cfg.animation_speed,
        );
        let multiplier = cfg.min_thickness_multiplier
            + (cfg.max_thickness_multiplier - cfg.min_thickness_multiplier) * thickness_fluct;
        let thickness = cfg.thickness * radial * multiplier;

        let color = cfg.color.resolve(t_mid, time_passed, cfg.color_offset_speed);

        let (Some(start), Some(end)) = (points[i], points[i + 1]) else {
            // Poisoned sample: keep the ordering but render nothing.
            segments.push(Segment {
                start: last_good,
                end: last_good,
                orientation: Quat::IDENTITY,
                thickness: 0.0,
                transparency: 1.0,
                color,
            });
            continue;
        };
        last_good = end;

        // Contract around the midpoint as the segment approaches full
        // transparency, instead of letting it vanish abruptly.
        let keep = 1.0 - profile::contraction(transparency, cfg.contract_from);
        let mid = (start + end) * 0.5;
        let half = (end - start) * 0.5 * keep;
        let chord = end - start;
        let orientation = if chord.length_squared() > 1e-12 {
            Quat::from_rotation_arc(Vec3::Y, chord.normalize())
        } else {
            Quat::IDENTITY
        };

        segments.push(Segment {
            start: mid - half,
            end: mid + half,
            orientation,
            thickness: thickness * keep,
            transparency,
            color,
        });
    }

    if poisoned {
        warn!("custom bolt function produced a non-finite sample; affected segments skipped");
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn attachments() -> (Attachment, Attachment) {
        (
            Attachment::new(Vec3::ZERO, Vec3::Y).unwrap(),
            Attachment::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Y).unwrap(),
        )
    }

    fn no_jitter_config(part_count: u32) -> BoltConfig {
        BoltConfig {
            part_count,
            min_radius: 0.0,
            max_radius: 0.0,
            curve_size0: 0.0,
            curve_size1: 0.0,
            // Always fully opaque so contraction stays out of the picture.
            pulse_length: 1000.0,
            contract_from: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn emits_part_count_segments() {
        let (a0, a1) = attachments();
        let segments = build_segments(
            &no_jitter_config(7),
            &a0,
            &a1,
            &NoisePhases::from_seed(1),
            0.5,
            DissipateShaping::default(),
        );
        assert_eq!(segments.len(), 7);
    }

    #[test]
    fn zero_radius_samples_lie_on_base_path() {
        // Two attachments 10 units apart, part_count = 4, default curve with
        // zero curve sizes: the 5 sampled points sit exactly on the line.
        let (a0, a1) = attachments();
        let segments = build_segments(
            &no_jitter_config(4),
            &a0,
            &a1,
            &NoisePhases::from_seed(3),
            1.25,
            DissipateShaping::default(),
        );
        assert_eq!(segments.len(), 4);
        for (i, seg) in segments.iter().enumerate() {
            let expected_start = Vec3::new(10.0 * i as f32 / 4.0, 0.0, 0.0);
            let expected_end = Vec3::new(10.0 * (i + 1) as f32 / 4.0, 0.0, 0.0);
            assert!(seg.start.abs_diff_eq(expected_start, 1e-4), "segment {i}");
            assert!(seg.end.abs_diff_eq(expected_end, 1e-4), "segment {i}");
            assert!(seg.start.y.abs() < 1e-5 && seg.start.z.abs() < 1e-5);
        }
    }

    #[test]
    fn segments_chain_without_gaps() {
        let (a0, a1) = attachments();
        let config = BoltConfig {
            part_count: 12,
            contract_from: 2.0,
            pulse_length: 1000.0,
            ..Default::default()
        };
        let segments = build_segments(
            &config,
            &a0,
            &a1,
            &NoisePhases::from_seed(9),
            2.0,
            DissipateShaping::default(),
        );
        for pair in segments.windows(2) {
            assert!(pair[0].end.abs_diff_eq(pair[1].start, 1e-4));
        }
    }

    #[test]
    fn transparency_in_unit_range() {
        let (a0, a1) = attachments();
        let config = BoltConfig {
            part_count: 16,
            pulse_speed: 2.0,
            pulse_length: 0.4,
            ..Default::default()
        };
        for step in 0..10 {
            let segments = build_segments(
                &config,
                &a0,
                &a1,
                &NoisePhases::from_seed(4),
                step as f32 * 0.17,
                DissipateShaping::default(),
            );
            for seg in &segments {
                assert!((0.0..=1.0).contains(&seg.transparency));
                assert!(seg.thickness >= 0.0);
            }
        }
    }

    #[test]
    fn negative_multiplier_bounds_never_emit_negative_thickness() {
        let (a0, a1) = attachments();
        let config = BoltConfig {
            part_count: 8,
            min_thickness_multiplier: -2.0,
            max_thickness_multiplier: -1.0,
            pulse_length: 1000.0,
            contract_from: 2.0,
            ..Default::default()
        };
        let segments = build_segments(
            &config,
            &a0,
            &a1,
            &NoisePhases::from_seed(5),
            1.0,
            DissipateShaping::default(),
        );
        for seg in &segments {
            assert!(seg.thickness >= 0.0, "thickness {}", seg.thickness);
        }
    }

    #[test]
    fn orientation_maps_y_to_chord() {
        let (a0, a1) = attachments();
        let segments = build_segments(
            &no_jitter_config(4),
            &a0,
            &a1,
            &NoisePhases::from_seed(2),
            0.0,
            DissipateShaping::default(),
        );
        for seg in &segments {
            let dir = seg.orientation * Vec3::Y;
            assert!(dir.abs_diff_eq(Vec3::X, 1e-4));
        }
    }

    #[test]
    fn non_finite_custom_curve_poisons_only_touching_segments() {
        let (a0, a1) = attachments();
        let mut config = no_jitter_config(4);
        // NaN exactly at the middle sample (t = 0.5).
        config.space_curve = Some(Arc::new(|t: f32, p0: Vec3, _, _, p3: Vec3| {
            if (t - 0.5).abs() < 1e-6 {
                Vec3::splat(f32::NAN)
            } else {
                p0.lerp(p3, t)
            }
        }));
        // time_passed = 1.0 so the default pulse has fully arrived and the
        // healthy segments are opaque.
        let segments = build_segments(
            &config,
            &a0,
            &a1,
            &NoisePhases::from_seed(6),
            1.0,
            DissipateShaping::default(),
        );
        assert_eq!(segments.len(), 4);
        // Segments 1 and 2 touch the bad sample and are fully transparent.
        assert_eq!(segments[1].transparency, 1.0);
        assert_eq!(segments[1].thickness, 0.0);
        assert_eq!(segments[2].transparency, 1.0);
        // Segments 0 and 3 are untouched.
        assert!(segments[0].transparency < 1.0);
        assert!(segments[3].transparency < 1.0);
    }

    #[test]
    fn contraction_shrinks_transparent_segments() {
        let (a0, a1) = attachments();
        let base = no_jitter_config(4);
        // Force full transparency via min_transparency = max_transparency = 1.
        let transparent = BoltConfig {
            min_transparency: 1.0,
            max_transparency: 1.0,
            contract_from: 0.5,
            ..base.clone()
        };
        let segments = build_segments(
            &transparent,
            &a0,
            &a1,
            &NoisePhases::from_seed(8),
            0.0,
            DissipateShaping::default(),
        );
        for seg in &segments {
            assert!(seg.length() < 1e-5, "fully transparent segments contract");
            assert_eq!(seg.thickness, 0.0);
        }

        // Same setup with contraction disabled keeps full-length segments.
        let disabled = BoltConfig {
            min_transparency: 1.0,
            max_transparency: 1.0,
            contract_from: 2.0,
            ..base
        };
        let segments = build_segments(
            &disabled,
            &a0,
            &a1,
            &NoisePhases::from_seed(8),
            0.0,
            DissipateShaping::default(),
        );
        for seg in &segments {
            assert!((seg.length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn dissipate_shaping_scales_amplitude_and_opacity() {
        let (a0, a1) = attachments();
        let config = BoltConfig {
            part_count: 8,
            min_radius: 1.0,
            max_radius: 1.0,
            pulse_length: 1000.0,
            contract_from: 2.0,
            ..Default::default()
        };
        let phases = NoisePhases::from_seed(14);
        let plain = build_segments(&config, &a0, &a1, &phases, 1.0, DissipateShaping::default());
        let shaped = build_segments(
            &config,
            &a0,
            &a1,
            &phases,
            1.0,
            DissipateShaping {
                amplitude_scale: 3.0,
                opacity_scale: 0.25,
            },
        );
        // Offsets grow with the amplitude scale.
        let line_dist = |p: Vec3| (p - Vec3::new(p.x, 0.0, 0.0)).length();
        let mid = 4;
        assert!(line_dist(shaped[mid].midpoint()) > line_dist(plain[mid].midpoint()) + 1e-3);
        // Opacity decays: transparency rises.
        assert!(shaped[mid].transparency > plain[mid].transparency);
    }
}
