//! Bolt facade and per-tick animation loop.
//!
//! [`LightningBolt`] owns the configuration and per-instance state and drives
//! one frame of recomputation per [`tick`](LightningBolt::tick). Rendering is
//! an external collaborator behind [`LightningRenderer`]; the kernel never
//! touches visual primitives itself.
//!
//! The lifecycle is a small state machine:
//! `Active --destroy--> Destroyed`,
//! `Active --destroy_dissipate--> Dissipating --(countdown)--> Destroyed`.
//! `Destroyed` is terminal and absorbs further calls as no-ops.

use bevy::prelude::*;

use crate::attachment::Attachment;
use crate::config::BoltConfig;
use crate::error::BoltError;
use crate::noise::NoisePhases;
use crate::segment::{DissipateShaping, Segment, build_segments};

/// Receives the bolt's per-frame output and owns the visual primitives.
///
/// `submit` is called once per enabled tick with the frame's ordered segment
/// list; `hide` when the bolt is alive but disabled (segments should be hidden,
/// not discarded); `release` exactly once when the bolt is destroyed.
pub trait LightningRenderer {
    fn submit(&mut self, segments: &[Segment]);
    fn hide(&mut self);
    fn release(&mut self);
}

/// Lifecycle phase of a bolt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum BoltPhase {
    #[default]
    Active,
    Dissipating,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DissipateCountdown {
    remaining: f32,
    total: f32,
    strength: f32,
}

/// A procedural lightning bolt strung between two attachments.
pub struct LightningBolt {
    /// Animatable parameters. Writes take effect on the next tick.
    pub config: BoltConfig,
    /// Start endpoint; the bolt originates here.
    pub attachment0: Attachment,
    /// End endpoint.
    pub attachment1: Attachment,
    /// When false, ticks skip recomputation and hide the previous segments,
    /// but elapsed time still advances so re-enabling resumes coherently.
    pub enabled: bool,

    time_passed: f32,
    phases: NoisePhases,
    phase: BoltPhase,
    dissipate: Option<DissipateCountdown>,
}

impl LightningBolt {
    /// Default dissipate countdown length in seconds.
    pub const DEFAULT_DISSIPATE_TIME: f32 = 0.5;
    /// Default dissipate strength.
    pub const DEFAULT_DISSIPATE_STRENGTH: f32 = 2.0;

    /// Create a bolt with the default configuration (30 parts).
    pub fn new(attachment0: Attachment, attachment1: Attachment) -> Result<Self, BoltError> {
        Self::with_config(attachment0, attachment1, BoltConfig::default())
    }

    /// Create a bolt with a specific part count.
    pub fn with_part_count(
        attachment0: Attachment,
        attachment1: Attachment,
        part_count: u32,
    ) -> Result<Self, BoltError> {
        Self::with_config(
            attachment0,
            attachment1,
            BoltConfig {
                part_count,
                ..Default::default()
            },
        )
    }

    /// Create a bolt from a full configuration. Fails fast on structural
    /// errors (zero part count, malformed gradient).
    pub fn with_config(
        attachment0: Attachment,
        attachment1: Attachment,
        config: BoltConfig,
    ) -> Result<Self, BoltError> {
        config.validate()?;
        Ok(Self {
            config,
            attachment0,
            attachment1,
            enabled: true,
            time_passed: 0.0,
            phases: NoisePhases::new(),
            phase: BoltPhase::Active,
            dissipate: None,
        })
    }

    /// Use a fixed noise seed instead of fresh entropy. Two bolts with the
    /// same seed and config flicker identically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.phases = NoisePhases::from_seed(seed);
        self
    }

    /// Replace the configuration, failing fast on structural errors and
    /// leaving the old configuration in place when it does.
    pub fn apply_config(&mut self, config: BoltConfig) -> Result<(), BoltError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn phase(&self) -> BoltPhase {
        self.phase
    }

    pub fn is_destroyed(&self) -> bool {
        self.phase == BoltPhase::Destroyed
    }

    /// Elapsed time since creation, in seconds.
    pub fn time_passed(&self) -> f32 {
        self.time_passed
    }

    /// Advance the bolt by `dt` seconds and hand the frame to the renderer.
    ///
    /// No-op once destroyed. Time advances even while disabled.
    pub fn tick(&mut self, dt: f32, renderer: &mut dyn LightningRenderer) {
        if self.phase == BoltPhase::Destroyed {
            return;
        }
        let dt = dt.max(0.0);
        self.time_passed += dt;

        if let Some(countdown) = &mut self.dissipate {
            countdown.remaining -= dt;
            if countdown.remaining <= 0.0 {
                self.destroy(renderer);
                return;
            }
        }

        if !self.enabled {
            renderer.hide();
            return;
        }

        let shaping = match &self.dissipate {
            Some(c) => {
                let progress = (1.0 - c.remaining / c.total).clamp(0.0, 1.0);
                DissipateShaping {
                    amplitude_scale: 1.0 + c.strength * progress,
                    opacity_scale: (1.0 - progress).powf(c.strength.max(1.0)),
                }
            }
            None => DissipateShaping::default(),
        };

        let segments = build_segments(
            &self.config,
            &self.attachment0,
            &self.attachment1,
            &self.phases,
            self.time_passed,
            shaping,
        );
        renderer.submit(&segments);
    }

    /// Destroy the bolt immediately, releasing its segments through the
    /// renderer. Idempotent: repeated calls are no-ops, and a pending
    /// dissipate countdown is cancelled rather than left to fire.
    pub fn destroy(&mut self, renderer: &mut dyn LightningRenderer) {
        if self.phase == BoltPhase::Destroyed {
            return;
        }
        self.phase = BoltPhase::Destroyed;
        self.dissipate = None;
        renderer.release();
    }

    /// Fade the bolt out over `time_length` seconds, then destroy it.
    ///
    /// `strength` scales how hard the noise amplitude grows and the opacity
    /// decays over the countdown. No-op once already dissipating or destroyed.
    pub fn destroy_dissipate(&mut self, time_length: f32, strength: f32) {
        if self.phase != BoltPhase::Active {
            return;
        }
        let total = time_length.max(1e-4);
        self.phase = BoltPhase::Dissipating;
        self.dissipate = Some(DissipateCountdown {
            remaining: total,
            total,
            strength: strength.max(0.0),
        });
    }
}
