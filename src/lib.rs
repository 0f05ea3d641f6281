//! # bevy_lightning
//!
//! Procedural animated lightning bolts for Bevy.
//!
//! A bolt is a flickering, pulsing, color-shifting chain of segments strung
//! between two attachments, regenerated every frame. The animation kernel is
//! pure (no ECS, no rendering) and hands each frame's segment descriptors to a
//! [`LightningRenderer`]; the bundled plugin renders them as unlit cylinder
//! mesh entities.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_lightning::{Attachment, Bolt, LightningBolt, LightningPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(LightningPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let a0 = Attachment::new(Vec3::new(-5.0, 4.0, 0.0), Vec3::Y).unwrap();
//!     let a1 = Attachment::new(Vec3::new(5.0, 4.0, 0.0), Vec3::Y).unwrap();
//!     commands.spawn(Bolt(LightningBolt::new(a0, a1).unwrap()));
//! }
//! ```
//!
//! The kernel can also be driven without the plugin: call
//! [`LightningBolt::tick`] from any per-frame callback with your own
//! [`LightningRenderer`].

pub mod attachment;
pub mod bolt;
pub mod color;
pub mod config;
pub mod curve;
pub mod error;
pub mod noise;
pub mod presets;
pub mod profile;
pub mod render;
pub mod segment;

pub use attachment::Attachment;
pub use bolt::{BoltPhase, LightningBolt, LightningRenderer};
pub use color::{BoltColor, ColorKey, ColorSequence};
pub use config::{BoltConfig, OpacityProfileFn, RadialProfileFn, SpaceCurveFn};
pub use error::BoltError;
pub use noise::NoisePhases;
pub use render::{Bolt, BoltAnchors, BoltRenderState};
pub use segment::Segment;

use bevy::prelude::*;

/// Main lightning plugin. Registers types and the per-frame bolt systems.
pub struct LightningPlugin;

impl Plugin for LightningPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Attachment>()
            .register_type::<BoltColor>()
            .register_type::<ColorSequence>()
            .register_type::<ColorKey>()
            .register_type::<BoltConfig>()
            .register_type::<BoltPhase>()
            .register_type::<NoisePhases>()
            .register_type::<Segment>()
            .register_type::<BoltAnchors>()
            .init_resource::<render::BoltAssets>()
            .add_systems(
                Update,
                (
                    render::auto_insert_bolt_render_state,
                    render::sync_bolt_anchors,
                    render::tick_bolts,
                    render::cleanup_bolts,
                )
                    .chain(),
            );
    }
}
