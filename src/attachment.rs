//! Bolt endpoint attachments.
//!
//! An attachment is the minimal capability a bolt endpoint needs: a world
//! position and a world axis used as a tangent hint for curve shaping. Both
//! host transforms and plain hand-built data satisfy it.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::BoltError;

/// A world-space position + axis defining one endpoint of a bolt.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Attachment {
    /// World-space position of the endpoint.
    pub world_position: Vec3,
    /// World-space axis the curve tangent aligns to at this endpoint.
    /// Normalized on construction.
    pub world_axis: Vec3,
}

impl Attachment {
    /// Create an attachment, validating that the position is finite and the
    /// axis is finite and non-zero. The axis is normalized.
    pub fn new(world_position: Vec3, world_axis: Vec3) -> Result<Self, BoltError> {
        if !world_position.is_finite() {
            return Err(BoltError::InvalidAttachment("non-finite position"));
        }
        if !world_axis.is_finite() {
            return Err(BoltError::InvalidAttachment("non-finite axis"));
        }
        if world_axis.length_squared() < 1e-8 {
            return Err(BoltError::InvalidAttachment("zero-length axis"));
        }
        Ok(Self {
            world_position,
            world_axis: world_axis.normalize(),
        })
    }

    /// Attachment at a transform's translation, axis along its local +X.
    pub fn from_transform(transform: &Transform) -> Result<Self, BoltError> {
        Self::new(transform.translation, transform.rotation * Vec3::X)
    }

    /// Attachment at a global transform's translation, axis along its local +X.
    pub fn from_global(global: &GlobalTransform) -> Result<Self, BoltError> {
        let (_, rotation, translation) = global.to_scale_rotation_translation();
        Self::new(translation, rotation * Vec3::X)
    }

    /// Attachment at `world_position` with its axis aimed at `target`.
    pub fn looking_at(world_position: Vec3, target: Vec3) -> Result<Self, BoltError> {
        Self::new(world_position, target - world_position)
    }
}
