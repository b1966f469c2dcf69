//! Pose buffer: the state of a skeleton expressed in its local pose, one
//! transform per joint relative to its immediate parent. Capacity is fixed
//! at acquisition and never resized.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use windlass_api_core::math::quat_from_euler;
use windlass_api_core::Transform;

use crate::sample::JointSampler;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pose {
    transforms: Vec<Transform>,
}

impl Pose {
    /// A bind pose: every joint at the identity local transform.
    pub fn new(capacity: u32) -> Self {
        Self {
            transforms: vec![Transform::IDENTITY; capacity as usize],
        }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.transforms.len() as u32
    }

    #[inline]
    pub fn transform(&self, joint: u32) -> Option<&Transform> {
        self.transforms.get(joint as usize)
    }

    #[inline]
    pub fn transform_mut(&mut self, joint: u32) -> Option<&mut Transform> {
        self.transforms.get_mut(joint as usize)
    }

    /// Copy from another pose, clamped to the smaller capacity.
    pub fn copy_from(&mut self, from: &Pose) {
        let n = self.transforms.len().min(from.transforms.len());
        self.transforms[..n].copy_from_slice(&from.transforms[..n]);
    }

    /// Compose extracted root-motion vectors onto the root joint. The
    /// rotation is given as XYZ Euler radians, matching what root-motion
    /// extraction hands back.
    pub fn apply_root_motion(&mut self, translation: [f32; 3], rotation: [f32; 3]) {
        if let Some(root) = self.transforms.get_mut(0) {
            let motion = Transform::new(translation, quat_from_euler(rotation));
            *root = motion.compose(root);
        }
    }
}

/// Plays a frozen pose back through the motor machinery: every joint
/// samples to the held pose's transform no matter the local clock, so a
/// hand-manipulated attitude can be blended and eased like any clip.
#[derive(Clone, Debug)]
pub struct PoseSampler {
    pose: Arc<Pose>,
}

impl PoseSampler {
    pub fn new(pose: Arc<Pose>) -> Self {
        Self { pose }
    }
}

impl JointSampler for PoseSampler {
    fn joint_cnt(&self) -> u32 {
        self.pose.capacity()
    }

    fn sample_joint(&self, joint: u32, _local_clock: f32, _allowed_err: f32) -> Option<Transform> {
        self.pose.transform(joint).copied()
    }
}
