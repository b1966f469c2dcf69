//! The sampling seam and per-call sampling context.
//!
//! Clip and skeleton data formats live outside this core; anything that can
//! turn (joint, local clock) into a local transform plugs in through
//! [`JointSampler`].

use windlass_api_core::Transform;

/// Source of per-joint local transforms at a given local clock value.
///
/// `allowed_err` is a sampling tolerance hint: implementations may return a
/// cheaper approximation whose error stays within it.
pub trait JointSampler: Send + Sync {
    /// Number of joints this source can drive.
    fn joint_cnt(&self) -> u32;

    /// Sample one joint; `None` when the source does not drive this joint.
    fn sample_joint(&self, joint: u32, local_clock: f32, allowed_err: f32) -> Option<Transform>;
}

/// Parameters for one [`crate::body::Body::sample_animations`] call.
#[derive(Clone, Copy, Debug)]
pub struct SampleContext<'a> {
    /// Request the batched (motive-major) code path. Must agree with the
    /// scalar path within floating-point tolerance.
    pub accelerated: bool,
    /// First joint of the sampled window.
    pub first_pivot: u32,
    /// Number of joints in the window (clamped to the model).
    pub pivot_cnt: u32,
    /// Sampling tolerance forwarded to the samplers.
    pub allowed_err: f32,
    /// Composed onto the root pivot's blended transform when the window
    /// starts at the root.
    pub displacement: Option<Transform>,
    /// Redirects window-relative pivots to pose slots:
    /// `pose_idx = map[joint - first_pivot]`.
    pub sparse_joint_map: Option<&'a [u32]>,
}

impl<'a> SampleContext<'a> {
    /// Sample every joint of a `joint_cnt`-joint model, scalar path.
    pub fn full(joint_cnt: u32) -> Self {
        Self {
            accelerated: false,
            first_pivot: 0,
            pivot_cnt: joint_cnt,
            allowed_err: 0.0,
            displacement: None,
            sparse_joint_map: None,
        }
    }
}
