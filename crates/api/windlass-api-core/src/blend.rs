//! Weighted accumulation of per-joint transform contributions.
//!
//! Translation: component-wise weighted sum, divided by total weight at
//! finalize. Rotation: weighted sum of quaternions with each contribution
//! hemisphere-aligned against the running sum, renormalized at finalize.
//! Equivalent to iterated NLERP for the usual blend weights.

use crate::math::{dot4, normalize4};
use crate::transform::Transform;

#[derive(Clone, Copy, Debug, Default)]
pub struct TransformAccumulator {
    t_sum: [f32; 3],
    r_sum: [f32; 4],
    weight: f32,
}

impl TransformAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn total_weight(&self) -> f32 {
        self.weight
    }

    /// Accumulate one contribution. Non-positive weights are ignored.
    pub fn add(&mut self, transform: &Transform, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        let mut r = transform.rotation;
        // Keep all contributions in the same hemisphere as the running sum
        // so antipodal quaternions reinforce instead of cancelling.
        if self.weight > 0.0 && dot4(self.r_sum, r) < 0.0 {
            r = [-r[0], -r[1], -r[2], -r[3]];
        }
        self.t_sum[0] += transform.translation[0] * weight;
        self.t_sum[1] += transform.translation[1] * weight;
        self.t_sum[2] += transform.translation[2] * weight;
        self.r_sum[0] += r[0] * weight;
        self.r_sum[1] += r[1] * weight;
        self.r_sum[2] += r[2] * weight;
        self.r_sum[3] += r[3] * weight;
        self.weight += weight;
    }

    /// Normalize by the total contributed weight; `None` if nothing landed.
    pub fn finalize(&self) -> Option<Transform> {
        if self.weight <= 0.0 {
            return None;
        }
        let inv = self.weight.recip();
        Some(Transform {
            translation: [
                self.t_sum[0] * inv,
                self.t_sum[1] * inv,
                self.t_sum[2] * inv,
            ],
            rotation: normalize4(self.r_sum),
        })
    }
}
