//! Per-joint weight masks, layered on top of a motor's effective weight so
//! one clip can drive only part of a skeleton (an upper-body wave over a
//! full-body walk, say).

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackMask {
    default_weight: f32,
    /// Sparse per-joint overrides; joints not listed use the default.
    overrides: HashMap<u32, f32>,
}

impl TrackMask {
    pub fn new(default_weight: f32) -> Self {
        Self {
            default_weight,
            overrides: HashMap::new(),
        }
    }

    /// Builder-style override for one joint.
    pub fn with_joint(mut self, joint: u32, weight: f32) -> Self {
        self.overrides.insert(joint, weight);
        self
    }

    pub fn set_joint_weight(&mut self, joint: u32, weight: f32) {
        self.overrides.insert(joint, weight);
    }

    #[inline]
    pub fn joint_weight(&self, joint: u32) -> f32 {
        self.overrides
            .get(&joint)
            .copied()
            .unwrap_or(self.default_weight)
    }
}

impl Default for TrackMask {
    fn default() -> Self {
        Self::new(1.0)
    }
}
