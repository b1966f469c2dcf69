//! Shared read-only model prototype.
//!
//! The model is structured data for one particular rig; it has no concept of
//! where an instance is or which animations are acting on it. Identical
//! entities share one `Model` behind an `Arc` while each keeps its own
//! [`crate::body::Body`], which is all-dynamic and never cached or reused.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Model {
    name: String,
    joint_cnt: u32,
}

impl Model {
    pub fn new(name: impl Into<String>, joint_cnt: u32) -> Self {
        Self {
            name: name.into(),
            joint_cnt,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of joints (articulations) in the rig.
    #[inline]
    pub fn joint_cnt(&self) -> u32 {
        self.joint_cnt
    }
}
