//! Opaque, generation-tagged motor handles.
//!
//! A handle is an index into the pool's slot array plus the generation the
//! slot carried when it was acquired. Releasing a slot bumps its generation,
//! so handles retained past release stop resolving instead of aliasing a
//! recycled motor.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MotorHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl MotorHandle {
    /// Slot index, stable for the lifetime of the acquisition. Exposed for
    /// diagnostics; do not use it to fabricate handles.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }
}
