//! Local joint transform: translation + rotation relative to the parent
//! joint. Scale is intentionally absent; the pose layer works in rigid
//! local space.

use serde::{Deserialize, Serialize};

use crate::math::{lerp_vec3, nlerp_quat, quat_mul, quat_rotate_vec3};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: [f32; 3],
    /// Unit quaternion (x,y,z,w).
    pub rotation: [f32; 4],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
    };

    pub fn new(translation: [f32; 3], rotation: [f32; 4]) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Blend toward `other`: translation lerp, rotation NLERP (shortest-arc).
    pub fn lerp(&self, other: &Transform, t: f32) -> Transform {
        Transform {
            translation: lerp_vec3(self.translation, other.translation, t),
            rotation: nlerp_quat(self.rotation, other.rotation, t),
        }
    }

    /// Apply `self` after `child`: rotate the child's translation into this
    /// frame, then offset.
    pub fn compose(&self, child: &Transform) -> Transform {
        let rotated = quat_rotate_vec3(self.rotation, child.translation);
        Transform {
            translation: [
                self.translation[0] + rotated[0],
                self.translation[1] + rotated[1],
                self.translation[2] + rotated[2],
            ],
            rotation: quat_mul(self.rotation, child.rotation),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
