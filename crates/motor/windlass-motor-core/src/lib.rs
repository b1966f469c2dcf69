//! Windlass Motor Core (engine-agnostic)
//!
//! The runtime animation layer has two ends: the [`body::Body`], which is the
//! state of one model instance that any number of animations may be affecting,
//! and the [`motor::Motor`], which is the state of one playing animation that
//! may be affecting any number of models. Motors live in a capacity-bounded
//! [`pool::MotorPool`] behind generation-tagged handles and are driven in
//! bulk; bodies aggregate their motors' sampled joint transforms into a
//! [`pose::Pose`] for the downstream skinning/rendering consumer.

pub mod body;
pub mod clock;
pub mod config;
pub mod ease;
pub mod error;
pub mod handle;
pub mod mask;
pub mod model;
pub mod motor;
pub mod pool;
pub mod pose;
pub mod sample;

// Re-exports for consumers (adapters)
pub use body::{perform_manipulated_pose, Body};
pub use clock::ClockAdvance;
pub use config::MotorConfig;
pub use ease::HermiteRamp;
pub use error::MotorError;
pub use handle::MotorHandle;
pub use mask::TrackMask;
pub use model::Model;
pub use motor::{MotorState, MotorTiming};
pub use pool::MotorPool;
pub use pose::{Pose, PoseSampler};
pub use sample::{JointSampler, SampleContext};
pub use windlass_api_core::{Transform, TransformAccumulator};
