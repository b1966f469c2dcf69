//! The per-instance end of the animation process: a body is the all-dynamic
//! state of one model instance, tracking which motors affect it and folding
//! their sampled joint transforms into its pose. Bodies reference motors
//! weakly by handle; the pool owns motor lifetime.

use std::sync::Arc;

use log::trace;

use windlass_api_core::math::{normalize4, quat_mul};
use windlass_api_core::{Transform, TransformAccumulator};

use crate::config::MotorConfig;
use crate::error::MotorError;
use crate::handle::MotorHandle;
use crate::mask::TrackMask;
use crate::model::Model;
use crate::pool::MotorPool;
use crate::pose::{Pose, PoseSampler};
use crate::sample::{JointSampler, SampleContext};

/// One motor bound to this body, with its sampling source and optional
/// per-joint mask.
struct Motive {
    motor: MotorHandle,
    sampler: Arc<dyn JointSampler>,
    mask: Option<TrackMask>,
}

pub struct Body {
    model: Arc<Model>,
    motives: Vec<Motive>,
    pose: Pose,
    /// When set, `update_motives` leaves terminated motives for an explicit
    /// purge instead of releasing them inline.
    defer_purge: bool,

    // Rigid-body dynamics, orthogonal to the motor blend.
    mass: f32,
    force_accum: [f32; 3],
    torque_accum: [f32; 3],
    linear_velocity: [f32; 3],
    angular_velocity: [f32; 3],
    placement: Transform,

    // Reused by the accelerated sampling path.
    scratch: Vec<TransformAccumulator>,
}

impl Body {
    /// Bind `cnt` new bodies to one shared read-only model. Bodies keep only
    /// the shared handle, never a private copy of model data.
    pub fn acquire_bodies(model: &Arc<Model>, cnt: usize) -> Vec<Body> {
        (0..cnt).map(|_| Body::new(model.clone())).collect()
    }

    fn new(model: Arc<Model>) -> Self {
        let pose = Pose::new(model.joint_cnt());
        Self {
            model,
            motives: Vec::new(),
            pose,
            defer_purge: false,
            mass: 1.0,
            force_accum: [0.0; 3],
            torque_accum: [0.0; 3],
            linear_velocity: [0.0; 3],
            angular_velocity: [0.0; 3],
            placement: Transform::IDENTITY,
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    #[inline]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    #[inline]
    pub fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    #[inline]
    pub fn placement(&self) -> &Transform {
        &self.placement
    }

    pub fn set_defer_purge(&mut self, defer: bool) {
        self.defer_purge = defer;
    }

    /// Attach a motor + sampling source to this body.
    pub fn bind_motive(
        &mut self,
        motor: MotorHandle,
        sampler: Arc<dyn JointSampler>,
        mask: Option<TrackMask>,
    ) {
        self.motives.push(Motive {
            motor,
            sampler,
            mask,
        });
    }

    /// Detach a motor without releasing it. Returns whether it was bound.
    pub fn unbind_motive(&mut self, motor: MotorHandle) -> bool {
        let before = self.motives.len();
        self.motives.retain(|mv| mv.motor != motor);
        self.motives.len() != before
    }

    /// Handles of every currently bound motive.
    pub fn motive_handles(&self) -> Vec<MotorHandle> {
        self.motives.iter().map(|mv| mv.motor).collect()
    }

    /// Update all the motors affecting this body to the new global clock,
    /// then purge terminated ones unless purging is deferred. Motives whose
    /// motor was released elsewhere are dropped.
    pub fn update_motives(&mut self, pool: &mut MotorPool, new_clock: f32) {
        self.motives.retain(|mv| pool.contains(mv.motor));
        let handles = self.motive_handles();
        pool.update_clock(new_clock, &handles);
        if !self.defer_purge {
            self.purge_terminated_motives(pool);
        }
    }

    /// Release terminated motives back to the pool and drop their bindings.
    pub fn purge_terminated_motives(&mut self, pool: &mut MotorPool) {
        let before = self.motives.len();
        self.motives.retain(|mv| {
            if !pool.contains(mv.motor) {
                return false;
            }
            if pool.has_terminated(mv.motor) {
                pool.release(mv.motor);
                return false;
            }
            true
        });
        if before != self.motives.len() {
            trace!(
                "purged {} terminated motive(s) from body of {}",
                before - self.motives.len(),
                self.model.name()
            );
        }
    }

    /// Zero every bound motor's local clock.
    pub fn reset_clock(&mut self, pool: &mut MotorPool) {
        let handles = self.motive_handles();
        pool.reset_local_clock(0.0, &handles);
    }

    /// Rebase every bound motor's clocks against a new origin.
    pub fn recenter_motive_clocks(&mut self, pool: &mut MotorPool, curr_clock: f32) {
        let handles = self.motive_handles();
        pool.rebase_clocks(curr_clock, &handles);
    }

    /// Blend every effective motive's sampled transforms into the pose over
    /// the window `[first_pivot, first_pivot + pivot_cnt)`.
    ///
    /// Per joint, contributions are weighted by
    /// `effective_weight × mask_weight` and normalized by the weight that
    /// actually landed there; joints nothing contributed to keep their prior
    /// pose. Returns false (pose untouched) when no motive contributed at
    /// all.
    pub fn sample_animations(&mut self, pool: &MotorPool, ctx: &SampleContext) -> bool {
        let joint_cnt = self.model.joint_cnt();
        let first = ctx.first_pivot.min(joint_cnt);
        let cnt = ctx.pivot_cnt.min(joint_cnt - first);
        if cnt == 0 || self.motives.is_empty() {
            return false;
        }

        // Snapshot motor state once per motive; motors are read-only for the
        // whole sampling pass.
        let live: Vec<(f32, f32, &Motive)> = self
            .motives
            .iter()
            .filter(|mv| pool.has_effect(mv.motor))
            .map(|mv| {
                let weight = pool.effective_weight(mv.motor);
                let (_, clamped) = pool.query_local_clock(mv.motor).unwrap_or_default();
                (weight, clamped, mv)
            })
            .collect();
        if live.is_empty() {
            return false;
        }

        let pose = &mut self.pose;
        let scratch = &mut self.scratch;
        let mut wrote_any = false;

        let mut write_joint = |joint: u32, acc: &TransformAccumulator, wrote: &mut bool| {
            let Some(mut blended) = acc.finalize() else {
                return;
            };
            if joint == 0 {
                if let Some(displacement) = &ctx.displacement {
                    blended = displacement.compose(&blended);
                }
            }
            let slot = match ctx.sparse_joint_map {
                Some(map) => map.get((joint - first) as usize).copied(),
                None => Some(joint),
            };
            if let Some(slot) = slot {
                if let Some(target) = pose.transform_mut(slot) {
                    *target = blended;
                    *wrote = true;
                }
            }
        };

        if ctx.accelerated {
            // Motive-major: walk each source's joints contiguously into
            // reusable accumulators. Joint-level add order matches the
            // scalar path, so the two paths agree.
            scratch.clear();
            scratch.resize(cnt as usize, TransformAccumulator::new());
            for (weight, clock, mv) in &live {
                for joint in first..first + cnt {
                    let w = mask_weight(mv, joint) * weight;
                    if w <= 0.0 {
                        continue;
                    }
                    if let Some(tr) = mv.sampler.sample_joint(joint, *clock, ctx.allowed_err) {
                        scratch[(joint - first) as usize].add(&tr, w);
                    }
                }
            }
            for (offset, acc) in scratch.iter().enumerate() {
                write_joint(first + offset as u32, acc, &mut wrote_any);
            }
        } else {
            for joint in first..first + cnt {
                let mut acc = TransformAccumulator::new();
                for (weight, clock, mv) in &live {
                    let w = mask_weight(mv, joint) * weight;
                    if w <= 0.0 {
                        continue;
                    }
                    if let Some(tr) = mv.sampler.sample_joint(joint, *clock, ctx.allowed_err) {
                        acc.add(&tr, w);
                    }
                }
                write_joint(joint, &acc, &mut wrote_any);
            }
        }

        wrote_any
    }

    // -- dynamics -----------------------------------------------------------

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass.max(f32::EPSILON);
    }

    /// Accumulate a force and torque to integrate on the next dynamics step.
    pub fn apply_force_and_torque(&mut self, force: [f32; 3], torque: [f32; 3]) {
        for i in 0..3 {
            self.force_accum[i] += force[i];
            self.torque_accum[i] += torque[i];
        }
    }

    /// Explicit Euler step over `dt`: force and torque integrate into the
    /// velocities, velocities into the placement. Accumulators clear after
    /// the step.
    pub fn do_dynamics(&mut self, dt: f32) {
        let inv_mass = self.mass.recip();
        for i in 0..3 {
            self.linear_velocity[i] += self.force_accum[i] * inv_mass * dt;
            self.angular_velocity[i] += self.torque_accum[i] * inv_mass * dt;
            self.placement.translation[i] += self.linear_velocity[i] * dt;
        }
        let w = self.angular_velocity;
        if w != [0.0; 3] {
            let q = self.placement.rotation;
            let dq = quat_mul([w[0], w[1], w[2], 0.0], q);
            self.placement.rotation = normalize4([
                q[0] + 0.5 * dt * dq[0],
                q[1] + 0.5 * dt * dq[1],
                q[2] + 0.5 * dt * dq[2],
                q[3] + 0.5 * dt * dq[3],
            ]);
        }
        self.force_accum = [0.0; 3];
        self.torque_accum = [0.0; 3];
    }

    #[inline]
    pub fn linear_velocity(&self) -> [f32; 3] {
        self.linear_velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> [f32; 3] {
        self.angular_velocity
    }
}

#[inline]
fn mask_weight(mv: &Motive, joint: u32) -> f32 {
    mv.mask.as_ref().map_or(1.0, |m| m.joint_weight(joint))
}

/// Play a frozen pose on a set of bodies as if it were a clip: one motor per
/// body, all sharing the pose snapshot. Returns how many bodies were bound;
/// fails with `ResourceExhausted` (binding nothing) if the pool cannot cover
/// every body.
pub fn perform_manipulated_pose(
    pool: &mut MotorPool,
    pose: &Pose,
    start_time: f32,
    duration: f32,
    iter_cnt: u32,
    mask: Option<&TrackMask>,
    bodies: &mut [Body],
) -> Result<u32, MotorError> {
    let snapshot = Arc::new(pose.clone());
    let cfg = MotorConfig {
        curr_clock: start_time,
        local_dur: duration,
        iter_cnt,
    };
    let handles = pool.acquire(&cfg, bodies.len())?;
    for (body, handle) in bodies.iter_mut().zip(handles) {
        body.bind_motive(
            handle,
            Arc::new(PoseSampler::new(snapshot.clone())),
            mask.cloned(),
        );
    }
    Ok(bodies.len() as u32)
}
