//! Shared test fixtures: manifest-driven rig/clip payloads plus reference
//! `JointSampler` implementations used across the workspace's tests and
//! benches.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

use windlass_api_core::Transform;
use windlass_motor_core::{JointSampler, Model};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, String>,
    clips: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod rigs {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct RigData {
        name: String,
        joint_cnt: u32,
    }

    pub fn keys() -> Vec<String> {
        MANIFEST.rigs.keys().cloned().collect()
    }

    pub fn load(name: &str) -> Result<Model> {
        let rel = lookup(&MANIFEST.rigs, "rig", name)?;
        let text = read_to_string(rel)?;
        let data: RigData =
            serde_json::from_str(&text).with_context(|| format!("failed to parse rig {name}"))?;
        Ok(Model::new(data.name, data.joint_cnt))
    }
}

pub mod clips {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.clips.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.clips, "clip", name)?;
        read_to_string(rel)
    }

    pub fn load(name: &str) -> Result<KeyedClip> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse clip {name}"))
    }
}

/// A keyframed clip: per-joint transform keys, linearly interpolated
/// (translation lerp, rotation NLERP), ends held. Joints without a track
/// are not driven.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyedClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<JointTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JointTrack {
    pub joint: u32,
    pub keys: Vec<TransformKey>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TransformKey {
    pub t: f32,
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
}

impl TransformKey {
    fn transform(&self) -> Transform {
        Transform::new(self.translation, self.rotation)
    }
}

impl JointSampler for KeyedClip {
    fn joint_cnt(&self) -> u32 {
        self.tracks.iter().map(|t| t.joint + 1).max().unwrap_or(0)
    }

    fn sample_joint(&self, joint: u32, local_clock: f32, _allowed_err: f32) -> Option<Transform> {
        let track = self.tracks.iter().find(|t| t.joint == joint)?;
        let keys = &track.keys;
        match keys.len() {
            0 => None,
            1 => Some(keys[0].transform()),
            _ => {
                if local_clock <= keys[0].t {
                    return Some(keys[0].transform());
                }
                let last = keys[keys.len() - 1];
                if local_clock >= last.t {
                    return Some(last.transform());
                }
                let idx = keys.windows(2).position(|w| local_clock <= w[1].t)?;
                let (left, right) = (keys[idx], keys[idx + 1]);
                let span = (right.t - left.t).max(f32::EPSILON);
                let u = (local_clock - left.t) / span;
                Some(left.transform().lerp(&right.transform(), u))
            }
        }
    }
}

/// Drives every joint to the same fixed transform; the simplest possible
/// blend input.
#[derive(Debug, Clone)]
pub struct ConstantSampler {
    joints: u32,
    transform: Transform,
}

impl ConstantSampler {
    pub fn new(joints: u32, transform: Transform) -> Self {
        Self { joints, transform }
    }

    /// Constant pure translation, a common test shape.
    pub fn translation(joints: u32, translation: [f32; 3]) -> Self {
        Self::new(joints, Transform::new(translation, [0.0, 0.0, 0.0, 1.0]))
    }
}

impl JointSampler for ConstantSampler {
    fn joint_cnt(&self) -> u32 {
        self.joints
    }

    fn sample_joint(&self, joint: u32, _local_clock: f32, _allowed_err: f32) -> Option<Transform> {
        (joint < self.joints).then_some(self.transform)
    }
}

/// Translates joint 0 along +X at one unit per second of local clock:
/// sampling it makes clock mistakes visible as positions.
#[derive(Debug, Clone, Copy)]
pub struct ClockRampSampler {
    joints: u32,
}

impl ClockRampSampler {
    pub fn new(joints: u32) -> Self {
        Self { joints }
    }
}

impl JointSampler for ClockRampSampler {
    fn joint_cnt(&self) -> u32 {
        self.joints
    }

    fn sample_joint(&self, joint: u32, local_clock: f32, _allowed_err: f32) -> Option<Transform> {
        (joint < self.joints)
            .then_some(Transform::new([local_clock, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]))
    }
}
