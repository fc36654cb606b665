//! Pose history store (§4.G): per-track bounded ring of 17-keypoint
//! samples, with joint velocities.

use crate::config::PoseHistoryConfig;
use crate::error::{FloortrackError, FloortrackResult};
use floortrack_models::{PoseSample, TrackId};
use std::collections::{HashMap, VecDeque};

#[derive(Debug)]
pub struct PoseHistoryStore {
    config: PoseHistoryConfig,
    tracks: HashMap<TrackId, VecDeque<PoseSample>>,
}

impl PoseHistoryStore {
    /// Builds a store, validating `config` per §7 ("history capacities <
    /// 2" is a `ConfigError`, raised at construction and fatal).
    pub fn new(config: PoseHistoryConfig) -> FloortrackResult<Self> {
        if config.capacity < 2 {
            return Err(FloortrackError::config(
                "pose history capacity must be at least 2",
            ));
        }
        Ok(Self {
            config,
            tracks: HashMap::new(),
        })
    }

    pub fn record(&mut self, id: TrackId, sample: PoseSample) {
        let ring = self.tracks.entry(id).or_insert_with(VecDeque::new);
        ring.push_back(sample);
        while ring.len() > self.config.capacity {
            ring.pop_front();
        }
    }

    pub fn forget(&mut self, id: TrackId) {
        self.tracks.remove(&id);
    }

    pub fn len(&self, id: TrackId) -> usize {
        self.tracks.get(&id).map_or(0, |r| r.len())
    }

    pub fn samples(&self, id: TrackId) -> Option<&VecDeque<PoseSample>> {
        self.tracks.get(&id)
    }

    /// Velocity of one joint between the last two *valid* samples of it,
    /// pixels per second. Invalid joints are skipped silently; returns
    /// `None` when fewer than two valid samples exist.
    pub fn joint_velocity(&self, id: TrackId, joint_idx: usize) -> Option<f64> {
        let ring = self.tracks.get(&id)?;
        let mut valid_iter = ring
            .iter()
            .filter(|sample| sample.joint(joint_idx).valid)
            .rev();
        let curr = valid_iter.next()?;
        let prev = valid_iter.next()?;
        velocity_between(prev, curr, joint_idx)
    }

    /// Smooths `joint_velocity` over the last `frames` valid consecutive
    /// pairs of that joint.
    pub fn average_joint_velocity(&self, id: TrackId, joint_idx: usize, frames: usize) -> f64 {
        let Some(ring) = self.tracks.get(&id) else {
            return 0.0;
        };
        let valid: Vec<&PoseSample> = ring
            .iter()
            .filter(|sample| sample.joint(joint_idx).valid)
            .collect();
        if valid.len() < 2 {
            return 0.0;
        }

        let window = frames.min(valid.len() - 1);
        let recent = &valid[valid.len() - window - 1..];

        let velocities: Vec<f64> = recent
            .windows(2)
            .filter_map(|pair| velocity_between(pair[0], pair[1], joint_idx))
            .collect();

        if velocities.is_empty() {
            0.0
        } else {
            velocities.iter().sum::<f64>() / velocities.len() as f64
        }
    }
}

fn velocity_between(prev: &PoseSample, curr: &PoseSample, joint_idx: usize) -> Option<f64> {
    let dt = curr.ts - prev.ts;
    if dt <= 0.0 {
        return Some(0.0);
    }
    let (px, py) = prev.joint(joint_idx).point();
    let (cx, cy) = curr.joint(joint_idx).point();
    let dx = cx - px;
    let dy = cy - py;
    Some((dx * dx + dy * dy).sqrt() / dt)
}
