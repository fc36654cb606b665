//! Motion history store (§4.F): per-track bounded ring of
//! `(centroid, timestamp)` samples, with smoothed speed.

use crate::config::MotionHistoryConfig;
use crate::error::{FloortrackError, FloortrackResult};
use floortrack_models::TrackId;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy)]
struct Sample {
    centroid: (f64, f64),
    ts: f64,
}

/// Bounded per-track ring of recent centroid positions. `smoothed_speed`
/// reports pixels per second, never pixels per frame.
#[derive(Debug)]
pub struct MotionHistoryStore {
    config: MotionHistoryConfig,
    tracks: HashMap<TrackId, VecDeque<Sample>>,
}

impl MotionHistoryStore {
    /// Builds a store, validating `config` per §7 ("history capacities <
    /// 2" is a `ConfigError`, raised at construction and fatal).
    pub fn new(config: MotionHistoryConfig) -> FloortrackResult<Self> {
        if config.capacity < 2 {
            return Err(FloortrackError::config(
                "motion history capacity must be at least 2",
            ));
        }
        if config.smoothing_window < 1 {
            return Err(FloortrackError::config(
                "motion smoothing_window must be at least 1",
            ));
        }
        Ok(Self {
            config,
            tracks: HashMap::new(),
        })
    }

    pub fn record(&mut self, id: TrackId, centroid: (f64, f64), ts: f64) {
        let ring = self.tracks.entry(id).or_insert_with(VecDeque::new);
        ring.push_back(Sample { centroid, ts });
        while ring.len() > self.config.capacity {
            ring.pop_front();
        }
    }

    pub fn forget(&mut self, id: TrackId) {
        self.tracks.remove(&id);
    }

    /// Average pixel-velocity over the most recent `smoothing_window`
    /// consecutive-pair intervals. Zero when fewer than 3 samples exist.
    /// An interval with `now - prev_ts <= 0` contributes a velocity of 0.
    pub fn smoothed_speed(&self, id: TrackId) -> f64 {
        let Some(ring) = self.tracks.get(&id) else {
            return 0.0;
        };
        if ring.len() < 3 {
            return 0.0;
        }

        let samples: Vec<&Sample> = ring.iter().collect();
        let window = self.config.smoothing_window.min(samples.len() - 1);
        let recent = &samples[samples.len() - window - 1..];

        let mut velocities = Vec::with_capacity(window);
        for pair in recent.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let dt = curr.ts - prev.ts;
            let velocity = if dt > 0.0 {
                let dx = curr.centroid.0 - prev.centroid.0;
                let dy = curr.centroid.1 - prev.centroid.1;
                (dx * dx + dy * dy).sqrt() / dt
            } else {
                0.0
            };
            velocities.push(velocity);
        }

        velocities.iter().sum::<f64>() / velocities.len() as f64
    }

    pub fn len(&self, id: TrackId) -> usize {
        self.tracks.get(&id).map_or(0, |r| r.len())
    }

    /// Average raw pixel displacement (not divided by time) between
    /// consecutive samples over the last `window` intervals. Used by the
    /// legacy classifier's loitering check, which cares about how far a
    /// track has physically moved rather than its speed.
    pub fn average_step_distance(&self, id: TrackId, window: usize) -> f64 {
        let Some(ring) = self.tracks.get(&id) else {
            return 0.0;
        };
        if ring.len() < 2 {
            return 0.0;
        }
        let samples: Vec<&Sample> = ring.iter().collect();
        let span = window.min(samples.len() - 1);
        let recent = &samples[samples.len() - span - 1..];

        let distances: Vec<f64> = recent
            .windows(2)
            .map(|pair| {
                let (prev, curr) = (pair[0], pair[1]);
                let dx = curr.centroid.0 - prev.centroid.0;
                let dy = curr.centroid.1 - prev.centroid.1;
                (dx * dx + dy * dy).sqrt()
            })
            .collect();

        distances.iter().sum::<f64>() / distances.len() as f64
    }
}
