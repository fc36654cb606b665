//! The activity classifier (§4.H): maps a track's current pose (or
//! bbox-only fallback) plus recent motion/pose history into one
//! [`ActivityLabel`], with majority-vote temporal smoothing.

use crate::config::{ActivityClassifierConfig, MotionHistoryConfig, PoseHistoryConfig};
use crate::error::FloortrackResult;
use crate::geometry::angle_at_vertex;
use crate::motion_history::MotionHistoryStore;
use crate::pose_history::PoseHistoryStore;
use floortrack_models::{ActivityLabel, Bbox, PoseSample, TrackId, LEFT_ANKLE, LEFT_HIP,
    LEFT_KNEE, LEFT_SHOULDER, NOSE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Rolling window, in samples, over which hip-center velocity is smoothed.
const HIP_VELOCITY_SMOOTHING_FRAMES: usize = 5;

/// Per-track state: the classifier shares nothing between tracks and
/// removes a track's history rings when asked to forget it.
pub struct ActivityClassifier {
    config: ActivityClassifierConfig,
    motion: MotionHistoryStore,
    pose: PoseHistoryStore,
    labels: HashMap<TrackId, VecDeque<ActivityLabel>>,
}

impl ActivityClassifier {
    /// Builds a classifier with caller-supplied tuning for its motion and
    /// pose history rings, independent of the classifier's own
    /// thresholds. Propagates `ConfigError` from either inner store (§7).
    pub fn new(
        config: ActivityClassifierConfig,
        motion_config: MotionHistoryConfig,
        pose_config: PoseHistoryConfig,
    ) -> FloortrackResult<Self> {
        Ok(Self {
            motion: MotionHistoryStore::new(motion_config)?,
            pose: PoseHistoryStore::new(pose_config)?,
            labels: HashMap::new(),
            config,
        })
    }

    pub fn forget_track(&mut self, id: TrackId) {
        self.motion.forget(id);
        self.pose.forget(id);
        self.labels.remove(&id);
    }

    /// Classify one call's worth of observation for `track_id`. `pose` is
    /// `None` when the (external) pose adapter returned nothing for this
    /// detection.
    pub fn classify(
        &mut self,
        track_id: TrackId,
        pose: Option<PoseSample>,
        bbox: Bbox,
        ts: f64,
    ) -> ActivityLabel {
        self.motion.record(track_id, bbox.center(), ts);

        let label = match pose {
            None => ActivityLabel::NoPose,
            Some(sample) => {
                self.pose.record(track_id, sample);
                if self.pose.len(track_id) < self.config.warmup_samples {
                    ActivityLabel::Initializing
                } else {
                    self.classify_from_pose(track_id, &sample)
                }
            }
        };

        self.push_label(track_id, label);
        debug!(track_id = track_id.0, label = %label, "activity classified");
        label
    }

    /// The legacy bbox-only fallback, for use when pose is unavailable
    /// for an entire stream rather than one frame.
    pub fn classify_legacy(&mut self, track_id: TrackId, bbox: Bbox, ts: f64) -> ActivityLabel {
        self.motion.record(track_id, bbox.center(), ts);
        let speed = self.motion.smoothed_speed(track_id);
        let aspect_ratio = bbox.aspect_ratio();

        let mut label = if speed < self.config.legacy_standing_speed_px_s {
            if aspect_ratio > 2.0 {
                ActivityLabel::Standing
            } else if aspect_ratio < 1.5 {
                ActivityLabel::Sitting
            } else {
                ActivityLabel::Standing
            }
        } else if speed < self.config.legacy_walking_slow_speed_px_s {
            ActivityLabel::WalkingSlow
        } else if speed < self.config.legacy_walking_speed_px_s {
            ActivityLabel::Walking
        } else {
            ActivityLabel::Running
        };

        if self.is_loitering(track_id, label) {
            label = ActivityLabel::Loitering;
        }
        if self.is_erratic(track_id, speed) {
            label = ActivityLabel::ErraticMovement;
        }
        if aspect_ratio < 1.0 && speed > 0.0 {
            label = ActivityLabel::PotentialFall;
        }

        self.push_label(track_id, label);
        label
    }

    /// Modal label over the classifier's configured `dominant_window`
    /// (§10.C), ties resolved by most-recent-occurrence.
    pub fn dominant_activity(&self, track_id: TrackId) -> Option<ActivityLabel> {
        let ring = self.labels.get(&track_id)?;
        if ring.is_empty() {
            return None;
        }
        let take = self.config.dominant_window.min(ring.len());
        let start = ring.len() - take;
        let mut counts: HashMap<ActivityLabel, (usize, usize)> = HashMap::new();
        for (pos, label) in ring.iter().enumerate().skip(start) {
            let entry = counts.entry(*label).or_insert((0, pos));
            entry.0 += 1;
            entry.1 = pos; // remember most recent occurrence
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(a.1 .1.cmp(&b.1 .1)))
            .map(|(label, _)| label)
    }

    fn push_label(&mut self, track_id: TrackId, label: ActivityLabel) {
        let ring = self.labels.entry(track_id).or_insert_with(VecDeque::new);
        ring.push_back(label);
        while ring.len() > self.config.label_ring_capacity {
            ring.pop_front();
        }
    }

    fn classify_from_pose(&self, track_id: TrackId, sample: &PoseSample) -> ActivityLabel {
        let hip_velocity = hip_center_velocity(self.pose.samples(track_id), HIP_VELOCITY_SMOOTHING_FRAMES);
        let head_tilt_deg = head_tilt_degrees(sample);
        let is_sitting = is_sitting(sample, &self.config);

        if is_sitting && head_tilt_deg >= self.config.reading_head_tilt_min_deg {
            ActivityLabel::Reading
        } else if is_sitting {
            ActivityLabel::Sitting
        } else if hip_velocity < self.config.standing_speed_threshold_px_s
            && head_tilt_deg >= self.config.reading_standing_head_tilt_min_deg
        {
            ActivityLabel::ReadingStanding
        } else if hip_velocity < self.config.standing_speed_threshold_px_s {
            ActivityLabel::Standing
        } else {
            // hip_velocity < walking_threshold, or beyond it: both
            // collapse to Walking per the design's explicit choice.
            ActivityLabel::Walking
        }
    }

    fn is_loitering(&self, track_id: TrackId, base_label: ActivityLabel) -> bool {
        if !matches!(base_label, ActivityLabel::Standing | ActivityLabel::WalkingSlow) {
            return false;
        }
        let avg_movement = self
            .motion
            .average_step_distance(track_id, self.config.legacy_loitering_window);
        avg_movement < self.config.legacy_loitering_threshold_px
    }

    fn is_erratic(&self, track_id: TrackId, current_speed: f64) -> bool {
        let Some(ring) = self.labels.get(&track_id) else {
            return false;
        };
        let window = self.config.legacy_erratic_window.min(ring.len());
        if window == 0 {
            return false;
        }
        let start = ring.len() - window;
        let recent: Vec<ActivityLabel> = ring.iter().skip(start).copied().collect();
        let distinct: std::collections::HashSet<ActivityLabel> = recent.iter().copied().collect();
        let has_running = recent.contains(&ActivityLabel::Running);
        let has_standing = recent.contains(&ActivityLabel::Standing);
        distinct.len() >= self.config.legacy_erratic_min_distinct_labels
            && has_running
            && has_standing
            && current_speed > self.config.legacy_standing_speed_px_s
    }
}

fn hip_center(sample: &PoseSample) -> Option<(f64, f64)> {
    let l = sample.joint(LEFT_HIP);
    let r = sample.joint(RIGHT_HIP);
    match (l.valid, r.valid) {
        (true, true) => Some(((l.x + r.x) / 2.0, (l.y + r.y) / 2.0)),
        (true, false) => Some((l.x, l.y)),
        (false, true) => Some((r.x, r.y)),
        (false, false) => None,
    }
}

fn hip_center_velocity(ring: Option<&VecDeque<PoseSample>>, frames: usize) -> f64 {
    let Some(ring) = ring else {
        return 0.0;
    };
    let valid: Vec<(f64, (f64, f64))> = ring
        .iter()
        .filter_map(|s| hip_center(s).map(|c| (s.ts, c)))
        .collect();
    if valid.len() < 2 {
        return 0.0;
    }
    let window = frames.min(valid.len() - 1);
    let recent = &valid[valid.len() - window - 1..];
    let velocities: Vec<f64> = recent
        .windows(2)
        .map(|pair| {
            let (pt, pc) = pair[0];
            let (ct, cc) = pair[1];
            let dt = ct - pt;
            if dt > 0.0 {
                let dx = cc.0 - pc.0;
                let dy = cc.1 - pc.1;
                (dx * dx + dy * dy).sqrt() / dt
            } else {
                0.0
            }
        })
        .collect();
    velocities.iter().sum::<f64>() / velocities.len() as f64
}

/// Degrees by which the shoulder-midpoint-to-nose vector deviates from
/// vertical-down. Returns 0 (not the generic 180-degree neutral value)
/// when the nose or either shoulder is invalid, per §4.H.
fn head_tilt_degrees(sample: &PoseSample) -> f64 {
    let nose = sample.joint(NOSE);
    let l_shoulder = sample.joint(LEFT_SHOULDER);
    let r_shoulder = sample.joint(RIGHT_SHOULDER);
    if !nose.valid || !l_shoulder.valid || !r_shoulder.valid {
        return 0.0;
    }
    let mid = ((l_shoulder.x + r_shoulder.x) / 2.0, (l_shoulder.y + r_shoulder.y) / 2.0);
    // Reference ray points straight up from the shoulder midpoint (image
    // y grows downward), so an upright head (nose above mid) gives ~0
    // degrees and a forward head-bow increases it.
    let up = (mid.0, mid.1 - 1.0);
    angle_at_vertex((nose.x, nose.y), true, mid, true, up, true)
}

fn is_sitting(sample: &PoseSample, config: &ActivityClassifierConfig) -> bool {
    is_sitting_side(
        sample,
        LEFT_SHOULDER,
        LEFT_HIP,
        LEFT_KNEE,
        LEFT_ANKLE,
        config,
    ) || is_sitting_side(
        sample,
        RIGHT_SHOULDER,
        RIGHT_HIP,
        RIGHT_KNEE,
        RIGHT_ANKLE,
        config,
    )
}

fn is_sitting_side(
    sample: &PoseSample,
    shoulder_idx: usize,
    hip_idx: usize,
    knee_idx: usize,
    ankle_idx: usize,
    config: &ActivityClassifierConfig,
) -> bool {
    let shoulder = sample.joint(shoulder_idx);
    let hip = sample.joint(hip_idx);
    let knee = sample.joint(knee_idx);
    let ankle = sample.joint(ankle_idx);

    let hip_angle = angle_at_vertex(
        (shoulder.x, shoulder.y),
        shoulder.valid,
        (hip.x, hip.y),
        hip.valid,
        (knee.x, knee.y),
        knee.valid,
    );
    let knee_angle = angle_at_vertex(
        (hip.x, hip.y),
        hip.valid,
        (knee.x, knee.y),
        knee.valid,
        (ankle.x, ankle.y),
        ankle.valid,
    );

    hip_angle < config.sitting_hip_angle_max_deg && knee_angle < config.sitting_knee_angle_max_deg
}
