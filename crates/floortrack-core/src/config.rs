//! Configuration records for every tunable the core exposes.
//!
//! Module-scope constants in the original reference implementation are
//! lifted here into explicit structs passed at construction, each with a
//! `Default` carrying the spec-stated default value and named presets
//! built with struct-update syntax.

use serde::{Deserialize, Serialize};

/// Ghost-buffer tracker tunables, plus the pass-through base-associator
/// knobs the wrapper surfaces but never inspects itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostBufferConfig {
    /// Frames a lost track may remain reclaimable before it expires.
    pub ghost_buffer_frames: u64,
    /// Minimum IoU (inclusive) for a candidate ghost match.
    pub ghost_iou_threshold: f64,
    /// Maximum centroid distance, in pixels, (inclusive) for a candidate
    /// ghost match.
    pub ghost_distance_threshold: f64,
    /// Weight of IoU in the combined ghost match score.
    pub score_iou_weight: f64,
    /// Weight of the distance term in the combined ghost match score.
    pub score_distance_weight: f64,

    /// Base associator: detection confidence floor for starting a track.
    pub track_activation_threshold: f64,
    /// Base associator: frames a tentative/confirmed track is retained
    /// without a match before it is dropped.
    pub lost_track_buffer: u64,
    /// Base associator: minimum IoU to accept a detection-to-track match.
    pub minimum_matching_threshold: f64,
    /// Base associator: consecutive matched frames required before a
    /// tentative track is confirmed and assigned a visible id.
    pub minimum_consecutive_frames: u32,
}

impl Default for GhostBufferConfig {
    fn default() -> Self {
        Self {
            ghost_buffer_frames: 150,
            ghost_iou_threshold: 0.2,
            ghost_distance_threshold: 200.0,
            score_iou_weight: 0.6,
            score_distance_weight: 0.4,
            track_activation_threshold: 0.25,
            lost_track_buffer: 150,
            minimum_matching_threshold: 0.8,
            minimum_consecutive_frames: 3,
        }
    }
}

impl GhostBufferConfig {
    /// More patient ghost retention and wider matching radius, for scenes
    /// with frequent occlusion and slow foot traffic.
    pub fn patient() -> Self {
        Self {
            ghost_buffer_frames: 300,
            ghost_distance_threshold: 300.0,
            ..Default::default()
        }
    }

    /// Tighter matching for sparse, well-lit scenes where false
    /// restorations are costlier than occasional new ids.
    pub fn strict() -> Self {
        Self {
            ghost_buffer_frames: 60,
            ghost_iou_threshold: 0.35,
            ghost_distance_threshold: 100.0,
            minimum_matching_threshold: 0.9,
            ..Default::default()
        }
    }
}

/// Motion (centroid) history store tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionHistoryConfig {
    pub capacity: usize,
    pub smoothing_window: usize,
}

impl Default for MotionHistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 15,
            smoothing_window: 4,
        }
    }
}

/// Pose history store tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseHistoryConfig {
    pub capacity: usize,
}

impl Default for PoseHistoryConfig {
    fn default() -> Self {
        Self { capacity: 15 }
    }
}

/// Activity classifier thresholds, pose-based and legacy bbox-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityClassifierConfig {
    pub warmup_samples: usize,
    pub standing_speed_threshold_px_s: f64,
    pub walking_speed_threshold_px_s: f64,
    pub sitting_hip_angle_max_deg: f64,
    pub sitting_knee_angle_max_deg: f64,
    pub reading_head_tilt_min_deg: f64,
    pub reading_standing_head_tilt_min_deg: f64,
    pub label_ring_capacity: usize,
    pub dominant_window: usize,

    // Legacy bbox-only fallback.
    pub legacy_standing_speed_px_s: f64,
    pub legacy_walking_slow_speed_px_s: f64,
    pub legacy_walking_speed_px_s: f64,
    pub legacy_loitering_window: usize,
    pub legacy_loitering_threshold_px: f64,
    pub legacy_erratic_window: usize,
    pub legacy_erratic_min_distinct_labels: usize,
}

impl Default for ActivityClassifierConfig {
    fn default() -> Self {
        Self {
            warmup_samples: 5,
            standing_speed_threshold_px_s: 25.0,
            walking_speed_threshold_px_s: 100.0,
            sitting_hip_angle_max_deg: 110.0,
            sitting_knee_angle_max_deg: 130.0,
            reading_head_tilt_min_deg: 20.0,
            reading_standing_head_tilt_min_deg: 30.0,
            label_ring_capacity: 30,
            dominant_window: 10,

            legacy_standing_speed_px_s: 20.0,
            legacy_walking_slow_speed_px_s: 100.0,
            legacy_walking_speed_px_s: 300.0,
            legacy_loitering_window: 5,
            legacy_loitering_threshold_px: 5.0,
            legacy_erratic_window: 10,
            legacy_erratic_min_distinct_labels: 4,
        }
    }
}

/// Zone engine configuration. Kept as a struct (rather than a bare
/// `Vec<Zone>` constructor argument) so it can grow without a breaking
/// signature change; the anchor policy is fixed to bbox-center and is
/// not configurable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneEngineConfig {
    pub zones: Vec<floortrack_models::Zone>,
}

impl ZoneEngineConfig {
    /// Loads the zone configuration file format named in §6: a JSON list
    /// of polygons, each an ordered list of `[x, y]` integer pairs. Zone
    /// ids are assigned by position. Malformed JSON surfaces as
    /// [`crate::error::FloortrackError::JsonParse`]; a polygon with fewer
    /// than 3 vertices is left for [`crate::zone_engine::ZoneEngine::new`]
    /// to reject with the offending index.
    pub fn from_reader<R: std::io::Read>(reader: R) -> crate::error::FloortrackResult<Self> {
        let polygons: Vec<Vec<(i64, i64)>> = serde_json::from_reader(reader)?;
        let zones = polygons
            .into_iter()
            .enumerate()
            .map(|(idx, polygon)| floortrack_models::Zone::new(idx as i64, polygon))
            .collect();
        Ok(Self { zones })
    }
}
