#![deny(unreachable_patterns)]
//! Identity-stable person tracking, zone occupancy, and activity
//! classification over per-frame detections and poses supplied by an
//! external detector/pose adapter.
//!
//! This crate provides:
//! - A ghost-buffer tracker that restores a track's original id across
//!   brief occlusions, wrapping a pluggable base associator
//! - A polygonal zone engine producing ordered entry/exit events with
//!   dwell accounting
//! - Motion and pose history rings per track
//! - An activity classifier (pose-based, with a bbox-only fallback) with
//!   temporal label smoothing

pub mod activity_classifier;
pub mod associator;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ghost;
pub mod motion_history;
pub mod pose_history;
pub mod tracker;
pub mod zone_engine;

pub use activity_classifier::ActivityClassifier;
pub use associator::{BaseAssociator, IouAssociator};
pub use config::{
    ActivityClassifierConfig, GhostBufferConfig, MotionHistoryConfig, PoseHistoryConfig,
    ZoneEngineConfig,
};
pub use error::{FloortrackError, FloortrackResult};
pub use ghost::GhostRecord;
pub use motion_history::MotionHistoryStore;
pub use pose_history::PoseHistoryStore;
pub use tracker::{DecisionTag, GhostBufferTracker, GhostComparison, TrackerDecision, TrackerStats};
pub use zone_engine::ZoneEngine;

pub use floortrack_models::{
    ActivityLabel, Bbox, ClassId, Detection, Keypoint, PoseSample, TrackId, TrackIdAllocator,
    Zone, ZoneEvent, ZoneEventKind, ZoneSummary,
};
