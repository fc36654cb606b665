//! Shared data model types for indoor person-tracking analytics.
//!
//! This crate provides Serde-serializable types for:
//! - Track identity (`TrackId`) and bounding boxes (`Bbox`)
//! - Per-frame detections (`Detection`)
//! - Pose keypoint samples in COCO order (`PoseSample`)
//! - Activity labels (`ActivityLabel`)
//! - Zone definitions and analytics (`Zone`, `ZoneEvent`, `ZoneSummary`)
//!
//! No tracking, zone, or classification *logic* lives here; see
//! `floortrack-core` for that.

pub mod activity;
pub mod bbox;
pub mod detection;
pub mod pose;
pub mod track_id;
pub mod zone;

pub use activity::ActivityLabel;
pub use bbox::Bbox;
pub use detection::{ClassId, Detection};
pub use pose::{
    Keypoint, PoseSample, LEFT_ANKLE, LEFT_EAR, LEFT_ELBOW, LEFT_EYE, LEFT_HIP, LEFT_KNEE,
    LEFT_SHOULDER, LEFT_WRIST, NOSE, NUM_JOINTS, RIGHT_ANKLE, RIGHT_EAR, RIGHT_ELBOW, RIGHT_EYE,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};
pub use track_id::{TrackId, TrackIdAllocator};
pub use zone::{Zone, ZoneEvent, ZoneEventKind, ZoneSummary};
