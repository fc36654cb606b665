use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of activity labels the classifier can emit.
///
/// `WalkingSlow`, `Running`, `ErraticMovement`, and `PotentialFall` are
/// only ever produced by the legacy bbox-only fallback classifier (no
/// pose available); the pose-based classifier never emits them, per its
/// explicit collapse of the fast-motion tiers into `Walking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLabel {
    Standing,
    Sitting,
    Reading,
    ReadingStanding,
    Walking,
    WalkingSlow,
    Running,
    Loitering,
    ErraticMovement,
    PotentialFall,
    NoPose,
    Initializing,
    Unknown,
}

impl fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLabel::Standing => "standing",
            ActivityLabel::Sitting => "sitting",
            ActivityLabel::Reading => "reading",
            ActivityLabel::ReadingStanding => "reading_standing",
            ActivityLabel::Walking => "walking",
            ActivityLabel::WalkingSlow => "walking_slow",
            ActivityLabel::Running => "running",
            ActivityLabel::Loitering => "loitering",
            ActivityLabel::ErraticMovement => "erratic_movement",
            ActivityLabel::PotentialFall => "potential_fall",
            ActivityLabel::NoPose => "no_pose",
            ActivityLabel::Initializing => "initializing",
            ActivityLabel::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}
