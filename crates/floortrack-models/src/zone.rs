use crate::track_id::TrackId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A polygonal zone, immutable after load. Vertices are ordered and need
/// not form a convex shape; zones may overlap one another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub polygon: Vec<(i64, i64)>,
}

impl Zone {
    pub fn new(id: i64, polygon: Vec<(i64, i64)>) -> Self {
        Self { id, polygon }
    }

    pub fn is_valid(&self) -> bool {
        self.polygon.len() >= 3
    }
}

/// One entry or exit event, appended to the zone event log in frame order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneEvent {
    pub frame: u64,
    pub time_s: f64,
    pub person: TrackId,
    pub zone: i64,
    pub kind: ZoneEventKind,
    /// Populated only on `Exit`.
    pub dwell_s: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneEventKind {
    Entry,
    Exit,
}

/// Per-zone analytics summary, matching the external analytics schema in
/// the system's external-interfaces boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone_id: i64,
    pub current_occupancy: usize,
    pub current_people: Vec<TrackId>,
    pub total_entries: usize,
    pub total_exits: usize,
    pub average_duration: f64,
    pub durations_by_person: HashMap<TrackId, f64>,
}
