//! The zone occupancy accountant (§4.E): for each configured polygon,
//! maintain the present set and emit ordered ENTRY/EXIT events with
//! accumulated dwell durations.

use crate::config::ZoneEngineConfig;
use crate::error::{FloortrackError, FloortrackResult};
use crate::geometry::point_in_polygon;
use floortrack_models::{Bbox, TrackId, Zone, ZoneEvent, ZoneEventKind, ZoneSummary};
use std::collections::{HashMap, HashSet};
use tracing::info;

#[derive(Debug, Default)]
struct ZoneState {
    present: HashSet<TrackId>,
    entry_time: HashMap<TrackId, f64>,
    cumulative_dwell: HashMap<TrackId, f64>,
    total_entries: usize,
    total_exits: usize,
}

/// Maintains, per configured zone, the set of currently-present tracks
/// and emits ordered ENTRY/EXIT events with accumulated dwell. The zone
/// engine consumes track ids read-only; it has no dependency on, and no
/// awareness of, the tracker that produced them.
pub struct ZoneEngine {
    zones: Vec<Zone>,
    states: Vec<ZoneState>,
}

impl ZoneEngine {
    pub fn new(config: ZoneEngineConfig) -> FloortrackResult<Self> {
        for (idx, zone) in config.zones.iter().enumerate() {
            if !zone.is_valid() {
                return Err(FloortrackError::bad_polygon(
                    idx,
                    "polygon must have at least 3 vertices",
                ));
            }
        }
        let states = config.zones.iter().map(|_| ZoneState::default()).collect();
        Ok(Self {
            zones: config.zones,
            states,
        })
    }

    pub fn reset(&mut self) {
        for state in &mut self.states {
            *state = ZoneState::default();
        }
    }

    /// Advance the zone engine by one frame. `tracked` is the final
    /// `(id, bbox)` set from the tracker for this frame; unassigned
    /// tracks should be filtered out by the caller before this call.
    pub fn update(&mut self, frame: u64, time_s: f64, tracked: &[(TrackId, Bbox)]) -> Vec<ZoneEvent> {
        let mut events = Vec::new();

        for (zone_idx, zone) in self.zones.iter().enumerate() {
            let present_now: HashSet<TrackId> = tracked
                .iter()
                .filter(|(_, bbox)| point_in_polygon(bbox.center(), &zone.polygon))
                .map(|(id, _)| *id)
                .collect();

            let state = &mut self.states[zone_idx];

            let mut entries: Vec<TrackId> = present_now.difference(&state.present).copied().collect();
            entries.sort();
            for id in entries {
                state.entry_time.insert(id, time_s);
                state.total_entries += 1;
                info!(zone_id = zone.id, track_id = id.0, frame, "zone entry");
                events.push(ZoneEvent {
                    frame,
                    time_s,
                    person: id,
                    zone: zone.id,
                    kind: ZoneEventKind::Entry,
                    dwell_s: None,
                });
            }

            let mut exits: Vec<TrackId> = state.present.difference(&present_now).copied().collect();
            exits.sort();
            for id in exits {
                let dwell = state
                    .entry_time
                    .remove(&id)
                    .map(|entry_time| (time_s - entry_time).max(0.0))
                    .unwrap_or(0.0);
                *state.cumulative_dwell.entry(id).or_insert(0.0) += dwell;
                state.total_exits += 1;
                info!(
                    zone_id = zone.id,
                    track_id = id.0,
                    frame,
                    dwell_s = dwell,
                    "zone exit"
                );
                events.push(ZoneEvent {
                    frame,
                    time_s,
                    person: id,
                    zone: zone.id,
                    kind: ZoneEventKind::Exit,
                    dwell_s: Some(dwell),
                });
            }

            state.present = present_now;
        }

        events
    }

    /// Per-zone analytics summary matching the external analytics schema.
    pub fn summary(&self, zone_id: i64, now_s: f64) -> Option<ZoneSummary> {
        let zone_idx = self.zones.iter().position(|z| z.id == zone_id)?;
        let state = &self.states[zone_idx];

        let mut durations_by_person = state.cumulative_dwell.clone();
        for (&id, &entry_time) in &state.entry_time {
            *durations_by_person.entry(id).or_insert(0.0) += (now_s - entry_time).max(0.0);
        }

        let average_duration = if durations_by_person.is_empty() {
            0.0
        } else {
            durations_by_person.values().sum::<f64>() / durations_by_person.len() as f64
        };

        let mut current_people: Vec<TrackId> = state.present.iter().copied().collect();
        current_people.sort();

        Some(ZoneSummary {
            zone_id,
            current_occupancy: state.present.len(),
            current_people,
            total_entries: state.total_entries,
            total_exits: state.total_exits,
            average_duration,
            durations_by_person,
        })
    }
}
