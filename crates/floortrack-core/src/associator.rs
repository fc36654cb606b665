//! The base associator contract (§4.C) and a concrete IoU-based
//! implementation satisfying it.
//!
//! The ghost-buffer tracker in [`crate::tracker`] wraps any
//! [`BaseAssociator`]; the concrete [`IouAssociator`] here plays the same
//! structural role the teacher's `IoUTracker`/`KalmanTracker` play for
//! the face-cropping pipeline, generalized to person detections and
//! surfaced as a trait so the wrapper never depends on its internals.

use crate::config::GhostBufferConfig;
use crate::geometry::iou;
use floortrack_models::{Bbox, Detection, TrackId, TrackIdAllocator};
use std::collections::HashMap;

/// A short-memory detection-to-track associator. Implementations own
/// their own tentative-track state, confirmation policy, and lost-track
/// buffer; they may occasionally assign a fresh id to a continuation of a
/// lost track, or very rarely reuse an id for a different object — both
/// failure modes the ghost-buffer tracker is designed to repair.
pub trait BaseAssociator {
    /// Associate this frame's detections with tracks. Returns one id per
    /// input detection, in the same order; unconfirmed or unmatched
    /// detections map to [`TrackId::UNASSIGNED`].
    fn update(&mut self, detections: &[Detection]) -> Vec<(Bbox, TrackId)>;

    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy)]
enum TrackState {
    Tentative,
    Confirmed,
}

#[derive(Debug, Clone)]
struct Track {
    id: TrackId,
    bbox: Bbox,
    state: TrackState,
    consecutive_hits: u32,
    age_since_update: u64,
}

/// Greedy IoU-matching base associator with a minimum-consecutive-frames
/// confirmation policy and a bounded lost-track buffer, grounded on the
/// teacher's `IoUTracker`/`KalmanTracker` matching loop.
#[derive(Debug)]
pub struct IouAssociator {
    config: GhostBufferConfig,
    tracks: HashMap<TrackId, Track>,
    allocator: TrackIdAllocator,
}

impl IouAssociator {
    pub fn new(config: GhostBufferConfig) -> Self {
        Self {
            config,
            tracks: HashMap::new(),
            allocator: TrackIdAllocator::new(),
        }
    }

    fn match_detections(&self, detections: &[Detection]) -> Vec<Option<TrackId>> {
        let mut assigned_tracks: Vec<TrackId> = Vec::new();
        let mut result = vec![None; detections.len()];

        // Greedy: repeatedly pick the highest-IoU (detection, track) pair
        // above threshold, same shape as the teacher's sorted-IoU loop.
        loop {
            let mut best: Option<(usize, TrackId, f64)> = None;
            for (di, det) in detections.iter().enumerate() {
                if result[di].is_some() {
                    continue;
                }
                for track in self.tracks.values() {
                    if assigned_tracks.contains(&track.id) {
                        continue;
                    }
                    let score = iou(&det.bbox, &track.bbox);
                    if score >= self.config.minimum_matching_threshold {
                        if best.map_or(true, |(_, _, best_score)| score > best_score) {
                            best = Some((di, track.id, score));
                        }
                    }
                }
            }
            match best {
                Some((di, track_id, _)) => {
                    result[di] = Some(track_id);
                    assigned_tracks.push(track_id);
                }
                None => break,
            }
        }
        result
    }
}

impl BaseAssociator for IouAssociator {
    fn update(&mut self, detections: &[Detection]) -> Vec<(Bbox, TrackId)> {
        let matches = self.match_detections(detections);
        let mut matched_track_ids: Vec<TrackId> = Vec::new();
        let mut out = Vec::with_capacity(detections.len());

        for (det, matched) in detections.iter().zip(matches.into_iter()) {
            match matched {
                Some(track_id) => {
                    let track = self.tracks.get_mut(&track_id).expect("matched track exists");
                    track.bbox = det.bbox;
                    track.age_since_update = 0;
                    track.consecutive_hits += 1;
                    if track.consecutive_hits >= self.config.minimum_consecutive_frames {
                        track.state = TrackState::Confirmed;
                    }
                    matched_track_ids.push(track_id);
                    let out_id = match track.state {
                        TrackState::Confirmed => track.id,
                        TrackState::Tentative => TrackId::UNASSIGNED,
                    };
                    out.push((det.bbox, out_id));
                }
                None => {
                    if det.confidence >= self.config.track_activation_threshold {
                        let id = self.allocator.next_id();
                        let confirmed_immediately = self.config.minimum_consecutive_frames <= 1;
                        self.tracks.insert(
                            id,
                            Track {
                                id,
                                bbox: det.bbox,
                                state: if confirmed_immediately {
                                    TrackState::Confirmed
                                } else {
                                    TrackState::Tentative
                                },
                                consecutive_hits: 1,
                                age_since_update: 0,
                            },
                        );
                        let out_id = if confirmed_immediately {
                            id
                        } else {
                            TrackId::UNASSIGNED
                        };
                        out.push((det.bbox, out_id));
                    } else {
                        out.push((det.bbox, TrackId::UNASSIGNED));
                    }
                }
            }
        }

        // Age and evict unmatched tracks.
        let lost_buffer = self.config.lost_track_buffer;
        self.tracks.retain(|id, track| {
            if matched_track_ids.contains(id) {
                true
            } else {
                track.age_since_update += 1;
                if track.age_since_update > lost_buffer {
                    false
                } else {
                    true
                }
            }
        });

        out
    }

    fn reset(&mut self) {
        self.tracks.clear();
        self.allocator = TrackIdAllocator::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floortrack_models::ClassId;

    fn det(bbox: Bbox) -> Detection {
        Detection::new(bbox, 0.9, ClassId::PERSON)
    }

    #[test]
    fn stable_detection_keeps_same_id_once_confirmed() {
        let mut config = GhostBufferConfig::default();
        config.minimum_consecutive_frames = 2;
        let mut assoc = IouAssociator::new(config);

        let bbox = Bbox::new(100.0, 100.0, 200.0, 300.0);
        let first = assoc.update(&[det(bbox)]);
        assert_eq!(first[0].1, TrackId::UNASSIGNED);

        let second = assoc.update(&[det(bbox)]);
        assert_ne!(second[0].1, TrackId::UNASSIGNED);

        let third = assoc.update(&[det(bbox)]);
        assert_eq!(second[0].1, third[0].1);
    }

    #[test]
    fn low_confidence_detection_never_starts_a_track() {
        let mut assoc = IouAssociator::new(GhostBufferConfig::default());
        let low_conf = Detection::new(Bbox::new(0.0, 0.0, 10.0, 10.0), 0.01, ClassId::PERSON);
        let out = assoc.update(&[low_conf]);
        assert_eq!(out[0].1, TrackId::UNASSIGNED);
    }
}
