//! The ghost-buffer tracker (§4.D) — the central component. Wraps a
//! [`BaseAssociator`] to repair spurious new-id assignment and suspicious
//! id reassignment using a buffer of recently-lost [`GhostRecord`]s.

use crate::associator::BaseAssociator;
use crate::config::GhostBufferConfig;
use crate::error::{FloortrackError, FloortrackResult};
use crate::ghost::GhostRecord;
use floortrack_models::{Bbox, Detection, TrackId, TrackIdAllocator};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// High bit reserved for ids this tracker mints itself, when a suspicious
/// reassignment's provisional id can't be reused without colliding with
/// its own stale ghost record. Keeps tracker-minted ids disjoint from
/// whatever sequential id space a `BaseAssociator` hands out.
const REASSIGNMENT_ID_BIT: u64 = 1 << 63;

/// One scored comparison between a detection and a candidate ghost,
/// carried on [`DecisionTag::GhostMatchingAttempt`] for offline tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostComparison {
    pub ghost_id: TrackId,
    pub iou: f64,
    pub distance: f64,
    pub score: f64,
}

/// Tagged union over the five observable decision kinds in §4.D. One
/// variant per event tag, carrying whatever that tag needs.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionTag {
    IdContinued,
    SuspiciousReassignmentDetected { ghost_iou: f64, ghost_distance: f64 },
    GhostMatchingAttempt { candidates: Vec<GhostComparison> },
    IdRestoredFromGhost { score: f64 },
    NewIdAssigned,
}

/// One structured decision record, the primary artifact for offline
/// tuning of the ghost buffer's thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerDecision {
    pub frame: u64,
    pub provisional_id: TrackId,
    pub final_id: TrackId,
    pub tag: DecisionTag,
}

/// Aggregate counters over the life of a tracker instance, supplementing
/// the per-frame decision log with a running summary (grounded on the
/// original reference implementation's tracking summary, and in the
/// teacher's own `TrackerStats`/`DecimatorStats` pattern).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub ghosts_created: u64,
    pub restorations: u64,
    pub suspicious_reassignments: u64,
    pub new_ids_assigned: u64,
}

/// Wraps a [`BaseAssociator`] to produce an identity stream in which
/// transient losses preserve the original id and erroneous reassignments
/// are overridden when geometry disagrees.
pub struct GhostBufferTracker<A: BaseAssociator> {
    associator: A,
    config: GhostBufferConfig,
    active: HashMap<TrackId, Bbox>,
    ghosts: HashMap<TrackId, GhostRecord>,
    last_active_ids: HashSet<TrackId>,
    frame_index: u64,
    stats: TrackerStats,
    reassignment_ids: TrackIdAllocator,
}

impl<A: BaseAssociator> GhostBufferTracker<A> {
    /// Builds a tracker, validating `config` per §7's `ConfigError`
    /// ("negative thresholds ... raised at construction; fatal").
    pub fn new(associator: A, config: GhostBufferConfig) -> FloortrackResult<Self> {
        if config.ghost_iou_threshold < 0.0 {
            return Err(FloortrackError::config("ghost_iou_threshold must be non-negative"));
        }
        if config.ghost_distance_threshold < 0.0 {
            return Err(FloortrackError::config("ghost_distance_threshold must be non-negative"));
        }
        if config.score_iou_weight < 0.0 || config.score_distance_weight < 0.0 {
            return Err(FloortrackError::config("ghost score weights must be non-negative"));
        }
        if config.track_activation_threshold < 0.0 {
            return Err(FloortrackError::config(
                "track_activation_threshold must be non-negative",
            ));
        }
        if config.minimum_matching_threshold < 0.0 {
            return Err(FloortrackError::config(
                "minimum_matching_threshold must be non-negative",
            ));
        }
        if config.minimum_consecutive_frames == 0 {
            return Err(FloortrackError::config(
                "minimum_consecutive_frames must be at least 1",
            ));
        }
        Ok(Self {
            associator,
            config,
            active: HashMap::new(),
            ghosts: HashMap::new(),
            last_active_ids: HashSet::new(),
            frame_index: 0,
            stats: TrackerStats::default(),
            reassignment_ids: TrackIdAllocator::new(),
        })
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_ids(&self) -> HashSet<TrackId> {
        self.active.keys().copied().collect()
    }

    pub fn ghost_ids(&self) -> HashSet<TrackId> {
        self.ghosts.keys().copied().collect()
    }

    pub fn reset(&mut self) {
        self.associator.reset();
        self.active.clear();
        self.ghosts.clear();
        self.last_active_ids.clear();
        self.frame_index = 0;
        self.stats = TrackerStats::default();
        self.reassignment_ids = TrackIdAllocator::new();
    }

    /// Mints an id guaranteed never to have been handed out by the base
    /// associator, for a suspicious detection whose provisional id cannot
    /// safely be reused (see the `remaining` loop in [`Self::update`]).
    fn mint_reassignment_id(&mut self) -> TrackId {
        let TrackId(raw) = self.reassignment_ids.next_id();
        TrackId(REASSIGNMENT_ID_BIT | raw)
    }

    /// Advance the tracker by one frame. Returns the final `(bbox, id)`
    /// pairs (`TrackId::UNASSIGNED` for detections the base associator
    /// has not yet confirmed) and the decision log for this frame.
    pub fn update(&mut self, detections: &[Detection]) -> (Vec<(Bbox, TrackId)>, Vec<TrackerDecision>) {
        self.frame_index += 1;
        let frame = self.frame_index;

        // Step 1: invoke the base associator.
        let provisional = self.associator.update(detections);

        // Step 2: current_active_ids, update `active`.
        let mut current_active_ids: HashSet<TrackId> = HashSet::new();
        for (bbox, id) in &provisional {
            if !id.is_unassigned() {
                current_active_ids.insert(*id);
                self.active.insert(*id, *bbox);
            }
        }

        // Step 3: promote losses to ghosts.
        for id in self.last_active_ids.difference(&current_active_ids) {
            if let Some(bbox) = self.active.get(id) {
                if !self.ghosts.contains_key(id) {
                    self.ghosts
                        .insert(*id, GhostRecord::new(*id, *bbox, frame - 1));
                    self.stats.ghosts_created += 1;
                    debug!(track_id = id.0, frame, "promoted lost track to ghost");
                }
            }
        }

        // Step 4: expire ghosts.
        let buffer = self.config.ghost_buffer_frames;
        self.ghosts.retain(|id, ghost| {
            let expired = ghost.age(frame) > buffer;
            if expired {
                debug!(track_id = id.0, frame, "ghost expired");
            }
            !expired
        });

        // Step 5: reclaim or repair ids.
        // Snapshot ghost ids before this frame's reclaim pass mutates the
        // map: a suspicious detection whose own ghost search comes up
        // empty still aliases a ghost record even if a *different*
        // detection wins that exact ghost later in this same pass.
        let ghosts_before_reclaim: HashSet<TrackId> = self.ghosts.keys().copied().collect();
        let mut decisions = Vec::with_capacity(provisional.len());
        let mut final_ids: Vec<(Bbox, TrackId)> = Vec::with_capacity(provisional.len());
        let mut pending_ghost_search: Vec<usize> = Vec::new();

        for (idx, (bbox, provisional_id)) in provisional.iter().enumerate() {
            if provisional_id.is_unassigned() {
                final_ids.push((*bbox, TrackId::UNASSIGNED));
                continue;
            }

            let suspicious = self.ghosts.get(provisional_id).is_some_and(|ghost| {
                ghost.iou(bbox) < self.config.ghost_iou_threshold
                    && ghost.distance(bbox) > self.config.ghost_distance_threshold
            });

            if suspicious {
                let ghost = &self.ghosts[provisional_id];
                decisions.push(TrackerDecision {
                    frame,
                    provisional_id: *provisional_id,
                    final_id: *provisional_id,
                    tag: DecisionTag::SuspiciousReassignmentDetected {
                        ghost_iou: ghost.iou(bbox),
                        ghost_distance: ghost.distance(bbox),
                    },
                });
                self.stats.suspicious_reassignments += 1;
                info!(
                    track_id = provisional_id.0,
                    frame, "suspicious reassignment detected"
                );
                final_ids.push((*bbox, TrackId::UNASSIGNED));
                pending_ghost_search.push(idx);
            } else if self.last_active_ids.contains(provisional_id) {
                decisions.push(TrackerDecision {
                    frame,
                    provisional_id: *provisional_id,
                    final_id: *provisional_id,
                    tag: DecisionTag::IdContinued,
                });
                final_ids.push((*bbox, *provisional_id));
            } else {
                final_ids.push((*bbox, TrackId::UNASSIGNED));
                pending_ghost_search.push(idx);
            }
        }

        // Score every pending detection against every live, not-yet-used
        // ghost, then greedily assign highest score first so that a
        // losing detection is retried against the remaining ghosts
        // within this same pass, and ties go to the smaller TrackId.
        let mut candidates_by_idx: HashMap<usize, Vec<GhostComparison>> = HashMap::new();
        for &idx in &pending_ghost_search {
            let (bbox, _) = &provisional[idx];
            let mut scored: Vec<GhostComparison> = self
                .ghosts
                .values()
                .filter(|ghost| {
                    ghost.iou(bbox) >= self.config.ghost_iou_threshold
                        && ghost.distance(bbox) <= self.config.ghost_distance_threshold
                })
                .map(|ghost| {
                    let g_iou = ghost.iou(bbox);
                    let g_dist = ghost.distance(bbox);
                    let score = self.config.score_iou_weight * g_iou
                        + self.config.score_distance_weight
                            * (1.0 - g_dist / self.config.ghost_distance_threshold);
                    GhostComparison {
                        ghost_id: ghost.id,
                        iou: g_iou,
                        distance: g_dist,
                        score,
                    }
                })
                .collect();
            scored.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap()
                    .then(a.ghost_id.cmp(&b.ghost_id))
            });
            decisions.push(TrackerDecision {
                frame,
                provisional_id: provisional[idx].1,
                final_id: TrackId::UNASSIGNED,
                tag: DecisionTag::GhostMatchingAttempt {
                    candidates: scored.clone(),
                },
            });
            candidates_by_idx.insert(idx, scored);
        }

        let mut used_ghosts: HashSet<TrackId> = HashSet::new();
        let mut remaining: HashSet<usize> = pending_ghost_search.iter().copied().collect();
        loop {
            let mut best: Option<(usize, GhostComparison)> = None;
            for &idx in &remaining {
                if let Some(candidates) = candidates_by_idx.get(&idx) {
                    if let Some(top) = candidates.iter().find(|c| !used_ghosts.contains(&c.ghost_id)) {
                        let better = best.as_ref().map_or(true, |(_, b)| {
                            top.score > b.score
                                || (top.score == b.score && top.ghost_id < b.ghost_id)
                        });
                        if better {
                            best = Some((idx, *top));
                        }
                    }
                }
            }
            match best {
                Some((idx, comparison)) => {
                    remaining.remove(&idx);
                    used_ghosts.insert(comparison.ghost_id);
                    self.ghosts.remove(&comparison.ghost_id);
                    let (bbox, provisional_id) = provisional[idx];
                    final_ids[idx] = (bbox, comparison.ghost_id);
                    self.active.insert(comparison.ghost_id, bbox);
                    decisions.push(TrackerDecision {
                        frame,
                        provisional_id,
                        final_id: comparison.ghost_id,
                        tag: DecisionTag::IdRestoredFromGhost {
                            score: comparison.score,
                        },
                    });
                    self.stats.restorations += 1;
                    info!(
                        track_id = comparison.ghost_id.0,
                        frame, "id restored from ghost"
                    );
                }
                None => break,
            }
        }

        for idx in remaining {
            let (bbox, provisional_id) = provisional[idx];
            let final_id = if ghosts_before_reclaim.contains(&provisional_id) {
                // This was a suspicious reassignment with no acceptable
                // ghost match: `provisional_id` still aliases a ghost
                // record (possibly just reclaimed by another detection
                // this very pass), so reusing it verbatim would put the
                // same id in `active` and `ghosts` at once. Drop the
                // stale ghost, if it's still there, and mint a fresh id.
                self.ghosts.remove(&provisional_id);
                self.mint_reassignment_id()
            } else {
                provisional_id
            };
            final_ids[idx] = (bbox, final_id);
            self.active.insert(final_id, bbox);
            decisions.push(TrackerDecision {
                frame,
                provisional_id,
                final_id,
                tag: DecisionTag::NewIdAssigned,
            });
            self.stats.new_ids_assigned += 1;
        }

        // Step 6: garbage-collect `active`, advance `last_active_ids`.
        let final_active_ids: HashSet<TrackId> = final_ids
            .iter()
            .filter(|(_, id)| !id.is_unassigned())
            .map(|(_, id)| *id)
            .collect();
        // `GhostRecord` already carries its own last-known bbox, so a
        // promoted id has no reason to also linger in `active` — doing
        // so would violate the active/ghost disjointness invariant.
        self.active.retain(|id, _| final_active_ids.contains(id));
        self.last_active_ids = final_active_ids;

        (final_ids, decisions)
    }
}
