//! `GhostRecord`: a lost track retained for possible reclaim.

use crate::geometry::{centroid_distance, iou};
use floortrack_models::{Bbox, TrackId};

/// A lost track's last known position, retained so a later detection can
/// be matched back to its original identity. Immutable except by
/// wholesale replacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostRecord {
    pub id: TrackId,
    pub bbox: Bbox,
    pub centroid: (f64, f64),
    pub last_seen_frame: u64,
}

impl GhostRecord {
    pub fn new(id: TrackId, bbox: Bbox, last_seen_frame: u64) -> Self {
        Self {
            id,
            centroid: bbox.center(),
            bbox,
            last_seen_frame,
        }
    }

    pub fn iou(&self, bbox: &Bbox) -> f64 {
        iou(&self.bbox, bbox)
    }

    pub fn distance(&self, bbox: &Bbox) -> f64 {
        centroid_distance(&self.bbox, bbox)
    }

    pub fn age(&self, frame_index: u64) -> u64 {
        frame_index.saturating_sub(self.last_seen_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_and_distance_against_self_position() {
        let bbox = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let ghost = GhostRecord::new(TrackId(1), bbox, 10);
        assert_eq!(ghost.iou(&bbox), 1.0);
        assert_eq!(ghost.distance(&bbox), 0.0);
    }

    #[test]
    fn age_grows_with_frame_index() {
        let ghost = GhostRecord::new(TrackId(1), Bbox::new(0.0, 0.0, 10.0, 10.0), 10);
        assert_eq!(ghost.age(10), 0);
        assert_eq!(ghost.age(15), 5);
    }
}
