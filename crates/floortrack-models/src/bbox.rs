use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in pixel coordinates of the source frame.
///
/// Valid bboxes satisfy `x1 < x2` and `y1 < y2`; callers at the system
/// boundary are responsible for rejecting malformed ones (see
/// `floortrack_core::error::FloortrackError::InputError`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bbox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_valid(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Center of the bbox, `((x1+x2)/2, (y1+y2)/2)`. This is the fixed
    /// triggering anchor used by the zone engine (no alternative anchors
    /// are in scope).
    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        let w = self.width();
        if w > 0.0 {
            self.height() / w
        } else {
            1.0
        }
    }
}
