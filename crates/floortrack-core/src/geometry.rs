//! Geometry primitives: IoU, centroid distance, point-in-polygon, and
//! angle-at-vertex. All operate in image-pixel space; there is no camera
//! model.

use floortrack_models::Bbox;

/// Intersection-over-union of two axis-aligned bboxes. Returns 0 when the
/// union area is 0 or the rectangles are disjoint.
pub fn iou(a: &Bbox, b: &Bbox) -> f64 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let iw = (ix2 - ix1).max(0.0);
    let ih = (iy2 - iy1).max(0.0);
    let intersection = iw * ih;

    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Euclidean distance between the centroids of two bboxes.
pub fn centroid_distance(a: &Bbox, b: &Bbox) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

/// Ray-casting point-in-polygon test over an integer-vertex polygon.
/// Points on the boundary count as inside.
pub fn point_in_polygon(point: (f64, f64), polygon: &[(i64, i64)]) -> bool {
    let (px, py) = point;
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let (vx, vy) = (polygon[i].0 as f64, polygon[i].1 as f64);
        if on_segment((vx, vy), edge_end(polygon, i), (px, py)) {
            return true;
        }
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].0 as f64, polygon[i].1 as f64);
        let (xj, yj) = (polygon[j].0 as f64, polygon[j].1 as f64);

        let intersects = (yi > py) != (yj > py)
            && px < (xj - xi) * (py - yi) / (yj - yi) + xi;
        if intersects {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn edge_end(polygon: &[(i64, i64)], i: usize) -> (f64, f64) {
    let next = polygon[(i + 1) % polygon.len()];
    (next.0 as f64, next.1 as f64)
}

/// True when `p` lies on the closed segment `a`-`b`, within floating
/// point tolerance. Used to make polygon boundaries count as inside.
fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    let cross = (p.0 - a.0) * (b.1 - a.1) - (p.1 - a.1) * (b.0 - a.0);
    if cross.abs() > 1e-6 {
        return false;
    }
    let dot = (p.0 - a.0) * (b.0 - a.0) + (p.1 - a.1) * (b.1 - a.1);
    if dot < 0.0 {
        return false;
    }
    let len_sq = (b.0 - a.0).powi(2) + (b.1 - a.1).powi(2);
    dot <= len_sq
}

/// Angle in degrees at vertex `p2` between rays `p2->p1` and `p2->p3`,
/// from the dot product of the two vectors. Returns 180 degrees (a
/// neutral, non-triggering value) if any point is flagged invalid.
pub fn angle_at_vertex(
    p1: (f64, f64),
    p1_valid: bool,
    p2: (f64, f64),
    p2_valid: bool,
    p3: (f64, f64),
    p3_valid: bool,
) -> f64 {
    if !p1_valid || !p2_valid || !p3_valid {
        return 180.0;
    }

    let v1 = (p1.0 - p2.0, p1.1 - p2.1);
    let v2 = (p3.0 - p2.0, p3.1 - p2.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if mag1 == 0.0 || mag2 == 0.0 {
        return 180.0;
    }

    let cos_theta = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}
