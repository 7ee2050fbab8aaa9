//! Segment-versus-circle intersection for slice testing
//!
//! A gesture segment slices a target when the closest point on the segment
//! lies within the target's hit circle.

use glam::Vec2;

/// Closest point on segment `a..b` to `point`
pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        return a; // Degenerate segment
    }

    let t = ((point - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    a + line_vec * t
}

/// Whether segment `a..b` touches the circle at `center` with `radius`
#[inline]
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = closest_point_on_segment(a, b, center);
    closest.distance_squared(center) <= radius * radius
}
