//! Bulge-encoded arc math.
//!
//! Bulge convention: `bulge = tan(included_angle / 4)`.
//! - `bulge = 0`: straight segment
//! - `bulge > 0`: counter-clockwise arc
//! - `bulge < 0`: clockwise arc

use super::EPSILON;
use crate::geometry::Point;

/// Converts a bulge-encoded polyline segment to center/radius/angle form.
///
/// `v1` and `v2` are the segment's start and end vertices; `bulge` is the
/// value stored on `v1`. Returns `(center, radius, start_angle_deg,
/// end_angle_deg)`, with angles already swapped so that sweeping from
/// `start_angle_deg` to `end_angle_deg` in the counter-clockwise direction
/// traces the intended arc.
///
/// Returns `None` for a degenerate chord (`|v2 - v1| < 1e-9`), matching the
/// invalid-geometry skip policy: the caller drops the segment rather than
/// emitting a nonsensical arc.
#[must_use]
pub fn bulge_to_arc(v1: Point, v2: Point, bulge: f64) -> Option<(Point, f64, f64, f64)> {
    let dx = v2.x - v1.x;
    let dy = v2.y - v1.y;
    let chord_length = (dx * dx + dy * dy).sqrt();
    if chord_length < EPSILON {
        return None;
    }

    let included_angle = 4.0 * bulge.abs().atan();
    let half_angle = included_angle / 2.0;
    let radius = chord_length / (2.0 * half_angle.sin());
    let sagitta = radius * (1.0 - half_angle.cos());

    let mid_x = (v1.x + v2.x) / 2.0;
    let mid_y = (v1.y + v2.y) / 2.0;

    let chord_ux = dx / chord_length;
    let chord_uy = dy / chord_length;

    // Perpendicular to the chord, rotated 90 degrees clockwise.
    let perp_ux = chord_uy;
    let perp_uy = -chord_ux;

    // Positive bulge (CCW) bulges left, so its center sits to the right of
    // the chord direction; negative bulge mirrors that.
    let mut dist_to_center = radius - sagitta;
    if bulge < 0.0 {
        dist_to_center = -dist_to_center;
    }

    let center = Point::new(
        mid_x + perp_ux * dist_to_center,
        mid_y + perp_uy * dist_to_center,
    );

    let mut start_angle = (v1.y - center.y).atan2(v1.x - center.x).to_degrees();
    let mut end_angle = (v2.y - center.y).atan2(v2.x - center.x).to_degrees();
    if start_angle < 0.0 {
        start_angle += 360.0;
    }
    if end_angle < 0.0 {
        end_angle += 360.0;
    }

    if bulge > 0.0 {
        std::mem::swap(&mut start_angle, &mut end_angle);
    }

    Some((center, radius.abs(), start_angle, end_angle))
}
