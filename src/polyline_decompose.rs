//! Converts bulged polyline vertices into line and arc segments.

use tracing::warn;

use crate::geometry::{Arc, Attributes, EntityId, Entity, Line, Polyline};
use crate::math::arc_2d::bulge_to_arc;

/// Decomposes a polyline into its constituent line/arc segments.
///
/// A degenerate chord on a bulged segment (shorter than the bulge-zero
/// epsilon) is an invalid-geometry case: the segment is skipped and a
/// warning is logged, but decomposition of the remaining segments
/// continues.
#[must_use]
pub fn decompose(polyline: &Polyline) -> Vec<Entity> {
    let mut segments = Vec::with_capacity(polyline.segment_count());

    for (v1, v2) in polyline.vertex_pairs() {
        if !v1.has_bulge() {
            segments.push(Entity::Line(Line::new(
                v1.point(),
                v2.point(),
                Attributes {
                    id: EntityId::fresh(),
                    ..polyline.attrs.clone()
                },
            )));
            continue;
        }

        match bulge_to_arc(v1.point(), v2.point(), v1.bulge) {
            Some((center, radius, start_angle, end_angle)) => {
                segments.push(Entity::Arc(Arc::new(
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    Attributes {
                        id: EntityId::fresh(),
                        ..polyline.attrs.clone()
                    },
                )));
            }
            None => {
                warn!(
                    target: "diecut::polyline",
                    "skipping bulged segment with degenerate chord"
                );
            }
        }
    }

    segments
}

/// Replaces every [`Entity::Polyline`] in `entities` with its decomposed
/// segments; other entities pass through unchanged.
#[must_use]
pub fn decompose_all(entities: &[Entity]) -> Vec<Entity> {
    let mut result = Vec::with_capacity(entities.len());
    for entity in entities {
        match entity {
            Entity::Polyline(p) => result.extend(decompose(p)),
            other => result.push(other.clone()),
        }
    }
    result
}

/// Counts the polyline entities in `entities`.
#[must_use]
pub fn count_polylines(entities: &[Entity]) -> usize {
    entities
        .iter()
        .filter(|e| matches!(e, Entity::Polyline(_)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PolylineVertex;
    use approx::assert_relative_eq;

    #[test]
    fn straight_segments_round_trip_vertex_sequence() {
        let polyline = Polyline::new(
            vec![
                PolylineVertex::new(0.0, 0.0, 0.0),
                PolylineVertex::new(10.0, 0.0, 0.0),
                PolylineVertex::new(10.0, 10.0, 0.0),
            ],
            false,
            Attributes::default(),
        );
        let segments = decompose(&polyline);
        assert_eq!(segments.len(), 2);
        for seg in &segments {
            assert!(matches!(seg, Entity::Line(_)));
        }
    }

    #[test]
    fn quarter_arc_bulge_decomposes_to_single_arc() {
        // Scenario 4: (0,0, bulge=tan(22.5deg)) -> (10,0).
        let bulge = 22.5_f64.to_radians().tan();
        let polyline = Polyline::new(
            vec![
                PolylineVertex::new(0.0, 0.0, bulge),
                PolylineVertex::new(10.0, 0.0, 0.0),
            ],
            false,
            Attributes::default(),
        );
        let segments = decompose(&polyline);
        assert_eq!(segments.len(), 1);
        match &segments[0] {
            Entity::Arc(arc) => {
                assert_relative_eq!(arc.radius, 7.0711, epsilon = 1e-3);
                let sweep = (arc.end_angle - arc.start_angle).rem_euclid(360.0);
                assert_relative_eq!(sweep, 90.0, epsilon = 1e-6);
            }
            _ => panic!("expected an arc segment"),
        }
    }

    #[test]
    fn degenerate_bulge_segment_is_skipped() {
        let polyline = Polyline::new(
            vec![
                PolylineVertex::new(5.0, 5.0, 0.5),
                PolylineVertex::new(5.0, 5.0, 0.0),
                PolylineVertex::new(6.0, 5.0, 0.0),
            ],
            false,
            Attributes::default(),
        );
        let segments = decompose(&polyline);
        assert_eq!(segments.len(), 1);
        assert!(matches!(segments[0], Entity::Line(_)));
    }

    #[test]
    fn segments_inherit_polyline_attributes() {
        let attrs = Attributes {
            layer: "CUT".to_string(),
            ..Attributes::default()
        };
        let polyline = Polyline::new(
            vec![
                PolylineVertex::new(0.0, 0.0, 0.0),
                PolylineVertex::new(10.0, 0.0, 0.0),
            ],
            false,
            attrs.clone(),
        );
        for seg in decompose(&polyline) {
            assert_eq!(seg.attrs().layer, attrs.layer);
        }
    }

    #[test]
    fn closed_polyline_includes_wraparound_segment() {
        let vertices = vec![
            PolylineVertex::new(0.0, 0.0, 0.0),
            PolylineVertex::new(10.0, 0.0, 0.0),
            PolylineVertex::new(10.0, 10.0, 0.0),
        ];
        let polyline = Polyline::new(vertices, true, Attributes::default());
        assert_eq!(decompose(&polyline).len(), 3);
    }
}
