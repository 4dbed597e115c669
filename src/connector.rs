//! Endpoint-proximity connection pass: merges near-touching collinear
//! lines, extends the rest to meet.

use std::collections::HashSet;

use crate::geometry::{Entity, Line, Point};
use crate::math::COLLINEARITY_EPSILON;

/// Settings controlling which endpoint pairs are eligible to connect.
#[derive(Debug, Clone, Copy)]
pub struct SegmentConnector {
    pub tolerance: f64,
    pub same_layer_only: bool,
    pub same_color_only: bool,
}

impl Default for SegmentConnector {
    fn default() -> Self {
        Self {
            tolerance: crate::math::DEFAULT_CONNECTION_TOLERANCE,
            same_layer_only: true,
            same_color_only: true,
        }
    }
}

/// The result of a connection pass.
#[derive(Debug, Clone)]
pub struct ConnectionResult {
    pub connected_entities: Vec<Entity>,
    pub connection_count: usize,
    /// Candidates where either side was an `Arc`: arc endpoints are never
    /// merged or extended (an intentional current limitation), so these
    /// are surfaced here rather than silently dropped.
    pub unhandled_count: usize,
}

struct Candidate {
    i: usize,
    j: usize,
    point_a: Point,
    point_b: Point,
}

fn endpoints(entity: &Entity) -> Option<Vec<Point>> {
    match entity {
        Entity::Line(l) => Some(vec![l.start, l.end]),
        Entity::Arc(a) => Some(vec![a.start_point(), a.end_point()]),
        Entity::Polyline(_) | Entity::Text(_) => None,
    }
}

impl SegmentConnector {
    fn can_connect(&self, a: &Entity, b: &Entity) -> bool {
        let attrs_a = a.attrs();
        let attrs_b = b.attrs();
        if self.same_layer_only
            && !attrs_a.layer.is_empty()
            && !attrs_b.layer.is_empty()
            && attrs_a.layer.to_uppercase() != attrs_b.layer.to_uppercase()
        {
            return false;
        }
        if self.same_color_only && attrs_a.color != attrs_b.color {
            return false;
        }
        true
    }

    /// Finds all candidate endpoint pairs within tolerance, in enumeration
    /// order (outer index ascending, then inner index ascending, then
    /// endpoint-combination order).
    fn find_connectable_pairs(&self, entities: &[Entity]) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for i in 0..entities.len() {
            let Some(endpoints_a) = endpoints(&entities[i]) else {
                continue;
            };
            for j in (i + 1)..entities.len() {
                if !self.can_connect(&entities[i], &entities[j]) {
                    continue;
                }
                let Some(endpoints_b) = endpoints(&entities[j]) else {
                    continue;
                };
                for &point_a in &endpoints_a {
                    for &point_b in &endpoints_b {
                        let distance = point_a.distance_to(point_b);
                        if distance > 0.0 && distance <= self.tolerance {
                            candidates.push(Candidate {
                                i,
                                j,
                                point_a,
                                point_b,
                            });
                        }
                    }
                }
            }
        }

        candidates
    }

    /// Runs the full connection pass over `entities`.
    #[must_use]
    pub fn connect_segments(&self, entities: &[Entity]) -> ConnectionResult {
        let candidates = self.find_connectable_pairs(entities);
        if candidates.is_empty() {
            return ConnectionResult {
                connected_entities: entities.to_vec(),
                connection_count: 0,
                unhandled_count: 0,
            };
        }

        let mut modified: HashSet<usize> = HashSet::new();
        let mut result = Vec::new();
        let mut connection_count = 0;
        let mut unhandled_count = 0;

        for candidate in &candidates {
            if modified.contains(&candidate.i) || modified.contains(&candidate.j) {
                continue;
            }

            match (&entities[candidate.i], &entities[candidate.j]) {
                (Entity::Line(line_a), Entity::Line(line_b)) => {
                    if are_collinear(line_a, line_b, COLLINEARITY_EPSILON) {
                        result.push(Entity::Line(merge_lines(line_a, line_b)));
                    } else {
                        let midpoint = candidate.point_a.midpoint_to(candidate.point_b);
                        result.push(Entity::Line(extend_line_endpoint(
                            line_a,
                            candidate.point_a,
                            midpoint,
                        )));
                        result.push(Entity::Line(extend_line_endpoint(
                            line_b,
                            candidate.point_b,
                            midpoint,
                        )));
                    }
                    modified.insert(candidate.i);
                    modified.insert(candidate.j);
                    connection_count += 1;
                }
                _ => {
                    unhandled_count += 1;
                }
            }
        }

        for (idx, entity) in entities.iter().enumerate() {
            if !modified.contains(&idx) {
                result.push(entity.clone());
            }
        }

        ConnectionResult {
            connected_entities: result,
            connection_count,
            unhandled_count,
        }
    }
}

/// Two lines are collinear if both of `line_b`'s endpoints lie within
/// `epsilon` of the infinite line through `line_a` (perpendicular distance
/// via the 2D cross product, normalized by `line_a`'s length).
fn are_collinear(line_a: &Line, line_b: &Line, epsilon: f64) -> bool {
    let dx = line_a.end.x - line_a.start.x;
    let dy = line_a.end.y - line_a.start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length < epsilon {
        return false;
    }

    let perpendicular_distance = |p: Point| {
        let px = p.x - line_a.start.x;
        let py = p.y - line_a.start.y;
        (dx * py - dy * px).abs() / length
    };

    perpendicular_distance(line_b.start) < epsilon && perpendicular_distance(line_b.end) < epsilon
}

/// Merges two collinear lines into the one spanning the farthest-apart
/// pair of their four endpoints. Inherits all attributes from `line_a`.
fn merge_lines(line_a: &Line, line_b: &Line) -> Line {
    let points = [line_a.start, line_a.end, line_b.start, line_b.end];
    let mut best = (points[0], points[1], 0.0);
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].distance_to(points[j]);
            if d > best.2 {
                best = (points[i], points[j], d);
            }
        }
    }
    Line::with_attrs(best.0, best.1, &line_a.attrs)
}

/// Moves whichever endpoint of `line` is within 0.001mm of `old_point` to
/// `new_point`, leaving the other endpoint untouched.
fn extend_line_endpoint(line: &Line, old_point: Point, new_point: Point) -> Line {
    if line.start.distance_to(old_point) < 0.001 {
        Line::with_attrs(new_point, line.end, &line.attrs)
    } else {
        Line::with_attrs(line.start, new_point, &line.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Attributes, LineCategory};
    use approx::assert_relative_eq;

    fn line_attrs(layer: &str, color: i32) -> Attributes {
        Attributes {
            layer: layer.to_string(),
            color,
            ..Attributes::default()
        }
    }

    #[test]
    fn collinear_lines_merge_into_one() {
        let a = Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let b = Entity::Line(Line::new(
            Point::new(10.05, 0.0),
            Point::new(20.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let connector = SegmentConnector::default();
        let result = connector.connect_segments(&[a, b]);
        assert_eq!(result.connection_count, 1);
        assert_eq!(result.connected_entities.len(), 1);
        match &result.connected_entities[0] {
            Entity::Line(l) => assert_relative_eq!(l.length(), 20.0, epsilon = 1e-6),
            _ => panic!("expected a merged line"),
        }
    }

    #[test]
    fn non_collinear_near_lines_extend_to_meet() {
        let a = Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let b = Entity::Line(Line::new(
            Point::new(10.05, 0.0),
            Point::new(10.05, 10.0),
            line_attrs("CUT", 1),
        ));
        let connector = SegmentConnector::default();
        let result = connector.connect_segments(&[a, b]);
        assert_eq!(result.connection_count, 1);
        assert_eq!(result.connected_entities.len(), 2);
    }

    #[test]
    fn arc_endpoints_are_counted_as_unhandled() {
        let line = Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let arc = Entity::Arc(Arc::new(
            Point::new(10.05, 5.0),
            5.0,
            180.0,
            270.0,
            line_attrs("CUT", 1),
        ));
        let connector = SegmentConnector::default();
        let result = connector.connect_segments(&[line, arc]);
        assert_eq!(result.connection_count, 0);
        assert_eq!(result.unhandled_count, 1);
        assert_eq!(result.connected_entities.len(), 2);
    }

    #[test]
    fn different_layer_blocks_connection_when_same_layer_only() {
        let a = Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let b = Entity::Line(Line::new(
            Point::new(10.05, 0.0),
            Point::new(20.0, 0.0),
            line_attrs("CREASE", 1),
        ));
        let connector = SegmentConnector::default();
        let result = connector.connect_segments(&[a, b]);
        assert_eq!(result.connection_count, 0);
        assert_eq!(result.connected_entities.len(), 2);
    }

    #[test]
    fn merged_line_inherits_first_lines_attributes() {
        let mut attrs_a = line_attrs("CUT", 1);
        attrs_a.category = LineCategory::Cut;
        let a = Entity::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), attrs_a));
        let b = Entity::Line(Line::new(
            Point::new(10.05, 0.0),
            Point::new(20.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let connector = SegmentConnector::default();
        let result = connector.connect_segments(&[a, b]);
        match &result.connected_entities[0] {
            Entity::Line(l) => assert_eq!(l.attrs.category, LineCategory::Cut),
            _ => panic!("expected a line"),
        }
    }

    #[test]
    fn no_candidates_returns_input_unchanged() {
        let a = Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let b = Entity::Line(Line::new(
            Point::new(1000.0, 0.0),
            Point::new(1010.0, 0.0),
            line_attrs("CUT", 1),
        ));
        let connector = SegmentConnector::default();
        let result = connector.connect_segments(&[a.clone(), b.clone()]);
        assert_eq!(result.connection_count, 0);
        assert_eq!(result.connected_entities, vec![a, b]);
    }
}
