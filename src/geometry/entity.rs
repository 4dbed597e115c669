use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::bbox::{BoundingBox, Point};

/// The functional role of a line: cut, crease, auxiliary reference, plywood
/// outline, or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCategory {
    Cut,
    Crease,
    Auxiliary,
    Plywood,
    Unknown,
}

/// An opaque per-invocation entity identity.
///
/// Assigned by a monotonic counter, never parsed or serialized. It exists
/// solely so the segment connector can recognize "this entity was already
/// modified in this pass" — the pipeline never looks an `EntityId` up in a
/// table, so a plain copyable integer is sufficient; no generational arena
/// is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Attributes shared by every entity variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    pub id: EntityId,
    pub layer: String,
    pub color: i32,
    pub linetype: String,
    pub category: LineCategory,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            id: EntityId::fresh(),
            layer: "0".to_string(),
            color: 7, // white
            linetype: "CONTINUOUS".to_string(),
            category: LineCategory::Unknown,
        }
    }
}

/// A straight line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub attrs: Attributes,
}

impl Line {
    #[must_use]
    pub fn new(start: Point, end: Point, attrs: Attributes) -> Self {
        Self { start, end, attrs }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.start.midpoint_to(self.end)
    }

    #[must_use]
    pub fn is_horizontal(&self, tolerance: f64) -> bool {
        (self.start.y - self.end.y).abs() <= tolerance
    }

    #[must_use]
    pub fn is_vertical(&self, tolerance: f64) -> bool {
        (self.start.x - self.end.x).abs() <= tolerance
    }

    #[must_use]
    pub fn point_at_ratio(&self, ratio: f64) -> Point {
        Point::new(
            self.start.x + (self.end.x - self.start.x) * ratio,
            self.start.y + (self.end.y - self.start.y) * ratio,
        )
    }

    /// Splits the line at the given ratios, clamped to `(0, 1)`, sorted and
    /// deduplicated with the implicit `0.0` and `1.0` endpoints. Every
    /// resulting segment inherits this line's layer, color, linetype, and
    /// category (a fresh identity each, since they are new entities).
    #[must_use]
    pub fn split_at_ratios(&self, ratios: &[f64]) -> Vec<Line> {
        let mut all: Vec<f64> = ratios.iter().map(|r| r.clamp(0.0, 1.0)).collect();
        all.push(0.0);
        all.push(1.0);
        all.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        all.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

        all.windows(2)
            .map(|w| {
                Line::new(
                    self.point_at_ratio(w[0]),
                    self.point_at_ratio(w[1]),
                    Attributes {
                        id: EntityId::fresh(),
                        ..self.attrs.clone()
                    },
                )
            })
            .collect()
    }

    #[must_use]
    pub fn with_attrs(start: Point, end: Point, source: &Attributes) -> Self {
        Line::new(
            start,
            end,
            Attributes {
                id: EntityId::fresh(),
                ..source.clone()
            },
        )
    }
}

impl Transformable for Line {
    fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn mirror_x(&self, axis: f64) -> Self {
        Line::with_attrs(self.start.mirror_x(axis), self.end.mirror_x(axis), &self.attrs)
    }

    fn translate(&self, dx: f64, dy: f64) -> Self {
        Line::with_attrs(self.start.translate(dx, dy), self.end.translate(dx, dy), &self.attrs)
    }
}

/// A circular arc. Angles are degrees from the +X axis, counter-clockwise;
/// if `end_angle < start_angle` the arc sweeps across 0 degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub attrs: Attributes,
}

impl Arc {
    #[must_use]
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64, attrs: Attributes) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            attrs,
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Point {
        Point::new(
            self.center.x + self.radius * self.start_angle.to_radians().cos(),
            self.center.y + self.radius * self.start_angle.to_radians().sin(),
        )
    }

    #[must_use]
    pub fn end_point(&self) -> Point {
        Point::new(
            self.center.x + self.radius * self.end_angle.to_radians().cos(),
            self.center.y + self.radius * self.end_angle.to_radians().sin(),
        )
    }

    /// True if `angle_deg` (any real value) lies within the arc's swept
    /// range, modulo 360 degrees, handling both the non-wrapping case
    /// (`start <= angle <= end`) and the wrap-across-0 case.
    fn angle_in_arc(&self, angle_deg: f64) -> bool {
        let norm = |a: f64| ((a % 360.0) + 360.0) % 360.0;
        let start = norm(self.start_angle);
        let end = norm(self.end_angle);
        let angle = norm(angle_deg);
        if start <= end {
            angle >= start && angle <= end
        } else {
            angle >= start || angle <= end
        }
    }
}

impl Transformable for Arc {
    fn bbox(&self) -> BoundingBox {
        let mut points = vec![self.start_point(), self.end_point()];
        for cardinal in [0.0, 90.0, 180.0, 270.0] {
            if self.angle_in_arc(cardinal) {
                points.push(Point::new(
                    self.center.x + self.radius * cardinal.to_radians().cos(),
                    self.center.y + self.radius * cardinal.to_radians().sin(),
                ));
            }
        }
        // Safe: `points` always has the two endpoints.
        BoundingBox::from_points(&points).unwrap_or_else(|_| {
            BoundingBox::new(self.center.x, self.center.y, self.center.x, self.center.y)
        })
    }

    fn mirror_x(&self, axis: f64) -> Self {
        Arc::new(
            self.center.mirror_x(axis),
            self.radius,
            180.0 - self.end_angle,
            180.0 - self.start_angle,
            Attributes {
                id: EntityId::fresh(),
                ..self.attrs.clone()
            },
        )
    }

    fn translate(&self, dx: f64, dy: f64) -> Self {
        Arc::new(
            self.center.translate(dx, dy),
            self.radius,
            self.start_angle,
            self.end_angle,
            Attributes {
                id: EntityId::fresh(),
                ..self.attrs.clone()
            },
        )
    }
}

/// A polyline vertex; `bulge` encodes the arc swept toward the *next*
/// vertex (`tan(included_angle / 4)`, zero for a straight segment).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PolylineVertex {
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn has_bulge(&self) -> bool {
        self.bulge.abs() > crate::math::EPSILON
    }
}

/// An ordered sequence of vertices, each optionally bulged into an arc
/// toward the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    pub closed: bool,
    pub attrs: Attributes,
}

impl Polyline {
    #[must_use]
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool, attrs: Attributes) -> Self {
        Self {
            vertices,
            closed,
            attrs,
        }
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        if self.vertices.len() < 2 {
            return 0;
        }
        let mut count = self.vertices.len() - 1;
        if self.closed {
            count += 1;
        }
        count
    }

    /// Pairs of consecutive vertices, including the wrap-around pair when
    /// the polyline is closed.
    pub(crate) fn vertex_pairs(&self) -> Vec<(PolylineVertex, PolylineVertex)> {
        let mut pairs = Vec::with_capacity(self.segment_count());
        for w in self.vertices.windows(2) {
            pairs.push((w[0], w[1]));
        }
        if self.closed && self.vertices.len() > 1 {
            pairs.push((self.vertices[self.vertices.len() - 1], self.vertices[0]));
        }
        pairs
    }
}

impl Transformable for Polyline {
    /// The envelope of the raw vertex hull — bulged segments that protrude
    /// past their chord are *not* accounted for. This is intentional; see
    /// the open question this resolves in the design notes.
    fn bbox(&self) -> BoundingBox {
        let points: Vec<Point> = self.vertices.iter().map(PolylineVertex::point).collect();
        BoundingBox::from_points(&points)
            .unwrap_or_else(|_| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    fn mirror_x(&self, axis: f64) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|v| PolylineVertex::new(2.0 * axis - v.x, v.y, -v.bulge))
            .collect();
        Polyline::new(
            vertices,
            self.closed,
            Attributes {
                id: EntityId::fresh(),
                ..self.attrs.clone()
            },
        )
    }

    fn translate(&self, dx: f64, dy: f64) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|v| PolylineVertex::new(v.x + dx, v.y + dy, v.bulge))
            .collect();
        Polyline::new(
            vertices,
            self.closed,
            Attributes {
                id: EntityId::fresh(),
                ..self.attrs.clone()
            },
        )
    }
}

/// A text annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub position: Point,
    pub height: f64,
    pub rotation: f64,
    pub attrs: Attributes,
}

impl Text {
    #[must_use]
    pub fn new(content: impl Into<String>, position: Point, height: f64, rotation: f64, attrs: Attributes) -> Self {
        Self {
            content: content.into(),
            position,
            height,
            rotation,
            attrs,
        }
    }
}

impl Transformable for Text {
    fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.position.x,
            self.position.y,
            self.position.x,
            self.position.y,
        )
    }

    fn mirror_x(&self, axis: f64) -> Self {
        Text::new(
            self.content.clone(),
            self.position.mirror_x(axis),
            self.height,
            self.rotation,
            Attributes {
                id: EntityId::fresh(),
                ..self.attrs.clone()
            },
        )
    }

    fn translate(&self, dx: f64, dy: f64) -> Self {
        Text::new(
            self.content.clone(),
            self.position.translate(dx, dy),
            self.height,
            self.rotation,
            Attributes {
                id: EntityId::fresh(),
                ..self.attrs.clone()
            },
        )
    }
}

/// The shared contract for the three geometric queries every entity
/// supports, delegated to by the `Entity` tagged variant.
pub trait Transformable {
    fn bbox(&self) -> BoundingBox;
    #[must_use]
    fn mirror_x(&self, axis: f64) -> Self
    where
        Self: Sized;
    #[must_use]
    fn translate(&self, dx: f64, dy: f64) -> Self
    where
        Self: Sized;
}

/// The tagged entity variant carried through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Line(Line),
    Arc(Arc),
    Polyline(Polyline),
    Text(Text),
}

impl Entity {
    #[must_use]
    pub fn attrs(&self) -> &Attributes {
        match self {
            Entity::Line(l) => &l.attrs,
            Entity::Arc(a) => &a.attrs,
            Entity::Polyline(p) => &p.attrs,
            Entity::Text(t) => &t.attrs,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.attrs().id
    }

    #[must_use]
    pub fn category(&self) -> LineCategory {
        self.attrs().category
    }

    #[must_use]
    pub fn with_category(&self, category: LineCategory) -> Entity {
        let mut entity = self.clone();
        match &mut entity {
            Entity::Line(l) => l.attrs.category = category,
            Entity::Arc(a) => a.attrs.category = category,
            Entity::Polyline(p) => p.attrs.category = category,
            Entity::Text(t) => t.attrs.category = category,
        }
        entity
    }
}

impl Transformable for Entity {
    fn bbox(&self) -> BoundingBox {
        match self {
            Entity::Line(l) => l.bbox(),
            Entity::Arc(a) => a.bbox(),
            Entity::Polyline(p) => p.bbox(),
            Entity::Text(t) => t.bbox(),
        }
    }

    fn mirror_x(&self, axis: f64) -> Self {
        match self {
            Entity::Line(l) => Entity::Line(l.mirror_x(axis)),
            Entity::Arc(a) => Entity::Arc(a.mirror_x(axis)),
            Entity::Polyline(p) => Entity::Polyline(p.mirror_x(axis)),
            Entity::Text(t) => Entity::Text(t.mirror_x(axis)),
        }
    }

    fn translate(&self, dx: f64, dy: f64) -> Self {
        match self {
            Entity::Line(l) => Entity::Line(l.translate(dx, dy)),
            Entity::Arc(a) => Entity::Arc(a.translate(dx, dy)),
            Entity::Polyline(p) => Entity::Polyline(p.translate(dx, dy)),
            Entity::Text(t) => Entity::Text(t.translate(dx, dy)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs_with_layer(layer: &str) -> Attributes {
        Attributes {
            layer: layer.to_string(),
            ..Attributes::default()
        }
    }

    #[test]
    fn line_split_at_ratios_covers_unit_interval() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Attributes::default());
        let segments = line.split_at_ratios(&[0.2, 0.5, 0.8]);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].start, Point::new(0.0, 0.0));
        assert_eq!(segments.last().unwrap().end, Point::new(10.0, 0.0));
    }

    #[test]
    fn line_split_clamps_out_of_range_ratios() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Attributes::default());
        let segments = line.split_at_ratios(&[-0.5, 1.5]);
        // Clamped to 0.0 and 1.0, deduped against the implicit endpoints: one segment.
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn line_split_preserves_attributes() {
        let attrs = attrs_with_layer("CUT");
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), attrs.clone());
        for seg in line.split_at_ratios(&[0.5]) {
            assert_eq!(seg.attrs.layer, attrs.layer);
            assert_eq!(seg.attrs.color, attrs.color);
            assert_eq!(seg.attrs.category, attrs.category);
        }
    }

    #[test]
    fn arc_mirror_x_formula() {
        let arc = Arc::new(Point::new(0.0, 0.0), 5.0, 30.0, 120.0, Attributes::default());
        let mirrored = arc.mirror_x(0.0);
        assert!((mirrored.start_angle - (180.0 - 120.0)).abs() < 1e-9);
        assert!((mirrored.end_angle - (180.0 - 30.0)).abs() < 1e-9);
    }

    #[test]
    fn arc_bbox_includes_cardinal_extrema() {
        // Quarter arc from 0 to 90 degrees must include the point at angle 90.
        let arc = Arc::new(Point::new(0.0, 0.0), 1.0, 0.0, 90.0, Attributes::default());
        let bbox = arc.bbox();
        assert!((bbox.max_x - 1.0).abs() < 1e-9);
        assert!((bbox.max_y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn entity_mirror_twice_is_identity() {
        let entity = Entity::Line(Line::new(
            Point::new(3.0, 4.0),
            Point::new(7.0, -2.0),
            Attributes::default(),
        ));
        let twice = entity.mirror_x(10.0).mirror_x(10.0);
        match (&entity, &twice) {
            (Entity::Line(a), Entity::Line(b)) => {
                assert!((a.start.x - b.start.x).abs() < 1e-9);
                assert!((a.end.x - b.end.x).abs() < 1e-9);
            }
            _ => panic!("variant changed under mirror"),
        }
    }

    #[test]
    fn polyline_bbox_is_vertex_hull_not_arc_envelope() {
        // A bulged segment whose arc would protrude past the chord; bbox
        // must still reflect only the vertex hull (open question decision).
        let polyline = Polyline::new(
            vec![
                PolylineVertex::new(0.0, 0.0, 1.0),
                PolylineVertex::new(10.0, 0.0, 0.0),
            ],
            false,
            Attributes::default(),
        );
        let bbox = polyline.bbox();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn polyline_segment_count_closed_vs_open() {
        let vertices = vec![
            PolylineVertex::new(0.0, 0.0, 0.0),
            PolylineVertex::new(1.0, 0.0, 0.0),
            PolylineVertex::new(1.0, 1.0, 0.0),
        ];
        let open = Polyline::new(vertices.clone(), false, Attributes::default());
        let closed = Polyline::new(vertices, true, Attributes::default());
        assert_eq!(open.segment_count(), 2);
        assert_eq!(closed.segment_count(), 3);
    }
}
