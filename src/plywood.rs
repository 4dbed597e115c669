//! Plywood support frame generation: the rectangle of cut lines
//! surrounding the drawing that the die board is mounted on.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::ValidationError;
use crate::geometry::{Attributes, BoundingBox, Line, LineCategory, Point};

/// Margins (mm) added to each side of a drawing's bounding box to get the
/// plywood frame's outer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(try_from = "RawPlywoodSettings")]
pub struct PlywoodSettings {
    top_margin: f64,
    bottom_margin: f64,
    left_margin: f64,
    right_margin: f64,
}

#[derive(Debug, Deserialize)]
struct RawPlywoodSettings {
    top_margin: f64,
    bottom_margin: f64,
    left_margin: f64,
    right_margin: f64,
}

impl TryFrom<RawPlywoodSettings> for PlywoodSettings {
    type Error = ValidationError;

    fn try_from(raw: RawPlywoodSettings) -> Result<Self, Self::Error> {
        PlywoodSettings::new(
            raw.top_margin,
            raw.bottom_margin,
            raw.left_margin,
            raw.right_margin,
        )
    }
}

/// Which plate the drawing will be mounted on — the bottom margin differs
/// because copper plates need extra clearance the die-cutting press
/// tooling does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateType {
    Copper,
    Auto,
}

impl PlywoodSettings {
    /// # Errors
    ///
    /// Returns [`ValidationError::PlywoodSettings`] if any margin is
    /// negative.
    pub fn new(
        top_margin: f64,
        bottom_margin: f64,
        left_margin: f64,
        right_margin: f64,
    ) -> Result<Self, ValidationError> {
        if [top_margin, bottom_margin, left_margin, right_margin]
            .iter()
            .any(|m| *m < 0.0)
        {
            return Err(ValidationError::PlywoodSettings(
                "plywood margins must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            top_margin,
            bottom_margin,
            left_margin,
            right_margin,
        })
    }

    /// The default profile for a given plate type: top/left/right margins
    /// are fixed, the bottom margin depends on the plate.
    #[must_use]
    pub fn for_plate_type(plate_type: PlateType) -> Self {
        Self {
            top_margin: 55.0,
            bottom_margin: match plate_type {
                PlateType::Copper => 25.0,
                PlateType::Auto => 15.0,
            },
            left_margin: 25.0,
            right_margin: 25.0,
        }
    }
}

/// Expands `bbox` outward by the settings' per-side margins.
#[must_use]
pub fn apply_margins(bbox: BoundingBox, settings: &PlywoodSettings) -> BoundingBox {
    BoundingBox::new(
        bbox.min_x - settings.left_margin,
        bbox.min_y - settings.bottom_margin,
        bbox.max_x + settings.right_margin,
        bbox.max_y + settings.top_margin,
    )
}

/// Builds the four cut lines of a plywood frame rectangle, in
/// bottom/right/top/left order, on the `PLYWOOD` layer in white.
#[must_use]
pub fn generate_rectangle(bbox: BoundingBox) -> Vec<Line> {
    let attrs = Attributes {
        layer: "PLYWOOD".to_string(),
        color: 7,
        category: LineCategory::Plywood,
        ..Attributes::default()
    };

    let bottom_left = Point::new(bbox.min_x, bbox.min_y);
    let bottom_right = Point::new(bbox.max_x, bbox.min_y);
    let top_right = Point::new(bbox.max_x, bbox.max_y);
    let top_left = Point::new(bbox.min_x, bbox.max_y);

    vec![
        Line::with_attrs(bottom_left, bottom_right, &attrs),
        Line::with_attrs(bottom_right, top_right, &attrs),
        Line::with_attrs(top_right, top_left, &attrs),
        Line::with_attrs(top_left, bottom_left, &attrs),
    ]
}

/// Applies `settings`'s margins to `bbox`, then generates the frame
/// rectangle for the expanded box. Returns the lines and the expanded
/// box, since downstream stages (straight-knife, text placement) need
/// both.
#[must_use]
pub fn generate_with_margins(bbox: BoundingBox, settings: &PlywoodSettings) -> (Vec<Line>, BoundingBox) {
    let expanded = apply_margins(bbox, settings);
    (generate_rectangle(expanded), expanded)
}

/// Convenience wrapper: computes the union bbox of `entities` first.
///
/// # Errors
///
/// Returns [`crate::error::GeometryError::EmptyPointSet`]-shaped error if
/// `entities` is empty.
pub fn generate_for_entities(
    entities: &[crate::geometry::Entity],
    settings: &PlywoodSettings,
) -> crate::error::Result<(Vec<Line>, BoundingBox)> {
    use crate::geometry::Transformable;

    let mut entities_iter = entities.iter();
    let first = entities_iter
        .next()
        .ok_or(crate::error::GeometryError::EmptyPointSet)?;
    let mut bbox = first.bbox();
    for entity in entities_iter {
        bbox = bbox.union(entity.bbox());
    }

    Ok(generate_with_margins(bbox, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plywood_settings_rejects_negative_margin() {
        assert!(PlywoodSettings::new(-1.0, 10.0, 10.0, 10.0).is_err());
    }

    #[test]
    fn copper_and_auto_plates_differ_only_in_bottom_margin() {
        let copper = PlywoodSettings::for_plate_type(PlateType::Copper);
        let auto = PlywoodSettings::for_plate_type(PlateType::Auto);
        assert_relative_eq!(copper.top_margin, auto.top_margin);
        assert_relative_eq!(copper.left_margin, auto.left_margin);
        assert_relative_eq!(copper.right_margin, auto.right_margin);
        assert_relative_eq!(copper.bottom_margin, 25.0);
        assert_relative_eq!(auto.bottom_margin, 15.0);
    }

    #[test]
    fn apply_margins_expands_each_side_independently() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let settings = PlywoodSettings::new(10.0, 20.0, 30.0, 40.0).unwrap();
        let expanded = apply_margins(bbox, &settings);
        assert_relative_eq!(expanded.min_x, -30.0);
        assert_relative_eq!(expanded.min_y, -20.0);
        assert_relative_eq!(expanded.max_x, 140.0);
        assert_relative_eq!(expanded.max_y, 210.0);
    }

    #[test]
    fn generate_rectangle_produces_four_lines_in_order() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
        let lines = generate_rectangle(bbox);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].start, Point::new(0.0, 0.0));
        assert_eq!(lines[0].end, Point::new(10.0, 0.0));
        assert_eq!(lines[3].end, Point::new(0.0, 0.0));
        for line in &lines {
            assert_eq!(line.attrs.layer, "PLYWOOD");
            assert_eq!(line.attrs.color, 7);
            assert_eq!(line.attrs.category, LineCategory::Plywood);
        }
    }

    #[test]
    fn generate_rectangle_forms_a_closed_loop() {
        let bbox = BoundingBox::new(-5.0, -5.0, 5.0, 5.0);
        let lines = generate_rectangle(bbox);
        for w in lines.windows(2) {
            assert_eq!(w[0].end, w[1].start);
        }
        assert_eq!(lines.last().unwrap().end, lines[0].start);
    }
}
