//! Job annotation text: the header block and optional side marker
//! stacked above the plywood frame.

use serde::{Deserialize, Serialize};

use crate::geometry::{Attributes, BoundingBox, Entity, LineCategory, Point, Text};
use crate::plywood::PlateType;

/// Which face of the die the drawing represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Front => "앞",
        Side::Back => "뒤",
    }
}

fn plate_label(plate_type: PlateType) -> &'static str {
    match plate_type {
        PlateType::Copper => "동판",
        PlateType::Auto => "자동",
    }
}

/// The job record driving text annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    /// `(year, month, day)`.
    pub date: (i32, u32, u32),
    pub job_number: String,
    pub package_name: String,
    pub side: Side,
    pub plate_type: PlateType,
}

impl JobInfo {
    #[must_use]
    pub fn formatted_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.date.0, self.date.1, self.date.2)
    }
}

fn text_attrs() -> Attributes {
    Attributes {
        layer: "TEXT".to_string(),
        color: 7,
        category: LineCategory::Unknown,
        ..Attributes::default()
    }
}

/// Builds the three stacked header texts above `plywood_bbox`'s top edge,
/// starting at `plywood_bbox.max_y + margin` and incrementing by
/// `height * line_spacing`.
#[must_use]
pub fn generate_positioned_texts(
    job_info: &JobInfo,
    plywood_bbox: BoundingBox,
    margin: f64,
    height: f64,
    line_spacing: f64,
) -> Vec<Entity> {
    let lines = [
        format!("{}  No.{}", job_info.formatted_date(), job_info.job_number),
        job_info.package_name.clone(),
        format!(
            "{}  {}",
            side_label(job_info.side),
            plate_label(job_info.plate_type)
        ),
    ];

    let attrs = text_attrs();
    let step = height * line_spacing;
    let base_y = plywood_bbox.max_y + margin;

    lines
        .into_iter()
        .enumerate()
        .map(|(i, content)| {
            Entity::Text(Text::new(
                content,
                Point::new(plywood_bbox.min_x, base_y + step * i as f64),
                height,
                0.0,
                Attributes {
                    id: crate::geometry::EntityId::fresh(),
                    ..attrs.clone()
                },
            ))
        })
        .collect()
}

/// Builds the side-marker text placed near the drawing bbox's
/// bottom-right corner, at double `height`.
#[must_use]
pub fn generate_positioned_side_marker(job_info: &JobInfo, drawing_bbox: BoundingBox, height: f64) -> Entity {
    Entity::Text(Text::new(
        side_label(job_info.side).to_string(),
        Point::new(drawing_bbox.max_x - 20.0, drawing_bbox.min_y + 10.0),
        height * 2.0,
        0.0,
        text_attrs(),
    ))
}
