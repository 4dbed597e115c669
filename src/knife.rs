//! Straight-knife cuts: the horizontal press-knife lines spanning from
//! the plywood frame to the drawing bbox on either side.

use crate::bridge::{apply_bridges, BridgeSettings};
use crate::geometry::{Attributes, BoundingBox, Line, LineCategory, Point};

/// Settings for the straight-knife generator.
#[derive(Debug, Clone)]
pub struct StraightKnifeSettings {
    pub apply_bridges: bool,
    pub bridge_settings: BridgeSettings,
}

impl Default for StraightKnifeSettings {
    fn default() -> Self {
        Self {
            apply_bridges: true,
            bridge_settings: BridgeSettings::for_cut(),
        }
    }
}

fn knife_attrs() -> Attributes {
    Attributes {
        layer: "CUT".to_string(),
        color: 1,
        category: LineCategory::Cut,
        ..Attributes::default()
    }
}

/// Generates the two knife candidate segments for one Y coordinate,
/// discarding segments shorter than 1mm, and applying bridges if
/// configured.
fn generate_at_y(
    drawing_bbox: BoundingBox,
    plywood_bbox: BoundingBox,
    y: f64,
    settings: &StraightKnifeSettings,
) -> Vec<Line> {
    let candidates = [
        Line::with_attrs(
            Point::new(plywood_bbox.min_x, y),
            Point::new(drawing_bbox.min_x, y),
            &knife_attrs(),
        ),
        Line::with_attrs(
            Point::new(drawing_bbox.max_x, y),
            Point::new(plywood_bbox.max_x, y),
            &knife_attrs(),
        ),
    ];

    let mut result = Vec::new();
    for line in candidates {
        if line.length() < 1.0 {
            continue;
        }
        if settings.apply_bridges {
            result.extend(apply_bridges(&line, &settings.bridge_settings));
        } else {
            result.push(line);
        }
    }
    result
}

/// Generates straight-knife lines for every Y in `y_positions`, or the
/// vertical centre of `drawing_bbox` if the list is empty.
#[must_use]
pub fn generate(
    drawing_bbox: BoundingBox,
    plywood_bbox: BoundingBox,
    y_positions: &[f64],
    settings: &StraightKnifeSettings,
) -> Vec<Line> {
    let ys: Vec<f64> = if y_positions.is_empty() {
        vec![drawing_bbox.center().y]
    } else {
        y_positions.to_vec()
    };

    ys.into_iter()
        .flat_map(|y| generate_at_y(drawing_bbox, plywood_bbox, y, settings))
        .collect()
}

/// Generates straight-knife lines at the vertical centre of `drawing_bbox`.
#[must_use]
pub fn generate_at_center(
    drawing_bbox: BoundingBox,
    plywood_bbox: BoundingBox,
    settings: &StraightKnifeSettings,
) -> Vec<Line> {
    generate(drawing_bbox, plywood_bbox, &[], settings)
}

/// Finds natural Y positions from near-horizontal lines: collects the Y
/// of every line whose endpoints' Y values differ by less than
/// `tolerance`, sorts them, then greedily clusters consecutive values
/// where each is within `tolerance` of the **last value added to the
/// current cluster** (not the cluster's running mean — a cluster can
/// drift further than `tolerance` from its first member). Emits each
/// cluster's mean.
#[must_use]
pub fn find_horizontal_line_positions(lines: &[Line], tolerance: f64) -> Vec<f64> {
    let mut ys: Vec<f64> = lines
        .iter()
        .filter(|l| l.is_horizontal(tolerance))
        .map(|l| l.start.y)
        .collect();
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for y in ys {
        match clusters.last_mut() {
            Some(cluster) if (y - cluster.last().copied().unwrap_or(y)).abs() <= tolerance => {
                cluster.push(y);
            }
            _ => clusters.push(vec![y]),
        }
    }

    clusters
        .into_iter()
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect()
}
