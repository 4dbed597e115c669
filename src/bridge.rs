//! Bridge placement: the short gaps left in cut/crease lines so the
//! cut-out stays attached to the sheet.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::ValidationError;
use crate::geometry::Line;

/// Parameters controlling bridge placement for one line category.
///
/// All five fields are in millimeters. Constructed only through
/// [`BridgeSettings::new`] (or the [`BridgeSettings::for_cut`] /
/// [`BridgeSettings::for_crease`] presets), which validates
/// `min_length > 0`, `single_bridge_max >= min_length`,
/// `target_interval > 0`, `gap_size > 0`, and `edge_margin >= 0` — the
/// caller finds out about a bad preset immediately, not mid-batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBridgeSettings")]
pub struct BridgeSettings {
    min_length: f64,
    single_bridge_max: f64,
    target_interval: f64,
    gap_size: f64,
    edge_margin: f64,
}

#[derive(Debug, Deserialize)]
struct RawBridgeSettings {
    min_length: f64,
    single_bridge_max: f64,
    target_interval: f64,
    gap_size: f64,
    edge_margin: f64,
}

impl TryFrom<RawBridgeSettings> for BridgeSettings {
    type Error = ValidationError;

    fn try_from(raw: RawBridgeSettings) -> Result<Self, Self::Error> {
        BridgeSettings::new(
            raw.min_length,
            raw.single_bridge_max,
            raw.target_interval,
            raw.gap_size,
            raw.edge_margin,
        )
    }
}

impl BridgeSettings {
    /// # Errors
    ///
    /// Returns [`ValidationError::BridgeSettings`] if any constraint is
    /// violated.
    pub fn new(
        min_length: f64,
        single_bridge_max: f64,
        target_interval: f64,
        gap_size: f64,
        edge_margin: f64,
    ) -> Result<Self, ValidationError> {
        if !(min_length > 0.0) {
            return Err(ValidationError::BridgeSettings(
                "min_length must be positive".to_string(),
            ));
        }
        if single_bridge_max < min_length {
            return Err(ValidationError::BridgeSettings(
                "single_bridge_max must be >= min_length".to_string(),
            ));
        }
        if !(target_interval > 0.0) {
            return Err(ValidationError::BridgeSettings(
                "target_interval must be positive".to_string(),
            ));
        }
        if !(gap_size > 0.0) {
            return Err(ValidationError::BridgeSettings(
                "gap_size must be positive".to_string(),
            ));
        }
        if edge_margin < 0.0 {
            return Err(ValidationError::BridgeSettings(
                "edge_margin must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            min_length,
            single_bridge_max,
            target_interval,
            gap_size,
            edge_margin,
        })
    }

    /// The default profile for cut lines.
    #[must_use]
    pub fn for_cut() -> Self {
        Self {
            min_length: 20.0,
            single_bridge_max: 50.0,
            target_interval: 60.0,
            gap_size: 3.0,
            edge_margin: 10.0,
        }
    }

    /// The default profile for crease lines.
    #[must_use]
    pub fn for_crease() -> Self {
        Self {
            min_length: 20.0,
            single_bridge_max: 50.0,
            target_interval: 50.0,
            gap_size: 2.0,
            edge_margin: 10.0,
        }
    }
}

/// The interval-adjustment thresholds are domain constants, kept exact.
const INTERVAL_MAX: f64 = 70.0;
const INTERVAL_MIN: f64 = 50.0;
const INTERVAL_MAX_DIVISOR: f64 = 50.0;

/// Computes bridge-centre ratios (in `(0, 1)`) for a line of length `length`.
#[must_use]
pub fn bridge_position_ratios(length: f64, settings: &BridgeSettings) -> Vec<f64> {
    if length < settings.min_length {
        return vec![];
    }
    if length < settings.single_bridge_max {
        return vec![0.5];
    }

    let effective = length - 2.0 * settings.edge_margin;
    if effective <= 0.0 {
        return vec![0.5];
    }

    let mut n = ((effective / settings.target_interval).round() as i64).max(1);
    let mut interval = effective / n as f64;

    if interval > INTERVAL_MAX && (n as f64) < effective / INTERVAL_MAX_DIVISOR {
        n += 1;
        interval = effective / n as f64;
    } else if interval < INTERVAL_MIN && n > 1 {
        n -= 1;
        interval = effective / n as f64;
    }

    (0..n)
        .map(|i| {
            let offset_within_effective = interval / 2.0 + interval * i as f64;
            let absolute_offset = settings.edge_margin + offset_within_effective;
            absolute_offset / length
        })
        .collect()
}

/// Splits `line` around the gaps centred at each bridge position. Returns
/// the unmodified line if every candidate segment would have been a gap.
#[must_use]
pub fn apply_bridges(line: &Line, settings: &BridgeSettings) -> Vec<Line> {
    let length = line.length();
    let centres = bridge_position_ratios(length, settings);
    if centres.is_empty() {
        return vec![line.clone()];
    }

    let half_gap_ratio = if length > 0.0 {
        settings.gap_size / (2.0 * length)
    } else {
        0.0
    };

    let gap_ranges: Vec<(f64, f64)> = centres
        .iter()
        .map(|&p| {
            (
                (p - half_gap_ratio).clamp(0.001, 0.999),
                (p + half_gap_ratio).clamp(0.001, 0.999),
            )
        })
        .collect();

    let mut boundaries: Vec<f64> = vec![0.0, 1.0];
    for &(a, b) in &gap_ranges {
        boundaries.push(a);
        boundaries.push(b);
    }
    boundaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    boundaries.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let is_gap_range = |lo: f64, hi: f64| {
        gap_ranges
            .iter()
            .any(|&(a, b)| (lo - a).abs() < 1e-4 && (hi - b).abs() < 1e-4)
    };

    let segments: Vec<Line> = boundaries
        .windows(2)
        .filter(|w| !is_gap_range(w[0], w[1]))
        .map(|w| {
            Line::with_attrs(line.point_at_ratio(w[0]), line.point_at_ratio(w[1]), &line.attrs)
        })
        .collect();

    if segments.is_empty() {
        vec![line.clone()]
    } else {
        segments
    }
}
