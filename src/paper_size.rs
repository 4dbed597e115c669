//! Standard and custom paper sizes for sheet-bound drawings.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::ValidationError;

const MIN_WIDTH: f64 = 100.0;
const MAX_WIDTH: f64 = 2000.0;
const MIN_HEIGHT: f64 = 100.0;
const MAX_HEIGHT: f64 = 3000.0;

/// A validated sheet size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPaperSize")]
pub struct PaperSize {
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct RawPaperSize {
    width: f64,
    height: f64,
}

impl TryFrom<RawPaperSize> for PaperSize {
    type Error = ValidationError;

    fn try_from(raw: RawPaperSize) -> Result<Self, Self::Error> {
        PaperSize::custom(raw.width, raw.height)
    }
}

/// The named standard sizes this catalogue recognizes, `(width, height)`
/// in millimeters.
const STANDARD_SIZES: &[(&str, f64, f64)] = &[
    ("국전", 636.0, 939.0),
    ("국반절", 636.0, 469.0),
    ("국4절", 318.0, 469.0),
    ("4x6전지", 788.0, 1091.0),
    ("4x6반절", 545.0, 788.0),
    ("4x6 4절", 394.0, 545.0),
    ("46판", 394.0, 545.0),
    ("A1", 594.0, 841.0),
    ("A2", 420.0, 594.0),
    ("A3", 297.0, 420.0),
    ("A4", 210.0, 297.0),
];

impl PaperSize {
    /// # Errors
    ///
    /// Returns [`ValidationError::PaperSizeOutOfRange`] if `width` or
    /// `height` falls outside the allowed range.
    pub fn custom(width: f64, height: f64) -> Result<Self, ValidationError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) || !(MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
            return Err(ValidationError::PaperSizeOutOfRange { width, height });
        }
        Ok(Self { width, height })
    }

    /// Looks up a named standard size.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPaperSize`] if `name` is not in
    /// the catalogue.
    pub fn from_standard(name: &str) -> Result<Self, ValidationError> {
        STANDARD_SIZES
            .iter()
            .find(|(candidate, _, _)| *candidate == name)
            .map(|&(_, width, height)| Self { width, height })
            .ok_or_else(|| ValidationError::UnknownPaperSize(name.to_string()))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The paper's bbox anchored at the origin: `(0, 0, width, height)`.
    #[must_use]
    pub fn bbox(&self) -> crate::geometry::BoundingBox {
        crate::geometry::BoundingBox::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_size_within_range_succeeds() {
        let size = PaperSize::custom(500.0, 700.0).unwrap();
        assert_eq!(size.width(), 500.0);
        assert_eq!(size.height(), 700.0);
    }

    #[test]
    fn width_below_minimum_fails() {
        assert!(PaperSize::custom(50.0, 500.0).is_err());
    }

    #[test]
    fn height_above_maximum_fails() {
        assert!(PaperSize::custom(500.0, 3500.0).is_err());
    }

    #[test]
    fn standard_size_lookup_matches_catalogue() {
        let size = PaperSize::from_standard("A4").unwrap();
        assert_eq!(size.width(), 210.0);
        assert_eq!(size.height(), 297.0);
    }

    #[test]
    fn unknown_standard_name_errors() {
        assert!(PaperSize::from_standard("B5").is_err());
    }

    #[test]
    fn bbox_is_anchored_at_origin() {
        let size = PaperSize::custom(300.0, 400.0).unwrap();
        let bbox = size.bbox();
        assert_eq!(bbox.min_x, 0.0);
        assert_eq!(bbox.min_y, 0.0);
        assert_eq!(bbox.max_x, 300.0);
        assert_eq!(bbox.max_y, 400.0);
    }
}
