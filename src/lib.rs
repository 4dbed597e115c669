pub mod bridge;
pub mod classify;
pub mod connector;
pub mod error;
pub mod geometry;
pub mod knife;
pub mod math;
pub mod paper_size;
pub mod pipeline;
pub mod plywood;
pub mod polyline_decompose;
pub mod remover;
pub mod text_gen;

pub use bridge::BridgeSettings;
pub use error::{DiecutError, Result};
pub use geometry::{Arc, Attributes, BoundingBox, Entity, EntityId, Line, LineCategory, Point, Polyline, PolylineVertex, Text};
pub use paper_size::PaperSize;
pub use pipeline::{process_drawing, PipelineStatistics, ProcessingOptions, ProcessingResult};
pub use plywood::{PlateType, PlywoodSettings};
pub use text_gen::{JobInfo, Side};
