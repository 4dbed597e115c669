pub mod bbox;
pub mod entity;

pub use bbox::{BoundingBox, Point};
pub use entity::{
    Arc, Attributes, Entity, EntityId, Line, LineCategory, Polyline, PolylineVertex, Text,
    Transformable,
};
