use thiserror::Error;

/// Top-level error type for the die-cut processing core.
#[derive(Debug, Error)]
pub enum DiecutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("orchestrator error: {0}")]
    Orchestrator(String),
}

/// Errors raised at construction time when a configuration value violates
/// a stated constraint. Callers see these eagerly, before any pipeline
/// invocation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bridge settings invalid: {0}")]
    BridgeSettings(String),

    #[error("plywood settings invalid: {0}")]
    PlywoodSettings(String),

    #[error("paper size {width} x {height} out of range (width 100..=2000, height 100..=3000)")]
    PaperSizeOutOfRange { width: f64, height: f64 },

    #[error("unknown paper size name: {0}")]
    UnknownPaperSize(String),
}

/// Errors encountered while processing geometry. Per the skip-and-continue
/// policy, these are logged and the offending segment is dropped; they do
/// not abort the pipeline.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("cannot build a bounding box from an empty point set")]
    EmptyPointSet,

    #[error("degenerate chord: length {0} is below the minimum {1}")]
    DegenerateChord(f64, f64),

    #[error("non-positive arc radius: {0}")]
    NonPositiveRadius(f64),
}

/// Convenience alias for results using [`DiecutError`].
pub type Result<T> = std::result::Result<T, DiecutError>;
