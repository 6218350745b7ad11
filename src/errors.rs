use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// Degenerate trigonometric inputs (zero node vector, acos drift) are not
/// errors: the orbital-elements converter clamps and falls back to the
/// documented conventions instead of propagating NaN.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
