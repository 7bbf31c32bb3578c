/// Error types for card construction and configuration
use thiserror::Error;

/// Everything that can go wrong while building or driving a card.
///
/// Pointer coordinates and hover flags are total; only explicit dimension,
/// catalog and configuration arguments can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    #[error("invalid card dimension: width={width}, height={height}")]
    InvalidDimension { width: f32, height: f32 },

    #[error("face catalog too small: {len} face(s)")]
    EmptyCatalog { len: usize },

    #[error("face {0:?} is not in the catalog")]
    UnknownFace(String),

    #[error("config error on line {line}: {message}")]
    Config { line: usize, message: String },

    #[error("config value {key} = {value} is out of range")]
    InvalidConfig { key: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, CardError>;
