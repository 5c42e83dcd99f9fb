//! Error types for the lattice solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LbmError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Cell ({x}, {y}) is outside the {nx}x{ny} lattice")]
    Index { x: usize, y: usize, nx: usize, ny: usize },

    #[error(
        "Numerical divergence at tick {tick} in cell ({x}, {y}): density {density}, speed {speed}"
    )]
    NumericalDivergence {
        tick: u64,
        x: usize,
        y: usize,
        density: f64,
        speed: f64,
    },

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, LbmError>;
