//! Error types for the simulation core.

use thiserror::Error;

/// Main error type for stardisk_core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid construction or run parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ring index outside the grid
    #[error("Ring index {index} out of range (grid has {ring_count} rings)")]
    RingIndex { index: usize, ring_count: usize },

    /// Cell index outside its ring, only reachable through external data
    #[error("Cell index {index} out of range for ring {ring} ({len} cells)")]
    CellIndex { ring: usize, index: usize, len: usize },

    /// Malformed history passed back into the core
    #[error("History error: {0}")]
    History(String),
}

/// Result type alias for stardisk_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a new history error.
    #[must_use]
    pub fn history<S: Into<String>>(msg: S) -> Self {
        Self::History(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::configuration("dt must be positive");
        assert_eq!(err.to_string(), "Configuration error: dt must be positive");
    }

    #[test]
    fn test_ring_index_display() {
        let err = SimError::RingIndex {
            index: 9,
            ring_count: 3,
        };
        assert!(err.to_string().contains("9"));
        assert!(err.to_string().contains("3 rings"));
    }
}
