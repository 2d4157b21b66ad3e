//! Error types for colony runs.

use thiserror::Error;

/// Errors surfaced at initialization or at a generation update.
///
/// None of these are transient: they signal a bad parameter set or a
/// graph the algorithm cannot work on, so nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcoError {
    /// A parameter is outside its valid range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The distance matrix cannot be used (too small, not square, zero-cost edge, ...).
    #[error("degenerate graph: {0}")]
    DegenerateGraph(String),

    /// A tour handed to pheromone reinforcement is not a Hamiltonian cycle
    /// of the trail's graph, or carries a non-finite length.
    #[error("tour {tour} is not a valid cycle over {nodes} nodes: {reason}")]
    InvalidTour {
        /// The offending tour, formatted as `a -> b -> ... -> a`.
        tour: String,
        /// Size of the graph it was checked against.
        nodes: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A tour with zero total length was handed to pheromone reinforcement.
    #[error("tour {tour} has zero length and cannot deposit pheromone")]
    ZeroFitness {
        /// The offending tour, formatted as `a -> b -> ... -> a`.
        tour: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AcoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AcoError::Configuration("q must be positive".into());
        assert_eq!(err.to_string(), "configuration error: q must be positive");

        let err = AcoError::ZeroFitness {
            tour: "0 -> 1 -> 0".into(),
        };
        assert!(err.to_string().contains("0 -> 1 -> 0"));
    }
}
