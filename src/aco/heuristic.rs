//! Static edge desirability derived from distances.

use super::types::DistanceMatrix;
use crate::error::{AcoError, Result};

/// Largest supported `accuracy`; f64 carries no more significant decimals.
pub const MAX_ACCURACY: u32 = 15;

/// `heuristic[i][j] = 1 / dist[i][j]` off the diagonal, `0` on it.
///
/// Computed once per run and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicMatrix {
    n: usize,
    data: Vec<f64>,
}

impl HeuristicMatrix {
    /// Derives the heuristic from `dist`, optionally rounded to `accuracy`
    /// decimal places.
    ///
    /// # Errors
    ///
    /// [`AcoError::DegenerateGraph`] if any off-diagonal distance is zero.
    /// Zero-cost edges must be removed or re-weighted by the caller.
    /// [`AcoError::Configuration`] if `accuracy` exceeds [`MAX_ACCURACY`].
    pub fn from_distances(dist: &DistanceMatrix, accuracy: Option<u32>) -> Result<Self> {
        check_accuracy(accuracy)?;
        let n = dist.n();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = dist.get(i, j);
                if d == 0.0 {
                    return Err(AcoError::DegenerateGraph(format!(
                        "edge ({i}, {j}) has zero cost"
                    )));
                }
                data[i * n + j] = round_to(1.0 / d, accuracy);
            }
        }
        Ok(Self { n, data })
    }

    /// Number of nodes.
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// Rejects an `accuracy` whose scale factor would leave the f64 range.
pub(crate) fn check_accuracy(accuracy: Option<u32>) -> Result<()> {
    match accuracy {
        Some(d) if d > MAX_ACCURACY => Err(AcoError::Configuration(format!(
            "accuracy must be at most {MAX_ACCURACY} decimal places, got {d}"
        ))),
        _ => Ok(()),
    }
}

/// Rounds half away from zero to `decimals` places.
///
/// `None`, or more places than [`MAX_ACCURACY`], leaves `value` as is.
pub(crate) fn round_to(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(d) if d <= MAX_ACCURACY => {
            let scale = 10f64.powi(d as i32);
            (value * scale).round() / scale
        }
        Some(_) | None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reciprocal_and_zero_diagonal() {
        let dist = DistanceMatrix::new(vec![
            vec![0.0, 2.0, 4.0],
            vec![2.0, 0.0, 8.0],
            vec![5.0, 8.0, 0.0],
        ])
        .unwrap();
        let h = HeuristicMatrix::from_distances(&dist, None).unwrap();
        assert_eq!(h.n(), 3);
        for i in 0..3 {
            assert_eq!(h.get(i, i), 0.0);
        }
        assert!((h.get(0, 1) - 0.5).abs() < 1e-15);
        assert!((h.get(0, 2) - 0.25).abs() < 1e-15);
        assert!((h.get(2, 0) - 0.2).abs() < 1e-15);
        assert!((h.get(1, 2) - 0.125).abs() < 1e-15);
    }

    #[test]
    fn test_rounding_to_accuracy() {
        let dist = DistanceMatrix::new(vec![vec![0.0, 3.0], vec![7.0, 0.0]]).unwrap();
        let h = HeuristicMatrix::from_distances(&dist, Some(2)).unwrap();
        assert!((h.get(0, 1) - 0.33).abs() < 1e-12);
        assert!((h.get(1, 0) - 0.14).abs() < 1e-12);
    }

    #[test]
    fn test_rounding_can_underflow_to_zero() {
        let dist = DistanceMatrix::new(vec![vec![0.0, 1000.0], vec![1000.0, 0.0]]).unwrap();
        let h = HeuristicMatrix::from_distances(&dist, Some(2)).unwrap();
        assert_eq!(h.get(0, 1), 0.0);
    }

    #[test]
    fn test_zero_cost_edge_is_degenerate() {
        let dist = DistanceMatrix::new(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ])
        .unwrap();
        let err = HeuristicMatrix::from_distances(&dist, None).unwrap_err();
        assert!(matches!(err, AcoError::DegenerateGraph(ref m) if m.contains("(0, 2)")));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.125, None), 0.125);
        assert!((round_to(0.126, Some(2)) - 0.13).abs() < 1e-12);
        assert_eq!(round_to(0.7, Some(0)), 1.0);
        assert_eq!(round_to(0.123456789, Some(400)), 0.123456789);
        assert_eq!(round_to(0.5, Some(u32::MAX)), 0.5);
    }

    #[test]
    fn test_excessive_accuracy_rejected() {
        let dist = DistanceMatrix::new(vec![vec![0.0, 3.0], vec![7.0, 0.0]]).unwrap();
        let err = HeuristicMatrix::from_distances(&dist, Some(400)).unwrap_err();
        assert!(matches!(err, AcoError::Configuration(_)));

        let h = HeuristicMatrix::from_distances(&dist, Some(MAX_ACCURACY)).unwrap();
        assert!(h.get(0, 1).is_finite());
    }
}
