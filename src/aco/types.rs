//! Problem data: the distance graph and the tours built over it.

use crate::error::{AcoError, Result};
use std::fmt;

/// Immutable N×N grid of pairwise edge costs.
///
/// `dist[i][i]` is zero; off-diagonal entries are finite and non-negative.
/// Asymmetric costs are allowed. Stored row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a distance matrix from nested rows.
    ///
    /// # Errors
    ///
    /// [`AcoError::DegenerateGraph`] if the grid has fewer than 2 nodes, is
    /// not square, holds a negative or non-finite cost, or has a non-zero
    /// diagonal entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_aco::aco::DistanceMatrix;
    ///
    /// let dist = DistanceMatrix::new(vec![
    ///     vec![0.0, 2.0],
    ///     vec![3.0, 0.0],
    /// ]).unwrap();
    /// assert_eq!(dist.n(), 2);
    /// assert_eq!(dist.get(1, 0), 3.0);
    /// ```
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(AcoError::DegenerateGraph(format!(
                "graph needs at least 2 nodes, got {n}"
            )));
        }

        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(AcoError::DegenerateGraph(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(AcoError::DegenerateGraph(format!(
                        "edge ({i}, {j}) has invalid cost {d}"
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(AcoError::DegenerateGraph(format!(
                        "diagonal entry ({i}, {i}) must be 0, got {d}"
                    )));
                }
            }
            data.extend(row);
        }

        Ok(Self { n, data })
    }

    /// Number of nodes.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Cost of the edge `i -> j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Outgoing costs of node `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// A closed Hamiltonian cycle.
///
/// Holds `N + 1` node indices: it starts at the start node, visits every
/// other node exactly once, and returns to the start node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    nodes: Vec<usize>,
}

impl Tour {
    pub(crate) fn from_nodes(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    /// Node sequence, including the closing return to the start node.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Number of entries in the sequence (`N + 1` for a complete tour).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for the placeholder tour of a run that has not evaluated anything.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node the tour starts and ends at.
    pub fn start(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    /// Traversed edges `(from, to)` in order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total length: the sum of consecutive distance lookups.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_aco::aco::{DistanceMatrix, Tour};
    ///
    /// let dist = DistanceMatrix::new(vec![
    ///     vec![0.0, 1.0, 4.0],
    ///     vec![1.0, 0.0, 2.0],
    ///     vec![4.0, 2.0, 0.0],
    /// ]).unwrap();
    /// let tour: Tour = vec![0, 1, 2, 0].try_into().unwrap();
    /// assert_eq!(tour.fitness(&dist), 7.0);
    /// ```
    pub fn fitness(&self, dist: &DistanceMatrix) -> f64 {
        self.edges().map(|(i, j)| dist.get(i, j)).sum()
    }

    /// Checks the Hamiltonian-cycle shape against an `n`-node graph.
    pub fn is_valid_cycle(&self, n: usize) -> bool {
        if self.nodes.len() != n + 1 || self.nodes.first() != self.nodes.last() {
            return false;
        }
        let mut seen = vec![false; n];
        for &node in &self.nodes[..n] {
            if node >= n || seen[node] {
                return false;
            }
            seen[node] = true;
        }
        true
    }
}

impl TryFrom<Vec<usize>> for Tour {
    type Error = AcoError;

    /// Wraps a caller-built cycle; it must be closed and visit each node once.
    fn try_from(nodes: Vec<usize>) -> Result<Self> {
        let n = nodes.len().saturating_sub(1);
        let tour = Tour { nodes };
        if n < 2 || !tour.is_valid_cycle(n) {
            return Err(AcoError::Configuration(format!(
                "{tour} is not a closed Hamiltonian cycle"
            )));
        }
        Ok(tour)
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, node) in self.nodes.iter().enumerate() {
            if k > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// A tour paired with its evaluated length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredTour {
    /// The tour.
    pub tour: Tour,
    /// Its total length.
    pub fitness: f64,
}

impl ScoredTour {
    /// Evaluates `tour` against `dist`.
    pub fn new(tour: Tour, dist: &DistanceMatrix) -> Self {
        let fitness = tour.fitness(dist);
        Self { tour, fitness }
    }
}
