//! Dense distance matrix and the distance metric shared by all consumers.

use serde::{Deserialize, Serialize};

use crate::models::Bin;

/// How the distance between two bin locations is measured.
///
/// Every stage of a plan (MST, clustering penalty, sequencing, route
/// distance) uses the one metric the graph was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Great-circle distance in kilometres.
    #[default]
    Haversine,
    /// Planar distance on raw degree coordinates.
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two bins under this metric.
    pub fn between(&self, a: &Bin, b: &Bin) -> f64 {
        match self {
            DistanceMetric::Haversine => a.location().haversine_km(b.location()),
            DistanceMetric::Euclidean => a.location().euclidean(b.location()),
        }
    }
}

/// A dense n×n distance matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Bin;
/// use waste_routing::distance::{DistanceMatrix, DistanceMetric};
///
/// let bins = vec![
///     Bin::at(1, 0.0, 0.0, 10, 100.0).unwrap(),
///     Bin::at(2, 3.0, 4.0, 10, 100.0).unwrap(),
/// ];
/// let dm = DistanceMatrix::from_bins(&bins, DistanceMetric::Euclidean);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a symmetric matrix over bin locations, indexed by input position.
    pub fn from_bins(bins: &[Bin], metric: DistanceMetric) -> Self {
        let n = bins.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.between(&bins[i], &bins[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from position `from` to position `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from position `from` to position `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Restriction to the given positions, re-indexed `0..positions.len()`.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    pub fn submatrix(&self, positions: &[usize]) -> DistanceMatrix {
        let m = positions.len();
        let mut data = Vec::with_capacity(m * m);
        for &from in positions {
            let row = &self.data[from * self.size..(from + 1) * self.size];
            data.extend(positions.iter().map(|&to| row[to]));
        }
        Self { data, size: m }
    }

    /// Returns the nearest of `candidates` to `from`.
    ///
    /// Ties go to the candidate listed first. Returns `None` if
    /// `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &c in candidates {
            let d = self.get(from, c);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((c, d));
            }
        }
        best.map(|(c, _)| c)
    }

    /// Length of the open path visiting `order` in sequence.
    pub fn path_length(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bins() -> Vec<Bin> {
        vec![
            Bin::at(1, 0.0, 0.0, 10, 100.0).expect("valid"),
            Bin::at(2, 3.0, 4.0, 10, 100.0).expect("valid"),
            Bin::at(3, 0.0, 8.0, 10, 100.0).expect("valid"),
        ]
    }

    #[test]
    fn test_from_bins_euclidean() {
        let dm = DistanceMatrix::from_bins(&sample_bins(), DistanceMetric::Euclidean);
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!(dm.get(0, 0).abs() < 1e-10);
    }

    #[test]
    fn test_from_bins_haversine_symmetric() {
        let dm = DistanceMatrix::from_bins(&sample_bins(), DistanceMetric::Haversine);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(dm.get(i, j), dm.get(j, i));
            }
        }
        // (0,0) to (0,8): 8 degrees of longitude on the equator.
        assert!((dm.get(0, 2) - 889.56).abs() < 0.1);
    }

    #[test]
    fn test_default_metric_is_haversine() {
        assert_eq!(DistanceMetric::default(), DistanceMetric::Haversine);
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_submatrix() {
        let dm = DistanceMatrix::from_bins(&sample_bins(), DistanceMetric::Euclidean);
        let sub = dm.submatrix(&[2, 0]);
        assert_eq!(sub.size(), 2);
        assert!((sub.get(0, 1) - 8.0).abs() < 1e-10);
        assert_eq!(sub.get(1, 1), 0.0);
        assert_eq!(dm.submatrix(&[]).size(), 0);
    }

    #[test]
    fn test_nearest_neighbor() {
        let dm = DistanceMatrix::from_bins(&sample_bins(), DistanceMetric::Euclidean);
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(0, &[2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[]), None);
    }

    #[test]
    fn test_nearest_neighbor_tie_keeps_first() {
        let dm = DistanceMatrix::from_data(3, vec![0.0, 2.0, 2.0, 2.0, 0.0, 1.0, 2.0, 1.0, 0.0])
            .expect("valid");
        assert_eq!(dm.nearest_neighbor(0, &[2, 1]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
    }

    #[test]
    fn test_path_length() {
        let dm = DistanceMatrix::from_bins(&sample_bins(), DistanceMetric::Euclidean);
        assert!((dm.path_length(&[0, 1, 2]) - 10.0).abs() < 1e-10);
        assert_eq!(dm.path_length(&[1]), 0.0);
        assert_eq!(dm.path_length(&[]), 0.0);
    }
}
