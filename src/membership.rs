//! Fuzzy membership matrix.
//!
//! Entry `(i, j)` is the degree to which point `i` belongs to cluster `j`.
//! Once normalized, every row sums to one.

use crate::algorithms::Error;
use crate::geometry::{self, Point2D};
use itertools::Itertools as _;
use nalgebra::DMatrix;
use rand::Rng;

fn partial_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    if a < b {
        std::cmp::Ordering::Less
    } else {
        std::cmp::Ordering::Greater
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MembershipMatrix {
    matrix: DMatrix<f64>,
}

impl MembershipMatrix {
    /// Draw `point_count * cluster_count` uniform values in `[0, 1)`, row by
    /// row, then normalize each row.
    pub fn random<R>(rng: &mut R, point_count: usize, cluster_count: usize) -> Result<Self, Error>
    where
        R: Rng,
    {
        let values: Vec<f64> = (0..point_count * cluster_count)
            .map(|_| rng.gen::<f64>())
            .collect();
        let mut memberships = Self {
            matrix: DMatrix::from_row_slice(point_count, cluster_count, &values),
        };
        memberships.normalize_rows()?;
        Ok(memberships)
    }

    /// Raw (unnormalized) memberships `1 / (d² + epsilon)`, where `d` is the
    /// distance between a point and a center.
    ///
    /// `epsilon` keeps the value finite when a point sits on a center.
    pub fn inverse_squared_distances(
        points: &[Point2D],
        centers: &[Point2D],
        epsilon: f64,
    ) -> Self {
        let matrix = DMatrix::from_fn(points.len(), centers.len(), |i, j| {
            let d = geometry::distance(points[i], centers[j]);
            1.0 / (d * d + epsilon)
        });
        Self { matrix }
    }

    /// Divide each row by its sum.
    ///
    /// Fails if a row sums to zero or to a non-finite value, in which case the
    /// matrix is left partially normalized.
    pub fn normalize_rows(&mut self) -> Result<(), Error> {
        for (point, mut row) in self.matrix.row_iter_mut().enumerate() {
            let sum = row.sum();
            if sum == 0.0 || !sum.is_finite() {
                return Err(Error::DegenerateMembership { point });
            }
            row.unscale_mut(sum);
        }
        Ok(())
    }

    pub fn point_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn cluster_count(&self) -> usize {
        self.matrix.ncols()
    }

    /// Membership of point `point` in cluster `cluster`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, point: usize, cluster: usize) -> f64 {
        self.matrix[(point, cluster)]
    }

    /// Memberships of one point across all clusters.
    pub fn row(&self, point: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.cluster_count()).map(move |cluster| self.matrix[(point, cluster)])
    }

    /// Sum of squared memberships, per cluster.
    pub fn squared_column_sums(&self) -> Vec<f64> {
        self.matrix
            .column_iter()
            .map(|column| column.norm_squared())
            .collect()
    }

    /// Index of the cluster each point belongs to the most.
    ///
    /// Ties go to the lowest cluster index.
    pub fn crisp(&self) -> Vec<usize> {
        self.matrix
            .row_iter()
            .map(|row| {
                row.iter()
                    .copied()
                    .position_max_by(partial_cmp)
                    .unwrap_or(0)
            })
            .collect()
    }

    /// The underlying `point_count × cluster_count` matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    #[cfg(test)]
    pub(crate) fn from_matrix(matrix: DMatrix<f64>) -> Self {
        Self { matrix }
    }

    #[cfg(test)]
    pub(crate) fn from_row_slice(point_count: usize, cluster_count: usize, values: &[f64]) -> Self {
        Self::from_matrix(DMatrix::from_row_slice(point_count, cluster_count, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng as _;

    fn assert_rows_sum_to_one(m: &MembershipMatrix) {
        for i in 0..m.point_count() {
            assert_abs_diff_eq!(m.row(i).sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_random_is_normalized() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(5);
        let m = MembershipMatrix::random(&mut rng, 7, 3).unwrap();
        assert_eq!(m.point_count(), 7);
        assert_eq!(m.cluster_count(), 3);
        assert_eq!(m.as_matrix().shape(), (7, 3));
        assert_rows_sum_to_one(&m);
    }

    #[test]
    fn test_rows_match_matrix() {
        let m = MembershipMatrix::from_row_slice(
            2,
            3,
            &[
                0.2, 0.3, 0.5, //
                0.6, 0.4, 0.0,
            ],
        );
        for (i, row) in m.as_matrix().row_iter().enumerate() {
            assert!(m.row(i).eq(row.iter().copied()));
        }
        assert_eq!(m.as_matrix()[(1, 0)], m.get(1, 0));
        assert_relative_eq!(m.as_matrix().sum(), 2.0);
    }

    #[test]
    fn test_random_zero_row() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 0);
        let err = MembershipMatrix::random(&mut rng, 3, 2).unwrap_err();
        assert!(matches!(err, Error::DegenerateMembership { point: 0 }));
    }

    #[test]
    fn test_inverse_squared_distances() {
        let points = [Point2D::new(0., 0.), Point2D::new(2., 0.)];
        let centers = [Point2D::new(0., 0.), Point2D::new(1., 0.)];
        let mut m = MembershipMatrix::inverse_squared_distances(&points, &centers, 1e-4);
        assert_relative_eq!(m.get(0, 0), 1e4, max_relative = 1e-12);
        assert_relative_eq!(m.get(0, 1), 1.0 / 1.0001, max_relative = 1e-12);
        assert_relative_eq!(m.get(1, 0), 1.0 / 4.0001, max_relative = 1e-12);
        assert_relative_eq!(m.get(1, 1), 1.0 / 1.0001, max_relative = 1e-12);

        m.normalize_rows().unwrap();
        assert_rows_sum_to_one(&m);
        // A point sitting on a center belongs to it almost entirely.
        assert!(m.get(0, 0) > 0.999);
    }

    #[test]
    fn test_squared_column_sums() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        let m = MembershipMatrix::random(&mut rng, 4, 2).unwrap();
        let sums = m.squared_column_sums();
        for (j, sum) in sums.into_iter().enumerate() {
            let expected: f64 = (0..4).map(|i| m.get(i, j).powi(2)).sum();
            assert_relative_eq!(sum, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_crisp() {
        let points = [
            Point2D::new(0., 0.),
            Point2D::new(10., 10.),
            Point2D::new(9., 9.),
        ];
        let centers = [Point2D::new(10., 10.), Point2D::new(0., 1.)];
        let mut m = MembershipMatrix::inverse_squared_distances(&points, &centers, 1e-4);
        m.normalize_rows().unwrap();
        assert_eq!(m.crisp(), vec![1, 0, 0]);
    }

    proptest!(
        #![proptest_config(ProptestConfig{timeout: 2000, ..ProptestConfig::default()})]

        #[test]
        fn random_rows_are_distributions(
            seed in any::<u64>(),
            point_count in 1..50usize,
            cluster_count in 1..10usize,
        ) {
            let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
            let m = MembershipMatrix::random(&mut rng, point_count, cluster_count).unwrap();
            for i in 0..point_count {
                let sum: f64 = m.row(i).sum();
                prop_assert!((sum - 1.0).abs() <= 1e-9, "row {} sums to {}", i, sum);
                prop_assert!(m.row(i).all(|u| (0.0..=1.0).contains(&u)));
            }
        }
    );
}
