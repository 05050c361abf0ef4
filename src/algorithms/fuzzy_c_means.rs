//! Fuzzy C-Means clustering of 2D points, with a fixed fuzziness exponent of
//! two.
//!
//! Each iteration moves every center to the mean of all points weighted by
//! their squared membership, then recomputes memberships from the inverse
//! squared distances to the new centers.

use super::Error;
use crate::geometry::{self, Point2D};
use crate::membership::MembershipMatrix;
use approx::AbsDiffEq;
use rand::Rng;

/// Default iteration cap.
pub const MAX_ITERATIONS: usize = 100;

/// Default convergence threshold, also used to keep memberships finite when a
/// point coincides with a center.
pub const EPSILON: f64 = 1e-4;

/// When candidate centers are committed relative to the convergence check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Convergence {
    /// Compare the candidate centers against the committed ones first, and
    /// stop without committing them (nor updating memberships) if no center
    /// moved more than epsilon. The reported centers are those of the
    /// previous iteration.
    #[default]
    Deferred,

    /// Update memberships and commit the candidate centers, then stop if no
    /// center moved more than epsilon.
    Committed,
}

/// Upper bounds on the input size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity {
    pub max_points: usize,
    pub max_clusters: usize,
}

impl Capacity {
    pub const UNBOUNDED: Capacity = Capacity {
        max_points: usize::MAX,
        max_clusters: usize::MAX,
    };

    /// 100 points, 10 clusters.
    pub const SMALL: Capacity = Capacity {
        max_points: 100,
        max_clusters: 10,
    };
}

impl Default for Capacity {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cluster {
    pub center: Point2D,

    /// Sum of the squared memberships of all points in this cluster.
    pub membership_total: f64,
}

impl AbsDiffEq for Cluster {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.center.abs_diff_eq(&other.center, epsilon)
            && self
                .membership_total
                .abs_diff_eq(&other.membership_total, epsilon)
    }
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No center moved more than epsilon.
    Converged,

    /// The iteration cap was reached first.
    Exhausted,
}

/// Result of [`FuzzyCMeans::fit`].
#[derive(Clone, Debug)]
pub struct Fit {
    pub clusters: Vec<Cluster>,

    /// Memberships as of the last committed iteration.
    pub memberships: MembershipMatrix,

    /// Number of iterations whose centers have been committed.
    pub iterations: usize,

    pub outcome: Outcome,
}

impl Fit {
    pub fn centers(&self) -> Vec<Point2D> {
        self.clusters.iter().map(|cluster| cluster.center).collect()
    }

    /// Index of the cluster each point belongs to the most.
    pub fn crisp_assignments(&self) -> Vec<usize> {
        self.memberships.crisp()
    }
}

/// Centers of mass of the points, weighted by squared memberships.
///
/// Fails with [`Error::DegenerateCluster`] when the weights of a cluster sum
/// to zero.
pub fn weighted_centers(
    points: &[Point2D],
    memberships: &MembershipMatrix,
) -> Result<Vec<Point2D>, Error> {
    debug_assert_eq!(points.len(), memberships.point_count());

    (0..memberships.cluster_count())
        .map(|cluster| {
            let (weighted_sum, weight_sum) = points.iter().enumerate().fold(
                (Point2D::zeros(), 0.0),
                |(weighted_sum, weight_sum), (i, point)| {
                    let weight = memberships.get(i, cluster).powi(2);
                    (weighted_sum + point * weight, weight_sum + weight)
                },
            );
            if weight_sum == 0.0 {
                return Err(Error::DegenerateCluster { cluster });
            }
            Ok(weighted_sum / weight_sum)
        })
        .collect()
}

fn validate(points: &[Point2D], cluster_count: usize, capacity: Capacity) -> Result<(), Error> {
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    if capacity.max_points < points.len() {
        return Err(Error::CapacityExceeded {
            what: "points",
            limit: capacity.max_points,
            actual: points.len(),
        });
    }
    if cluster_count == 0 || points.len() < cluster_count {
        return Err(Error::InvalidClusterCount {
            requested: cluster_count,
            point_count: points.len(),
        });
    }
    if capacity.max_clusters < cluster_count {
        return Err(Error::CapacityExceeded {
            what: "clusters",
            limit: capacity.max_clusters,
            actual: cluster_count,
        });
    }
    if let Some(index) = points
        .iter()
        .position(|point| !point.x.is_finite() || !point.y.is_finite())
    {
        return Err(Error::NonFiniteInput { index });
    }
    Ok(())
}

fn fuzzy_c_means<R>(
    points: &[Point2D],
    cluster_count: usize,
    rng: &mut R,
    max_iter: usize,
    epsilon: f64,
    convergence: Convergence,
) -> Result<Fit, Error>
where
    R: Rng,
{
    let span = tracing::info_span!(
        "fuzzy_c_means",
        points = points.len(),
        clusters = cluster_count
    );
    let _enter = span.enter();

    let mut memberships = MembershipMatrix::random(rng, points.len(), cluster_count)?;
    let mut clusters: Vec<Cluster> = (0..cluster_count)
        .map(|_| Cluster {
            center: points[rng.gen_range(0..points.len())],
            membership_total: 0.0,
        })
        .collect();

    let mut iteration = 0;
    let mut outcome = Outcome::Exhausted;

    while iteration < max_iter {
        let new_centers = weighted_centers(points, &memberships)?;

        let movements: Vec<f64> = clusters
            .iter()
            .zip(&new_centers)
            .map(|(cluster, new_center)| geometry::distance(cluster.center, *new_center))
            .collect();
        let converged = movements.iter().all(|movement| *movement <= epsilon);
        let max_movement = movements.iter().cloned().fold(0.0, f64::max);
        tracing::debug!(iteration, max_movement, "computed candidate centers");

        if converged && convergence == Convergence::Deferred {
            outcome = Outcome::Converged;
            break;
        }

        // Centers must all be known before memberships are recomputed.
        memberships = MembershipMatrix::inverse_squared_distances(points, &new_centers, epsilon);
        memberships.normalize_rows()?;

        let totals = memberships.squared_column_sums();
        for ((cluster, center), total) in clusters.iter_mut().zip(new_centers).zip(totals) {
            cluster.center = center;
            cluster.membership_total = total;
        }

        iteration += 1;

        if converged {
            outcome = Outcome::Converged;
            break;
        }
    }

    match outcome {
        Outcome::Converged => tracing::info!("converged after {} iterations", iteration),
        Outcome::Exhausted => {
            tracing::info!("stopped after {} iterations without converging", iteration)
        }
    }

    Ok(Fit {
        clusters,
        memberships,
        iterations: iteration,
        outcome,
    })
}

/// Fuzzy C-Means clustering.
///
/// Memberships are initialized at random from `rng`, and each cluster starts
/// centered on a random input point (two clusters may start on the same
/// point).
///
/// # Example
///
/// ```rust
/// use fcm::FuzzyCMeans;
/// use fcm::Point2D;
/// use rand::SeedableRng as _;
///
/// let points = [
///     Point2D::new(1.0, 2.0),
///     Point2D::new(2.0, 1.5),
///     Point2D::new(3.0, 1.0),
///     Point2D::new(5.0, 4.0),
///     Point2D::new(6.0, 5.0),
/// ];
///
/// let rng = rand::rngs::StdRng::seed_from_u64(0);
/// let fit = FuzzyCMeans::new(rng, 2).fit(&points).unwrap();
///
/// assert_eq!(fit.clusters.len(), 2);
/// assert!(fit.iterations <= fcm::MAX_ITERATIONS);
/// ```
#[derive(Debug)]
pub struct FuzzyCMeans<R> {
    pub rng: R,
    pub cluster_count: usize,
    pub max_iter: usize,
    pub epsilon: f64,
    pub convergence: Convergence,
    pub capacity: Capacity,
}

impl<R> FuzzyCMeans<R> {
    pub fn new(rng: R, cluster_count: usize) -> Self {
        Self {
            rng,
            cluster_count,
            max_iter: MAX_ITERATIONS,
            epsilon: EPSILON,
            convergence: Convergence::default(),
            capacity: Capacity::default(),
        }
    }
}

impl<R> FuzzyCMeans<R>
where
    R: Rng,
{
    /// Cluster the given points.
    ///
    /// Input is validated before anything is computed.
    pub fn fit(&mut self, points: &[Point2D]) -> Result<Fit, Error> {
        validate(points, self.cluster_count, self.capacity)?;
        fuzzy_c_means(
            points,
            self.cluster_count,
            &mut self.rng,
            self.max_iter,
            self.epsilon,
            self.convergence,
        )
    }
}

impl<'a, R> crate::Partition<&'a [Point2D]> for FuzzyCMeans<R>
where
    R: Rng,
{
    type Metadata = Fit;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        points: &'a [Point2D],
    ) -> Result<Self::Metadata, Self::Error> {
        if part_ids.len() != points.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: points.len(),
            });
        }
        let fit = self.fit(points)?;
        part_ids.copy_from_slice(&fit.crisp_assignments());
        Ok(fit)
    }
}
