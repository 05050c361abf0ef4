//! Fuzzy C-Means clustering of 2D point sets.
//!
//! Unlike hard clustering, where every point belongs to exactly one cluster,
//! fuzzy clustering gives each point a degree of membership in `[0, 1]` in
//! every cluster, and the memberships of a point sum to one.
//!
//! # Crate Layout
//!
//! [`FuzzyCMeans`] runs the algorithm and returns a [`Fit`]: the cluster
//! centers, the sum of squared memberships of each cluster and the final
//! [`MembershipMatrix`].  It also implements the [`Partition`] trait, which
//! assigns each point to the cluster it belongs to the most.
//!
//! Randomness is only used for initialization and comes from the generator
//! given to [`FuzzyCMeans`], so runs are reproducible with a seeded
//! generator.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

#[cfg(test)]
#[macro_use]
extern crate approx;

mod algorithms;
mod geometry;
mod membership;


pub use crate::algorithms::*;
pub use crate::geometry::{centroid, distance, Point2D};
pub use crate::membership::MembershipMatrix;

pub use nalgebra;
pub use rand;

/// The `Partition` trait allows for partitioning data.
///
/// The generic argument `M` defines the input of the algorithms (e.g. a set
/// of 2D points).
pub trait Partition<M> {
    /// Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    /// Error details, should the algorithm fail to run.
    type Error;

    /// Partition the given data and output the part ID of each element in
    /// `part_ids`.
    ///
    /// Part IDs must be contiguous and start from zero.  If a lower ID does
    /// not appear in the array, the part is assumed to be empty.
    fn partition(&mut self, part_ids: &mut [usize], data: M)
        -> Result<Self::Metadata, Self::Error>;
}

/// Cluster `(x, y)` pairs into `cluster_count` clusters with the default
/// settings, and return the `(x, y, membership_total)` triple of each
/// cluster.
///
/// # Example
///
/// ```rust
/// use rand::SeedableRng as _;
///
/// let points = [(1.0, 2.0), (2.0, 1.5), (3.0, 1.0), (5.0, 4.0), (6.0, 5.0)];
/// let rng = rand::rngs::StdRng::seed_from_u64(12);
///
/// let clusters = fcm::run(&points, 2, rng).unwrap();
/// assert_eq!(clusters.len(), 2);
/// ```
pub fn run<R>(
    points: &[(f64, f64)],
    cluster_count: usize,
    rng: R,
) -> Result<Vec<(f64, f64, f64)>, Error>
where
    R: rand::Rng,
{
    let points: Vec<Point2D> = points.iter().map(|&(x, y)| Point2D::new(x, y)).collect();
    let fit = FuzzyCMeans::new(rng, cluster_count).fit(&points)?;
    Ok(fit
        .clusters
        .into_iter()
        .map(|cluster| (cluster.center.x, cluster.center.y, cluster.membership_total))
        .collect())
}
