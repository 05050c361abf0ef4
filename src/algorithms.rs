use std::fmt;

mod fuzzy_c_means;

pub use fuzzy_c_means::weighted_centers;
pub use fuzzy_c_means::Capacity;
pub use fuzzy_c_means::Cluster;
pub use fuzzy_c_means::Convergence;
pub use fuzzy_c_means::Fit;
pub use fuzzy_c_means::FuzzyCMeans;
pub use fuzzy_c_means::Outcome;
pub use fuzzy_c_means::EPSILON;
pub use fuzzy_c_means::MAX_ITERATIONS;

/// Broad classes of [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed data or parameters the algorithm cannot run on.
    /// Nothing has been computed.
    InvalidInput,

    /// The computation hit a zero or non-finite denominator and was aborted.
    NumericDegeneracy,
}

/// Common errors thrown by algorithms.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The data set is empty.
    EmptyInput,

    /// The cluster count is zero or greater than the number of points.
    InvalidClusterCount {
        requested: usize,
        point_count: usize,
    },

    /// The input is larger than the configured capacity.
    CapacityExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// A point has a NaN or infinite coordinate.
    NonFiniteInput { index: usize },

    /// Input sets don't have matching lengths.
    InputLenMismatch { expected: usize, actual: usize },

    /// The memberships of a point sum to zero or to a non-finite value.
    DegenerateMembership { point: usize },

    /// The squared memberships of a cluster sum to zero, so its center is
    /// undefined.
    DegenerateCluster { cluster: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput
            | Error::InvalidClusterCount { .. }
            | Error::CapacityExceeded { .. }
            | Error::NonFiniteInput { .. }
            | Error::InputLenMismatch { .. } => ErrorKind::InvalidInput,
            Error::DegenerateMembership { .. } | Error::DegenerateCluster { .. } => {
                ErrorKind::NumericDegeneracy
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input"),
            Error::InvalidClusterCount {
                requested,
                point_count,
            } => {
                write!(f, "cannot form {requested} clusters from {point_count} points")
            }
            Error::CapacityExceeded {
                what,
                limit,
                actual,
            } => {
                write!(f, "too many {what} (limit is {limit}, got {actual})")
            }
            Error::NonFiniteInput { index } => {
                write!(f, "point #{index} has a non-finite coordinate")
            }
            Error::InputLenMismatch { expected, actual } => write!(
                f,
                "input sets don't have the same length (expected {expected} items, got {actual})",
            ),
            Error::DegenerateMembership { point } => {
                write!(f, "memberships of point #{point} cannot be normalized")
            }
            Error::DegenerateCluster { cluster } => {
                write!(f, "cluster #{cluster} has no membership weight")
            }
        }
    }
}

impl std::error::Error for Error {}
