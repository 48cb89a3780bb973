use crate::Clusters::cluster::N_AXES;
use thiserror::Error;

/// error types of the network builder, the coefficient synthesizer and the evaluation entry points
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Cluster {0} does not exist in the network")]
    UnknownCluster(usize),
    #[error("Cluster {0} is not a super-cluster")]
    NotASuperCluster(usize),
    #[error("Production reaction {0} does not exist in the network")]
    UnknownProductionReaction(usize),
    #[error("Dissociation reaction {0} does not exist in the network")]
    UnknownDissociationReaction(usize),
    #[error("Cluster {cluster} does not take part in reaction {reaction}")]
    NotAParticipant { cluster: usize, reaction: usize },
    #[error("Invalid moment configuration: {0}")]
    InvalidMoments(String),
    #[error("Empty overlap on axis {axis}: width {width}")]
    EmptyOverlap { axis: usize, width: i32 },
    #[error("Overlap derivation needs exactly one grouped partner, found {0}")]
    GroupedPartners(usize),
    #[error("Expected {expected} coefficients, got {got}")]
    CoefficientCount { expected: usize, got: usize },
    #[error("Rate array has {got} grid points, the network has {expected}")]
    RateLength { expected: usize, got: usize },
    #[error("Membership list of {name} has {got} entries, the group declares {expected}")]
    MembershipCount {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("Bounds of {name} on axis {axis} are inverted: [{lo}, {hi}]")]
    InvertedBounds {
        name: String,
        axis: usize,
        lo: i32,
        hi: i32,
    },
    #[error("Member {member:?} of {name} lies outside its bounds on axis {axis}")]
    MemberOutOfBounds {
        name: String,
        member: [i32; N_AXES],
        axis: usize,
    },
    #[error("Dispersion of {name} on axis {axis} is {value}, it must be positive")]
    NonPositiveDispersion {
        name: String,
        axis: usize,
        value: f64,
    },
    #[error("Global index {index} has no partial derivative slot for column {column}")]
    UnmappedPartialIndex { column: usize, index: usize },
    #[error("Zeroth moment specialization needs psDim == 1, the network tracks psDim == {0}")]
    MomentsTracked(usize),
    #[error("State vector has {got} entries, the network has {expected} unknowns")]
    StateLength { expected: usize, got: usize },
    #[error("Grid point {xi} is out of range, the network has {grid_points} grid points")]
    GridIndex { xi: usize, grid_points: usize },
    #[error("Overlap contribution of cluster {cluster} to reaction {reaction} names no product")]
    MissingProduct { cluster: usize, reaction: usize },
    #[error("Section '{0}' not found in the document")]
    MissingSection(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}
