//! Error type for planning operations.

use std::fmt;

use crate::models::BinId;

/// Errors raised when planner input violates a precondition.
///
/// Conditions the planner can work around (an oversized cluster, a truck
/// fleet that runs out of room) are reported as data on the results instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A bin record failed validation.
    InvalidBin { id: BinId, reason: String },
    /// A truck record failed validation.
    InvalidTruck { id: u32, reason: String },
    /// Coordinates outside the valid latitude/longitude range.
    InvalidLocation { lat: f64, lng: f64 },
    /// Two distinct bins share an id.
    DuplicateBinId(BinId),
    /// Two distinct trucks share an id.
    DuplicateTruckId(u32),
    /// A bin id that is not part of the graph.
    UnknownBin(BinId),
    /// B+Tree order below the minimum of 3.
    InvalidOrder(usize),
    /// Configuration could not be parsed.
    Config(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InvalidBin { id, reason } => write!(f, "invalid bin #{id}: {reason}"),
            PlanError::InvalidTruck { id, reason } => write!(f, "invalid truck #{id}: {reason}"),
            PlanError::InvalidLocation { lat, lng } => {
                write!(f, "invalid location [{lat}, {lng}]")
            }
            PlanError::DuplicateBinId(id) => write!(f, "duplicate bin id {id}"),
            PlanError::DuplicateTruckId(id) => write!(f, "duplicate truck id {id}"),
            PlanError::UnknownBin(id) => write!(f, "bin {id} is not part of the graph"),
            PlanError::InvalidOrder(order) => {
                write!(f, "B+Tree order must be at least 3, got {order}")
            }
            PlanError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for PlanError {}

#[cfg(feature = "json")]
impl From<serde_json::Error> for PlanError {
    fn from(e: serde_json::Error) -> Self {
        PlanError::Config(e.to_string())
    }
}
