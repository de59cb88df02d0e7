//! Domain model types for waste-collection planning.
//!
//! Bins with locations and fill levels, trucks with capacities, routes as
//! ordered pickup sequences, and the append-only optimization history.

mod bin;
mod record;
mod route;
mod truck;

pub use bin::{
    high_priority_ids, Bin, BinId, Location, PriorityTier, HIGH_PRIORITY_THRESHOLD,
    MEDIUM_PRIORITY_THRESHOLD,
};
pub use record::{OptimizationHistory, OptimizationRecord, PlanSummary, RouteComparison};
pub use route::Route;
pub use truck::Truck;
