//! Truck route generation under capacity constraints.

mod truck_routes;

pub use truck_routes::{assign_routes, Assignment, AssignmentIssue};
