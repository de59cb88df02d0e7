//! # waste-routing
//!
//! Waste-collection route planning over geolocated bins with time-varying
//! fill levels: an MST backbone, priority-aware clustering, exact
//! intra-cluster sequencing, and capacity-constrained truck assignment.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Bin, Truck, Route, optimization history)
//! - [`distance`] — Distance matrix and complete bin graph
//! - [`mst`] — Kruskal MST with union-find
//! - [`cluster`] — Priority-weighted clustering over the MST
//! - [`sequencing`] — Bitmask DP sequencing with a 2-opt fallback
//! - [`assignment`] — Capacity-constrained truck routes
//! - [`prediction`] — Fill-level forecast and simulation step
//! - [`index`] — B+Tree bin index
//! - [`planner`] — End-to-end pipeline
//! - [`config`] — Tunable planning policy
//! - [`demo`] — Built-in demonstration data

pub mod assignment;
pub mod cluster;
pub mod config;
pub mod demo;
pub mod distance;
pub mod error;
pub mod index;
pub mod models;
pub mod mst;
pub mod planner;
pub mod prediction;
pub mod sequencing;

pub use error::PlanError;
