//! End-to-end route planning.
//!
//! Runs the stages in dependency order:
//!
//! ```text
//! bins -> graph -> MST -> clusters -> sequences -> truck routes
//! ```
//!
//! and stamps the result as an [`OptimizationRecord`]. Fill predictions are
//! computed alongside from the same bin set.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::assignment::{assign_routes, Assignment};
use crate::cluster::{extract_clusters_with, Cluster};
use crate::config::PlannerConfig;
use crate::distance::{build_graph_with, Edge, Graph};
use crate::error::PlanError;
use crate::models::{
    high_priority_ids, Bin, BinId, OptimizationHistory, OptimizationRecord, PlanSummary, Route,
    RouteComparison, Truck,
};
use crate::mst::compute_mst;
use crate::prediction::FillPredictor;
use crate::sequencing::{sequence_cluster_with, SequencedCluster};

/// Everything one planning run produced.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Distance graph over the input bins.
    pub graph: Graph,
    /// MST edges, ascending by weight.
    pub mst: Vec<Edge>,
    /// Clusters in extraction order.
    pub clusters: Vec<Cluster>,
    /// One sequence per cluster, same order as `clusters`.
    pub sequenced: Vec<SequencedCluster>,
    /// Routes and assignment issues.
    pub assignment: Assignment,
    /// IDs of bins above the high-priority threshold, in input order.
    pub high_priority: Vec<BinId>,
    /// Forecast fill level per bin.
    pub predictions: BTreeMap<BinId, f64>,
    /// History entry for this run.
    pub record: OptimizationRecord,
}

impl PlanOutcome {
    /// The planned routes.
    pub fn routes(&self) -> &[Route] {
        &self.assignment.routes
    }

    /// Dashboard figures over the planned routes.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_routes(self.routes())
    }

    /// Change relative to an earlier route set, `None` if either is empty.
    pub fn compare_with(&self, previous: &[Route]) -> Option<RouteComparison> {
        RouteComparison::between(self.routes(), previous)
    }
}

/// Pipeline driver holding the planning policy.
///
/// # Examples
///
/// ```
/// use waste_routing::demo::{demo_bins, demo_trucks};
/// use waste_routing::planner::RoutePlanner;
///
/// let outcome = RoutePlanner::default().plan(&demo_bins(), &demo_trucks()).unwrap();
/// assert_eq!(outcome.mst.len(), 9);
/// assert_eq!(outcome.high_priority, vec![1, 3, 6, 9]);
/// assert!(outcome.assignment.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutePlanner {
    config: PlannerConfig,
}

impl RoutePlanner {
    /// Creates a planner with the given policy.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// The planning policy.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans routes, stamping the record with the current time.
    pub fn plan(&self, bins: &[Bin], trucks: &[Truck]) -> Result<PlanOutcome, PlanError> {
        self.plan_at(bins, trucks, SystemTime::now())
    }

    /// Plans routes, stamping the record with `timestamp`.
    ///
    /// Fails on duplicate bin or truck IDs. Capacity shortfalls are not
    /// errors; they show up as [`crate::assignment::AssignmentIssue`]s.
    pub fn plan_at(
        &self,
        bins: &[Bin],
        trucks: &[Truck],
        timestamp: SystemTime,
    ) -> Result<PlanOutcome, PlanError> {
        let graph = build_graph_with(bins, self.config.metric)?;
        let mst = compute_mst(&graph);
        let clusters = extract_clusters_with(bins, &mst, &self.config.cluster);
        tracing::debug!(
            bins = graph.len(),
            mst_edges = mst.len(),
            clusters = clusters.len(),
            "built MST backbone"
        );

        let sequenced = clusters
            .iter()
            .map(|c| sequence_cluster_with(c, &graph, self.config.exact_limit))
            .collect::<Result<Vec<_>, _>>()?;

        let high_priority = high_priority_ids(bins);
        let assignment = assign_routes(&sequenced, trucks, &high_priority, &graph)?;
        let predictions = FillPredictor::new(self.config.forecast).predict_all(bins);
        let record = OptimizationRecord::new(timestamp, &assignment.routes, high_priority.len());

        tracing::info!(
            routes = record.route_count(),
            total_distance = record.total_distance(),
            total_waste = record.total_waste(),
            high_priority = high_priority.len(),
            issues = assignment.issues.len(),
            "route plan computed"
        );

        Ok(PlanOutcome {
            graph,
            mst,
            clusters,
            sequenced,
            assignment,
            high_priority,
            predictions,
            record,
        })
    }

    /// Plans routes and appends the record to `history`.
    pub fn plan_into(
        &self,
        bins: &[Bin],
        trucks: &[Truck],
        history: &mut OptimizationHistory,
    ) -> Result<PlanOutcome, PlanError> {
        let outcome = self.plan(bins, trucks)?;
        history.push(outcome.record.clone());
        Ok(outcome)
    }
}
