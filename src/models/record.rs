//! Optimization history, plan summaries, and route-set comparison.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::Route;

/// Aggregate figures over a set of routes.
///
/// # Examples
///
/// ```
/// use waste_routing::models::{PlanSummary, Route};
///
/// let routes = vec![
///     Route::new(1, vec![1, 2], 3.0, 150.0),
///     Route::new(2, vec![3], 1.0, 50.0),
/// ];
/// let s = PlanSummary::from_routes(&routes);
/// assert_eq!(s.route_count, 2);
/// assert!((s.efficiency - 50.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Distance summed over all routes.
    pub total_distance: f64,
    /// Waste summed over all routes, in kg.
    pub total_waste: f64,
    /// Number of routes.
    pub route_count: usize,
    /// Mean distance per route (0 without routes).
    pub average_distance: f64,
    /// Waste per unit distance (0 without distance).
    pub efficiency: f64,
}

impl PlanSummary {
    /// Computes the summary of a route set.
    pub fn from_routes(routes: &[Route]) -> Self {
        let total_distance: f64 = routes.iter().map(Route::total_distance).sum();
        let total_waste: f64 = routes.iter().map(Route::total_waste_collected).sum();
        let route_count = routes.len();
        let average_distance = if route_count > 0 {
            total_distance / route_count as f64
        } else {
            0.0
        };
        let efficiency = if total_distance > 0.0 {
            total_waste / total_distance
        } else {
            0.0
        };
        Self {
            total_distance,
            total_waste,
            route_count,
            average_distance,
            efficiency,
        }
    }
}

/// One entry of the optimization history. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecord {
    timestamp: SystemTime,
    total_distance: f64,
    total_waste: f64,
    route_count: usize,
    high_priority_bins: usize,
}

impl OptimizationRecord {
    /// Creates a record from a route set, stamped with the given time.
    pub fn new(timestamp: SystemTime, routes: &[Route], high_priority_bins: usize) -> Self {
        let summary = PlanSummary::from_routes(routes);
        Self {
            timestamp,
            total_distance: summary.total_distance,
            total_waste: summary.total_waste,
            route_count: summary.route_count,
            high_priority_bins,
        }
    }

    /// When the optimization ran.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Total route distance.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Total waste planned for collection.
    pub fn total_waste(&self) -> f64 {
        self.total_waste
    }

    /// Number of routes generated.
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Number of bins above the high-priority threshold at planning time.
    pub fn high_priority_bins(&self) -> usize {
        self.high_priority_bins
    }
}

/// Append-only log of optimization runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationHistory {
    records: Vec<OptimizationRecord>,
}

impl OptimizationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: OptimizationRecord) {
        self.records.push(record);
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[OptimizationRecord] {
        &self.records
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&OptimizationRecord> {
        self.records.last()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shortest total distance seen so far.
    pub fn best_distance(&self) -> Option<f64> {
        self.records
            .iter()
            .map(OptimizationRecord::total_distance)
            .min_by(f64::total_cmp)
    }
}

/// Difference between the current and the previous route set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteComparison {
    /// Current minus previous total distance.
    pub distance_diff: f64,
    /// Distance change relative to the previous total, in percent.
    pub distance_percent: f64,
    /// Current minus previous total waste.
    pub waste_diff: f64,
    /// Waste change relative to the previous total, in percent.
    pub waste_percent: f64,
    /// The current plan drives less.
    pub is_distance_better: bool,
    /// The current plan collects more.
    pub is_waste_better: bool,
}

impl RouteComparison {
    /// Compares two route sets. Returns `None` if either is empty.
    pub fn between(current: &[Route], previous: &[Route]) -> Option<Self> {
        if current.is_empty() || previous.is_empty() {
            return None;
        }
        let cur = PlanSummary::from_routes(current);
        let prev = PlanSummary::from_routes(previous);

        let distance_diff = cur.total_distance - prev.total_distance;
        let waste_diff = cur.total_waste - prev.total_waste;

        Some(Self {
            distance_diff,
            distance_percent: percent_of(distance_diff, prev.total_distance),
            waste_diff,
            waste_percent: percent_of(waste_diff, prev.total_waste),
            is_distance_better: distance_diff < 0.0,
            is_waste_better: waste_diff > 0.0,
        })
    }
}

fn percent_of(diff: f64, base: f64) -> f64 {
    if base != 0.0 {
        diff / base * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn routes_a() -> Vec<Route> {
        vec![
            Route::new(1, vec![1, 2], 4.0, 100.0),
            Route::new(2, vec![3], 6.0, 50.0),
        ]
    }

    #[test]
    fn test_summary_empty() {
        let s = PlanSummary::from_routes(&[]);
        assert_eq!(s.route_count, 0);
        assert_eq!(s.total_distance, 0.0);
        assert_eq!(s.average_distance, 0.0);
        assert_eq!(s.efficiency, 0.0);
    }

    #[test]
    fn test_summary_totals() {
        let s = PlanSummary::from_routes(&routes_a());
        assert!((s.total_distance - 10.0).abs() < 1e-10);
        assert!((s.total_waste - 150.0).abs() < 1e-10);
        assert!((s.average_distance - 5.0).abs() < 1e-10);
        assert!((s.efficiency - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_record_from_routes() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let r = OptimizationRecord::new(at, &routes_a(), 4);
        assert_eq!(r.timestamp(), at);
        assert_eq!(r.route_count(), 2);
        assert_eq!(r.high_priority_bins(), 4);
        assert!((r.total_waste() - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_history_append_only() {
        let mut h = OptimizationHistory::new();
        assert!(h.is_empty());
        assert!(h.best_distance().is_none());
        h.push(OptimizationRecord::new(SystemTime::UNIX_EPOCH, &routes_a(), 1));
        h.push(OptimizationRecord::new(
            SystemTime::UNIX_EPOCH,
            &[Route::new(1, vec![1], 2.0, 10.0)],
            0,
        ));
        assert_eq!(h.len(), 2);
        assert_eq!(h.latest().map(|r| r.route_count()), Some(1));
        assert_eq!(h.best_distance(), Some(2.0));
    }

    #[test]
    fn test_comparison_requires_both_sets() {
        assert!(RouteComparison::between(&routes_a(), &[]).is_none());
        assert!(RouteComparison::between(&[], &routes_a()).is_none());
    }

    #[test]
    fn test_comparison_diffs() {
        let current = vec![Route::new(1, vec![1, 2, 3], 8.0, 180.0)];
        let cmp = RouteComparison::between(&current, &routes_a()).expect("both non-empty");
        assert!((cmp.distance_diff + 2.0).abs() < 1e-10);
        assert!((cmp.distance_percent + 20.0).abs() < 1e-10);
        assert!((cmp.waste_diff - 30.0).abs() < 1e-10);
        assert!((cmp.waste_percent - 20.0).abs() < 1e-10);
        assert!(cmp.is_distance_better);
        assert!(cmp.is_waste_better);
    }

    #[test]
    fn test_comparison_zero_base() {
        let previous = vec![Route::new(1, vec![1], 0.0, 0.0)];
        let current = vec![Route::new(1, vec![1, 2], 3.0, 40.0)];
        let cmp = RouteComparison::between(&current, &previous).expect("both non-empty");
        assert_eq!(cmp.distance_percent, 0.0);
        assert_eq!(cmp.waste_percent, 0.0);
        assert!(!cmp.is_distance_better);
    }
}
