//! Tunable planning policy.
//!
//! The priority weighting used for clustering and the fill-rate model used
//! for prediction are policies, not correctness requirements, so both live
//! here as named, serializable parameters.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::models::PriorityTier;

/// Largest cluster the bitmask DP will solve exactly.
pub const DEFAULT_EXACT_LIMIT: usize = 15;

/// Hard ceiling for the exact limit (`20 * 2^20` DP cells).
pub const MAX_EXACT_LIMIT: usize = 20;

/// Score contributed by a bin's priority tier during clustering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    /// Weight of a bin above 80% full.
    pub high: f64,
    /// Weight of a bin above 50% and at most 80% full.
    pub medium: f64,
    /// Weight of a bin at most 50% full.
    pub low: f64,
}

impl PriorityWeights {
    /// Weight for a tier.
    pub fn weight(&self, tier: PriorityTier) -> f64 {
        match tier {
            PriorityTier::High => self.high,
            PriorityTier::Medium => self.medium,
            PriorityTier::Low => self.low,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            high: 3.0,
            medium: 1.0,
            low: 0.0,
        }
    }
}

/// Parameters of cluster extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Weights per priority tier.
    pub priority: PriorityWeights,
    /// Penalty per unit of mean incident MST edge length.
    pub distance_penalty: f64,
    /// Upper bound on bins per cluster.
    pub max_cluster_size: usize,
}

impl ClusterConfig {
    /// Sets the priority weights.
    pub fn with_priority(mut self, priority: PriorityWeights) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the distance penalty factor.
    pub fn with_distance_penalty(mut self, penalty: f64) -> Self {
        self.distance_penalty = penalty;
        self
    }

    /// Sets the maximum cluster size (at least 1).
    pub fn with_max_cluster_size(mut self, size: usize) -> Self {
        self.max_cluster_size = size.max(1);
        self
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            priority: PriorityWeights::default(),
            distance_penalty: 0.5,
            max_cluster_size: 12,
        }
    }
}

/// Parameters of the linear fill-level forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// How far ahead to predict, in hours.
    pub horizon_hours: f64,
    /// Fill rate assumed when a bin has no usable history, in percent per hour.
    pub default_rate_per_hour: f64,
}

impl ForecastConfig {
    /// Sets the forecast horizon.
    pub fn with_horizon_hours(mut self, hours: f64) -> Self {
        self.horizon_hours = hours;
        self
    }

    /// Sets the fallback fill rate.
    pub fn with_default_rate(mut self, rate_per_hour: f64) -> Self {
        self.default_rate_per_hour = rate_per_hour;
        self
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_hours: 24.0,
            default_rate_per_hour: 1.5,
        }
    }
}

/// Configuration of a full planning run.
///
/// # Examples
///
/// ```
/// use waste_routing::config::PlannerConfig;
/// use waste_routing::distance::DistanceMetric;
///
/// let cfg = PlannerConfig::default()
///     .with_metric(DistanceMetric::Euclidean)
///     .with_exact_limit(10);
/// assert_eq!(cfg.exact_limit, 10);
/// assert_eq!(cfg.metric, DistanceMetric::Euclidean);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Distance metric for the graph and everything derived from it.
    pub metric: DistanceMetric,
    /// Cluster extraction policy.
    pub cluster: ClusterConfig,
    /// Largest cluster sequenced exactly; larger ones use the heuristic.
    pub exact_limit: usize,
    /// Fill forecast policy.
    pub forecast: ForecastConfig,
}

impl PlannerConfig {
    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the cluster policy.
    pub fn with_cluster(mut self, cluster: ClusterConfig) -> Self {
        self.cluster = cluster;
        self
    }

    /// Sets the exact-sequencing limit, clamped to [`MAX_EXACT_LIMIT`].
    pub fn with_exact_limit(mut self, limit: usize) -> Self {
        self.exact_limit = limit.min(MAX_EXACT_LIMIT);
        self
    }

    /// Sets the forecast policy.
    pub fn with_forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = forecast;
        self
    }

    /// Parses a JSON configuration. Missing fields take their defaults.
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self, crate::error::PlanError> {
        let cfg: Self = serde_json::from_str(json)?;
        Ok(cfg.with_exact_limit(cfg.exact_limit))
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            cluster: ClusterConfig::default(),
            exact_limit: DEFAULT_EXACT_LIMIT,
            forecast: ForecastConfig::default(),
        }
    }
}
