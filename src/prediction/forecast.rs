//! Linear fill-level forecast.

use std::collections::{BTreeMap, HashMap};

use crate::config::ForecastConfig;
use crate::models::{Bin, BinId};

/// Observed fill levels per bin, as `(hour, level)` samples.
///
/// # Examples
///
/// ```
/// use waste_routing::prediction::FillHistory;
///
/// let mut h = FillHistory::new();
/// h.record(1, 0.0, 20);
/// h.record(1, 4.0, 40);
/// assert_eq!(h.rate(1), Some(5.0));
/// assert_eq!(h.rate(2), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FillHistory {
    samples: HashMap<BinId, Vec<(f64, u8)>>,
}

impl FillHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fill level observed at `hour`.
    pub fn record(&mut self, bin_id: BinId, hour: f64, level: u8) {
        self.samples.entry(bin_id).or_default().push((hour, level.min(100)));
    }

    /// Records the current level of every bin at `hour`.
    pub fn record_snapshot(&mut self, bins: &[Bin], hour: f64) {
        for bin in bins {
            self.record(bin.id(), hour, bin.fill_level());
        }
    }

    /// Fill rate in percent per hour from the two most recent samples.
    ///
    /// `None` if there are fewer than two samples or they are not strictly
    /// increasing in time.
    pub fn rate(&self, bin_id: BinId) -> Option<f64> {
        let samples = self.samples.get(&bin_id)?;
        let [.., (t0, l0), (t1, l1)] = samples.as_slice() else {
            return None;
        };
        let dt = t1 - t0;
        if !(dt > 0.0) {
            return None;
        }
        Some((f64::from(*l1) - f64::from(*l0)) / dt)
    }
}

/// Predicts future fill levels by linear extrapolation.
///
/// The rate per bin comes from its [`FillHistory`] when one is attached and
/// usable; a negative observed rate (the bin was emptied) falls back to the
/// configured default. Every prediction is clipped to `[0, 100]`.
#[derive(Debug, Clone, Default)]
pub struct FillPredictor {
    config: ForecastConfig,
    history: Option<FillHistory>,
}

impl FillPredictor {
    /// Creates a predictor with the given forecast policy.
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            config,
            history: None,
        }
    }

    /// Attaches observed history.
    pub fn with_history(mut self, history: FillHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// The forecast policy.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Rate used for one bin, in percent per hour.
    pub fn rate_for(&self, bin_id: BinId) -> f64 {
        self.history
            .as_ref()
            .and_then(|h| h.rate(bin_id))
            .filter(|r| r.is_finite() && *r >= 0.0)
            .unwrap_or(self.config.default_rate_per_hour)
    }

    /// Predicted level of one bin at the configured horizon.
    pub fn predict(&self, bin: &Bin) -> f64 {
        let current = f64::from(bin.fill_level());
        let predicted = current + self.rate_for(bin.id()) * self.config.horizon_hours;
        if predicted.is_nan() {
            return current;
        }
        predicted.clamp(0.0, 100.0)
    }

    /// One prediction per bin ID.
    pub fn predict_all(&self, bins: &[Bin]) -> BTreeMap<BinId, f64> {
        bins.iter().map(|b| (b.id(), self.predict(b))).collect()
    }
}

/// Predicts fill levels with the default forecast policy.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Bin;
/// use waste_routing::prediction::predict_fill_levels;
///
/// let bins = vec![
///     Bin::at(1, 0.0, 0.0, 20, 100.0).unwrap(),
///     Bin::at(2, 0.0, 0.0, 95, 100.0).unwrap(),
/// ];
/// let predicted = predict_fill_levels(&bins);
/// assert_eq!(predicted.len(), 2);
/// assert!((predicted[&1] - 56.0).abs() < 1e-10);
/// assert_eq!(predicted[&2], 100.0);
/// ```
pub fn predict_fill_levels(bins: &[Bin]) -> BTreeMap<BinId, f64> {
    FillPredictor::default().predict_all(bins)
}
