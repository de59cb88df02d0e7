//! One tick of the fill-level simulation.
//!
//! Each step picks a random bin and raises its level by 5 to 14 points,
//! capped at 100. Callers re-plan when the updated bin is above the
//! high-priority threshold.

use rand::Rng;

use crate::models::{Bin, BinId, HIGH_PRIORITY_THRESHOLD};

/// Smallest increase applied by one step.
pub const MIN_FILL_INCREASE: u8 = 5;
/// Largest increase applied by one step.
pub const MAX_FILL_INCREASE: u8 = 14;

/// Outcome of [`advance_simulation`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationStep {
    /// Bins after the step, in input order.
    pub bins: Vec<Bin>,
    /// The bin that was filled, `None` if there were no bins.
    pub updated: Option<BinId>,
    /// `true` if the updated bin crossed from at-or-below to above the
    /// high-priority threshold in this step.
    pub crossed_high_priority: bool,
    /// `true` if the updated bin is now above the high-priority threshold.
    pub requires_replan: bool,
}

/// Advances the simulation by one step.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use waste_routing::models::Bin;
/// use waste_routing::prediction::advance_simulation;
///
/// let bins = vec![Bin::at(1, 0.0, 0.0, 78, 100.0).unwrap()];
/// let mut rng = StdRng::seed_from_u64(7);
/// let step = advance_simulation(&bins, &mut rng);
/// assert_eq!(step.updated, Some(1));
/// assert!(step.bins[0].fill_level() > 80);
/// assert!(step.crossed_high_priority);
/// ```
pub fn advance_simulation<R: Rng + ?Sized>(bins: &[Bin], rng: &mut R) -> SimulationStep {
    let mut next = bins.to_vec();
    if next.is_empty() {
        return SimulationStep {
            bins: next,
            updated: None,
            crossed_high_priority: false,
            requires_replan: false,
        };
    }

    let index = rng.random_range(0..next.len());
    let increase = rng.random_range(MIN_FILL_INCREASE..=MAX_FILL_INCREASE);
    let before = next[index].fill_level();
    let after = before.saturating_add(increase).min(100);
    next[index] = next[index].with_fill_level(after);

    let crossed = before <= HIGH_PRIORITY_THRESHOLD && after > HIGH_PRIORITY_THRESHOLD;
    let id = next[index].id();
    tracing::debug!(bin = id, before, after, crossed, "simulation step");

    SimulationStep {
        bins: next,
        updated: Some(id),
        crossed_high_priority: crossed,
        requires_replan: after > HIGH_PRIORITY_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bins(levels: &[u8]) -> Vec<Bin> {
        levels
            .iter()
            .enumerate()
            .map(|(i, &f)| Bin::at(i as BinId + 1, 0.0, 0.0, f, 100.0).expect("valid"))
            .collect()
    }

    #[test]
    fn test_empty_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let step = advance_simulation(&[], &mut rng);
        assert!(step.bins.is_empty());
        assert_eq!(step.updated, None);
        assert!(!step.requires_replan);
    }

    #[test]
    fn test_exactly_one_bin_changes() {
        let input = bins(&[10, 20, 30, 40, 50]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let step = advance_simulation(&input, &mut rng);
            let id = step.updated.expect("non-empty");
            for (old, new) in input.iter().zip(&step.bins) {
                assert_eq!(old.id(), new.id());
                if old.id() == id {
                    let inc = new.fill_level() - old.fill_level();
                    assert!((MIN_FILL_INCREASE..=MAX_FILL_INCREASE).contains(&inc));
                } else {
                    assert_eq!(old, new);
                }
            }
        }
    }

    #[test]
    fn test_capped_at_100() {
        let input = bins(&[97]);
        let mut rng = StdRng::seed_from_u64(3);
        let step = advance_simulation(&input, &mut rng);
        assert_eq!(step.bins[0].fill_level(), 100);
        assert!(step.requires_replan);
        assert!(!step.crossed_high_priority);
    }

    #[test]
    fn test_low_bin_no_replan() {
        let input = bins(&[0]);
        let mut rng = StdRng::seed_from_u64(9);
        let step = advance_simulation(&input, &mut rng);
        assert!(step.bins[0].fill_level() <= MAX_FILL_INCREASE);
        assert!(!step.requires_replan);
        assert!(!step.crossed_high_priority);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let input = bins(&[10, 20, 30]);
        let a = advance_simulation(&input, &mut StdRng::seed_from_u64(5));
        let b = advance_simulation(&input, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
