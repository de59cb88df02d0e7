//! Route type.

use serde::{Deserialize, Serialize};

use super::BinId;

/// An ordered sequence of bin pickups assigned to one truck.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Route;
///
/// let route = Route::new(1, vec![3, 5, 4], 2.5, 180.0);
/// assert_eq!(route.truck_id(), 1);
/// assert_eq!(route.len(), 3);
/// assert_eq!(route.bin_sequence(), &[3, 5, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    truck_id: u32,
    bin_sequence: Vec<BinId>,
    total_distance: f64,
    total_waste_collected: f64,
}

impl Route {
    /// Creates a route with precomputed totals.
    pub fn new(
        truck_id: u32,
        bin_sequence: Vec<BinId>,
        total_distance: f64,
        total_waste_collected: f64,
    ) -> Self {
        Self {
            truck_id,
            bin_sequence,
            total_distance,
            total_waste_collected,
        }
    }

    /// Returns the truck serving this route.
    pub fn truck_id(&self) -> u32 {
        self.truck_id
    }

    /// Bin IDs in visiting order.
    pub fn bin_sequence(&self) -> &[BinId] {
        &self.bin_sequence
    }

    /// Number of bins on this route.
    pub fn len(&self) -> usize {
        self.bin_sequence.len()
    }

    /// Returns `true` if this route visits no bins.
    pub fn is_empty(&self) -> bool {
        self.bin_sequence.is_empty()
    }

    /// Sum of consecutive leg distances along the sequence.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Waste picked up along this route, in kg.
    pub fn total_waste_collected(&self) -> f64 {
        self.total_waste_collected
    }

    /// Waste collected per unit distance, or 0 for a zero-length route.
    pub fn efficiency(&self) -> f64 {
        if self.total_distance > 0.0 {
            self.total_waste_collected / self.total_distance
        } else {
            0.0
        }
    }
}
