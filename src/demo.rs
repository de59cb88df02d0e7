//! Built-in demonstration data set.
//!
//! Ten bins around central London with 100 kg capacity each, and two trucks
//! of 400 kg and 300 kg.

use crate::models::{Bin, BinId, Location, Truck};

const DEMO_BINS: [(BinId, f64, f64, u8); 10] = [
    (1, 51.505, -0.09, 85),
    (2, 51.51, -0.1, 30),
    (3, 51.515, -0.09, 90),
    (4, 51.52, -0.1, 40),
    (5, 51.518, -0.08, 75),
    (6, 51.51, -0.05, 95),
    (7, 51.505, -0.06, 20),
    (8, 51.508, -0.11, 60),
    (9, 51.512, -0.07, 82),
    (10, 51.502, -0.08, 45),
];

const DEMO_BIN_CAPACITY: f64 = 100.0;

const DEMO_TRUCKS: [(u32, f64); 2] = [(1, 400.0), (2, 300.0)];

/// The demo bins, in ID order.
pub fn demo_bins() -> Vec<Bin> {
    DEMO_BINS
        .iter()
        .filter_map(|&(id, lat, lng, fill)| {
            let location = Location::new(lat, lng).ok()?;
            Bin::new(id, location, fill, DEMO_BIN_CAPACITY).ok()
        })
        .collect()
}

/// The demo trucks.
pub fn demo_trucks() -> Vec<Truck> {
    DEMO_TRUCKS
        .iter()
        .filter_map(|&(id, capacity)| Truck::new(id, capacity).ok())
        .collect()
}
