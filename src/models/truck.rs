//! Collection truck type.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A collection truck.
///
/// The current load is informational. Planning treats every truck as
/// starting empty.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Truck;
///
/// let t = Truck::new(1, 400.0).unwrap();
/// assert_eq!(t.id(), 1);
/// assert_eq!(t.capacity(), 400.0);
/// assert_eq!(t.current_load(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTruck")]
pub struct Truck {
    id: u32,
    capacity: f64,
    current_load: f64,
}

/// Unchecked wire form of [`Truck`].
#[derive(Deserialize)]
struct RawTruck {
    id: u32,
    capacity: f64,
    #[serde(default)]
    current_load: f64,
}

impl TryFrom<RawTruck> for Truck {
    type Error = PlanError;

    fn try_from(raw: RawTruck) -> Result<Self, Self::Error> {
        Truck::new(raw.id, raw.capacity)?.with_current_load(raw.current_load)
    }
}

impl Truck {
    /// Creates an empty truck with the given ID and capacity in kg.
    pub fn new(id: u32, capacity: f64) -> Result<Self, PlanError> {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(PlanError::InvalidTruck {
                id,
                reason: format!("capacity {capacity} must be positive"),
            });
        }
        Ok(Self {
            id,
            capacity,
            current_load: 0.0,
        })
    }

    /// Sets the current load, which must lie within `0..=capacity`.
    pub fn with_current_load(mut self, load: f64) -> Result<Self, PlanError> {
        if !load.is_finite() || load < 0.0 || load > self.capacity {
            return Err(PlanError::InvalidTruck {
                id: self.id,
                reason: format!("current load {load} outside 0..={}", self.capacity),
            });
        }
        self.current_load = load;
        Ok(self)
    }

    /// Truck ID.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Maximum load in kg.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Load reported by the operator.
    pub fn current_load(&self) -> f64 {
        self.current_load
    }

    /// Share of capacity currently used, in percent.
    pub fn load_percentage(&self) -> f64 {
        self.current_load / self.capacity * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truck_new() {
        let t = Truck::new(2, 300.0).expect("valid");
        assert_eq!(t.id(), 2);
        assert_eq!(t.capacity(), 300.0);
        assert_eq!(t.current_load(), 0.0);
    }

    #[test]
    fn test_truck_invalid_capacity() {
        assert!(Truck::new(1, 0.0).is_err());
        assert!(Truck::new(1, -10.0).is_err());
        assert!(Truck::new(1, f64::INFINITY).is_err());
    }

    #[test]
    fn test_truck_current_load() {
        let t = Truck::new(1, 200.0)
            .and_then(|t| t.with_current_load(50.0))
            .expect("valid");
        assert_eq!(t.current_load(), 50.0);
        assert!((t.load_percentage() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_deserialize_validates() {
        let t: Truck = serde_json::from_str(r#"{"id":3,"capacity":300.0}"#).expect("valid");
        assert_eq!(t, Truck::new(3, 300.0).expect("valid"));

        let loaded: Truck =
            serde_json::from_str(r#"{"id":3,"capacity":300.0,"current_load":120.0}"#)
                .expect("valid");
        assert_eq!(loaded.current_load(), 120.0);

        assert!(serde_json::from_str::<Truck>(r#"{"id":1,"capacity":-5.0}"#).is_err());
        assert!(serde_json::from_str::<Truck>(r#"{"id":1,"capacity":0.0}"#).is_err());
        let over = r#"{"id":1,"capacity":100.0,"current_load":150.0}"#;
        assert!(serde_json::from_str::<Truck>(over).is_err());
    }

    #[test]
    fn test_truck_overloaded_rejected() {
        let t = Truck::new(1, 200.0).expect("valid");
        assert!(t.clone().with_current_load(250.0).is_err());
        assert!(t.with_current_load(-1.0).is_err());
    }
}
