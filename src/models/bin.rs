//! Bin, location, and priority tier types.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Identifier of a bin. Always positive.
pub type BinId = u32;

/// Fill level above which a bin is high priority.
pub const HIGH_PRIORITY_THRESHOLD: u8 = 80;

/// Fill level above which a bin is medium priority.
pub const MEDIUM_PRIORITY_THRESHOLD: u8 = 50;

/// A geographic position in degrees.
///
/// # Examples
///
/// ```
/// use waste_routing::models::Location;
///
/// let loc = Location::new(51.505, -0.09).unwrap();
/// assert_eq!(loc.lat(), 51.505);
/// assert!(Location::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    lat: f64,
    lng: f64,
}

/// Unchecked wire form of [`Location`].
#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = PlanError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.lat, raw.lng)
    }
}

impl Location {
    /// Creates a location.
    ///
    /// Fails if either coordinate is non-finite or outside
    /// [-90, 90] x [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self, PlanError> {
        if !lat.is_finite()
            || !lng.is_finite()
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=180.0).contains(&lng)
        {
            return Err(PlanError::InvalidLocation { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance in kilometres (haversine, R = 6371 km).
    pub fn haversine_km(&self, other: &Location) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Planar distance on raw degree coordinates.
    pub fn euclidean(&self, other: &Location) -> f64 {
        let dx = self.lat - other.lat;
        let dy = self.lng - other.lng;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Collection urgency derived from a fill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    /// Fill level at most 50%.
    Low,
    /// Fill level above 50% and at most 80%.
    Medium,
    /// Fill level above 80%.
    High,
}

impl PriorityTier {
    /// Classifies a fill level percentage.
    pub fn from_fill_level(fill_level: u8) -> Self {
        if fill_level > HIGH_PRIORITY_THRESHOLD {
            PriorityTier::High
        } else if fill_level > MEDIUM_PRIORITY_THRESHOLD {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }
}

/// A geolocated waste bin.
///
/// # Examples
///
/// ```
/// use waste_routing::models::{Bin, Location, PriorityTier};
///
/// let bin = Bin::new(1, Location::new(51.505, -0.09).unwrap(), 85, 100.0).unwrap();
/// assert_eq!(bin.id(), 1);
/// assert_eq!(bin.priority(), PriorityTier::High);
/// assert!((bin.waste_kg() - 85.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBin")]
pub struct Bin {
    id: BinId,
    location: Location,
    fill_level: u8,
    capacity: f64,
}

/// Unchecked wire form of [`Bin`].
#[derive(Deserialize)]
struct RawBin {
    id: BinId,
    location: Location,
    fill_level: u8,
    capacity: f64,
}

impl TryFrom<RawBin> for Bin {
    type Error = PlanError;

    fn try_from(raw: RawBin) -> Result<Self, Self::Error> {
        Bin::new(raw.id, raw.location, raw.fill_level, raw.capacity)
    }
}

impl Bin {
    /// Creates a bin.
    ///
    /// Fails if `id` is zero, `fill_level` exceeds 100, or `capacity` is not
    /// a positive finite number.
    pub fn new(
        id: BinId,
        location: Location,
        fill_level: u8,
        capacity: f64,
    ) -> Result<Self, PlanError> {
        if id == 0 {
            return Err(PlanError::InvalidBin {
                id,
                reason: "id must be positive".to_string(),
            });
        }
        if fill_level > 100 {
            return Err(PlanError::InvalidBin {
                id,
                reason: format!("fill level {fill_level} exceeds 100"),
            });
        }
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(PlanError::InvalidBin {
                id,
                reason: format!("capacity {capacity} must be positive"),
            });
        }
        Ok(Self {
            id,
            location,
            fill_level,
            capacity,
        })
    }

    /// Shorthand for `Bin::new` with raw coordinates.
    pub fn at(
        id: BinId,
        lat: f64,
        lng: f64,
        fill_level: u8,
        capacity: f64,
    ) -> Result<Self, PlanError> {
        Self::new(id, Location::new(lat, lng)?, fill_level, capacity)
    }

    /// Returns a copy with a different fill level, capped at 100.
    pub fn with_fill_level(&self, fill_level: u8) -> Self {
        Self {
            fill_level: fill_level.min(100),
            ..self.clone()
        }
    }

    /// Bin ID.
    pub fn id(&self) -> BinId {
        self.id
    }

    /// Geographic location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Fill level percentage (0..=100).
    pub fn fill_level(&self) -> u8 {
        self.fill_level
    }

    /// Capacity in kg.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Waste currently held: `capacity * fill_level / 100`.
    pub fn waste_kg(&self) -> f64 {
        self.capacity * f64::from(self.fill_level) / 100.0
    }

    /// Priority tier for this bin's fill level.
    pub fn priority(&self) -> PriorityTier {
        PriorityTier::from_fill_level(self.fill_level)
    }

    /// Returns `true` if the fill level is above 80%.
    pub fn is_high_priority(&self) -> bool {
        self.priority() == PriorityTier::High
    }
}

/// IDs of all high-priority bins, in input order.
pub fn high_priority_ids(bins: &[Bin]) -> Vec<BinId> {
    bins.iter()
        .filter(|b| b.is_high_priority())
        .map(Bin::id)
        .collect()
}
