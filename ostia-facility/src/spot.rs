use serde::{Deserialize, Serialize};

use crate::vehicle::Vehicle;

/// Vehicle footprint classes, ordered by how much room they need
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleSize {
    Small,
    Medium,
    Large,
}

impl VehicleSize {
    /// A vehicle fits any spot at least as large as itself.
    pub fn fits_in(self, spot_size: VehicleSize) -> bool {
        self <= spot_size
    }
}

/// Zone a spot belongs to, which drives both access and billing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotZone {
    Standard,
    Vip,
    Handicap,
}

impl SpotZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotZone::Standard => "STANDARD",
            SpotZone::Vip => "VIP",
            SpotZone::Handicap => "HANDICAP",
        }
    }
}

/// A single parking bay. Occupancy is exactly the presence of an occupant;
/// there is no separate flag to drift out of sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: String,
    pub size: VehicleSize,
    pub zone: SpotZone,
    occupant: Option<Vehicle>,
}

impl ParkingSpot {
    pub fn new(id: &str, size: VehicleSize, zone: SpotZone) -> Self {
        Self {
            id: id.to_string(),
            size,
            zone,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&Vehicle> {
        self.occupant.as_ref()
    }

    /// Can this spot physically take the vehicle, ignoring zone rules?
    pub fn fits(&self, vehicle: &Vehicle) -> bool {
        vehicle.size.fits_in(self.size)
    }

    pub(crate) fn assign(&mut self, vehicle: Vehicle) -> Option<Vehicle> {
        self.occupant.replace(vehicle)
    }

    pub(crate) fn release(&mut self) -> Option<Vehicle> {
        self.occupant.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::Vehicle;

    #[test]
    fn test_size_ordering_matches_fit_rules() {
        assert!(VehicleSize::Small.fits_in(VehicleSize::Small));
        assert!(VehicleSize::Small.fits_in(VehicleSize::Large));
        assert!(VehicleSize::Medium.fits_in(VehicleSize::Large));
        assert!(!VehicleSize::Large.fits_in(VehicleSize::Medium));
        assert!(!VehicleSize::Medium.fits_in(VehicleSize::Small));
    }

    #[test]
    fn test_enum_wire_format() {
        let size = serde_json::to_string(&VehicleSize::Medium).unwrap();
        assert_eq!(size, "\"MEDIUM\"");
        let zone: SpotZone = serde_json::from_str("\"HANDICAP\"").unwrap();
        assert_eq!(zone, SpotZone::Handicap);
        assert_eq!(zone.as_str(), "HANDICAP");
    }

    #[test]
    fn test_occupancy_follows_occupant() {
        let mut spot = ParkingSpot::new("A-01", VehicleSize::Medium, SpotZone::Standard);
        assert!(!spot.is_occupied());

        let previous = spot.assign(Vehicle::new("ka-01-hh-1234", VehicleSize::Small, false));
        assert!(previous.is_none());
        assert!(spot.is_occupied());
        assert_eq!(spot.occupant().unwrap().plate, "KA-01-HH-1234");

        let released = spot.release().unwrap();
        assert_eq!(released.plate, "KA-01-HH-1234");
        assert!(!spot.is_occupied());
        assert!(spot.release().is_none());
    }
}
