use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::spot::VehicleSize;

/// A vehicle presenting at the gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Normalized license plate, the key for every occupancy lookup
    pub plate: String,
    pub size: VehicleSize,
    /// Whether the driver claims a reservation; grants access to VIP spots
    pub reserved: bool,
    pub arrived_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(plate: &str, size: VehicleSize, reserved: bool) -> Self {
        Self {
            plate: normalize_plate(plate),
            size,
            reserved,
            arrived_at: Utc::now(),
        }
    }
}

/// Gate cameras and kiosks disagree on casing and padding, so plates are
/// uppercased and trimmed before they are used as keys anywhere.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_is_normalized_on_construction() {
        let vehicle = Vehicle::new("  ka-01-hh-1234 ", VehicleSize::Small, false);
        assert_eq!(vehicle.plate, "KA-01-HH-1234");
        assert!(!vehicle.reserved);
    }

    #[test]
    fn test_normalize_plate_is_idempotent() {
        let once = normalize_plate(" mh-12-ab-9 ");
        assert_eq!(normalize_plate(&once), once);
    }
}
