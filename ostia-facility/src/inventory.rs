use std::collections::HashSet;

use crate::spot::{ParkingSpot, SpotZone};
use crate::vehicle::Vehicle;

/// In-memory registry of every spot in the facility. All occupancy changes
/// go through here so the spot list and its counts cannot disagree.
///
/// Spots keep the order they were registered in; allocation scans that order,
/// so layout order is the allocation preference order.
#[derive(Debug)]
pub struct SpotInventory {
    spots: Vec<ParkingSpot>,
}

impl SpotInventory {
    pub fn new(spots: Vec<ParkingSpot>) -> Result<Self, InventoryError> {
        let mut seen = HashSet::new();
        for spot in &spots {
            if !seen.insert(spot.id.clone()) {
                return Err(InventoryError::DuplicateSpot(spot.id.clone()));
            }
        }
        Ok(Self { spots })
    }

    pub fn get(&self, spot_id: &str) -> Option<&ParkingSpot> {
        self.spots.iter().find(|spot| spot.id == spot_id)
    }

    /// Spots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParkingSpot> {
        self.spots.iter()
    }

    /// Park a vehicle in the given spot.
    pub fn assign(&mut self, spot_id: &str, vehicle: Vehicle) -> Result<(), InventoryError> {
        let spot = self
            .spots
            .iter_mut()
            .find(|spot| spot.id == spot_id)
            .ok_or_else(|| InventoryError::SpotNotFound(spot_id.to_string()))?;

        if spot.is_occupied() {
            return Err(InventoryError::SpotOccupied(spot_id.to_string()));
        }
        spot.assign(vehicle);
        Ok(())
    }

    /// Clear the given spot, returning the vehicle that was parked there.
    pub fn release(&mut self, spot_id: &str) -> Result<Vehicle, InventoryError> {
        let spot = self
            .spots
            .iter_mut()
            .find(|spot| spot.id == spot_id)
            .ok_or_else(|| InventoryError::SpotNotFound(spot_id.to_string()))?;

        spot.release()
            .ok_or_else(|| InventoryError::SpotVacant(spot_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn available(&self) -> usize {
        self.spots.iter().filter(|spot| !spot.is_occupied()).count()
    }

    pub fn available_in_zone(&self, zone: SpotZone) -> usize {
        self.spots
            .iter()
            .filter(|spot| spot.zone == zone && !spot.is_occupied())
            .count()
    }

    /// Occupied fraction of the whole facility, 0.0 for an empty layout.
    pub fn occupancy_rate(&self) -> f64 {
        if self.spots.is_empty() {
            0.0
        } else {
            let occupied = self.spots.iter().filter(|spot| spot.is_occupied()).count();
            occupied as f64 / self.spots.len() as f64
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Spot not found: {0}")]
    SpotNotFound(String),

    #[error("Spot already occupied: {0}")]
    SpotOccupied(String),

    #[error("Spot already vacant: {0}")]
    SpotVacant(String),

    #[error("Duplicate spot id in layout: {0}")]
    DuplicateSpot(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spot::VehicleSize;

    fn small_lot() -> SpotInventory {
        SpotInventory::new(vec![
            ParkingSpot::new("A-01", VehicleSize::Small, SpotZone::Standard),
            ParkingSpot::new("A-02", VehicleSize::Medium, SpotZone::Standard),
            ParkingSpot::new("V-01", VehicleSize::Large, SpotZone::Vip),
            ParkingSpot::new("H-01", VehicleSize::Medium, SpotZone::Handicap),
        ])
        .unwrap()
    }

    #[test]
    fn test_occupancy_lifecycle() {
        let mut inventory = small_lot();
        assert_eq!(inventory.len(), 4);
        assert_eq!(inventory.available(), 4);
        assert_eq!(inventory.occupancy_rate(), 0.0);

        inventory
            .assign("A-02", Vehicle::new("KA-01-AB-1", VehicleSize::Medium, false))
            .unwrap();
        assert_eq!(inventory.available(), 3);
        assert_eq!(inventory.available_in_zone(SpotZone::Standard), 1);
        assert!((inventory.occupancy_rate() - 0.25).abs() < 1e-9);

        let vehicle = inventory.release("A-02").unwrap();
        assert_eq!(vehicle.plate, "KA-01-AB-1");
        assert_eq!(inventory.available(), 4);
        assert_eq!(inventory.occupancy_rate(), 0.0);
    }

    #[test]
    fn test_double_assign_is_rejected() {
        let mut inventory = small_lot();
        inventory
            .assign("A-01", Vehicle::new("P-1", VehicleSize::Small, false))
            .unwrap();
        let err = inventory
            .assign("A-01", Vehicle::new("P-2", VehicleSize::Small, false))
            .unwrap_err();
        assert!(matches!(err, InventoryError::SpotOccupied(_)));
        // The original occupant is untouched.
        assert_eq!(inventory.get("A-01").unwrap().occupant().unwrap().plate, "P-1");
    }

    #[test]
    fn test_release_vacant_and_unknown_spots() {
        let mut inventory = small_lot();
        assert!(matches!(
            inventory.release("A-01"),
            Err(InventoryError::SpotVacant(_))
        ));
        assert!(matches!(
            inventory.release("Z-99"),
            Err(InventoryError::SpotNotFound(_))
        ));
        assert!(inventory.get("Z-99").is_none());
    }

    #[test]
    fn test_duplicate_layout_rejected() {
        let err = SpotInventory::new(vec![
            ParkingSpot::new("A-01", VehicleSize::Small, SpotZone::Standard),
            ParkingSpot::new("A-01", VehicleSize::Large, SpotZone::Vip),
        ])
        .unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateSpot(id) if id == "A-01"));
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let inventory = small_lot();
        let ids: Vec<&str> = inventory.iter().map(|spot| spot.id.as_str()).collect();
        assert_eq!(ids, vec!["A-01", "A-02", "V-01", "H-01"]);
    }
}
