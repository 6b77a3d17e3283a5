use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use ostia_core::clock::{Clock, SystemClock};
use ostia_core::telemetry::TelemetrySink;
use ostia_core::{CoreError, CoreResult};
use ostia_facility::inventory::SpotInventory;
use ostia_facility::spot::{ParkingSpot, SpotZone};
use ostia_facility::tariff::{elapsed_hours, TariffEngine};
use ostia_facility::vehicle::{normalize_plate, Vehicle};
use ostia_reserve::book::{ReservationBook, ReservationError};
use ostia_reserve::models::Reservation;
use ostia_shared::models::events::{
    ReservationReleasedEvent, SpotReservedEvent, VehicleCheckedInEvent, VehicleCheckedOutEvent,
};
use ostia_shared::pii::Masked;

use crate::app_config::Config;
use crate::finance::{ParkingReceipt, RevenueLedger};

/// Summary of a successful check-in
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub spot_id: String,
    pub zone: SpotZone,
    pub arrived_at: DateTime<Utc>,
    pub via_reservation: bool,
}

/// The lot itself. Owns every table: the spot inventory, the live
/// plate-to-spot occupancy index, the reservation book and the revenue
/// ledger. All state changes go through its methods.
pub struct ParkingLot {
    inventory: SpotInventory,
    occupancy: HashMap<String, String>,
    reservations: ReservationBook,
    tariff: TariffEngine,
    ledger: RevenueLedger,
    clock: Arc<dyn Clock>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl ParkingLot {
    pub fn new(inventory: SpotInventory, tariff: TariffEngine) -> Self {
        Self::with_clock(inventory, tariff, Arc::new(SystemClock))
    }

    pub fn with_clock(
        inventory: SpotInventory,
        tariff: TariffEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inventory,
            occupancy: HashMap::new(),
            reservations: ReservationBook::new(),
            tariff,
            ledger: RevenueLedger::new(),
            clock,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build a lot from loaded configuration.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let spots = config
            .lot
            .spots
            .iter()
            .map(|spec| ParkingSpot::new(&spec.id, spec.size, spec.zone))
            .collect();
        let inventory =
            SpotInventory::new(spots).map_err(|e| CoreError::ValidationError(e.to_string()))?;
        tracing::info!(
            lot = %config.lot.name,
            spots = inventory.len(),
            "initialized lot from configuration"
        );
        Ok(Self::new(inventory, TariffEngine::new(config.tariff.clone())))
    }

    // ==================== Allocation ====================

    /// First unoccupied, size-compatible spot the vehicle may take, scanning
    /// the inventory in its fixed registration order. Non-reserved vehicles
    /// never match VIP spots, and a spot under an active hold is skipped.
    pub fn find_available_spot(&self, vehicle: &Vehicle) -> Option<&ParkingSpot> {
        let now = self.clock.now();
        self.inventory.iter().find(|spot| {
            !spot.is_occupied()
                && spot.fits(vehicle)
                && (vehicle.reserved || spot.zone != SpotZone::Vip)
                && !self.reservations.is_spot_held(&spot.id, now)
        })
    }

    // ==================== Check-in / check-out ====================

    pub fn check_in(&mut self, mut vehicle: Vehicle) -> Result<CheckIn, LotError> {
        let now = self.clock.now();
        // A Vehicle built without Vehicle::new (serde, struct literal) may
        // carry a raw plate; occupancy keys must be normalized.
        vehicle.plate = normalize_plate(&vehicle.plate);
        let plate = vehicle.plate.clone();

        if self.occupancy.contains_key(&plate) {
            return Err(LotError::AlreadyParked(plate));
        }

        // 1. Resolve the target spot. A live hold pins its spot; a standing
        //    hold whose window has passed blocks check-in outright until the
        //    sweep resolves it. Redeemed or released holds are history and
        //    the vehicle goes through general allocation like any walk-in.
        let (spot_id, zone, reservation_id) =
            match self.reservations.find_open_for_plate(&plate, now) {
                Some(reservation) if reservation.is_active(now) => {
                    let spot = self.inventory.get(&reservation.spot_id).ok_or_else(|| {
                        LotError::Internal(format!(
                            "reserved spot {} missing from inventory",
                            reservation.spot_id
                        ))
                    })?;
                    (spot.id.clone(), spot.zone, Some(reservation.id))
                }
                Some(_) => return Err(LotError::ReservationInactive(plate)),
                None => {
                    let spot = self
                        .find_available_spot(&vehicle)
                        .ok_or(LotError::NoSpotAvailable)?;
                    (spot.id.clone(), spot.zone, None)
                }
            };

        // 2. Park the vehicle and index its plate.
        vehicle.arrived_at = now;
        let via_reservation = reservation_id.is_some();
        self.inventory
            .assign(&spot_id, vehicle)
            .map_err(|e| LotError::Internal(e.to_string()))?;
        self.occupancy.insert(plate.clone(), spot_id.clone());

        // 3. A redeemed hold is consumed, never deleted.
        if let Some(reservation_id) = reservation_id {
            self.reservations
                .consume(&reservation_id, now)
                .map_err(|e| LotError::Internal(e.to_string()))?;
        }

        if let Some(ref tel) = self.telemetry {
            tel.record_check_in(&VehicleCheckedInEvent {
                plate: Masked(plate),
                spot_id: spot_id.clone(),
                zone: zone.as_str().to_string(),
                via_reservation,
                checked_in_at: now.timestamp(),
            });
        }

        Ok(CheckIn {
            spot_id,
            zone,
            arrived_at: now,
            via_reservation,
        })
    }

    pub fn check_out(&mut self, plate: &str) -> Result<ParkingReceipt, LotError> {
        let now = self.clock.now();
        let plate = normalize_plate(plate);

        // 1. An unknown plate fails before anything is touched.
        let spot_id = self
            .occupancy
            .remove(&plate)
            .ok_or_else(|| LotError::VehicleNotFound(plate.clone()))?;
        let zone = self
            .inventory
            .get(&spot_id)
            .map(|spot| spot.zone)
            .ok_or_else(|| {
                LotError::Internal(format!("occupied spot {} missing from inventory", spot_id))
            })?;

        // 2. Free the spot and bill the stay.
        let vehicle = self
            .inventory
            .release(&spot_id)
            .map_err(|e| LotError::Internal(e.to_string()))?;
        let duration_hours = elapsed_hours(vehicle.arrived_at, now);
        let fee = self.tariff.fee_for(duration_hours, zone);

        let receipt = ParkingReceipt::new(
            plate.clone(),
            spot_id.clone(),
            zone,
            vehicle.arrived_at,
            now,
            duration_hours,
            fee,
        );
        self.ledger.record(receipt.clone());

        if let Some(ref tel) = self.telemetry {
            tel.record_check_out(&VehicleCheckedOutEvent {
                plate: Masked(plate),
                spot_id,
                zone: zone.as_str().to_string(),
                duration_hours,
                fee,
                checked_out_at: now.timestamp(),
            });
        }

        Ok(receipt)
    }

    // ==================== Reservations ====================

    /// Book a spot for a vehicle over a time window. Runs the same
    /// allocator as walk-in check-in, so an occupied or already held spot
    /// is never double-booked.
    pub fn reserve_spot(
        &mut self,
        vehicle: &Vehicle,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Uuid, LotError> {
        let now = self.clock.now();
        let plate = normalize_plate(&vehicle.plate);

        if ends_at <= starts_at {
            return Err(LotError::InvalidWindow);
        }
        if self.reservations.has_active_for_plate(&plate, now) {
            return Err(LotError::AlreadyReserved(plate));
        }

        let spot_id = self
            .find_available_spot(vehicle)
            .map(|spot| spot.id.clone())
            .ok_or(LotError::NoSpotAvailable)?;

        let reservation = Reservation::new(&plate, &spot_id, starts_at, ends_at, now);
        let reservation_id = reservation.id;

        if let Some(ref tel) = self.telemetry {
            tel.record_reservation(&SpotReservedEvent {
                reservation_id,
                plate: Masked(plate),
                spot_id: spot_id.clone(),
                window_starts_at: starts_at.timestamp(),
                window_ends_at: ends_at.timestamp(),
            });
        }

        self.reservations.store(reservation);
        Ok(reservation_id)
    }

    /// Cancel a live hold, returning its spot to general allocation.
    pub fn cancel_reservation(&mut self, reservation_id: &Uuid) -> Result<(), LotError> {
        let now = self.clock.now();
        let spot_id = self
            .reservations
            .get(reservation_id)
            .map(|r| r.spot_id.clone());

        self.reservations
            .cancel(reservation_id, now)
            .map_err(|e| match e {
                ReservationError::NotFound(id) => LotError::ReservationNotFound(id),
                ReservationError::Expired(id) | ReservationError::AlreadyProcessed(id) => {
                    LotError::ReservationInactive(id)
                }
            })?;

        if let Some(ref tel) = self.telemetry {
            tel.record_release(&ReservationReleasedEvent {
                reservation_id: *reservation_id,
                spot_id: spot_id.unwrap_or_default(),
                reason: "CANCELLED".to_string(),
                released_at: now.timestamp(),
            });
        }

        Ok(())
    }

    /// Sweep holds whose window has passed, marking them expired in place.
    /// Returns how many were swept.
    pub fn expire_due_reservations(&mut self) -> usize {
        let now = self.clock.now();
        let swept = self.reservations.expire_due(now);
        if !swept.is_empty() {
            tracing::info!(count = swept.len(), "expired overdue reservations");
        }

        if let Some(ref tel) = self.telemetry {
            for reservation_id in &swept {
                let spot_id = self
                    .reservations
                    .get(reservation_id)
                    .map(|r| r.spot_id.clone())
                    .unwrap_or_default();
                tel.record_release(&ReservationReleasedEvent {
                    reservation_id: *reservation_id,
                    spot_id,
                    reason: "EXPIRED".to_string(),
                    released_at: now.timestamp(),
                });
            }
        }

        swept.len()
    }

    // ==================== Queries ====================

    pub fn available_spots(&self) -> usize {
        self.inventory.available()
    }

    pub fn zone_availability(&self, zone: SpotZone) -> usize {
        self.inventory.available_in_zone(zone)
    }

    pub fn occupancy_rate(&self) -> f64 {
        self.inventory.occupancy_rate()
    }

    /// Spot currently holding the given plate, if any.
    pub fn occupied_spot_for(&self, plate: &str) -> Option<&str> {
        self.occupancy
            .get(&normalize_plate(plate))
            .map(String::as_str)
    }

    pub fn reservation(&self, reservation_id: &Uuid) -> Option<&Reservation> {
        self.reservations.get(reservation_id)
    }

    pub fn active_reservation_count(&self) -> usize {
        self.reservations.active_count(self.clock.now())
    }

    pub fn inventory(&self) -> &SpotInventory {
        &self.inventory
    }

    pub fn ledger(&self) -> &RevenueLedger {
        &self.ledger
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LotError {
    #[error("No compatible spot available")]
    NoSpotAvailable,

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Vehicle already parked: {0}")]
    AlreadyParked(String),

    #[error("Reservation no longer valid for: {0}")]
    ReservationInactive(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("Plate already holds an active reservation: {0}")]
    AlreadyReserved(String),

    #[error("Reservation window is empty or inverted")]
    InvalidWindow,

    #[error("Internal state error: {0}")]
    Internal(String),
}
