use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Reservation, ReservationStatus};

/// Registry of every reservation ever taken. Lifecycle transitions happen
/// in place; nothing is removed, so a consumed or expired hold stays
/// visible to reporting.
pub struct ReservationBook {
    reservations: HashMap<Uuid, Reservation>,
}

impl ReservationBook {
    pub fn new() -> Self {
        Self {
            reservations: HashMap::new(),
        }
    }

    pub fn store(&mut self, reservation: Reservation) {
        self.reservations.insert(reservation.id, reservation);
    }

    pub fn get(&self, reservation_id: &Uuid) -> Option<&Reservation> {
        self.reservations.get(reservation_id)
    }

    /// The active hold for a plate, if any. At most one exists because
    /// booking rejects a plate that already holds an active reservation.
    pub fn find_active_for_plate(&self, plate: &str, now: DateTime<Utc>) -> Option<&Reservation> {
        self.reservations
            .values()
            .find(|r| r.plate == plate && r.is_active(now))
    }

    pub fn has_active_for_plate(&self, plate: &str, now: DateTime<Utc>) -> bool {
        self.find_active_for_plate(plate, now).is_some()
    }

    /// The plate's standing hold: a record still in Active status, whether
    /// or not its window has passed. Prefers a live one. Consumed, expired
    /// and cancelled records are never returned.
    pub fn find_open_for_plate(&self, plate: &str, now: DateTime<Utc>) -> Option<&Reservation> {
        self.find_active_for_plate(plate, now).or_else(|| {
            self.reservations
                .values()
                .find(|r| r.plate == plate && r.status == ReservationStatus::Active)
        })
    }

    /// Whether any reservation, active or not, was ever taken for a plate.
    pub fn has_for_plate(&self, plate: &str) -> bool {
        self.reservations.values().any(|r| r.plate == plate)
    }

    /// A spot under an active hold is off limits to general allocation.
    pub fn is_spot_held(&self, spot_id: &str, now: DateTime<Utc>) -> bool {
        self.reservations
            .values()
            .any(|r| r.spot_id == spot_id && r.is_active(now))
    }

    /// Mark a hold consumed after its vehicle checks in.
    pub fn consume(
        &mut self,
        reservation_id: &Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        self.transition(reservation_id, now, ReservationStatus::Consumed)
    }

    /// Cancel a hold, freeing its spot for general allocation.
    pub fn cancel(
        &mut self,
        reservation_id: &Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        self.transition(reservation_id, now, ReservationStatus::Cancelled)
    }

    fn transition(
        &mut self,
        reservation_id: &Uuid,
        now: DateTime<Utc>,
        to: ReservationStatus,
    ) -> Result<(), ReservationError> {
        let reservation = self
            .reservations
            .get_mut(reservation_id)
            .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()))?;

        match reservation.status {
            ReservationStatus::Active if reservation.is_expired(now) => {
                Err(ReservationError::Expired(reservation_id.to_string()))
            }
            ReservationStatus::Active => {
                reservation.status = to;
                Ok(())
            }
            ReservationStatus::Expired => {
                Err(ReservationError::Expired(reservation_id.to_string()))
            }
            _ => Err(ReservationError::AlreadyProcessed(reservation_id.to_string())),
        }
    }

    /// Sweep holds whose window has passed, marking them Expired. Returns
    /// the ids that were swept; records stay in the book.
    pub fn expire_due(&mut self, now: DateTime<Utc>) -> Vec<Uuid> {
        let mut swept = Vec::new();
        for reservation in self.reservations.values_mut() {
            if reservation.status == ReservationStatus::Active && reservation.is_expired(now) {
                reservation.status = ReservationStatus::Expired;
                swept.push(reservation.id);
            }
        }
        swept
    }

    pub fn active_count(&self, now: DateTime<Utc>) -> usize {
        self.reservations.values().filter(|r| r.is_active(now)).count()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

impl Default for ReservationBook {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Reservation expired: {0}")]
    Expired(String),

    #[error("Reservation already processed: {0}")]
    AlreadyProcessed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn window_at(hour: u32) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap();
        (start, start + Duration::hours(2))
    }

    #[test]
    fn test_hold_lifecycle() {
        let mut book = ReservationBook::new();
        let (start, end) = window_at(10);
        let mut reservation = Reservation::new("KA-01-HH-1234", "V-01", start, end, start);
        reservation.metadata = serde_json::json!({"channel": "KIOSK"});
        let id = reservation.id;

        book.store(reservation);
        let now = start + Duration::minutes(30);
        assert!(book.has_active_for_plate("KA-01-HH-1234", now));
        assert!(book.is_spot_held("V-01", now));
        assert_eq!(book.active_count(now), 1);

        book.consume(&id, now).unwrap();
        assert!(!book.has_active_for_plate("KA-01-HH-1234", now));
        assert!(!book.is_spot_held("V-01", now));
        // The record survives consumption, metadata included.
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&id).unwrap().status, ReservationStatus::Consumed);
        assert_eq!(book.get(&id).unwrap().metadata["channel"], "KIOSK");
    }

    #[test]
    fn test_sweep_marks_but_keeps_records() {
        let mut book = ReservationBook::new();
        let (start, end) = window_at(8);
        let overdue = Reservation::new("AA-1", "A-01", start, end, start);
        let overdue_id = overdue.id;
        let (late_start, late_end) = window_at(13);
        let live = Reservation::new("BB-2", "A-02", late_start, late_end, start);
        book.store(overdue);
        book.store(live);

        let now = end + Duration::hours(1);
        let swept = book.expire_due(now);
        assert_eq!(swept, vec![overdue_id]);
        assert_eq!(book.len(), 2);
        assert_eq!(book.get(&overdue_id).unwrap().status, ReservationStatus::Expired);
        assert_eq!(book.active_count(now), 1);

        // A second sweep finds nothing new.
        assert!(book.expire_due(now).is_empty());
    }

    #[test]
    fn test_open_hold_lookup() {
        let mut book = ReservationBook::new();
        let (start, end) = window_at(9);
        let reservation = Reservation::new("DD-4", "A-03", start, end, start);
        let id = reservation.id;
        book.store(reservation);

        // Live within the window.
        let open = book.find_open_for_plate("DD-4", start + Duration::hours(1)).unwrap();
        assert_eq!(open.id, id);

        // Still standing after the window passes, until the sweep runs.
        let overdue = end + Duration::hours(1);
        assert!(book.find_active_for_plate("DD-4", overdue).is_none());
        assert!(book.find_open_for_plate("DD-4", overdue).is_some());

        book.expire_due(overdue);
        assert!(book.find_open_for_plate("DD-4", overdue).is_none());
    }

    #[test]
    fn test_transition_guards() {
        let mut book = ReservationBook::new();
        let (start, end) = window_at(10);
        let reservation = Reservation::new("CC-3", "H-01", start, end, start);
        let id = reservation.id;
        book.store(reservation);

        let missing = Uuid::new_v4();
        assert!(matches!(
            book.consume(&missing, start),
            Err(ReservationError::NotFound(_))
        ));

        // Window passed but not yet swept.
        assert!(matches!(
            book.consume(&id, end + Duration::seconds(1)),
            Err(ReservationError::Expired(_))
        ));

        let now = start + Duration::minutes(5);
        book.cancel(&id, now).unwrap();
        assert!(matches!(
            book.consume(&id, now),
            Err(ReservationError::AlreadyProcessed(_))
        ));
        assert!(book.has_for_plate("CC-3"));
        assert!(!book.has_active_for_plate("CC-3", now));
    }
}
