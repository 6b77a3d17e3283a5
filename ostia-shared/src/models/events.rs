use uuid::Uuid;

use crate::pii::Masked;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct VehicleCheckedInEvent {
    pub plate: Masked<String>,
    pub spot_id: String,
    pub zone: String,
    pub via_reservation: bool,
    pub checked_in_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct VehicleCheckedOutEvent {
    pub plate: Masked<String>,
    pub spot_id: String,
    pub zone: String,
    pub duration_hours: f64,
    pub fee: f64,
    pub checked_out_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SpotReservedEvent {
    pub reservation_id: Uuid,
    pub plate: Masked<String>,
    pub spot_id: String,
    pub window_starts_at: i64,
    pub window_ends_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationReleasedEvent {
    pub reservation_id: Uuid,
    pub spot_id: String,
    pub reason: String,
    pub released_at: i64,
}
