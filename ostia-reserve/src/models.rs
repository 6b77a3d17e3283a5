use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reservation status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Consumed,
    Expired,
    Cancelled,
}

/// A spot held for a specific vehicle over a time window. Records are
/// deactivated in place and never deleted, so the audit trail survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    /// Normalized plate of the vehicle this hold belongs to
    pub plate: String,
    pub spot_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl Reservation {
    pub fn new(
        plate: &str,
        spot_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate: plate.to_string(),
            spot_id: spot_id.to_string(),
            starts_at,
            ends_at,
            status: ReservationStatus::Active,
            created_at,
            metadata: serde_json::json!({}),
        }
    }

    /// Past the end of the window, whatever the status says.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }

    /// Still Active and inside its window. Arriving before `starts_at` is
    /// allowed; only the end of the window closes a hold.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Active && !self.is_expired(now)
    }
}
