use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ostia_facility::spot::SpotZone;
use ostia_shared::pii::Masked;

/// Invoice for one completed parking session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingReceipt {
    pub id: Uuid,
    pub plate: Masked<String>,
    pub spot_id: String,
    pub zone: SpotZone,
    pub arrived_at: DateTime<Utc>,
    pub departed_at: DateTime<Utc>,
    pub duration_hours: f64,
    pub fee: f64,
}

impl ParkingReceipt {
    pub fn new(
        plate: String,
        spot_id: String,
        zone: SpotZone,
        arrived_at: DateTime<Utc>,
        departed_at: DateTime<Utc>,
        duration_hours: f64,
        fee: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate: Masked(plate),
            spot_id,
            zone,
            arrived_at,
            departed_at,
            duration_hours,
            fee,
        }
    }
}

/// Append-only record of every settled session
pub struct RevenueLedger {
    entries: Vec<ParkingReceipt>,
}

impl RevenueLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, receipt: ParkingReceipt) {
        self.entries.push(receipt);
    }

    pub fn entries(&self) -> &[ParkingReceipt] {
        &self.entries
    }

    pub fn receipt_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_collected(&self) -> f64 {
        self.entries.iter().map(|r| r.fee).sum()
    }

    /// Settlement-style summary grouped by zone.
    pub fn report(&self) -> serde_json::Value {
        let mut by_zone: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for receipt in &self.entries {
            let slot = by_zone.entry(receipt.zone.as_str()).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += receipt.fee;
        }

        let zones: serde_json::Map<String, serde_json::Value> = by_zone
            .into_iter()
            .map(|(zone, (sessions, collected))| {
                (
                    zone.to_string(),
                    serde_json::json!({
                        "sessions": sessions,
                        "collected": collected,
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "report_date": Utc::now().to_rfc3339(),
            "metrics": {
                "sessions": self.receipt_count(),
                "total_collected": self.total_collected(),
                "by_zone": zones,
            }
        })
    }
}

impl Default for RevenueLedger {
    fn default() -> Self {
        Self::new()
    }
}
