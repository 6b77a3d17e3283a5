use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::spot::SpotZone;

/// Billing knobs, loadable from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffConfig {
    /// Hourly rate charged in a Standard spot
    #[serde(default = "default_base_rate")]
    pub base_rate_per_hour: f64,

    /// Surcharge factor for VIP spots
    #[serde(default = "default_vip_multiplier")]
    pub vip_multiplier: f64,

    /// Discount factor for Handicap spots
    #[serde(default = "default_handicap_multiplier")]
    pub handicap_multiplier: f64,
}

fn default_base_rate() -> f64 {
    5.0
}

fn default_vip_multiplier() -> f64 {
    1.5
}

fn default_handicap_multiplier() -> f64 {
    0.5
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            base_rate_per_hour: default_base_rate(),
            vip_multiplier: default_vip_multiplier(),
            handicap_multiplier: default_handicap_multiplier(),
        }
    }
}

/// Pure fee computation over elapsed time and zone
pub struct TariffEngine {
    config: TariffConfig,
}

impl TariffEngine {
    pub fn new(config: TariffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    pub fn zone_multiplier(&self, zone: SpotZone) -> f64 {
        match zone {
            SpotZone::Standard => 1.0,
            SpotZone::Vip => self.config.vip_multiplier,
            SpotZone::Handicap => self.config.handicap_multiplier,
        }
    }

    pub fn hourly_rate(&self, zone: SpotZone) -> f64 {
        self.config.base_rate_per_hour * self.zone_multiplier(zone)
    }

    /// Fee for a stay. Duration is fractional hours and is not rounded up;
    /// half an hour bills half the hourly rate.
    pub fn fee_for(&self, duration_hours: f64, zone: SpotZone) -> f64 {
        duration_hours * self.hourly_rate(zone)
    }
}

impl Default for TariffEngine {
    fn default() -> Self {
        Self::new(TariffConfig::default())
    }
}

/// Elapsed stay length in fractional hours, millisecond precision.
pub fn elapsed_hours(arrived_at: DateTime<Utc>, departed_at: DateTime<Utc>) -> f64 {
    (departed_at - arrived_at).num_milliseconds() as f64 / 3_600_000.0
}
