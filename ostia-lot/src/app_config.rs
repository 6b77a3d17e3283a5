use serde::Deserialize;
use std::env;

use ostia_facility::spot::{SpotZone, VehicleSize};
use ostia_facility::tariff::TariffConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub lot: LotConfig,
    pub tariff: TariffConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LotConfig {
    pub name: String,
    pub spots: Vec<SpotSpec>,
}

/// One spot in the configured layout. Order in the file is allocation
/// preference order.
#[derive(Debug, Deserialize, Clone)]
pub struct SpotSpec {
    pub id: String,
    pub size: VehicleSize,
    pub zone: SpotZone,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of OSTIA)
            // Eg.. `OSTIA_TARIFF__BASE_RATE_PER_HOUR=6.5` would override the base rate
            .add_source(config::Environment::with_prefix("OSTIA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
