pub mod inventory;
pub mod spot;
pub mod tariff;
pub mod vehicle;

pub use inventory::{InventoryError, SpotInventory};
pub use spot::{ParkingSpot, SpotZone, VehicleSize};
pub use tariff::{TariffConfig, TariffEngine};
pub use vehicle::Vehicle;
