pub mod app_config;
pub mod finance;
pub mod lot;

pub use app_config::Config;
pub use finance::{ParkingReceipt, RevenueLedger};
pub use lot::{CheckIn, LotError, ParkingLot};
