pub mod book;
pub mod models;

pub use book::{ReservationBook, ReservationError};
pub use models::{Reservation, ReservationStatus};
