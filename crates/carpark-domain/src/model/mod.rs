//! Domain model types

pub mod plate;
pub mod tariff;

pub use plate::{normalize, Plate, PLATE_PATTERN};
pub use tariff::{Tariff, DEFAULT_RATE_PER_HOUR};
