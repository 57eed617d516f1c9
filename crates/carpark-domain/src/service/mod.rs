//! Domain services

pub mod lifecycle;

pub use lifecycle::{resolve_event, EventKind, ParkingEvent, Resolution};
