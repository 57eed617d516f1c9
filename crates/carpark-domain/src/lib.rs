//! Parking domain: plates, tariffs, and the session lifecycle

pub mod model;
pub mod repository;
pub mod service;

pub use model::{Plate, Tariff};
pub use repository::SessionRepository;
pub use service::{resolve_event, EventKind, ParkingEvent, Resolution};
