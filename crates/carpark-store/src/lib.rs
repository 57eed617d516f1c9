//! Persistent store for parking sessions

pub mod locks;
pub mod sessions;

pub use locks::{PlateGuard, PlateLocks};
pub use sessions::SessionStore;
