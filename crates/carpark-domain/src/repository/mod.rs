//! Repository trait definitions for data persistence

use carpark_types::{ParkingSession, Result};

/// Keyed storage for parking sessions, one record per plate
///
/// Implementations only guarantee that each call is atomic on its own.
/// Read-modify-write sequences for a plate must be serialized by the caller.
pub trait SessionRepository: Send + Sync {
    /// Find the record for a normalized plate
    fn find_by_plate(&self, plate: &str) -> Result<Option<ParkingSession>>;

    /// Insert or replace the record keyed by `session.car_number`
    fn upsert(&self, session: &ParkingSession) -> Result<()>;

    /// Remove a record, returning whether it existed
    fn delete(&self, plate: &str) -> Result<bool>;

    /// All records sorted by plate
    fn find_all(&self) -> Result<Vec<ParkingSession>>;
}
