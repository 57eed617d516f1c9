//! In-memory session repository (ephemeral runs and tests)

use std::collections::HashMap;

use carpark_domain::SessionRepository;
use carpark_types::{ParkingSession, Result};
use parking_lot::RwLock;

#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<String, ParkingSession>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for MemorySessionRepository {
    fn find_by_plate(&self, plate: &str) -> Result<Option<ParkingSession>> {
        Ok(self.sessions.read().get(plate).cloned())
    }

    fn upsert(&self, session: &ParkingSession) -> Result<()> {
        self.sessions
            .write()
            .insert(session.car_number.clone(), session.clone());
        Ok(())
    }

    fn delete(&self, plate: &str) -> Result<bool> {
        Ok(self.sessions.write().remove(plate).is_some())
    }

    fn find_all(&self) -> Result<Vec<ParkingSession>> {
        let mut sessions: Vec<_> = self.sessions.read().values().cloned().collect();
        sessions.sort_by(|a, b| a.car_number.cmp(&b.car_number));
        Ok(sessions)
    }
}
