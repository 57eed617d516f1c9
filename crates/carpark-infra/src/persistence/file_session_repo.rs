//! File-based session repository implementation

use std::path::PathBuf;

use carpark_domain::SessionRepository;
use carpark_store::SessionStore;
use carpark_types::{ParkingSession, Result};
use parking_lot::RwLock;

/// File-based implementation of SessionRepository
///
/// Stores sessions in a JSON file on disk. Safe to share between request tasks,
/// but only one repository may hold a given directory at a time.
pub struct FileSessionRepository {
    store: RwLock<SessionStore>,
}

impl FileSessionRepository {
    /// Create or load a session repository
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        let store = SessionStore::open(store_dir)?;
        Ok(Self {
            store: RwLock::new(store),
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.read().path().to_path_buf()
    }
}

impl SessionRepository for FileSessionRepository {
    fn find_by_plate(&self, plate: &str) -> Result<Option<ParkingSession>> {
        Ok(self.store.read().get(plate).cloned())
    }

    fn upsert(&self, session: &ParkingSession) -> Result<()> {
        self.store.write().put(session.clone())
    }

    fn delete(&self, plate: &str) -> Result<bool> {
        self.store.write().remove(plate)
    }

    fn find_all(&self) -> Result<Vec<ParkingSession>> {
        Ok(self
            .store
            .read()
            .all_sessions()
            .into_iter()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carpark_types::{Error, VehicleDetails};
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = tempdir().unwrap();
        let session = ParkingSession::new("MH12AB1234".into(), VehicleDetails::default(), Utc::now());
        {
            let repo = FileSessionRepository::open(dir.path().to_path_buf()).unwrap();
            repo.upsert(&session).unwrap();
        }

        let repo = FileSessionRepository::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(repo.find_by_plate("MH12AB1234").unwrap(), Some(session));
        assert_eq!(repo.find_all().unwrap().len(), 1);
        assert!(repo.store_path().ends_with("sessions.json"));
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let repo = FileSessionRepository::open(dir.path().to_path_buf()).unwrap();
        let session = ParkingSession::new("MH12AB1234".into(), VehicleDetails::default(), Utc::now());
        repo.upsert(&session).unwrap();

        assert!(repo.delete("MH12AB1234").unwrap());
        assert!(repo.find_by_plate("MH12AB1234").unwrap().is_none());
        assert!(!repo.delete("MH12AB1234").unwrap());
    }

    #[test]
    fn test_two_repositories_cannot_share_a_dir() {
        let dir = tempdir().unwrap();
        let server = FileSessionRepository::open(dir.path().to_path_buf()).unwrap();
        server
            .upsert(&ParkingSession::new("KA01CD5678".into(), VehicleDetails::default(), Utc::now()))
            .unwrap();

        assert!(matches!(
            FileSessionRepository::open(dir.path().to_path_buf()),
            Err(Error::Store(_))
        ));

        drop(server);
        let cli = FileSessionRepository::open(dir.path().to_path_buf()).unwrap();
        cli.upsert(&ParkingSession::new("MH12AB1234".into(), VehicleDetails::default(), Utc::now()))
            .unwrap();
        assert_eq!(cli.find_all().unwrap().len(), 2);
    }
}
