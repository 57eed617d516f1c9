//! Session store backed by a JSON file

use carpark_types::{Error, ParkingSession, Result};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "sessions.json";
const LOCK_FILE: &str = "sessions.lock";

/// Persistent store for parking sessions keyed by plate
///
/// The store owns its directory: an exclusive lock on `sessions.lock` is held
/// until the store drops, so a second process opening the same directory fails
/// instead of overwriting writes it never loaded.
pub struct SessionStore {
    store_path: PathBuf,
    sessions: HashMap<String, ParkingSession>,
    _lock: File,
}

impl SessionStore {
    /// Create or load a session store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let lock = acquire_dir_lock(&store_dir)?;
        let store_path = store_dir.join(STORE_FILE);

        let sessions = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_else(|e| {
                tracing::warn!(path = %store_path.display(), "Unreadable session store, starting empty: {e}");
                HashMap::new()
            })
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %store_path.display(), count = sessions.len(), "Session store opened");
        Ok(Self {
            store_path,
            sessions,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// Write a map to disk
    ///
    /// Goes through a sibling temp file so a crash never leaves a truncated store.
    fn save(&self, sessions: &HashMap<String, ParkingSession>) -> Result<()> {
        let tmp_path = self.store_path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, sessions)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.store_path)?;
        Ok(())
    }

    /// Insert or replace a session
    ///
    /// Memory only changes once the new state is on disk.
    pub fn put(&mut self, session: ParkingSession) -> Result<()> {
        let mut next = self.sessions.clone();
        next.insert(session.car_number.clone(), session);
        self.save(&next)?;
        self.sessions = next;
        Ok(())
    }

    /// Remove a session by plate
    pub fn remove(&mut self, plate: &str) -> Result<bool> {
        if !self.sessions.contains_key(plate) {
            return Ok(false);
        }
        let mut next = self.sessions.clone();
        next.remove(plate);
        self.save(&next)?;
        self.sessions = next;
        Ok(true)
    }

    /// Get a session by plate
    pub fn get(&self, plate: &str) -> Option<&ParkingSession> {
        self.sessions.get(plate)
    }

    /// Get all sessions sorted by plate
    pub fn all_sessions(&self) -> Vec<&ParkingSession> {
        let mut sessions: Vec<_> = self.sessions.values().collect();
        sessions.sort_by(|a, b| a.car_number.cmp(&b.car_number));
        sessions
    }

    /// Get total session count
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

fn acquire_dir_lock(store_dir: &Path) -> Result<File> {
    let lock_path = store_dir.join(LOCK_FILE);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    match file.try_lock() {
        Ok(()) => Ok(file),
        Err(TryLockError::WouldBlock) => Err(Error::Store(format!(
            "Data directory {} is in use by another carpark process",
            store_dir.display()
        ))),
        Err(TryLockError::Error(e)) => Err(e.into()),
    }
}
