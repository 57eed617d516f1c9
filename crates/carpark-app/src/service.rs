//! Parking Service - core use case for plate sightings
//!
//! Each sighting runs under the plate's lock:
//! 1. Read the stored record
//! 2. Look up registry details (first entry only)
//! 3. Resolve entry, exit, or re-entry
//! 4. Persist the updated record
//!
//! Uploads are staged, read, and matched against the plate pattern first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use carpark_domain::model::normalize;
use carpark_domain::{resolve_event, Plate, Resolution, SessionRepository, Tariff};
use carpark_infra::registry::VehicleRegistry;
use carpark_store::PlateLocks;
use carpark_types::{ConfigError, Error, ParkingSession, Result, VehicleDetails};
use carpark_vision::{PlateExtractor, StagedImage};
use chrono::{DateTime, Utc};

pub struct ParkingService {
    sessions: Arc<dyn SessionRepository>,
    extractor: Option<PlateExtractor>,
    registry: Option<Arc<dyn VehicleRegistry>>,
    locks: PlateLocks,
    tariff: Tariff,
    upload_dir: PathBuf,
}

impl ParkingService {
    pub fn new(sessions: Arc<dyn SessionRepository>, tariff: Tariff) -> Self {
        Self {
            sessions,
            extractor: None,
            registry: None,
            locks: PlateLocks::new(),
            tariff,
            upload_dir: std::env::temp_dir().join("carpark-uploads"),
        }
    }

    pub fn with_extractor(mut self, extractor: PlateExtractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn VehicleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_upload_dir(mut self, upload_dir: PathBuf) -> Self {
        self.upload_dir = upload_dir;
        self
    }

    /// Record a sighting of `plate` now
    pub async fn record_plate(&self, plate: &Plate) -> Result<Resolution> {
        self.record(plate, None).await
    }

    /// Record a sighting of `plate` at a fixed time
    pub async fn record_plate_at(&self, plate: &Plate, now: DateTime<Utc>) -> Result<Resolution> {
        self.record(plate, Some(now)).await
    }

    /// Stage an uploaded image, extract its plate, and record the sighting
    ///
    /// The staged file is removed when this returns, whatever the outcome.
    pub async fn record_upload(&self, bytes: Vec<u8>) -> Result<Resolution> {
        let plate = self.extract_plate(bytes).await?;
        self.record(&plate, None).await
    }

    /// Like `record_upload` with a fixed sighting time
    pub async fn record_upload_at(&self, bytes: Vec<u8>, now: DateTime<Utc>) -> Result<Resolution> {
        let plate = self.extract_plate(bytes).await?;
        self.record(&plate, Some(now)).await
    }

    /// Read the plate from a photo on disk and record the sighting
    pub async fn record_image_file(&self, image_path: &Path) -> Result<Resolution> {
        let plate = self.extract_plate_from_file(image_path).await?;
        self.record(&plate, None).await
    }

    /// Read the plate from an image without recording anything
    pub async fn extract_plate(&self, bytes: Vec<u8>) -> Result<Plate> {
        let extractor = self.extractor()?;
        let staged = StagedImage::stage(&self.upload_dir, bytes)?;
        extractor.extract(&staged).await
    }

    /// Like `extract_plate` for a photo on disk
    pub async fn extract_plate_from_file(&self, image_path: &Path) -> Result<Plate> {
        let extractor = self.extractor()?;
        let staged = StagedImage::from_file(&self.upload_dir, image_path)?;
        extractor.extract(&staged).await
    }

    fn extractor(&self) -> Result<&PlateExtractor> {
        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| ConfigError::Missing("plate reader".to_string()))?;
        Ok(extractor)
    }

    pub fn find(&self, car_number: &str) -> Result<ParkingSession> {
        let key = normalize(car_number);
        self.sessions
            .find_by_plate(&key)?
            .ok_or_else(|| Error::NotFound(format!("car {key}")))
    }

    pub fn list(&self) -> Result<Vec<ParkingSession>> {
        self.sessions.find_all()
    }

    /// Delete a record; waits for any in-flight sighting of the same plate
    pub async fn remove(&self, car_number: &str) -> Result<()> {
        let key = normalize(car_number);
        let _guard = self.locks.lock(&key).await;
        if self.sessions.delete(&key)? {
            tracing::info!(car_number = %key, "Removed parking record");
            Ok(())
        } else {
            Err(Error::NotFound(format!("car {key}")))
        }
    }

    async fn record(&self, plate: &Plate, at: Option<DateTime<Utc>>) -> Result<Resolution> {
        let _guard = self.locks.lock(plate.as_str()).await;

        let existing = self.sessions.find_by_plate(plate.as_str())?;
        let details = match existing {
            None => self.lookup_details(plate).await,
            Some(_) => None,
        };

        let now = at.unwrap_or_else(Utc::now);
        let resolution = resolve_event(plate, existing, details, now, &self.tariff);
        self.sessions.upsert(&resolution.session)?;

        tracing::info!(
            car_number = %plate,
            event = ?resolution.event.kind(),
            "{}",
            resolution.event.message()
        );
        Ok(resolution)
    }

    /// Registry details for a new record; failures only cost the metadata
    async fn lookup_details(&self, plate: &Plate) -> Option<VehicleDetails> {
        let registry = self.registry.as_ref()?;
        match registry.lookup(plate).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    registry = registry.name(),
                    car_number = %plate,
                    "Vehicle lookup failed: {e}"
                );
                None
            }
        }
    }
}
