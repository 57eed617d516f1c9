//! Wiring from configuration to repositories and collaborators

use std::sync::Arc;

use carpark_domain::{SessionRepository, Tariff};
use carpark_infra::persistence::{FileSessionRepository, MemorySessionRepository};
use carpark_infra::registry::{RtoApiRegistry, VehicleMasterRegistry, VehicleRegistry};
use carpark_types::{ConfigError, Result};
use carpark_vision::{CommandReader, GeminiReader, PlateExtractor, PlateReader, RecognitionCache};

use crate::config::Config;
use crate::service::ParkingService;

/// Open file-based session repository
pub fn open_session_repo(config: &Config) -> Result<FileSessionRepository> {
    let data_dir = config.data_dir()?;
    FileSessionRepository::open(data_dir)
}

/// Session repository for a run; `ephemeral` keeps everything in memory
pub fn open_sessions(config: &Config, ephemeral: bool) -> Result<Arc<dyn SessionRepository>> {
    if ephemeral {
        tracing::info!("Using in-memory session store");
        return Ok(Arc::new(MemorySessionRepository::new()));
    }

    let repo = open_session_repo(config)?;
    tracing::info!(path = %repo.store_path().display(), "Opened session store");
    Ok(Arc::new(repo))
}

/// Plate reader from config, `None` when no reader is usable
pub fn open_reader(config: &Config) -> Result<Option<Arc<dyn PlateReader>>> {
    let reader = &config.reader;
    match reader.backend.as_str() {
        "gemini" => match reader.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let gemini = GeminiReader::new(key.to_string(), reader.model.clone())?;
                Ok(Some(Arc::new(gemini)))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY is not set; image uploads are disabled");
                Ok(None)
            }
        },
        "command" => {
            let command = reader
                .command
                .as_deref()
                .ok_or_else(|| ConfigError::Missing("reader.command".to_string()))?;
            Ok(Some(Arc::new(CommandReader::from_command_line(command)?)))
        }
        other => Err(ConfigError::ParseError(format!("Unknown reader backend: {other}")).into()),
    }
}

/// Plate extractor with the recognition cache attached when enabled
pub fn open_extractor(config: &Config) -> Result<Option<PlateExtractor>> {
    let Some(reader) = open_reader(config)? else {
        return Ok(None);
    };

    let mut extractor = PlateExtractor::new(reader);
    if config.cache_enabled {
        extractor = extractor.with_cache(open_recognition_cache(config)?);
    }
    Ok(Some(extractor))
}

/// Recognition cache under the configured cache dir
pub fn open_recognition_cache(config: &Config) -> Result<RecognitionCache> {
    RecognitionCache::new(config.cache_dir()?.join("recognitions"))
}

/// Vehicle registry from config, `None` when disabled or unusable
pub fn open_registry(config: &Config) -> Result<Option<Arc<dyn VehicleRegistry>>> {
    let registry = &config.registry;
    match registry.backend.as_str() {
        "none" => Ok(None),
        "rto-api" => match registry.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let api = RtoApiRegistry::new(key.to_string(), registry.host.clone())?;
                Ok(Some(Arc::new(api)))
            }
            None => {
                tracing::warn!("RAPIDAPI_KEY is not set; vehicle details will be blank");
                Ok(None)
            }
        },
        "vehicle-master" => {
            let path = registry
                .vehicles_file
                .as_deref()
                .ok_or_else(|| ConfigError::Missing("registry.vehicles_file".to_string()))?;
            let master = VehicleMasterRegistry::load_from_file(path)?;
            tracing::info!(vehicles = master.count(), "Loaded vehicle master");
            Ok(Some(Arc::new(master)))
        }
        other => Err(ConfigError::ParseError(format!("Unknown registry backend: {other}")).into()),
    }
}

/// Build the parking service with every configured collaborator
pub fn build_service(config: &Config, ephemeral: bool) -> Result<ParkingService> {
    let sessions = open_sessions(config, ephemeral)?;
    let mut service = ParkingService::new(sessions, Tariff::new(config.rate_per_hour))
        .with_upload_dir(config.upload_dir());

    if let Some(extractor) = open_extractor(config)? {
        service = service.with_extractor(extractor);
    }
    if let Some(registry) = open_registry(config)? {
        service = service.with_registry(registry);
    }
    Ok(service)
}
