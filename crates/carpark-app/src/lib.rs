//! Application service layer - config, parking use cases, repository openers

pub mod config;
pub mod repository;
pub mod service;

pub use config::{Config, ReaderConfig, RegistryConfig};
pub use service::ParkingService;
