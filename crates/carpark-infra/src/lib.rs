//! Infrastructure layer - persistence implementations, registry clients, export

pub mod export;
pub mod persistence;
pub mod registry;
