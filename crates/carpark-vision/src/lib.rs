//! Vision module - license plate extraction from vehicle photos

pub mod cache;
pub mod extractor;
pub mod reader;
pub mod staging;

pub use cache::RecognitionCache;
pub use extractor::PlateExtractor;
pub use reader::{CommandReader, GeminiReader, PlateReader};
pub use staging::StagedImage;
