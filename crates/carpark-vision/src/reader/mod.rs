//! Plate readers: turn a staged image into recognized text

mod command;
mod gemini;

pub use command::CommandReader;
pub use gemini::{GeminiReader, DEFAULT_GEMINI_MODEL};

use async_trait::async_trait;
use carpark_types::Result;

use crate::staging::StagedImage;

/// Text recognition over a vehicle photo
///
/// Implementations return whatever text they recognized. Locating the plate
/// inside that text is the extractor's job.
#[async_trait]
pub trait PlateReader: Send + Sync {
    /// Short backend name for logs and cache entries
    fn name(&self) -> &'static str;

    async fn read_text(&self, image: &StagedImage) -> Result<String>;
}
