//! Plate extraction: recognition plus plate-pattern search

use carpark_domain::Plate;
use carpark_types::{Error, Result};
use std::sync::Arc;

use crate::cache::RecognitionCache;
use crate::reader::PlateReader;
use crate::staging::StagedImage;

pub const NO_PLATE_MESSAGE: &str = "No valid number plate found.";

/// Turns a staged image into a validated plate
pub struct PlateExtractor {
    reader: Arc<dyn PlateReader>,
    cache: Option<RecognitionCache>,
}

impl PlateExtractor {
    pub fn new(reader: Arc<dyn PlateReader>) -> Self {
        Self {
            reader,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: RecognitionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Recognized text for an image, from cache when possible
    ///
    /// Cache problems are logged and never fail the request.
    pub async fn recognize(&self, image: &StagedImage) -> Result<String> {
        if let Some(cache) = &self.cache {
            match cache.get(image.bytes()) {
                Ok(Some(hit)) => {
                    tracing::debug!(reader = %hit.reader, "Recognition cache hit");
                    return Ok(hit.text);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Recognition cache read failed: {e}"),
            }
        }

        let text = self.reader.read_text(image).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(image.bytes(), self.reader.name(), &text) {
                tracing::warn!("Recognition cache write failed: {e}");
            }
        }

        Ok(text)
    }

    /// Extract the first plate found in the recognized text
    pub async fn extract(&self, image: &StagedImage) -> Result<Plate> {
        let text = self.recognize(image).await?;
        match Plate::find_in(&text) {
            Some(plate) => {
                tracing::info!(reader = self.reader.name(), plate = %plate, "Plate extracted");
                Ok(plate)
            }
            None => {
                tracing::info!(reader = self.reader.name(), text = %text, "No plate in recognized text");
                Err(Error::Validation(NO_PLATE_MESSAGE.to_string()))
            }
        }
    }
}
