//! Local OCR command reader
//!
//! Runs a configured command (typically a small tesseract wrapper script)
//! with the staged image path appended as the last argument.
//! Whatever the command prints on stdout is the recognized text.

use async_trait::async_trait;
use carpark_types::{ConfigError, Error, Result};
use tokio::process::Command;

use super::PlateReader;
use crate::staging::StagedImage;

pub struct CommandReader {
    program: String,
    args: Vec<String>,
}

impl CommandReader {
    /// Parse a shell-style command line
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let mut parts = shell_words::split(command_line).map_err(|e| {
            ConfigError::ParseError(format!("Invalid reader command {command_line:?}: {e}"))
        })?;
        if parts.is_empty() {
            return Err(ConfigError::Missing("reader command".to_string()).into());
        }
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl PlateReader for CommandReader {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn read_text(&self, image: &StagedImage) -> Result<String> {
        tracing::debug!(program = %self.program, args = ?self.args, image = %image.path().display(), "Running reader command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image.path())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Upstream(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
