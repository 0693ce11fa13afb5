//! Text recognition over normalized bitmaps.

use std::future::Future;
use std::io::Write;

use crate::error::OcrError;

pub trait TextRecognizer: Send + Sync {
    /// Returns the raw recognized text of one bitmap.
    fn recognize(&self, bitmap: Vec<u8>) -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// Runs the `tesseract` command-line engine as a subprocess.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    binary: String,
    language: String,
}

impl TesseractCli {
    #[must_use]
    pub fn new(language: &str) -> Self {
        Self::with_binary("tesseract", language)
    }

    #[must_use]
    pub fn with_binary(binary: &str, language: &str) -> Self {
        Self {
            binary: binary.to_owned(),
            language: language.to_owned(),
        }
    }
}

impl TextRecognizer for TesseractCli {
    async fn recognize(&self, bitmap: Vec<u8>) -> Result<String, OcrError> {
        let mut input = tempfile::Builder::new()
            .prefix("shelfwatch-banner-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Recognition(format!("temp bitmap: {e}")))?;
        input
            .write_all(&bitmap)
            .map_err(|e| OcrError::Recognition(format!("temp bitmap: {e}")))?;

        let output = tokio::process::Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .await
            .map_err(|source| OcrError::EngineUnavailable {
                engine: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
