//! Seams to the external solve and chat relays.
//!
//! The relays forward requests to a hosted model and are not part of this
//! crate; the session only needs something that turns an image into a
//! [`Solution`] and a question into a reply. [`ReplayRelay`] plays back a
//! model response recorded earlier, which is how the CLI drives the
//! pipeline offline.

use std::fs;
use std::path::Path;

use mathbud_types::Solution;
use thiserror::Error;

/// Largest image the solve relay accepts.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Errors reported by a relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upload is not an acceptable image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The provider or transport failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The provider answered with nothing usable
    #[error("Empty response from model")]
    EmptyResponse,

    /// Reading a local file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded picture of a math problem.
#[derive(Debug, Clone)]
pub struct ProblemImage {
    mime_type: String,
    bytes: Vec<u8>,
}

impl ProblemImage {
    /// Validate an upload.
    ///
    /// The MIME type must be `image/*` and the payload non-empty and no
    /// larger than [`MAX_IMAGE_BYTES`].
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, RelayError> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(RelayError::InvalidImage(format!(
                "only image files are allowed, got {mime_type}"
            )));
        }
        if bytes.is_empty() {
            return Err(RelayError::InvalidImage("no image data provided".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(RelayError::InvalidImage(format!(
                "file too large ({} bytes); images must be smaller than 10MB",
                bytes.len()
            )));
        }
        Ok(Self { mime_type, bytes })
    }

    /// Read an image file, inferring its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, RelayError> {
        let mime_type = mime_for_path(path);
        let bytes = fs::read(path)?;
        Self::new(mime_type, bytes)
    }

    /// MIME type of the upload.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Turns a problem image into a normalized solution.
pub trait SolveRelay {
    /// Solve the problem shown in `image`.
    fn solve(&self, image: &ProblemImage) -> Result<Solution, RelayError>;
}

/// Answers a free-text tutoring question.
pub trait ChatRelay {
    /// Reply to `message`.
    fn reply(&self, message: &str) -> Result<String, RelayError>;
}

/// Relay that plays back a recorded model response.
#[derive(Debug, Clone)]
pub struct ReplayRelay {
    content: String,
}

impl ReplayRelay {
    /// Replay `content` as the model's answer.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Replay the contents of a file.
    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        Ok(Self::new(fs::read_to_string(path)?))
    }
}

impl SolveRelay for ReplayRelay {
    fn solve(&self, image: &ProblemImage) -> Result<Solution, RelayError> {
        tracing::debug!(
            mime_type = image.mime_type(),
            bytes = image.bytes().len(),
            "Replaying recorded response"
        );
        if self.content.trim().is_empty() {
            return Err(RelayError::EmptyResponse);
        }
        Ok(Solution::from_model_output(&self.content))
    }
}

impl ChatRelay for ReplayRelay {
    fn reply(&self, message: &str) -> Result<String, RelayError> {
        tracing::debug!(chars = message.chars().count(), "Replaying recorded reply");
        let reply = self.content.trim();
        if reply.is_empty() {
            return Err(RelayError::EmptyResponse);
        }
        Ok(reply.to_string())
    }
}
