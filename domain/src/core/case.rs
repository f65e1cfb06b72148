//! Case value object

use super::error::DomainError;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Image attached to a case.
///
/// The bytes are shared behind an `Arc` so concurrent agent tasks can hold
/// the payload without copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Arc<[u8]>,
    media_type: String,
}

impl ImagePayload {
    /// Create an image payload. Empty payloads are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Result<Self, DomainError> {
        let bytes: Vec<u8> = bytes.into();
        if bytes.is_empty() {
            return Err(DomainError::EmptyImage);
        }
        Ok(Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, e.g. `image/png`
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A clinical case: optional image plus required free-text notes (Value Object)
///
/// Created once per request and never mutated. When no identifier is
/// supplied, one is derived from the content so that identical inputs
/// always carry the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    id: String,
    image: Option<ImagePayload>,
    notes: String,
}

impl Case {
    /// Create a case with a content-derived identifier.
    pub fn new(image: Option<ImagePayload>, notes: impl Into<String>) -> Result<Self, DomainError> {
        let notes = notes.into();
        if notes.trim().is_empty() {
            return Err(DomainError::EmptyNotes);
        }
        let id = content_id(image.as_ref(), &notes);
        Ok(Self { id, image, notes })
    }

    /// Replace the derived identifier with a caller-supplied one.
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidCaseId(id));
        }
        self.id = id;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// `case-` followed by the first 16 hex digits of SHA-256(image || 0x00 || notes).
fn content_id(image: Option<&ImagePayload>, notes: &str) -> String {
    let mut hasher = Sha256::new();
    if let Some(image) = image {
        hasher.update(image.bytes());
    }
    hasher.update([0u8]);
    hasher.update(notes.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("case-{}", &digest[..16])
}
