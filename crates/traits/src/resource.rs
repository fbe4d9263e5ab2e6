//! ImageProvider trait for abstracting image measurement.
//!
//! Layout needs only the intrinsic size of an image to place it; decoding
//! and embedding belong to renderers.

use folio_types::Mpt;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for resource lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),
}

/// Intrinsic size of an image in millipoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSize {
    pub width: Mpt,
    pub height: Mpt,
}

impl ImageSize {
    pub fn new(width: Mpt, height: Mpt) -> Self {
        Self { width, height }
    }
}

/// A source of image intrinsic sizes.
///
/// # Example
///
/// ```ignore
/// let images = InMemoryImageProvider::new();
/// images.add("logo.png", ImageSize::new(72_000, 36_000))?;
/// let size = images.intrinsic_size("logo.png")?;
/// ```
pub trait ImageProvider: Send + Sync + Debug {
    /// Looks up the intrinsic size of the image at `uri`.
    fn intrinsic_size(&self, uri: &str) -> Result<ImageSize, ResourceError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An image provider backed by a pre-populated map.
#[derive(Debug, Default)]
pub struct InMemoryImageProvider {
    images: RwLock<HashMap<String, ImageSize>>,
}

impl InMemoryImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image size.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, uri: impl Into<String>, size: ImageSize) -> Result<(), ResourceError> {
        let uri = uri.into();
        let mut images = self.images.write().map_err(|_| ResourceError::LoadFailed {
            path: uri.clone(),
            message: "image store lock poisoned".to_string(),
        })?;
        images.insert(uri, size);
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.images.read().map(|i| i.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.images.read().map(|i| i.is_empty()).unwrap_or(true)
    }
}

impl ImageProvider for InMemoryImageProvider {
    fn intrinsic_size(&self, uri: &str) -> Result<ImageSize, ResourceError> {
        let images = self.images.read().map_err(|_| ResourceError::LoadFailed {
            path: uri.to_string(),
            message: "image store lock poisoned".to_string(),
        })?;
        images
            .get(uri)
            .copied()
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryImageProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_provider_add_and_lookup() {
        let provider = InMemoryImageProvider::new();
        provider.add("logo.png", ImageSize::new(72_000, 36_000)).unwrap();
        assert_eq!(
            provider.intrinsic_size("logo.png"),
            Ok(ImageSize::new(72_000, 36_000))
        );
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_in_memory_provider_not_found() {
        let provider = InMemoryImageProvider::new();
        assert!(provider.is_empty());
        assert!(matches!(
            provider.intrinsic_size("missing.png"),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_in_memory_provider_overwrite() {
        let provider = InMemoryImageProvider::new();
        provider.add("a.png", ImageSize::new(1, 1)).unwrap();
        provider.add("a.png", ImageSize::new(2, 3)).unwrap();
        assert_eq!(provider.intrinsic_size("a.png"), Ok(ImageSize::new(2, 3)));
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::LoadFailed {
            path: "file.png".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("file.png"));
        assert!(err.to_string().contains("permission denied"));
    }
}
