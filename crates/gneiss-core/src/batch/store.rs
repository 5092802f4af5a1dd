//! Artifact load/save seam.
//!
//! The engine never interprets artifact contents; it only moves them
//! through load -> transform -> save. Deployments supply a store for their
//! artifact representation (decoded images, documents, tensors). The
//! byte-passthrough [`FsByteStore`] ships as the default boundary
//! primitive and is what the engine's own tests run against.

use async_trait::async_trait;
use std::path::Path;

/// Load and save primitives for one artifact representation.
///
/// Errors cross this boundary as plain strings; the engine classifies them
/// by stage and never lets them propagate past the worker.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// In-memory artifact representation.
    type Artifact: Send + 'static;

    /// Load an artifact from a source path.
    async fn load(&self, source: &Path) -> Result<Self::Artifact, String>;

    /// Save an artifact to the given path, optionally in an explicit
    /// format.
    async fn save(
        &self,
        artifact: Self::Artifact,
        dest: &Path,
        format: Option<&str>,
    ) -> Result<(), String>;
}

/// Filesystem store that treats artifacts as opaque byte buffers.
///
/// The format hint only affects the resolved file name, never the bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsByteStore;

#[async_trait]
impl ArtifactStore for FsByteStore {
    type Artifact = Vec<u8>;

    async fn load(&self, source: &Path) -> Result<Vec<u8>, String> {
        tokio::fs::read(source)
            .await
            .map_err(|e| format!("failed to read {}: {}", source.display(), e))
    }

    async fn save(&self, artifact: Vec<u8>, dest: &Path, _format: Option<&str>) -> Result<(), String> {
        tokio::fs::write(dest, artifact)
            .await
            .map_err(|e| format!("failed to write {}: {}", dest.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fs_byte_store_round_trip() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.bin");
        let dest = dir.path().join("out.bin");
        tokio::fs::write(&source, b"artifact bytes").await.unwrap();

        let store = FsByteStore;
        let bytes = store.load(&source).await.unwrap();
        store.save(bytes, &dest, Some("bin")).await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"artifact bytes");
    }

    #[tokio::test]
    async fn test_fs_byte_store_load_missing() {
        let store = FsByteStore;
        let err = store.load(Path::new("/nonexistent/input.bin")).await.unwrap_err();
        assert!(err.contains("failed to read"));
    }

    #[tokio::test]
    async fn test_fs_byte_store_save_to_missing_dir() {
        let store = FsByteStore;
        let err = store
            .save(vec![1, 2, 3], Path::new("/nonexistent/dir/out.bin"), None)
            .await
            .unwrap_err();
        assert!(err.contains("failed to write"));
    }
}
