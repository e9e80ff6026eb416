use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use bytes::Bytes;
use std::error::Error;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// FsAdapter implements StoragePort on a local directory, for the monolith.
#[derive(Clone, Debug)]
pub struct FsAdapter {
    root: PathBuf,
    public_base_url: String,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> io::Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty() || !key_is_valid(relative) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid object key {:?}", key),
            ));
        }
        Ok(self.root.join(relative))
    }
}

/// Only plain relative components: no `..`, no root, no drive prefix.
fn key_is_valid(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

#[async_trait]
impl StoragePort for FsAdapter {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&data).await?;
        file.flush().await?;

        tracing::debug!(path = ?path, size = data.len(), "Stored object");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_upload_writes_file() {
        let temp_dir = tempdir().unwrap();
        let adapter = FsAdapter::new(temp_dir.path(), "http://localhost:3000/files/");

        adapter
            .upload(
                "payment-proofs/NRYLI2025-1-1-receipt.png",
                Bytes::from_static(b"\x89PNG"),
                "image/png",
            )
            .await
            .unwrap();

        let stored = std::fs::read(
            temp_dir
                .path()
                .join("payment-proofs/NRYLI2025-1-1-receipt.png"),
        )
        .unwrap();
        assert_eq!(stored, b"\x89PNG");
    }

    #[tokio::test]
    async fn test_upload_never_overwrites() {
        let temp_dir = tempdir().unwrap();
        let adapter = FsAdapter::new(temp_dir.path(), "http://localhost:3000/files");

        adapter
            .upload("a.pdf", Bytes::from_static(b"first"), "application/pdf")
            .await
            .unwrap();
        let result = adapter
            .upload("a.pdf", Bytes::from_static(b"second"), "application/pdf")
            .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read(temp_dir.path().join("a.pdf")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_upload_rejects_escaping_keys() {
        let temp_dir = tempdir().unwrap();
        let adapter = FsAdapter::new(temp_dir.path(), "http://localhost:3000/files");

        for key in ["../outside.png", "/etc/passwd", "a/../../b", ""] {
            let result = adapter
                .upload(key, Bytes::from_static(b"x"), "image/png")
                .await;
            assert!(result.is_err(), "key {:?} should be rejected", key);
        }
    }

    #[test]
    fn test_public_url() {
        let adapter = FsAdapter::new("/srv/uploads", "http://localhost:3000/files/");
        assert_eq!(
            adapter.public_url("payment-proofs/x.pdf"),
            "http://localhost:3000/files/payment-proofs/x.pdf"
        );
    }

    #[test]
    fn test_valid_key() {
        assert!(key_is_valid(Path::new("payment-proofs/x.png")));
        assert!(!key_is_valid(Path::new("../x.png")));
        assert!(!key_is_valid(Path::new("/x.png")));
    }
}
