use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::key::AssetKey;
use super::traits::AssetStore;

/// Filesystem-backed asset store.
///
/// An asset published at `{public_base_url}/{key}` lives at `{base_path}/{key}`.
pub struct FilesystemAssetStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl FilesystemAssetStore {
    /// Create a new filesystem asset store, creating `base_path` if needed.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn asset_path(&self, key: &AssetKey) -> PathBuf {
        self.base_path.join(key.to_relative_path())
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    fn key_for_url(&self, url: &str) -> Option<AssetKey> {
        let rest = url.strip_prefix(&self.public_base_url)?;
        let rest = rest.strip_prefix('/')?;
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        match AssetKey::parse(path) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!(url, error = %e, "URL under asset base is not a valid key");
                None
            }
        }
    }

    async fn exists(&self, key: &AssetKey) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.asset_path(key)).await?)
    }

    async fn delete(&self, key: &AssetKey) -> Result<bool, StorageError> {
        match fs::remove_file(self.asset_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
