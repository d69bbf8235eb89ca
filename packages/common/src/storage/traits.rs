use async_trait::async_trait;

use super::error::StorageError;
use super::key::AssetKey;

/// Storage for user-uploaded assets, addressed by public URL.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Map a public URL to the key it is stored under.
    ///
    /// Returns `None` for URLs this store does not manage (external links).
    fn key_for_url(&self, url: &str) -> Option<AssetKey>;

    /// Check whether an asset exists.
    async fn exists(&self, key: &AssetKey) -> Result<bool, StorageError>;

    /// Delete an asset.
    ///
    /// Returns `true` if the asset was deleted, `false` if it did not exist.
    async fn delete(&self, key: &AssetKey) -> Result<bool, StorageError>;

    /// Delete the asset behind a public URL, ignoring unmanaged URLs.
    async fn delete_url(&self, url: &str) -> Result<bool, StorageError> {
        match self.key_for_url(url) {
            Some(key) => self.delete(&key).await,
            None => Ok(false),
        }
    }
}
