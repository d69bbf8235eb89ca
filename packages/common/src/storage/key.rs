use std::fmt;
use std::path::PathBuf;

use super::error::StorageError;

const MAX_KEY_LEN: usize = 512;

/// A validated, relative asset key such as `credentials/42/photo.jpg`.
///
/// Keys never contain empty, `.` or `..` segments, so joining one onto a
/// store root cannot escape it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let raw = raw.trim_matches('/');
        if raw.is_empty() {
            return Err(StorageError::InvalidKey("key is empty".into()));
        }
        if raw.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey(format!(
                "key exceeds {MAX_KEY_LEN} bytes"
            )));
        }
        for segment in raw.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StorageError::InvalidKey(format!(
                    "illegal path segment in '{raw}'"
                )));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            {
                return Err(StorageError::InvalidKey(format!(
                    "illegal character in '{raw}'"
                )));
            }
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative filesystem path for this key.
    pub fn to_relative_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetKey({})", self.0)
    }
}
