//! Local-disk portrait storage.
//!
//! Portraits live under `<root>/<owner-uuid>/<millis>.<ext>` and are served
//! back through the static file route mounted at the public base path. The
//! owner segment keeps one user's uploads out of another's namespace.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use folio_domain::UserId;

use crate::infrastructure::ports::{AssetStoreError, AssetStorePort, ClockPort};

/// Image extensions accepted for portrait uploads.
const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

/// Stores portraits on the local filesystem.
pub struct LocalAssetStore {
    root: PathBuf,
    public_base: String,
    clock: Arc<dyn ClockPort>,
}

impl LocalAssetStore {
    /// `public_base` is the URL prefix the stored files are served from,
    /// e.g. `/assets/portraits`.
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
            clock,
        }
    }

    fn extension_of(filename: &str) -> Result<String, AssetStoreError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(AssetStoreError::UnsupportedType(ext))
        }
    }
}

#[async_trait]
impl AssetStorePort for LocalAssetStore {
    async fn store_portrait(
        &self,
        owner: UserId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, AssetStoreError> {
        let ext = Self::extension_of(filename)?;
        let stored_name = format!("{}.{}", self.clock.now().timestamp_millis(), ext);

        let dir = self.root.join(owner.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AssetStoreError::io("create_dir", e))?;

        let path = dir.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AssetStoreError::io("write", e))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored portrait");

        Ok(format!("{}/{}/{}", self.public_base, owner, stored_name))
    }
}
