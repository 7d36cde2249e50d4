//! Filesystem object store.
//!
//! Objects live at `{root}/objects/{key}` and their metadata at
//! `{root}/meta/{key}.json`. Writes go to a temporary file in the same
//! directory first and are then renamed into place, so readers never see a
//! half-written object.

use crate::{ObjectMetadata, ObjectStore, Result, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const OBJECTS_DIR: &str = "objects";
const META_DIR: &str = "meta";

/// Object store rooted at a local directory
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    /// Create a file store rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join(OBJECTS_DIR))?;
        std::fs::create_dir_all(root.join(META_DIR))?;
        Ok(Self { root })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(OBJECTS_DIR).join(relative_path(key)?))
    }

    fn meta_path(&self, key: &str) -> Result<PathBuf> {
        let mut rel = relative_path(key)?.into_os_string();
        rel.push(".json");
        Ok(self.root.join(META_DIR).join(rel))
    }
}

/// Map a key onto a relative path that cannot leave the store root
fn relative_path(key: &str) -> Result<PathBuf> {
    if key.is_empty()
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StoreError::InvalidKey);
    }
    let path = PathBuf::from(key);
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(StoreError::InvalidKey);
    }
    Ok(path)
}

async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, data).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn put(&self, key: &str, data: Bytes, metadata: ObjectMetadata) -> Result<()> {
        let object_path = self.object_path(key)?;
        let meta_path = self.meta_path(key)?;
        let meta_json = serde_json::to_vec(&metadata)?;

        write_atomic(&object_path, &data).await?;
        write_atomic(&meta_path, &meta_json).await?;

        debug!(path = %object_path.display(), size = data.len(), "stored object to file");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let object_path = self.object_path(key)?;
        let data = match tokio::fs::read(&object_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let meta_json = tokio::fs::read(self.meta_path(key)?).await?;
        let metadata: ObjectMetadata = serde_json::from_slice(&meta_json)?;

        Ok(Some(StoredObject {
            data: Bytes::from(data),
            metadata,
        }))
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
