use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// A record stored in a [`JsonCollection`], addressed by an opaque id.
pub trait Document {
    fn id(&self) -> &str;
}

/// Ordered document collection persisted to a single JSON file.
///
/// Documents keep insertion order, so `list` returns them oldest first.
/// Every mutation rewrites the file while the write lock is still held.
pub struct JsonCollection<D> {
    inner: RwLock<Vec<D>>,
    file_path: PathBuf,
}

impl<D> JsonCollection<D>
where
    D: Document + Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Open the collection at `path`. Creates the file with an empty array if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let docs: Vec<D> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{} is not a document array: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&file_path, b"[]").await.map_err(ServiceError::storage)?;
                Vec::new()
            }
            Err(e) => {
                return Err(ServiceError::Storage(format!("cannot read {}: {e}", file_path.display())));
            }
        };
        debug!(path = %file_path.display(), count = docs.len(), "collection opened");

        Ok(Arc::new(Self { inner: RwLock::new(docs), file_path }))
    }

    async fn persist(&self, docs: &[D]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(docs).map_err(ServiceError::storage)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)
    }

    pub async fn list(&self) -> Vec<D> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<D> {
        let docs = self.inner.read().await;
        docs.iter().find(|d| d.id() == id).cloned()
    }

    /// Append a document and persist.
    pub async fn insert(&self, doc: D) -> Result<(), ServiceError> {
        let mut docs = self.inner.write().await;
        docs.push(doc);
        if let Err(e) = self.persist(&docs).await {
            docs.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Apply `f` to a copy of the document with `id` and store the result.
    ///
    /// Returns `Ok(None)` when no document has that id. When `f` fails the
    /// stored document is left untouched.
    pub async fn update_with<F>(&self, id: &str, f: F) -> Result<Option<D>, ServiceError>
    where
        F: FnOnce(&mut D) -> Result<(), ServiceError>,
    {
        let mut docs = self.inner.write().await;
        let Some(pos) = docs.iter().position(|d| d.id() == id) else {
            return Ok(None);
        };
        let mut next = docs[pos].clone();
        f(&mut next)?;
        let previous = std::mem::replace(&mut docs[pos], next.clone());
        if let Err(e) = self.persist(&docs).await {
            docs[pos] = previous;
            return Err(e);
        }
        Ok(Some(next))
    }

    /// Remove the document with `id` and persist; returns whether it existed.
    pub async fn remove(&self, id: &str) -> Result<bool, ServiceError> {
        let mut docs = self.inner.write().await;
        let Some(pos) = docs.iter().position(|d| d.id() == id) else {
            return Ok(false);
        };
        let removed = docs.remove(pos);
        if let Err(e) = self.persist(&docs).await {
            docs.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }
}
