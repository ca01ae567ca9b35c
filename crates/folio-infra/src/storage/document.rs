//! A single JSON document on disk with whole-file read-modify-write.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use folio_core::error::RepoError;

/// What a mutation closure decided.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The document changed and must be written back.
    Write(T),
    /// Nothing changed; skip the write.
    Skip(T),
}

/// A JSON document of type `D` stored at `path`.
///
/// Mutations inside one process are serialized by an async mutex, so a
/// read-modify-write cycle never interleaves with another. Nothing guards
/// against a second process writing the same file: last write wins.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so readers never observe a half-written document.
pub struct JsonDocument<D> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _doc: PhantomData<fn() -> D>,
}

impl<D> JsonDocument<D>
where
    D: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty document if they are missing.
    pub async fn init(&self) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        tracing::info!(path = %self.path.display(), "Creating empty data file");
        self.write(&D::default()).await
    }

    /// Read the whole document. A missing or empty file reads as the default.
    pub async fn read(&self) -> Result<D, RepoError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(D::default()),
            Err(e) => return Err(e.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(D::default());
        }

        serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Data file is not valid");
            RepoError::from(e)
        })
    }

    /// Read the document, let `apply` change it in memory and write it back
    /// when `apply` returns `Outcome::Write`.
    pub async fn mutate<T, F>(&self, apply: F) -> Result<T, RepoError>
    where
        F: FnOnce(&mut D) -> Result<Outcome<T>, RepoError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read().await?;

        match apply(&mut doc)? {
            Outcome::Write(value) => {
                self.write(&doc).await?;
                Ok(value)
            }
            Outcome::Skip(value) => Ok(value),
        }
    }

    async fn write(&self, doc: &D) -> Result<(), RepoError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut body = serde_json::to_vec_pretty(doc)?;
        body.push(b'\n');

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    #[tokio::test]
    async fn test_missing_file_reads_default() {
        let dir = TempDir::new().unwrap();
        let doc: JsonDocument<Counter> = JsonDocument::new(dir.path().join("nope.json"));
        assert_eq!(doc.read().await.unwrap(), Counter::default());
    }

    #[tokio::test]
    async fn test_init_creates_nested_file_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("counter.json");
        let doc: JsonDocument<Counter> = JsonDocument::new(&path);

        doc.init().await.unwrap();
        assert!(path.exists());

        doc.mutate(|c| {
            c.value = 7;
            Ok(Outcome::Write(()))
        })
        .await
        .unwrap();
        doc.init().await.unwrap();
        assert_eq!(doc.read().await.unwrap().value, 7);
    }

    #[tokio::test]
    async fn test_skip_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counter.json");
        let doc: JsonDocument<Counter> = JsonDocument::new(&path);

        let out = doc
            .mutate(|c| {
                c.value = 99;
                Ok(Outcome::Skip("skipped"))
            })
            .await
            .unwrap();

        assert_eq!(out, "skipped");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_written_file_is_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counter.json");
        let doc: JsonDocument<Counter> = JsonDocument::new(&path);

        doc.mutate(|c| {
            c.value = 1;
            Ok(Outcome::Write(()))
        })
        .await
        .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{\n  \"value\": 1\n}\n");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counter.json");
        std::fs::write(&path, "{ not json").unwrap();
        let doc: JsonDocument<Counter> = JsonDocument::new(&path);

        assert!(matches!(
            doc.read().await,
            Err(RepoError::Serialization(_))
        ));
        // and the file is left alone
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_concurrent_mutations_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let doc = std::sync::Arc::new(JsonDocument::<Counter>::new(
            dir.path().join("counter.json"),
        ));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let doc = doc.clone();
            handles.push(tokio::spawn(async move {
                doc.mutate(|c| {
                    c.value += 1;
                    Ok(Outcome::Write(()))
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(doc.read().await.unwrap().value, 20);
    }
}
