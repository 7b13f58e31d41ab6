//! Snapshot Module
//!
//! Reads and writes the warm-start file: one JSON array of values, no envelope.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};

// == Load ==
/// Reads the snapshot at `path`.
///
/// Returns None when the file is missing or cannot be decoded. A cache must
/// still start without its warm-up data, so neither case is an error.
pub async fn load<V: DeserializeOwned>(path: &Path) -> Option<Vec<V>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "No snapshot to load");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(values) => Some(values),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Ignoring unreadable snapshot");
            None
        }
    }
}

// == Encode ==
/// Serializes `values` into the snapshot format.
pub fn encode<'a, V, I>(values: I) -> Result<Vec<u8>>
where
    V: Serialize + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let values: Vec<&V> = values.into_iter().collect();
    Ok(serde_json::to_vec(&values)?)
}

// == Write ==
/// Replaces the snapshot at `path` with already encoded bytes.
///
/// The bytes land in a sibling `.tmp` file first and are renamed over `path`,
/// so an interrupted dump leaves the previous snapshot intact.
pub async fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    let staging = staging_path(path);
    let io_err = |source| CacheError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    };

    if let Err(err) = tokio::fs::write(&staging, bytes).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(io_err(err));
    }

    if let Err(err) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(io_err(err));
    }

    Ok(())
}

/// `cache.json` -> `cache.json.tmp`, in the same directory.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_utils::{record, Record};

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Vec<Record>> = load(&dir.path().join("absent.json")).await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, b"{not json").unwrap();

        let loaded: Option<Vec<Record>> = load(&path).await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, br#"{"id":"a","payload":"b"}"#).unwrap();

        let loaded: Option<Vec<Record>> = load(&path).await;
        assert!(loaded.is_none());
    }

    #[test]
    fn test_encode_is_flat_array() {
        let values = [record("a", "1"), record("b", "2")];
        let bytes = encode(values.iter()).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let array = json.as_array().expect("snapshot must be a bare array");
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["id"], "a");
    }

    #[test]
    fn test_encode_empty() {
        let bytes = encode(std::iter::empty::<&Record>()).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[tokio::test]
    async fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let values = vec![record("a", "1"), record("b", "2")];

        write(&path, &encode(values.iter()).unwrap()).await.unwrap();

        let loaded: Vec<Record> = load(&path).await.unwrap();
        assert_eq!(loaded, values);
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dump.json");

        let result = write(&path, b"[]").await;
        assert!(matches!(result, Err(CacheError::SnapshotIo { .. })));
    }

    #[tokio::test]
    async fn test_write_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, b"[{\"id\":\"old\",\"payload\":\"x\"}]").unwrap();

        let values = vec![record("new", "1")];
        write(&path, &encode(values.iter()).unwrap()).await.unwrap();

        let loaded: Vec<Record> = load(&path).await.unwrap();
        assert_eq!(loaded, values);
        assert!(!staging_path(&path).exists(), "staging file must not linger");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let previous = vec![record("a", "1")];
        std::fs::write(&path, encode(previous.iter()).unwrap()).unwrap();

        // A directory squatting on the staging name makes the first write fail
        std::fs::create_dir(staging_path(&path)).unwrap();

        let result = write(&path, b"[]").await;
        assert!(matches!(result, Err(CacheError::SnapshotIo { .. })));

        let loaded: Vec<Record> = load(&path).await.unwrap();
        assert_eq!(loaded, previous);
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let path = Path::new("/var/lib/cache/orders.json");
        assert_eq!(
            staging_path(path),
            PathBuf::from("/var/lib/cache/orders.json.tmp")
        );
    }
}
