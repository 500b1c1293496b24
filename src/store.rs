// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Storage for the collected and processed trend sets.
//!
//! Artifacts are JSON values stored under fixed keys. [`FileStore`] keeps each one in a file named
//! after its key, pretty-printed with four-space indentation and UTF-8 left unescaped, so the
//! same value always produces the same bytes. [`MemoryStore`] keeps them in a map.
//!
//! [`FileStore`]: struct.FileStore.html
//! [`MemoryStore`]: struct.MemoryStore.html

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Error, Result};

/// A key/value store for JSON artifacts.
pub trait BlobStore: Send + Sync {
    /// Stores `value` under `key`, replacing whatever was there.
    fn write(&self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// Loads the value stored under `key`. Returns `Error::MissingArtifact` if there is none.
    fn read(&self, key: &str) -> Result<serde_json::Value>;
}

/// Serializes `value` and stores it under `key`.
pub fn write_as<T: Serialize>(store: &dyn BlobStore, key: &str, value: &T) -> Result<()> {
    store.write(key, &serde_json::to_value(value)?)
}

/// Loads the value under `key` and deserializes it.
pub fn read_as<T: DeserializeOwned>(store: &dyn BlobStore, key: &str) -> Result<T> {
    Ok(serde_json::from_value(store.read(key)?)?)
}

/// Renders a JSON value the way artifacts are written to disk.
pub fn to_pretty_bytes(value: &serde_json::Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// A `BlobStore` that keeps each artifact in its own file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given directory. The directory is created on the first
    /// write if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    /// The directory this store writes to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl BlobStore for FileStore {
    fn write(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let bytes = to_pretty_bytes(value)?;
        fs::write(&path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<serde_json::Value> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingArtifact(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), bytes = bytes.len(), "read artifact");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A `BlobStore` that keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.blobs
            .lock()
            .map(|blobs| blobs.contains_key(key))
            .unwrap_or(false)
    }
}

impl BlobStore for MemoryStore {
    fn write(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| Error::IOError(io::Error::new(io::ErrorKind::Other, "store poisoned")))?;
        blobs.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<serde_json::Value> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| Error::IOError(io::Error::new(io::ErrorKind::Other, "store poisoned")))?;
        blobs
            .get(key)
            .cloned()
            .ok_or_else(|| Error::MissingArtifact(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        let value = json!({"trends": [{"name": "Dia das Mães", "tweet_volume": 98114}]});

        store.write("clean.json", &value).unwrap();
        assert_eq!(store.read("clean.json").unwrap(), value);

        let text = fs::read_to_string(dir.path().join("data").join("clean.json")).unwrap();
        assert!(text.contains("Dia das Mães"));
        assert!(text.starts_with("{\n    \"trends\": [\n        {"));
    }

    #[test]
    fn file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        match store.read("nothing.json") {
            Err(Error::MissingArtifact(key)) => assert_eq!(key, "nothing.json"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clean.json"), "{\"trends\": [").unwrap();
        let store = FileStore::new(dir.path());
        match store.read("clean.json") {
            Err(Error::DeserializeError(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn same_value_same_bytes() {
        let value = json!({"b": 1, "a": [1, 2, {"c": null}]});
        assert_eq!(to_pretty_bytes(&value).unwrap(), to_pretty_bytes(&value.clone()).unwrap());
    }

    #[test]
    fn typed_helpers() {
        let store = MemoryStore::new();
        write_as(&store, "numbers", &vec![3u32, 1, 2]).unwrap();
        assert!(store.contains("numbers"));
        let back: Vec<u32> = read_as(&store, "numbers").unwrap();
        assert_eq!(back, vec![3, 1, 2]);

        match read_as::<Vec<u32>>(&store, "other") {
            Err(Error::MissingArtifact(_)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
