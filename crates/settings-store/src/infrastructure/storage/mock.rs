//! In-memory blob store for unit testing.
//!
//! Allows tests to seed raw bytes (including corrupt ones) and to inspect
//! what a store wrote, without touching the file system.

use std::io;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::BlobStore;

/// A [`BlobStore`] that keeps its content in memory.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    contents: Mutex<Option<Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryBlobStore {
    /// Creates an empty store (the blob does not exist yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose blob already holds `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(Some(bytes.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Returns a copy of the current content.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().expect("lock poisoned").clone()
    }

    /// Returns how many times [`BlobStore::replace`] has succeeded.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    async fn replace(&self, bytes: Vec<u8>) -> io::Result<()> {
        *self.contents.lock().expect("lock poisoned") = Some(bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
