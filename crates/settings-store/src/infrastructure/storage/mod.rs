//! Storage infrastructure: the durable blob a store is bound to.
//!
//! The application layer only needs three things from storage: read the
//! whole blob (or learn that it does not exist yet), replace it atomically,
//! and name it in log messages.  [`BlobStore`] captures exactly that, so the
//! store can be exercised against memory in tests and against a file in
//! production.
//!
//! - [`file`] — a single file on disk, replaced via write-to-temp + rename.
//! - [`mock`] — an in-process implementation for tests and demos.
//! - [`paths`] — where the settings file lives on each platform.

use std::io;

use async_trait::async_trait;

pub mod file;
pub mod mock;
pub mod paths;

pub use file::FileBlobStore;
pub use mock::MemoryBlobStore;

/// A single durable byte blob.
///
/// Implementations must make [`replace`](BlobStore::replace) all-or-nothing:
/// a concurrent [`read`](BlobStore::read) sees either the old bytes or the
/// new bytes, never a mix.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Human-readable location used in errors and logs (e.g. a file path).
    fn location(&self) -> String;

    /// Reads the whole blob.  Returns `Ok(None)` when it does not exist.
    async fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the blob's content, creating it if absent.
    async fn replace(&self, bytes: Vec<u8>) -> io::Result<()>;
}
