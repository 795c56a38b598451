//! DataStore: the single source of truth for one persisted value.
//!
//! A `DataStore` is bound to exactly one [`BlobStore`] and owns it: nothing
//! else writes that blob.  It offers four operations:
//!
//! - [`read`](DataStore::read) – the latest committed value.
//! - [`write`](DataStore::write) – replace the value.
//! - [`update`](DataStore::update) / [`try_update`](DataStore::try_update) –
//!   atomic read-modify-write.
//! - [`observe`](DataStore::observe) – a stream of committed values.
//!
//! # Missing and corrupt data
//!
//! ```text
//! blob absent          ──►  default value
//! blob corrupt         ──►  warn!, default value
//! blob unreadable      ──►  StoreError::Io
//! ```
//!
//! A real I/O failure is never disguised as "use the default": doing so would
//! let the next write silently overwrite data that merely could not be read.
//!
//! # Concurrency
//!
//! Writers (`write`, `update`, `try_update`) take an async mutex, so each one
//! completes its read, transform, and write before the next begins.  The
//! committed value is published through a `tokio::sync::watch` channel, which
//! doubles as the in-memory cache: once the first value has been loaded,
//! `read` and `observe` never wait for a writer.  The cache is only replaced
//! after the blob has been replaced successfully.
//!
//! Replacing the blob and publishing the new value run on a spawned task that
//! owns the writer lock.  Dropping a `write` or `update` future therefore never
//! leaves the blob ahead of the cache: a cancelled write may still complete,
//! and the next writer waits for it and builds on its value.

use std::io;
use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use settings_core::{CodecError, Settings, SettingsSerializer, ValueSerializer};
use thiserror::Error;
use tokio::sync::{watch, Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::infrastructure::storage::BlobStore;

/// Boxed error returned by a failing update transform.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`DataStore`] operations.
///
/// Corrupt stored data is deliberately absent: it degrades to the default
/// value inside the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying blob could not be read or written.
    #[error("I/O error accessing settings at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The new value could not be encoded; nothing was written.
    #[error("failed to encode value: {0}")]
    Encode(#[from] CodecError),

    /// The update transform failed; nothing was written.
    #[error("update aborted by transform: {0}")]
    Transform(#[source] TransformError),
}

/// The store for the application [`Settings`].
pub type SettingsStore = DataStore<Settings, SettingsSerializer>;

/// A single-slot persistent store for values of type `T`.
pub struct DataStore<T, S> {
    blob: Arc<dyn BlobStore>,
    serializer: S,
    /// Serializes writers.  Shared with in-flight commit tasks.
    writer: Arc<Mutex<()>>,
    /// Last committed value; `None` until the first load.
    latest: Arc<watch::Sender<Option<T>>>,
}

impl SettingsStore {
    /// Creates a settings store bound to `blob`.
    pub fn for_settings(blob: impl BlobStore + 'static) -> Self {
        Self::new(blob, SettingsSerializer)
    }
}

impl<T, S> DataStore<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: ValueSerializer<T>,
{
    /// Creates a store bound to `blob`.  Nothing is read until the first
    /// operation.
    pub fn new(blob: impl BlobStore + 'static, serializer: S) -> Self {
        Self::with_shared_blob(Arc::new(blob), serializer)
    }

    /// Like [`new`](Self::new), for callers that keep their own handle to
    /// the blob.
    pub fn with_shared_blob(blob: Arc<dyn BlobStore>, serializer: S) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            blob,
            serializer,
            writer: Arc::new(Mutex::new(())),
            latest: Arc::new(latest),
        }
    }

    /// Where the value is stored.
    pub fn location(&self) -> String {
        self.blob.location()
    }

    /// Returns the latest committed value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the blob exists but cannot be read.
    /// Absent or corrupt data yields the serializer's default value instead.
    pub async fn read(&self) -> Result<T, StoreError> {
        if let Some(value) = self.cached() {
            return Ok(value);
        }
        let loaded = self.load().await?;
        Ok(self.publish_loaded(loaded))
    }

    /// Replaces the stored value with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if `value` cannot be encoded and
    /// [`StoreError::Io`] if the blob cannot be replaced.  In both cases the
    /// previously committed value stays in place.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn write(&self, value: T) -> Result<(), StoreError> {
        let guard = Arc::clone(&self.writer).lock_owned().await;
        self.commit(guard, value).await.map(|_| ())
    }

    /// Atomically applies `transform` to the latest committed value and
    /// stores the result, which is also returned.
    ///
    /// Concurrent updates never interleave, so none of them is lost.
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write); additionally fails with [`StoreError::Io`]
    /// if the current value cannot be read.
    pub async fn update<F>(&self, transform: F) -> Result<T, StoreError>
    where
        F: FnOnce(T) -> T,
    {
        self.try_update(|value| Ok::<_, std::convert::Infallible>(transform(value)))
            .await
    }

    /// Like [`update`](Self::update), but `transform` may refuse.  A refusal
    /// is returned as [`StoreError::Transform`] and nothing is written.
    pub async fn try_update<F, E>(&self, transform: F) -> Result<T, StoreError>
    where
        F: FnOnce(T) -> Result<T, E>,
        E: Into<TransformError>,
    {
        let guard = Arc::clone(&self.writer).lock_owned().await;
        let current = self.read().await?;
        let next = transform(current).map_err(|e| StoreError::Transform(e.into()))?;
        self.commit(guard, next).await
    }

    /// Subscribes to committed values.
    ///
    /// The returned stream yields the current value first and then every
    /// newly committed value.  A slow consumer only sees the most recent one;
    /// it never receives a value older than one it has already seen.  The
    /// stream ends when the store is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the current value has to be loaded and
    /// the blob cannot be read.
    pub async fn observe(&self) -> Result<BoxStream<'static, T>, StoreError> {
        self.read().await?;
        let receiver = self.latest.subscribe();

        let values = stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first {
                // Err means the store was dropped.
                receiver.changed().await.ok()?;
            }
            let value = receiver.borrow_and_update().clone()?;
            Some((value, (receiver, false)))
        });
        Ok(values.boxed())
    }

    fn cached(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    async fn load(&self) -> Result<T, StoreError> {
        let stored = self.blob.read().await.map_err(|source| StoreError::Io {
            location: self.blob.location(),
            source,
        })?;

        let Some(bytes) = stored else {
            debug!(location = %self.blob.location(), "no stored value; using default");
            return Ok(self.serializer.default_value());
        };

        match self.serializer.read_from(&bytes) {
            Ok(value) => {
                debug!(location = %self.blob.location(), len = bytes.len(), "loaded stored value");
                Ok(value)
            }
            Err(e) => {
                warn!(
                    location = %self.blob.location(),
                    error = %e,
                    "stored value is corrupt; using default"
                );
                Ok(self.serializer.default_value())
            }
        }
    }

    /// Installs a freshly loaded value unless a writer committed one first,
    /// and returns whichever value is now current.
    fn publish_loaded(&self, loaded: T) -> T {
        let mut current = loaded;
        self.latest.send_if_modified(|slot| match slot {
            Some(committed) => {
                current = committed.clone();
                false
            }
            None => {
                *slot = Some(current.clone());
                true
            }
        });
        current
    }

    /// Encodes `value`, then replaces the blob and publishes the value on a
    /// task that holds `guard` until both are done.
    async fn commit(&self, guard: OwnedMutexGuard<()>, value: T) -> Result<T, StoreError> {
        let bytes = self.serializer.write_to(&value)?;
        let blob = Arc::clone(&self.blob);
        let latest = Arc::clone(&self.latest);

        let task = tokio::spawn(async move {
            let _guard = guard;
            let len = bytes.len();
            blob.replace(bytes).await.map_err(|source| StoreError::Io {
                location: blob.location(),
                source,
            })?;

            latest.send_replace(Some(value.clone()));
            debug!(location = %blob.location(), len, "committed value");
            Ok::<_, StoreError>(value)
        });

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(StoreError::Io {
                location: self.blob.location(),
                source: io::Error::new(io::ErrorKind::Interrupted, e),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
