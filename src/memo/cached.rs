//! The cached-result wrapper.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::storage::{suffixed, StorageError, Store};
use crate::value::ArgValue;

/// A value produced through the caching protocol, together with the
/// provenance that produced it: the full argument map, the derived cache
/// key, the storage path, and the persistence strategy that wrote it.
///
/// `Cached` values can themselves be passed as arguments to other memoized
/// computations: `ArgValue::from(&cached)` renders the derived key, so a
/// downstream key records the upstream lineage readably.
///
/// The wrapper is immutable; [`reload`](Cached::reload) returns a new
/// instance rather than mutating in place.
pub struct Cached<T> {
    value: T,
    params: BTreeMap<String, ArgValue>,
    name: String,
    path: PathBuf,
    store: Arc<dyn Store<T>>,
}

impl<T> Cached<T> {
    pub(crate) fn new(
        value: T,
        params: BTreeMap<String, ArgValue>,
        name: String,
        path: PathBuf,
        store: Arc<dyn Store<T>>,
    ) -> Self {
        Cached {
            value,
            params,
            name,
            path,
            store,
        }
    }

    /// The cached value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and take the value, discarding provenance.
    pub fn into_value(self) -> T {
        self.value
    }

    /// The full argument map recorded for provenance.
    pub fn params(&self) -> &BTreeMap<String, ArgValue> {
        &self.params
    }

    /// The derived cache key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The suffix-free storage path; the persistence strategy appends its
    /// own format suffix.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The actual on-disk file backing this entry.
    pub fn storage_file(&self) -> PathBuf {
        suffixed(&self.path, self.store.extension())
    }

    /// Load a fresh copy of this entry from storage.
    ///
    /// Returns a new wrapper sharing this one's key, path, and provenance.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] if the backing file has been removed,
    /// or any other storage failure.
    pub fn reload(&self) -> Result<Cached<T>, StorageError> {
        let value = self.store.load(&self.path)?;
        Ok(Cached {
            value,
            params: self.params.clone(),
            name: self.name.clone(),
            path: self.path.clone(),
            store: Arc::clone(&self.store),
        })
    }
}

impl<T> fmt::Display for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name)
    }
}

impl<T> fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<T> From<&Cached<T>> for ArgValue {
    /// Renders the wrapper's derived key, so cached results trace lineage
    /// when used as arguments to other memoized computations.
    fn from(cached: &Cached<T>) -> Self {
        ArgValue::Str(format!("[{}]", cached.name))
    }
}
