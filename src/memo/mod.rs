//! The memoization engine.
//!
//! [`Memoized`] wraps a pure computation and instruments it to cache its
//! result durably, keyed by the arguments that actually changed from their
//! defaults. Per invocation the flow is one-directional:
//!
//! ```text
//! CallArgs → bind/classify → relevant args → key + path
//!          → probe storage → cached value | compute + save → Cached<T>
//! ```
//!
//! Two reserved flags on [`CallArgs`](crate::signature::CallArgs) steer the
//! branch: `refresh` recomputes and overwrites the stored entry,
//! `refresh_no_save` recomputes and leaves storage untouched. Neither flag
//! participates in naming or provenance.
//!
//! The engine is single-call, synchronous. Concurrent invocations with the
//! same key from multiple threads or processes race on the storage path;
//! there is no locking or at-most-once-compute guarantee. Arbitrating
//! concurrent writers is the caller's responsibility.

use std::sync::Arc;

use tracing::debug;

use crate::naming::{Namer, NamingError};
use crate::signature::{ArgumentError, BoundArgs, CallArgs, Signature};
use crate::storage::{StorageError, Store};

mod builder;
mod cached;

pub use self::builder::{BuilderError, MemoBuilder};
pub use self::cached::Cached;

/// Boxed error type a memoized computation may fail with.
pub type ComputeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by invoking a memoized computation.
#[derive(Debug, thiserror::Error)]
pub enum MemoError {
    /// The call's arguments did not bind to the declared signature.
    #[error("invalid arguments")]
    Arguments(#[from] ArgumentError),
    /// Key derivation was attempted before one-time configuration.
    #[error("cache configuration error")]
    Configuration(#[from] NamingError),
    /// Storage failed for a reason other than a missing entry. A missing
    /// entry is handled internally as the compute-and-store path.
    #[error("storage error")]
    Storage(#[from] StorageError),
    /// The computation itself failed; nothing was cached.
    #[error("computation failed")]
    Computation(#[source] ComputeError),
}

/// A computation instrumented to cache its result durably.
///
/// Construct via [`Memoized::builder`]; invoke via [`Memoized::call`].
/// Every invocation returns a [`Cached`] wrapper carrying the value and
/// the provenance used to produce it.
///
/// # Example
///
/// ```rust,ignore
/// use memostore::prelude::*;
///
/// let signature = Signature::builder()
///     .param("a")
///     .param_with_default("c", 3)
///     .build()?;
///
/// let f = Memoized::builder()
///     .name("f")
///     .directory("cache")
///     .signature(signature)
///     .computation(|args| {
///         let a = args.get("a").and_then(ArgValue::as_i64).unwrap_or(0);
///         let c = args.get("c").and_then(ArgValue::as_i64).unwrap_or(0);
///         Ok(a + c)
///     })
///     .build()?;
///
/// // First call computes and stores; the second loads.
/// let first = f.call(CallArgs::new().positional(1))?;
/// let second = f.call(CallArgs::new().positional(1))?;
/// assert_eq!(first.value(), second.value());
/// ```
pub struct Memoized<T, F> {
    name: String,
    signature: Signature,
    namer: Namer,
    store: Arc<dyn Store<T>>,
    computation: F,
    debug: bool,
}

impl<T, F> std::fmt::Debug for Memoized<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("namer", &self.namer)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl<T, F> Memoized<T, F>
where
    F: Fn(&BoundArgs) -> Result<T, ComputeError>,
{
    /// Create a new [`MemoBuilder`].
    pub fn builder() -> MemoBuilder<T, F> {
        MemoBuilder::new()
    }

    pub(crate) fn from_parts(
        name: String,
        signature: Signature,
        namer: Namer,
        store: Arc<dyn Store<T>>,
        computation: F,
        debug: bool,
    ) -> Self {
        Memoized {
            name,
            signature,
            namer,
            store,
            computation,
            debug,
        }
    }

    /// The registered base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the computation through the cache.
    ///
    /// Classifies the arguments, derives the key and path, then either
    /// loads the stored entry or computes and stores a new one. With
    /// `refresh` the computation always runs and overwrites storage; with
    /// `refresh_no_save` it always runs and storage is never touched.
    ///
    /// # Errors
    ///
    /// See [`MemoError`]. A missing entry is not an error; it is the
    /// compute-and-store path. A storage failure other than a missing
    /// entry aborts the invocation rather than being treated as a miss.
    pub fn call(&self, args: CallArgs) -> Result<Cached<T>, MemoError> {
        let refresh = args.refresh_requested();
        let refresh_no_save = args.refresh_no_save_requested();

        let bound = self.signature.bind(&args)?;
        let relevant = bound.relevant();
        let full = bound.full();

        let key = self.namer.name_for_args(&relevant)?;
        let path = self.namer.path_for_args(&relevant)?;

        let value = if refresh || refresh_no_save {
            if self.debug {
                debug!(cache = %self.name, %key, save = !refresh_no_save, "refreshing");
            }
            let value = self.compute(&bound)?;
            if !refresh_no_save {
                self.store.save(&path, &value)?;
            }
            value
        } else {
            match self.store.load(&path) {
                Ok(value) => {
                    if self.debug {
                        debug!(cache = %self.name, %key, "loaded stored entry");
                    }
                    value
                }
                Err(StorageError::NotFound { .. }) => {
                    if self.debug {
                        debug!(cache = %self.name, %key, "computing and saving");
                    }
                    let value = self.compute(&bound)?;
                    self.store.save(&path, &value)?;
                    value
                }
                Err(err) => return Err(err.into()),
            }
        };

        Ok(Cached::new(value, full, key, path, Arc::clone(&self.store)))
    }

    fn compute(&self, bound: &BoundArgs) -> Result<T, MemoError> {
        (self.computation)(bound).map_err(MemoError::Computation)
    }
}
