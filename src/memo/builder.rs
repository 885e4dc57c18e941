//! Builder pattern for registering memoized computations.
//!
//! The builder is the registration surface: everything here is configured
//! once, when the computation is wrapped, and is immutable afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::memo::{ComputeError, Memoized};
use crate::naming::Namer;
use crate::signature::{BoundArgs, Signature};
use crate::storage::{BincodeStore, Store};

/// Error type for builder validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// No base name was provided.
    #[error("Base name is required. Use .name() to set it.")]
    MissingName,
    /// No signature was provided.
    #[error("Signature is required. Use .signature() to set it.")]
    MissingSignature,
    /// No computation was provided.
    #[error("Computation is required. Use .computation() to set it.")]
    MissingComputation,
}

/// Builder for constructing a [`Memoized`] computation with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// let f = Memoized::builder()
///     .name("f")
///     .directory("cache")
///     .signature(signature)
///     .computation(|args| Ok(expensive(args)))
///     .build()?;
/// ```
pub struct MemoBuilder<T, F> {
    name: Option<String>,
    directory: Option<PathBuf>,
    namer: Option<Namer>,
    store: Option<Arc<dyn Store<T>>>,
    signature: Option<Signature>,
    computation: Option<F>,
    debug: bool,
}

impl<T, F> MemoBuilder<T, F> {
    /// Create a new empty builder.
    pub fn new() -> Self {
        MemoBuilder {
            name: None,
            directory: None,
            namer: None,
            store: None,
            signature: None,
            computation: None,
            debug: false,
        }
    }

    /// Set the base name: the prefix of every derived cache key.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the directory cached entries are stored in.
    ///
    /// May be omitted if a preconfigured [`Namer`] carries the directory
    /// instead; the namer's value wins (first-set-wins).
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Use a custom namer (abbreviation, length limits, digest sizes).
    pub fn namer(mut self, namer: Namer) -> Self {
        self.namer = Some(namer);
        self
    }

    /// Use a custom persistence strategy. Defaults to [`BincodeStore`].
    pub fn store(mut self, store: impl Store<T> + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set the parameter descriptor for the computation.
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Set the computation to memoize.
    ///
    /// Assumed pure: it runs only on cache misses and refreshes, so any
    /// side effects replay only then. Its failures propagate to the caller
    /// unchanged and nothing is cached for the invocation.
    pub fn computation(mut self, computation: F) -> Self
    where
        F: Fn(&BoundArgs) -> Result<T, ComputeError>,
    {
        self.computation = Some(computation);
        self
    }

    /// Emit human-readable tracing output for cache decisions. No
    /// behavioral effect.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the [`Memoized`] computation.
    ///
    /// Applies first-set-wins configuration to the namer: a name or
    /// directory already present on a custom namer is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the name, signature, or computation is missing.
    pub fn build(self) -> Result<Memoized<T, F>, BuilderError>
    where
        T: Serialize + DeserializeOwned + 'static,
        F: Fn(&BoundArgs) -> Result<T, ComputeError>,
    {
        let name = self.name.ok_or(BuilderError::MissingName)?;
        let signature = self.signature.ok_or(BuilderError::MissingSignature)?;
        let computation = self.computation.ok_or(BuilderError::MissingComputation)?;

        let mut namer = self.namer.unwrap_or_default();
        namer.configure_name(&name);
        if let Some(directory) = self.directory {
            namer.configure_directory(directory);
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(BincodeStore) as Arc<dyn Store<T>>);

        Ok(Memoized::from_parts(
            name,
            signature,
            namer,
            store,
            computation,
            self.debug,
        ))
    }
}

impl<T, F> Default for MemoBuilder<T, F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::CallArgs;

    #[test]
    fn missing_fields_are_reported() {
        let err = MemoBuilder::<i64, fn(&BoundArgs) -> Result<i64, ComputeError>>::new()
            .build()
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingName);

        let err = MemoBuilder::<i64, fn(&BoundArgs) -> Result<i64, ComputeError>>::new()
            .name("f")
            .build()
            .unwrap_err();
        assert_eq!(err, BuilderError::MissingSignature);
    }

    #[test]
    fn namer_configuration_is_first_set_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut namer = Namer::new();
        namer.configure_directory(dir.path());

        // The builder's directory is a no-op when the namer already has one.
        let f = Memoized::builder()
            .name("f")
            .directory("/nonexistent/ignored")
            .namer(namer)
            .signature(Signature::builder().param("a").build().unwrap())
            .computation(|args: &BoundArgs| Ok(args.get("a").and_then(|v| v.as_i64()).unwrap()))
            .build()
            .unwrap();

        let result = f.call(CallArgs::new().positional(4)).unwrap();
        assert!(result.path().starts_with(dir.path()));
    }
}
