//! # memostore
//!
//! Durable, argument-keyed memoization.
//!
//! `memostore` caches the result of a pure computation on disk, keyed by a
//! deterministic name derived from the call arguments that actually affect
//! the output. Arguments left at their declared defaults stay out of the
//! key, so keys remain stable when new defaulted parameters are added.
//! Every invocation returns a [`Cached`](memo::Cached) wrapper carrying
//! the value and its provenance (the arguments, the derived key, and the
//! backing file), so cached results can feed other memoized computations
//! and trace a readable lineage.
//!
//! ## Example
//!
//! ```rust,ignore
//! use memostore::prelude::*;
//!
//! let signature = Signature::builder()
//!     .param("dataset")
//!     .param_with_default("window", 7)
//!     .build()?;
//!
//! let rollup = Memoized::builder()
//!     .name("rollup")
//!     .directory("cache")
//!     .signature(signature)
//!     .computation(|args| {
//!         let dataset = args.get("dataset").and_then(ArgValue::as_str).unwrap();
//!         let window = args.get("window").and_then(ArgValue::as_i64).unwrap();
//!         Ok(expensive_rollup(dataset, window))
//!     })
//!     .build()?;
//!
//! // Computes and stores under cache/rollup.dataset-sales.bin
//! let first = rollup.call(CallArgs::new().positional("sales"))?;
//! // Loads from storage without running the computation.
//! let second = rollup.call(CallArgs::new().positional("sales"))?;
//!
//! // Force recomputation, overwriting the stored entry.
//! let fresh = rollup.call(CallArgs::new().positional("sales").refresh(true))?;
//! ```
//!
//! ## Cache keys
//!
//! Keys are `<base>.<arg>-<value>.<arg>-<value>` over the sorted relevant
//! arguments. Three rules decide relevance: the receiver parameter never
//! counts, parameters whose names start with `_` never count, and a
//! parameter with a default counts only when the supplied value differs
//! from it. Over-length keys degrade to `<base>.<digest>` using a stable
//! truncated SHA-256, collision-resistant and reproducible across
//! processes.
//!
//! ## Storage formats
//!
//! The default strategy is compact binary ([`storage::BincodeStore`]).
//! The `json` feature adds a human-readable strategy and the `compression`
//! feature a gzip-compressed one; both are optional and their absence does
//! not affect the default.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod labeled;
pub mod memo;
pub mod naming;
pub mod signature;
pub mod storage;
pub mod value;

/// Common imports for convenient usage.
pub mod prelude {
    pub use crate::labeled::Labeled;
    pub use crate::memo::{BuilderError, Cached, ComputeError, MemoBuilder, MemoError, Memoized};
    pub use crate::naming::{Namer, NamingError};
    pub use crate::signature::{
        ArgumentError, BoundArgs, CallArgs, Signature, SignatureBuilder, SignatureError,
    };
    pub use crate::storage::{BincodeStore, StorageError, Store};
    pub use crate::value::ArgValue;

    #[cfg(feature = "json")]
    pub use crate::storage::JsonStore;

    #[cfg(feature = "compression")]
    pub use crate::storage::GzipStore;
}
