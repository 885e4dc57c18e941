//! Parameter descriptors, call arguments, and the argument classifier.
//!
//! A [`Signature`] is the one-time description of a memoized computation's
//! parameters: their declaration order, their defaults, and an optional
//! receiver marker. It is registered explicitly through
//! [`SignatureBuilder`] and is immutable afterwards.
//!
//! At each invocation, [`Signature::bind`] resolves a [`CallArgs`] (ordered
//! positional values plus keyword values) against the descriptor, producing
//! [`BoundArgs`]. From there the classifier partitions the supplied values
//! into two maps:
//!
//! - **relevant** arguments: those that influence the cache key, because
//!   they were supplied with a value different from their declared default
//!   (parameters without a default are always relevant once supplied);
//! - **full** arguments: every supplied parameter, default-equal or not,
//!   kept for provenance.
//!
//! Both maps exclude the receiver and any parameter whose name starts with
//! the reserved ignore prefix `_`. Ignore-prefixed values stay readable
//! through [`BoundArgs::get`] so the computation itself can still use them.

use std::collections::BTreeMap;

use crate::value::ArgValue;

/// Parameters whose names start with this prefix never participate in
/// naming or provenance.
pub const IGNORE_PREFIX: char = '_';

/// Error type for signature construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The same parameter name was declared twice.
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),
    /// A receiver was declared after other parameters.
    #[error("receiver `{0}` must be the first declared parameter")]
    ReceiverNotFirst(String),
}

/// Error type for binding one invocation's arguments to a signature.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    /// A keyword argument names no declared parameter.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    /// A parameter received both a positional and a keyword value, or the
    /// same keyword twice.
    #[error("parameter `{0}` was supplied more than once")]
    DuplicateArgument(String),
    /// A parameter without a default was not supplied.
    #[error("missing required parameter `{0}`")]
    MissingArgument(String),
    /// More positional values than declared parameters.
    #[error("too many positional arguments: expected at most {expected}, got {given}")]
    TooManyPositional {
        /// Number of declared non-receiver parameters.
        expected: usize,
        /// Number of positional values supplied.
        given: usize,
    },
}

#[derive(Debug, Clone)]
struct Param {
    name: String,
    default: Option<ArgValue>,
    receiver: bool,
}

/// Ordered parameter descriptor for a memoized computation.
///
/// Built once via [`Signature::builder`]; replaces the kind of live
/// signature introspection that dynamic languages use for the same job.
///
/// # Example
///
/// ```rust,ignore
/// let signature = Signature::builder()
///     .param("a")
///     .param("b")
///     .param_with_default("c", 3)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<Param>,
}

/// Builder for [`Signature`] with a fluent API.
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    params: Vec<Param>,
}

impl SignatureBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a receiver (`self`-like) parameter.
    ///
    /// The receiver is never bound from [`CallArgs`] (in Rust the
    /// computation closure captures its receiver) and is always excluded
    /// from both classifier outputs. It must be declared first.
    pub fn receiver(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
            receiver: true,
        });
        self
    }

    /// Declare a parameter without a default value.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
            receiver: false,
        });
        self
    }

    /// Declare a parameter with a default value.
    ///
    /// A call that supplies a value equal to the default produces the same
    /// cache key as a call that omits the parameter entirely.
    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        default: impl Into<ArgValue>,
    ) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
            receiver: false,
        });
        self
    }

    /// Build the [`Signature`].
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter name is declared twice or a receiver
    /// is declared anywhere but first.
    pub fn build(self) -> Result<Signature, SignatureError> {
        for (i, param) in self.params.iter().enumerate() {
            if param.receiver && i != 0 {
                return Err(SignatureError::ReceiverNotFirst(param.name.clone()));
            }
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(SignatureError::DuplicateParameter(param.name.clone()));
            }
        }
        Ok(Signature {
            params: self.params,
        })
    }
}

impl Signature {
    /// Create a new [`SignatureBuilder`].
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::new()
    }

    /// Bind one invocation's arguments to this signature.
    ///
    /// Positional values match declared parameters by position (the
    /// receiver, if any, does not consume a position). Declared defaults
    /// fill in for omitted parameters so the computation can read every
    /// parameter through [`BoundArgs::get`].
    ///
    /// # Errors
    ///
    /// Fails fast on unknown keywords, duplicate supply, excess positional
    /// values, and missing no-default parameters.
    pub fn bind(&self, call: &CallArgs) -> Result<BoundArgs, ArgumentError> {
        let formal: Vec<&Param> = self.params.iter().filter(|p| !p.receiver).collect();

        if call.positional.len() > formal.len() {
            return Err(ArgumentError::TooManyPositional {
                expected: formal.len(),
                given: call.positional.len(),
            });
        }

        for (i, (name, _)) in call.keyword.iter().enumerate() {
            if !formal.iter().any(|p| &p.name == name) {
                return Err(ArgumentError::UnknownParameter(name.clone()));
            }
            if call.keyword[..i].iter().any(|(other, _)| other == name) {
                return Err(ArgumentError::DuplicateArgument(name.clone()));
            }
        }

        let mut entries = Vec::with_capacity(formal.len());

        for (i, param) in formal.iter().enumerate() {
            let positional = call.positional.get(i);
            let keyword = call
                .keyword
                .iter()
                .find(|(name, _)| name == &param.name)
                .map(|(_, value)| value);

            let (value, supplied) = match (positional, keyword) {
                (Some(_), Some(_)) => {
                    return Err(ArgumentError::DuplicateArgument(param.name.clone()))
                }
                (Some(v), None) | (None, Some(v)) => (v.clone(), true),
                (None, None) => match &param.default {
                    Some(default) => (default.clone(), false),
                    None => return Err(ArgumentError::MissingArgument(param.name.clone())),
                },
            };

            entries.push(BoundEntry {
                name: param.name.clone(),
                value,
                supplied,
                default: param.default.clone(),
            });
        }

        Ok(BoundArgs { entries })
    }
}

/// One invocation's arguments: ordered positional values, keyword values,
/// and the two reserved control flags.
///
/// The flags are out-of-band: they steer the engine's load-or-compute
/// branch and are never bound to parameters or recorded in provenance.
///
/// # Example
///
/// ```rust,ignore
/// let call = CallArgs::new()
///     .positional(1)
///     .positional(vec![2])
///     .keyword("c", 5)
///     .refresh(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<ArgValue>,
    keyword: Vec<(String, ArgValue)>,
    refresh: bool,
    refresh_no_save: bool,
}

impl CallArgs {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value.
    pub fn positional(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Supply a value by parameter name.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    /// Force recomputation; the result overwrites any stored entry.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Force recomputation without touching storage at all.
    pub fn refresh_no_save(mut self, refresh_no_save: bool) -> Self {
        self.refresh_no_save = refresh_no_save;
        self
    }

    pub(crate) fn refresh_requested(&self) -> bool {
        self.refresh
    }

    pub(crate) fn refresh_no_save_requested(&self) -> bool {
        self.refresh_no_save
    }
}

#[derive(Debug, Clone)]
struct BoundEntry {
    name: String,
    value: ArgValue,
    supplied: bool,
    default: Option<ArgValue>,
}

impl BoundEntry {
    fn ignored(&self) -> bool {
        self.name.starts_with(IGNORE_PREFIX)
    }

    fn differs_from_default(&self) -> bool {
        match &self.default {
            Some(default) => &self.value != default,
            None => true,
        }
    }
}

/// The result of binding a [`CallArgs`] to a [`Signature`]: every
/// non-receiver parameter with its effective value, in declaration order.
///
/// This is what the memoized computation receives. Defaults are filled in
/// for omitted parameters; ignore-prefixed parameters are present here even
/// though the classifier drops them.
#[derive(Debug, Clone)]
pub struct BoundArgs {
    entries: Vec<BoundEntry>,
}

impl BoundArgs {
    /// Look up a parameter's effective value (supplied or defaulted).
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    /// The arguments that influence the cache key.
    ///
    /// Supplied, non-ignored parameters whose value differs from their
    /// declared default; no-default parameters always qualify once
    /// supplied. Sorted by name, which is the iteration order the namer
    /// relies on.
    pub fn relevant(&self) -> BTreeMap<String, ArgValue> {
        self.entries
            .iter()
            .filter(|e| e.supplied && !e.ignored() && e.differs_from_default())
            .map(|e| (e.name.clone(), e.value.clone()))
            .collect()
    }

    /// Every supplied, non-ignored parameter, default-equal or not, for
    /// provenance. Relevant values overlay these; the overlay is idempotent
    /// because both maps draw from the same bound values.
    pub fn full(&self) -> BTreeMap<String, ArgValue> {
        let mut full: BTreeMap<String, ArgValue> = self
            .entries
            .iter()
            .filter(|e| e.supplied && !e.ignored())
            .map(|e| (e.name.clone(), e.value.clone()))
            .collect();
        for (name, value) in self.relevant() {
            full.insert(name, value);
        }
        full
    }
}
