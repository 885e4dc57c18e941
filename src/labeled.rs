//! Argument-derived display names for values used as parameters.
//!
//! The companion surface to the engine: a [`Labeled`] value carries a
//! display name derived through the same classifier + namer pipeline that
//! derives cache keys, so passing it to a memoized computation embeds a
//! readable description of how it was built. Provenance only; nothing is
//! stored.

use std::collections::BTreeMap;
use std::fmt;

use crate::memo::MemoError;
use crate::naming::Namer;
use crate::signature::{CallArgs, Signature};
use crate::value::ArgValue;

/// A value paired with a display name derived from construction arguments.
pub struct Labeled<T> {
    value: T,
    name: String,
    params: BTreeMap<String, ArgValue>,
}

impl<T> Labeled<T> {
    /// Derive a display name for `value` from the arguments that built it.
    ///
    /// Classification follows the cache-key rules: arguments equal to their
    /// declared default are left out of the name, so
    /// `Labeled::derive("P", &sig, &call, p)` with defaults untouched names
    /// the value plain `P`.
    ///
    /// # Errors
    ///
    /// Fails if the arguments do not bind to the signature.
    pub fn derive(
        base: &str,
        signature: &Signature,
        call: &CallArgs,
        value: T,
    ) -> Result<Self, MemoError> {
        Self::derive_with_namer(Namer::new(), base, signature, call, value)
    }

    /// Like [`derive`](Labeled::derive) with a custom namer (abbreviation,
    /// length limits). The base name applies first-set-wins, so a namer
    /// that already carries a name keeps it.
    pub fn derive_with_namer(
        mut namer: Namer,
        base: &str,
        signature: &Signature,
        call: &CallArgs,
        value: T,
    ) -> Result<Self, MemoError> {
        let bound = signature.bind(call)?;
        namer.configure_name(base);
        let name = namer.name_for_args(&bound.relevant())?;
        Ok(Labeled {
            value,
            name,
            params: bound.full(),
        })
    }

    /// The wrapped value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the wrapper and take the value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// The derived display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full argument map recorded for provenance.
    pub fn params(&self) -> &BTreeMap<String, ArgValue> {
        &self.params
    }
}

impl<T> fmt::Display for Labeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name)
    }
}

impl<T> fmt::Debug for Labeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<T> From<&Labeled<T>> for ArgValue {
    fn from(labeled: &Labeled<T>) -> Self {
        ArgValue::Str(format!("[{}]", labeled.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Config {
        depth: i64,
    }

    fn signature() -> Signature {
        Signature::builder()
            .param("a")
            .param("b")
            .param_with_default("c", 3)
            .build()
            .unwrap()
    }

    #[test]
    fn name_reflects_non_default_arguments() {
        let call = CallArgs::new().positional(1).positional(2).positional(3);
        let labeled = Labeled::derive("P", &signature(), &call, Config { depth: 1 }).unwrap();

        assert_eq!(labeled.name(), "P.a-1.b-2");
        assert_eq!(labeled.to_string(), "[P.a-1.b-2]");
        assert_eq!(labeled.value().depth, 1);
    }

    #[test]
    fn default_arguments_stay_in_provenance() {
        let call = CallArgs::new().positional(1).positional(2).positional(3);
        let labeled = Labeled::derive("P", &signature(), &call, ()).unwrap();

        assert_eq!(labeled.params().get("c"), Some(&ArgValue::Int(3)));
        assert!(!labeled.name().contains('c'));
    }

    #[test]
    fn converts_to_arg_value_as_bracketed_name() {
        let call = CallArgs::new().positional(1).positional(2);
        let labeled = Labeled::derive("P", &signature(), &call, ()).unwrap();

        assert_eq!(
            ArgValue::from(&labeled),
            ArgValue::Str("[P.a-1.b-2]".to_string())
        );
    }
}
