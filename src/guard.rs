//! Field allow-listing for sort and filter parameters.
//!
//! A guard is either the wildcard `"*"` (allow every field) or an array of
//! permitted field names. Guards frequently come from untyped configuration,
//! so validation is a total three-way function: a guard that is neither the
//! wildcard nor an array is a configuration bug, not a client error, and is
//! reported as [`GuardOutcome::Misconfigured`] rather than a rejection.

use serde_json::Value;

/// The sentinel that allows every field, either as the whole guard or as an
/// element of an allow-list.
pub const WILDCARD: &str = "*";

/// Result of checking one field name against a guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The field may be used.
    Allowed,
    /// The guard is well-formed but does not list the field.
    Rejected,
    /// The guard itself is neither the wildcard nor an array.
    Misconfigured,
}

/// Typed guard configuration for callers that set up guards in code.
///
/// Converts into the untyped guard value the interpreter stores, so handler
/// code can write `set_sort_fields(FieldGuard::allow(["name", "age"]))`
/// instead of hand-building JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldGuard {
    /// Allow every field.
    Wildcard,
    /// Allow exactly the listed fields.
    AllowList(Vec<String>),
}

impl FieldGuard {
    /// Build an allow-list guard from any iterable of field names.
    pub fn allow<I>(fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::AllowList(fields.into_iter().map(Into::into).collect())
    }
}

impl From<FieldGuard> for Value {
    fn from(guard: FieldGuard) -> Self {
        match guard {
            FieldGuard::Wildcard => Self::String(WILDCARD.to_string()),
            FieldGuard::AllowList(fields) => {
                Self::Array(fields.into_iter().map(Self::String).collect())
            }
        }
    }
}

/// Check whether `field` is permitted under `guard`.
///
/// Pure and total: never panics, never errors. Callers translate
/// [`GuardOutcome::Rejected`] into a client-facing rejection and
/// [`GuardOutcome::Misconfigured`] into a server-side configuration error.
#[must_use]
pub fn validate(field: &str, guard: &Value) -> GuardOutcome {
    if guard.as_str() == Some(WILDCARD) {
        return GuardOutcome::Allowed;
    }
    if let Some(entries) = guard.as_array() {
        let matches = |candidate: &str| entries.iter().any(|e| e.as_str() == Some(candidate));
        if matches(WILDCARD) || matches(field) {
            return GuardOutcome::Allowed;
        }
        return GuardOutcome::Rejected;
    }
    GuardOutcome::Misconfigured
}
