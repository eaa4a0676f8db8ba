//! Error types for the cachelab library.
//!
//! ## Key Components
//!
//! - [`UnknownPolicy`]: Returned when a registry call names a policy that was
//!   not registered at construction.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (debug-only `check_invariants` methods).
//! - [`ConfigError`]: Returned when simulation or provider configuration
//!   parameters are invalid (e.g. out-of-range probabilities).
//!
//! Key absence on `get` is *not* an error anywhere in this crate; it is an
//! ordinary `Option::None` that callers branch on to decide whether to fetch
//! from the backing archive.

use std::fmt;

// ---------------------------------------------------------------------------
// UnknownPolicy
// ---------------------------------------------------------------------------

/// Error returned when a registry operation names an unregistered policy.
///
/// The registry's policy set is fixed at construction; routing to any other
/// name surfaces this error to the caller. It is never retried internally.
///
/// # Example
///
/// ```
/// use cachelab::config::CacheConfig;
/// use cachelab::manager::CacheRegistry;
///
/// let mut registry: CacheRegistry<u32, String> =
///     CacheRegistry::new(&CacheConfig::default()).unwrap();
/// let err = registry.get(&1, "CLOCK").unwrap_err();
/// assert!(err.to_string().contains("CLOCK"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(String);

impl UnknownPolicy {
    /// Creates a new `UnknownPolicy` error for the given policy name.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the policy name that failed to resolve.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown cache policy '{}'", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by debug-only `check_invariants` methods on the cache and its
/// ordering structures. A correct build never produces one at runtime; any
/// occurrence indicates a bug in the eviction bookkeeping, not a recoverable
/// condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when configuration parameters are invalid.
///
/// Produced by `validate()` on the config structs and by fallible
/// constructors that consume them. Carries a human-readable description of
/// which parameter failed validation. Capacity 0 and capacity 1 are valid
/// boundary configurations and never produce this error.
///
/// # Example
///
/// ```
/// use cachelab::config::WeightedParams;
///
/// let bad = WeightedParams {
///     special_range: (30, 40),
///     special_probability: 1.7,
/// };
/// let err = bad.validate().unwrap_err();
/// assert!(err.to_string().contains("probability"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
