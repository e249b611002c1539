//! Hash collection helpers
//!
//! Provides ahash-backed sets used for text deduplication
//! and term lookups inside rules.

use ahash::RandomState;
use std::collections::HashSet;

/// Create a new `HashSet` with the ahash hasher
///
/// # Example
///
/// ```rust
/// use capcheck_core::utils::hashers::create_hash_set;
///
/// let mut seen = create_hash_set::<String>();
/// assert!(seen.insert("Hello".to_string()));
/// assert!(!seen.insert("Hello".to_string()));
/// ```
#[must_use]
pub fn create_hash_set<T>() -> HashSet<T, RandomState> {
    HashSet::with_hasher(RandomState::new())
}
