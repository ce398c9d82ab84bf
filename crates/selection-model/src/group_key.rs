//! Group keys scoping independent click histories.
//!
//! Every list binding that supports range selection needs its own click
//! history. A [`GroupKey`] names one history; a [`KeyGenerator`] mints fresh
//! keys and a [`GroupKeyRegistry`] hands them out per structural scope, so
//! bindings nested under the same container share a single history.
//!
//! # Generators
//!
//! - [`CounterKeyGenerator`] (default): deterministic base-36 counter,
//!   reproducible in tests
//! - [`UuidKeyGenerator`]: random v4 UUIDs
//!
//! # Example
//!
//! ```
//! use selection_model::group_key::{CounterKeyGenerator, KeyGenerator};
//!
//! let keys = CounterKeyGenerator::new();
//! assert_eq!(keys.next_key().as_str(), "001");
//! assert_eq!(keys.next_key().as_str(), "002");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use selection_model_core::{targets, Result, SelectionError};

/// Identifier of one click history scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(Arc<str>);

impl GroupKey {
    /// Wraps an existing key string.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints group keys that never repeat for the life of the generator.
pub trait KeyGenerator: Send + Sync {
    /// Returns a fresh key.
    fn next_key(&self) -> GroupKey;
}

/// Deterministic counter over the symbols `0-9` then `A-Z`.
///
/// The counter starts at `"000"` and advances before each key is returned.
/// Scanning from the rightmost symbol: `'9'` becomes `'A'` without carrying,
/// `'Z'` becomes `'0'` and carries, anything else steps to the next symbol.
/// A carry out of the leftmost symbol prepends a `'0'`, widening the key.
pub struct CounterKeyGenerator {
    symbols: Mutex<Vec<u8>>,
}

impl Default for CounterKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterKeyGenerator {
    /// Creates a counter at `"000"`.
    pub fn new() -> Self {
        Self {
            symbols: Mutex::new(b"000".to_vec()),
        }
    }

    /// Creates a counter at `seed`; the first key is the one after it.
    ///
    /// Fails unless `seed` is a non-empty string of `0-9` and `A-Z`.
    pub fn starting_after(seed: &str) -> Result<Self> {
        let valid = !seed.is_empty()
            && seed
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());
        if !valid {
            return Err(SelectionError::invalid_option("group_key_seed", seed));
        }
        Ok(Self {
            symbols: Mutex::new(seed.as_bytes().to_vec()),
        })
    }

    fn advance(symbols: &mut Vec<u8>) {
        for symbol in symbols.iter_mut().rev() {
            match *symbol {
                b'9' => {
                    *symbol = b'A';
                    return;
                }
                b'Z' => *symbol = b'0',
                other => {
                    *symbol = other + 1;
                    return;
                }
            }
        }
        symbols.insert(0, b'0');
    }
}

impl KeyGenerator for CounterKeyGenerator {
    fn next_key(&self) -> GroupKey {
        let mut symbols = self.symbols.lock();
        Self::advance(&mut symbols);
        let key: String = symbols.iter().map(|&b| char::from(b)).collect();
        GroupKey::new(key)
    }
}

/// Random v4 UUID keys.
///
/// Unique across a session but not reproducible; prefer
/// [`CounterKeyGenerator`] where tests need stable keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn next_key(&self) -> GroupKey {
        GroupKey::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Structural identity of a binding or its container, as tracked by the
/// binding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

impl ScopeId {
    /// Wraps an identity the binding layer already owns.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocates a process-unique scope identity.
    ///
    /// Allocated identities count down from `u64::MAX`, away from the small
    /// values binding layers usually pass to [`ScopeId::new`].
    pub fn unique() -> Self {
        Self(u64::MAX - NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identity.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Resolves group keys per scope, sharing them with parent scopes.
///
/// # Example
///
/// ```
/// use selection_model::group_key::{GroupKeyRegistry, ScopeId};
///
/// let registry = GroupKeyRegistry::new();
/// let list = ScopeId::new(1);
/// let row_a = ScopeId::new(2);
/// let row_b = ScopeId::new(3);
///
/// // Siblings under one container share a history.
/// let a = registry.resolve(row_a, Some(list));
/// let b = registry.resolve(row_b, Some(list));
/// assert_eq!(a, b);
/// ```
pub struct GroupKeyRegistry {
    generator: Box<dyn KeyGenerator>,
    keys: Mutex<HashMap<ScopeId, GroupKey>>,
}

impl Default for GroupKeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupKeyRegistry {
    /// Creates a registry backed by a [`CounterKeyGenerator`].
    pub fn new() -> Self {
        Self::with_generator(CounterKeyGenerator::new())
    }

    /// Creates a registry backed by `generator`.
    pub fn with_generator(generator: impl KeyGenerator + 'static) -> Self {
        Self {
            generator: Box::new(generator),
            keys: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<GroupKeyRegistry> {
        static GLOBAL: OnceLock<Arc<GroupKeyRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(GroupKeyRegistry::new()))
            .clone()
    }

    /// Returns the key for `scope`, assigning one if needed.
    ///
    /// A key cached on `scope` wins; otherwise a key cached on `parent` is
    /// adopted; otherwise a fresh key is minted and cached on both.
    pub fn resolve(&self, scope: ScopeId, parent: Option<ScopeId>) -> GroupKey {
        let mut keys = self.keys.lock();

        if let Some(key) = keys.get(&scope) {
            return key.clone();
        }

        if let Some(key) = parent.and_then(|parent| keys.get(&parent).cloned()) {
            tracing::debug!(target: targets::GROUP_KEY, %key, ?scope, "adopted parent group key");
            keys.insert(scope, key.clone());
            return key;
        }

        let key = self.generator.next_key();
        tracing::debug!(target: targets::GROUP_KEY, %key, ?scope, "assigned new group key");
        keys.insert(scope, key.clone());
        if let Some(parent) = parent {
            keys.insert(parent, key.clone());
        }
        key
    }

    /// Returns the key already cached for `scope`, if any.
    pub fn key_for(&self, scope: ScopeId) -> Option<GroupKey> {
        self.keys.lock().get(&scope).cloned()
    }

    /// Drops the key cached for `scope`, returning it.
    ///
    /// Other scopes sharing the key keep it.
    pub fn forget(&self, scope: ScopeId) -> Option<GroupKey> {
        let key = self.keys.lock().remove(&scope);
        if let Some(key) = &key {
            tracing::debug!(target: targets::GROUP_KEY, %key, ?scope, "released group key");
        }
        key
    }
}

static_assertions::assert_impl_all!(GroupKeyRegistry: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_counter_sequence() {
        let keys = CounterKeyGenerator::new();
        let produced: Vec<String> = (0..16).map(|_| keys.next_key().to_string()).collect();

        assert_eq!(produced[0], "001");
        assert_eq!(produced[8], "009");
        assert_eq!(produced[9], "00A");
        assert_eq!(produced[15], "00G");
    }

    #[test]
    fn test_counter_carry() {
        let keys = CounterKeyGenerator::starting_after("00Y").unwrap();
        assert_eq!(keys.next_key().as_str(), "00Z");
        assert_eq!(keys.next_key().as_str(), "010");

        let keys = CounterKeyGenerator::starting_after("09Z").unwrap();
        assert_eq!(keys.next_key().as_str(), "0A0");
    }

    #[test]
    fn test_counter_widens_on_overflow() {
        let keys = CounterKeyGenerator::starting_after("ZZZ").unwrap();
        assert_eq!(keys.next_key().as_str(), "0000");
        assert_eq!(keys.next_key().as_str(), "0001");
    }

    #[test]
    fn test_counter_rejects_bad_seed() {
        assert!(CounterKeyGenerator::starting_after("").is_err());
        assert!(CounterKeyGenerator::starting_after("0a0").is_err());
    }

    #[test]
    fn test_counter_monotonic() {
        let keys = CounterKeyGenerator::new();
        let produced: Vec<GroupKey> = (0..5000).map(|_| keys.next_key()).collect();

        for pair in produced.windows(2) {
            let (a, b) = (pair[0].as_str(), pair[1].as_str());
            assert!(a.len() == b.len() && a < b, "{a} should precede {b}");
        }
        let distinct: HashSet<_> = produced.iter().collect();
        assert_eq!(distinct.len(), produced.len());
    }

    #[test]
    fn test_uuid_keys() {
        let keys = UuidKeyGenerator;
        let a = keys.next_key();
        let b = keys.next_key();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert_eq!(a.as_str().as_bytes()[14], b'4');
    }

    #[test]
    fn test_registry_resolution() {
        let registry = GroupKeyRegistry::new();
        let container = ScopeId::new(10);
        let first = ScopeId::new(11);
        let second = ScopeId::new(12);
        let unrelated = ScopeId::new(20);

        let key = registry.resolve(first, Some(container));
        assert_eq!(key.as_str(), "001");
        assert_eq!(registry.key_for(container), Some(key.clone()));
        assert_eq!(registry.resolve(second, Some(container)), key);
        assert_eq!(registry.resolve(first, None), key);

        let other = registry.resolve(unrelated, None);
        assert_ne!(other, key);
        assert_eq!(registry.key_for(ScopeId::new(99)), None);
    }

    #[test]
    fn test_registry_forget_keeps_shared_entries() {
        let registry = GroupKeyRegistry::new();
        let container = ScopeId::new(1);
        let list = ScopeId::new(2);

        let key = registry.resolve(list, Some(container));
        assert_eq!(registry.forget(list), Some(key.clone()));
        assert_eq!(registry.forget(list), None);
        assert_eq!(registry.key_for(list), None);
        assert_eq!(registry.key_for(container), Some(key.clone()));

        // A new list under the same container picks the shared key up again.
        assert_eq!(registry.resolve(ScopeId::new(3), Some(container)), key);
    }

    #[test]
    fn test_unique_scopes() {
        assert_ne!(ScopeId::unique(), ScopeId::unique());
    }
}
