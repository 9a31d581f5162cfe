//! Per-run state bag with typed keys.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// A well-known state bag key bound to the type of value stored under it.
///
/// The name is the stable, externally visible identifier; the type parameter
/// makes every read and write through the key type-checked.
///
/// # Examples
///
/// ```
/// use armstep_core::{StateBag, StateKey};
///
/// const IMAGE_NAME: StateKey<String> = StateKey::new("ImageName");
///
/// let mut bag = StateBag::new();
/// bag.put(IMAGE_NAME, "ubuntu-22.04".to_string());
/// assert_eq!(bag.get(IMAGE_NAME), "ubuntu-22.04");
/// ```
pub struct StateKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Creates a key with the given stable name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    /// Returns the key name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateKey").field(&self.name).finish()
    }
}

impl<T> fmt::Display for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Shared mutable state for a single pipeline run.
///
/// Steps read their inputs from the bag and write their outputs (notably the
/// failure under [`ERROR`](crate::keys::ERROR)) back into it. A bag is created
/// before the first step runs and dropped once the run is over; it is never
/// shared between runs.
///
/// # Examples
///
/// ```
/// use armstep_core::{StateBag, StateKey};
///
/// const ATTEMPTS: StateKey<u32> = StateKey::new("Attempts");
/// const LABEL: StateKey<String> = StateKey::new("Label");
///
/// let mut bag = StateBag::new();
/// bag.put(ATTEMPTS, 3);
///
/// assert_eq!(bag.get_ok(ATTEMPTS), Some(&3));
/// assert_eq!(bag.get_ok(LABEL), None);
/// ```
pub struct StateBag {
    data: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
    started_at: Instant,
}

impl fmt::Debug for StateBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateBag")
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl Default for StateBag {
    fn default() -> Self {
        Self::new()
    }
}

impl StateBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            started_at: Instant::now(),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put<T: Any + Send + Sync>(&mut self, key: StateKey<T>, value: T) {
        self.data.insert(key.name(), Box::new(value));
    }

    /// Returns the value under `key`, or `None` if it was never set.
    ///
    /// A value stored under the same name with a different type also yields
    /// `None`.
    pub fn get_ok<T: Any>(&self, key: StateKey<T>) -> Option<&T> {
        self.data
            .get(key.name())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns the value under a key the caller requires to be present.
    ///
    /// # Panics
    ///
    /// Panics if the key is absent. Steps only call this for their declared
    /// inputs; a missing input is a wiring bug in the pipeline definition.
    #[allow(clippy::panic)]
    pub fn get<T: Any>(&self, key: StateKey<T>) -> &T {
        match self.get_ok(key) {
            Some(value) => value,
            None => panic!("state bag has no value of the expected type for required key '{key}'"),
        }
    }

    /// Returns `true` if a value of the key's type is stored under it.
    pub fn contains<T: Any>(&self, key: StateKey<T>) -> bool {
        self.get_ok(key).is_some()
    }

    /// Returns an iterator over the names of all stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Time elapsed since the bag was created.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: StateKey<String> = StateKey::new("Name");
    const COUNT: StateKey<u32> = StateKey::new("Count");
    const NAME_AS_COUNT: StateKey<u32> = StateKey::new("Name");

    #[test]
    fn test_put_and_get() {
        let mut bag = StateBag::new();
        bag.put(NAME, "rg1".to_string());
        bag.put(COUNT, 2);

        assert_eq!(bag.get(NAME), "rg1");
        assert_eq!(bag.get_ok(COUNT), Some(&2));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_put_overwrites() {
        let mut bag = StateBag::new();
        bag.put(COUNT, 1);
        bag.put(COUNT, 5);

        assert_eq!(bag.get(COUNT), &5);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_get_ok_absent() {
        let bag = StateBag::new();
        assert_eq!(bag.get_ok(NAME), None);
        assert!(!bag.contains(NAME));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_absent() {
        let mut bag = StateBag::new();
        bag.put(NAME, "westus".to_string());

        assert_eq!(bag.get_ok(NAME_AS_COUNT), None);
        assert!(bag.contains(NAME));
    }

    #[test]
    #[should_panic(expected = "required key 'Name'")]
    fn test_get_missing_required_key_panics() {
        let bag = StateBag::new();
        let _ = bag.get(NAME);
    }

    #[test]
    fn test_keys() {
        let mut bag = StateBag::new();
        bag.put(NAME, "rg1".to_string());
        bag.put(COUNT, 1);

        let mut keys: Vec<_> = bag.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["Count", "Name"]);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(NAME.to_string(), "Name");
        assert_eq!(format!("{:?}", COUNT), "StateKey(\"Count\")");
    }
}
