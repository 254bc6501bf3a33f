//! Versioned signals and memoized derived values.
//!
//! Every [`Signal`] carries a [`Version`] that advances on each real change.
//! A [`Memo`] remembers the key (usually a tuple of input versions) it was
//! computed from and recomputes only when the key differs, so any number of
//! readers within one frame share a single computation and always see the
//! value for the latest inputs. Memos expose their own output version, which
//! downstream memos fold into their keys; a change therefore propagates
//! top-down, once, on the next read.
//!
//! ```text
//!   selected_species ──▶ filtered ──┬──▶ scatter
//!                                   └──▶ distribution histogram ◀── attribute, bins
//! ```

use std::fmt;

/// Monotonic change counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    fn next(self) -> Self {
        Version(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// An input value. Writing an equal value is not a change.
#[derive(Debug, Clone)]
pub struct Signal<T> {
    value: T,
    version: Version,
}

impl<T: PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            version: Version::default(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Replace the value. Returns `true` if it changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version = self.version.next();
        true
    }

    /// Edit the value in place through a copy. Returns `true` if it changed.
    pub fn update(&mut self, edit: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let mut next = self.value.clone();
        edit(&mut next);
        self.set(next)
    }
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// A cached derived value, recomputed when its dependency key changes.
pub struct Memo<K, T> {
    name: &'static str,
    cached: Option<(K, T)>,
    version: Version,
    computations: u64,
}

impl<K: PartialEq + fmt::Debug, T> Memo<K, T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cached: None,
            version: Version::default(),
            computations: 0,
        }
    }

    /// Return the cached value for `key`, computing it first if stale.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> T) -> &T {
        let entry = match self.cached.take() {
            Some((cached_key, value)) if cached_key == key => (cached_key, value),
            _ => {
                log::debug!("recomputing {} for {:?}", self.name, key);
                self.computations += 1;
                self.version = self.version.next();
                (key, compute())
            }
        };
        &self.cached.insert(entry).1
    }

    /// Version of the cached output; advances on every recomputation.
    pub fn version(&self) -> Version {
        self.version
    }

    /// How many times the value has been computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

impl<K, T> fmt::Debug for Memo<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("cached", &self.cached.is_some())
            .field("version", &self.version)
            .field("computations", &self.computations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_writes_do_not_bump_version() {
        let mut s = Signal::new(3);
        let v0 = s.version();
        assert!(!s.set(3));
        assert_eq!(s.version(), v0);
        assert!(s.set(4));
        assert_ne!(s.version(), v0);
        assert_eq!(*s.get(), 4);
    }

    #[test]
    fn update_edits_through_a_copy() {
        let mut s = Signal::new(vec![1, 2]);
        assert!(s.update(|v| v.push(3)));
        assert_eq!(s.get(), &vec![1, 2, 3]);
        assert!(!s.update(|_| {}));
    }

    #[test]
    fn memo_recomputes_only_on_key_change() {
        let mut input = Signal::new(2);
        let mut memo: Memo<Version, i32> = Memo::new("square");

        let v = *input.get();
        assert_eq!(*memo.get_or_compute(input.version(), || v * v), 4);
        assert_eq!(*memo.get_or_compute(input.version(), || unreachable_compute()), 4);
        assert_eq!(memo.computations(), 1);

        input.set(5);
        let v = *input.get();
        assert_eq!(*memo.get_or_compute(input.version(), || v * v), 25);
        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn memo_version_tracks_recomputation() {
        let mut memo: Memo<u8, &str> = Memo::new("label");
        let before = memo.version();
        memo.get_or_compute(1, || "one");
        let after_first = memo.version();
        memo.get_or_compute(1, || "uno");
        assert_eq!(memo.version(), after_first);
        assert_ne!(before, after_first);

        assert_eq!(*memo.get_or_compute(2, || "two"), "two");
        assert_ne!(memo.version(), after_first);
        assert_eq!(memo.computations(), 2);
    }

    fn unreachable_compute() -> i32 {
        panic!("memo should have been served from cache")
    }
}
