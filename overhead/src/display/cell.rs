//! Versioned shared value.

use parking_lot::RwLock;

/// A value plus a monotonically increasing version stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

/// Single-writer, many-reader cell whose every write bumps a version.
///
/// Readers can tell whether the value changed since they last looked
/// without comparing contents.
#[derive(Debug)]
pub struct VersionedCell<T> {
    inner: RwLock<Versioned<T>>,
}

impl<T: Clone> VersionedCell<T> {
    /// Create a cell at version 0.
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(Versioned { version: 0, value }),
        }
    }

    /// Replace the value. Returns the new version.
    pub fn set(&self, value: T) -> u64 {
        let mut guard = self.inner.write();
        guard.version += 1;
        guard.value = value;
        guard.version
    }

    /// Clone of the current value and its version.
    pub fn get(&self) -> Versioned<T> {
        self.inner.read().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read().value)
    }

    pub fn version(&self) -> u64 {
        self.inner.read().version
    }
}

impl<T: Clone + Default> Default for VersionedCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_version_increments_on_every_set() {
        let cell = VersionedCell::new(None::<u32>);
        assert_eq!(cell.version(), 0);

        assert_eq!(cell.set(Some(1)), 1);
        assert_eq!(cell.set(Some(1)), 2);
        assert_eq!(cell.get(), Versioned { version: 2, value: Some(1) });
    }

    #[test]
    fn test_read_without_clone() {
        let cell = VersionedCell::new(vec![1, 2, 3]);
        assert_eq!(cell.read(|v| v.len()), 3);
    }

    #[test]
    fn test_shared_between_threads() {
        let cell = Arc::new(VersionedCell::<u64>::default());
        let writer = {
            let cell = Arc::clone(&cell);
            std::thread::spawn(move || {
                for i in 1..=100 {
                    cell.set(i);
                }
            })
        };
        writer.join().unwrap();

        let snapshot = cell.get();
        assert_eq!(snapshot.version, 100);
        assert_eq!(snapshot.value, 100);
    }
}
