use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An immutable list that is replaced wholesale on every structural change.
///
/// Code that captured a snapshot (for example to walk a civ's units while a cascade
/// relocates some of them) keeps seeing the list as it was when taken. Cloning the
/// list allocates a fresh copy, so a cloned civilization never shares state with
/// the original.
pub struct SnapshotList<T> {
    items: Arc<Vec<T>>,
}

impl<T> SnapshotList<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }

    /// Cheap handle on the current contents
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.items)
    }

    pub fn replace(&mut self, items: Vec<T>) {
        self.items = Arc::new(items);
    }
}

impl<T: Clone> SnapshotList<T> {
    /// Builds the next snapshot with `item` appended
    pub fn with_added(&mut self, item: T) {
        let mut next = self.items.as_ref().clone();
        next.push(item);
        self.replace(next);
    }

    /// Builds the next snapshot keeping only the items matching `keep`
    pub fn retain_into_new(&mut self, keep: impl Fn(&T) -> bool) {
        let next: Vec<T> = self.items.iter().filter(|it| keep(*it)).cloned().collect();
        if next.len() != self.items.len() {
            self.replace(next);
        }
    }

    /// Builds the next snapshot with every item passed through `f`
    pub fn map_into_new(&mut self, f: impl Fn(&T) -> T) {
        let next = self.items.iter().map(f).collect();
        self.replace(next);
    }
}

impl<T: Clone> Clone for SnapshotList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::new(self.items.as_ref().clone()),
        }
    }
}

impl<T> Default for SnapshotList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for SnapshotList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.items.as_slice()
    }
}

impl<T> From<Vec<T>> for SnapshotList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SnapshotList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: Serialize> Serialize for SnapshotList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.as_slice().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SnapshotList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_old_snapshot_survives_replacement() {
        let mut list = SnapshotList::from(vec![1, 2, 3]);
        let before = list.snapshot();
        list.retain_into_new(|it| *it != 2);
        list.with_added(4);
        assert_eq!(before.as_slice(), &[1, 2, 3]);
        assert_eq!(&*list, &[1, 3, 4]);
    }

    #[test]
    fn test_clone_is_independent() {
        let list = SnapshotList::from(vec![1]);
        let mut copy = list.clone();
        copy.with_added(2);
        assert_eq!(list.len(), 1);
        assert_eq!(copy.len(), 2);
        assert!(!Arc::ptr_eq(&list.snapshot(), &copy.snapshot()));
    }
}
