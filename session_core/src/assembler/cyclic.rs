//! Wrap-around cursor over a fixed list.

/// A non-empty list read in order forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicSource<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T: Clone> CyclicSource<T> {
    /// Returns `None` for an empty list.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self { items, cursor: 0 })
    }

    /// The item under the cursor; the cursor then advances, wrapping at the end.
    pub fn next_item(&mut self) -> T {
        let item = self.items[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.items.len();
        item
    }

    /// The next `count` items, wrapping as often as needed.
    pub fn take(&mut self, count: usize) -> Vec<T> {
        (0..count).map(|_| self.next_item()).collect()
    }

    /// Index of the item the next call returns.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// A constructed source is never empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
