use serde::{Deserialize, Serialize};

/// One window of an incrementally loaded collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: usize,
    pub requested_limit: usize,
    /// A full page suggests more may exist.
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, offset: usize, requested_limit: usize) -> Self {
        let has_more = items.len() == requested_limit;
        Self {
            items,
            offset,
            requested_limit,
            has_more,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset of the page that would follow this one.
    pub fn next_offset(&self) -> usize {
        self.offset + self.items.len()
    }
}
