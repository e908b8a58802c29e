//! Binary min-heap backed by a dense `Vec`
//!
//! The element at index `i` has children at `2i + 1` and `2i + 2`; every
//! element compares `<=` both of its children.
//!
//! # Complexity
//!
//! - insert / extract_min: O(log n)
//! - peek: O(1)
//! - from_vec (bottom-up heapify): O(n)
//! - peek_top(k): O(n + k log n), clones the heap
//! - drain_sorted: O(n log n), consumes the contents

use super::errors::{StructureError, StructureResult};

/// Min-heap priority queue
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    data: Vec<T>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinHeap<T> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap has no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Smallest element, without removing it
    pub fn peek(&self) -> StructureResult<&T> {
        self.data.first().ok_or(StructureError::empty("peek"))
    }

    /// Backing array in heap order (root at index 0)
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Ord> MinHeap<T> {
    /// Builds a heap from arbitrary elements with bottom-up heapify.
    pub fn from_vec(data: Vec<T>) -> Self {
        let mut heap = Self { data };
        heap.heapify();
        heap
    }

    /// Sifts down every non-leaf, last one first
    fn heapify(&mut self) {
        for index in (0..self.data.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    /// Adds an element
    pub fn insert(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    /// Removes and returns the smallest element
    pub fn extract_min(&mut self) -> StructureResult<T> {
        if self.data.is_empty() {
            return Err(StructureError::empty("extract_min"));
        }

        let min = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Empties the heap, returning its elements in ascending order.
    pub fn drain_sorted(&mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Ok(item) = self.extract_min() {
            sorted.push(item);
        }
        sorted
    }

    /// Returns true if an equal element is stored. O(n).
    pub fn contains(&self, item: &T) -> bool {
        self.data.contains(item)
    }

    /// Checks the heap property at every parent. O(n).
    pub fn verify_heap_property(&self) -> bool {
        (1..self.data.len()).all(|child| self.data[(child - 1) / 2] <= self.data[child])
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.data[index] >= self.data[parent] {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.data[left] < self.data[smallest] {
                smallest = left;
            }
            if right < len && self.data[right] < self.data[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.data.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: Ord + Clone> MinHeap<T> {
    /// The `n` smallest elements in ascending order, without mutating the heap.
    ///
    /// Returns every element, still ascending, when `n >= len()`.
    pub fn peek_top(&self, n: usize) -> Vec<T> {
        let mut scratch = self.clone();
        let mut top = Vec::with_capacity(n.min(self.data.len()));
        while top.len() < n {
            match scratch.extract_min() {
                Ok(item) => top.push(item),
                Err(_) => break,
            }
        }
        top
    }

    /// Copy of the backing array in heap order
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }
}

impl<T: Ord> From<Vec<T>> for MinHeap<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
