use thiserror::Error;

/// Binary min-heap keyed by a `u64` priority.
///
/// Equal priorities come out in insertion order: every entry carries a
/// sequence number taken at insert time and the heap orders by
/// `(priority, sequence)`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    priority: u64,
    seq: u64,
    value: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.priority, self.seq)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapErr {
    #[error("index {0} out of range for heap of size {1}")]
    KeyError(usize, usize),
    #[error("extract from empty heap")]
    HeapUnderflow,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { elements: vec![], next_seq: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap { elements: Vec::with_capacity(capacity), next_seq: 0 }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size())
            .all(|i| self.elements[Self::parent(i)].key() <= self.elements[i].key())
    }

    fn min_heapify(&mut self, i: usize) -> Result<(), HeapErr> {
        if i >= self.heap_size() {
            return Err(HeapErr::KeyError(i, self.heap_size()));
        }
        let mut i = i;
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.heap_size() && self.elements[l].key() < self.elements[smallest].key() {
                smallest = l;
            }
            if r < self.heap_size() && self.elements[r].key() < self.elements[smallest].key() {
                smallest = r;
            }
            if smallest == i {
                return Ok(());
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[p].key() <= self.elements[i].key() {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    pub fn insert(&mut self, value: T, priority: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.elements.push(Entry { priority, seq, value });
        self.sift_up(self.heap_size() - 1);
        debug_assert!(self.valid_min_heap());
    }

    /// Removes the lowest-priority value together with its priority.
    pub fn extract_min(&mut self) -> Result<(T, u64), HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let n = self.heap_size() - 1;
        self.elements.swap(0, n);
        let result = self.elements.pop().ok_or(HeapErr::HeapUnderflow)?;
        if !self.is_empty() {
            self.min_heapify(0)?;
        }
        Ok((result.value, result.priority))
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
