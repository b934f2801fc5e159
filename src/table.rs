//! Unique table: node storage with hash-consing.
//!
//! Nodes live in a plain `Vec`, addressed by index. Lookup goes through a
//! bucket array of chained entries, keyed by the node's [`MyHash`] value.
//! Index `0` is reserved for the terminal node and never appears in a chain.

use crate::utils::MyHash;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    /// Index of the next entry in the same bucket (0 = end of chain).
    next: usize,
}

#[derive(Debug)]
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: MyHash + Eq + Copy,
{
    /// Create a new table with `2^bits` initial buckets, holding `sentinel` at index 0.
    pub fn new(bits: usize, sentinel: T) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let size = 1usize << bits;
        let mut data = Vec::with_capacity(size);
        data.push(Entry { value: sentinel, next: 0 });

        Self {
            data,
            buckets: vec![0; size],
            bitmask: (size - 1) as u64,
        }
    }

    /// Number of stored values, including the sentinel.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        &self.data[index].value
    }

    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Return the index of `value`, inserting it if it is not present yet.
    pub fn put(&mut self, value: T) -> usize {
        let bucket = self.bucket_index(&value);

        let mut index = self.buckets[bucket];
        while index != 0 {
            if self.data[index].value == value {
                return index;
            }
            index = self.data[index].next;
        }

        let i = self.data.len();
        self.data.push(Entry {
            value,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = i;

        if self.data.len() > 2 * self.buckets.len() {
            self.grow();
        }

        i
    }

    /// Double the bucket array and relink every chain.
    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;
        for i in 1..self.data.len() {
            let bucket = self.bucket_index(&self.data[i].value);
            self.data[i].next = self.buckets[bucket];
            self.buckets[bucket] = i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_put_dedup() {
        let mut table = Table::new(2, Item(0));
        let a = table.put(Item(5));
        let b = table.put(Item(5));
        assert_eq!(a, b);
        assert_eq!(a, 1);
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_put_collision() {
        let mut table = Table::new(2, Item(0));
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(*table.value(index1), Item(5));
        assert_eq!(*table.value(index2), Item(-5));
        assert_eq!(table.put(Item(5)), index1);
        assert_eq!(table.put(Item(-5)), index2);
    }

    #[test]
    fn test_grow_keeps_entries() {
        let mut table = Table::new(1, Item(0));
        let indices: Vec<usize> = (1..100).map(|x| table.put(Item(x))).collect();
        assert!(table.num_buckets() > 2);
        for (x, &i) in (1..100).zip(&indices) {
            assert_eq!(table.put(Item(x)), i);
            assert_eq!(*table.value(i), Item(x));
        }
    }
}
