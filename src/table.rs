//! Immutable indexed tables.
//!
//! Both the MC catalog and the dialect dictionaries are loaded once and then
//! queried through a stable key (the 小韻號 of a catalog entry, the row number
//! of a dictionary entry). `IndexedTable` stores rows in key order and keeps a
//! key→position map built at construction.
//!
//! `index_of` is identity-based: it answers for a reference that points *into*
//! this table, whatever view or filter produced it, and rejects equal-looking
//! rows that live elsewhere.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct IndexedTable<T> {
    rows: Vec<T>,
    keys: Vec<usize>,
    positions: HashMap<usize, usize>,
}

impl<T> IndexedTable<T> {
    /// Build from `(key, row)` pairs. Rows are stored in ascending key order;
    /// a repeated key keeps the last row.
    pub fn new(pairs: impl IntoIterator<Item = (usize, T)>) -> Self {
        let mut pairs: Vec<(usize, T)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(key, _)| *key);
        pairs.reverse();
        pairs.dedup_by_key(|(key, _)| *key);
        pairs.reverse();

        let mut rows = Vec::with_capacity(pairs.len());
        let mut keys = Vec::with_capacity(pairs.len());
        let mut positions = HashMap::with_capacity(pairs.len());
        for (position, (key, row)) in pairs.into_iter().enumerate() {
            positions.insert(key, position);
            keys.push(key);
            rows.push(row);
        }

        IndexedTable { rows, keys, positions }
    }

    /// Build with keys `0..n` in iteration order.
    pub fn from_rows(rows: Vec<T>) -> Self {
        let keys: Vec<usize> = (0..rows.len()).collect();
        let positions = keys.iter().map(|&k| (k, k)).collect();
        IndexedTable { rows, keys, positions }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn entry_at(&self, key: usize) -> Option<&T> {
        self.positions.get(&key).map(|&position| &self.rows[position])
    }

    /// Key of a row of this table, found by address.
    pub fn index_of(&self, row: &T) -> Option<usize> {
        let size = std::mem::size_of::<T>();
        if size == 0 {
            return None;
        }
        let range = self.rows.as_ptr_range();
        let address = row as *const T as usize;
        let (start, end) = (range.start as usize, range.end as usize);
        if address < start || address >= end || (address - start) % size != 0 {
            return None;
        }
        Some(self.keys[(address - start) / size])
    }

    /// Rows matching `filter`, in key order.
    pub fn select(&self, filter: impl Fn(&T) -> bool) -> Vec<&T> {
        self.rows.iter().filter(|row| filter(row)).collect()
    }

    /// Keys of the rows matching `filter`, in key order. Keys are the stored
    /// keys, never renumbered.
    pub fn select_indices(&self, filter: impl Fn(&T) -> bool) -> Vec<usize> {
        self.iter().filter(|(_, row)| filter(row)).map(|(key, _)| key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.keys.iter().copied().zip(self.rows.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_keys_keep_their_identity() {
        let table = IndexedTable::new([(7, "b"), (2, "a"), (9, "c")]);

        assert_eq!(table.entry_at(2), Some(&"a"));
        assert_eq!(table.entry_at(3), None);

        let odd = table.select_indices(|row| *row != "a");
        assert_eq!(odd, vec![7, 9]);

        let selected = table.select(|row| *row == "c");
        assert_eq!(table.index_of(selected[0]), Some(9));
    }

    #[test]
    fn index_of_rejects_foreign_rows() {
        let table = IndexedTable::from_rows(vec![String::from("x"), String::from("y")]);
        let foreign = String::from("y");

        assert_eq!(table.index_of(&foreign), None);
        assert_eq!(table.index_of(table.entry_at(1).unwrap()), Some(1));
    }

    #[test]
    fn repeated_key_keeps_last_row() {
        let table = IndexedTable::new([(1, "first"), (1, "second")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entry_at(1), Some(&"second"));
    }
}
