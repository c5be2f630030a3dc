use tracing::debug;

use crate::error::{Result, SolarError};
use crate::model::record::Record;

/// Ordered, session-owned collection of records. Insertion order is the
/// display order; 1-based display positions map to `index + 1`.
///
/// There is no interior locking. Hosts that share a store across threads
/// must guard it with a single `Mutex` and compute metrics over a clone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: Record) {
        debug!(week = record.week(), energy = record.total_energy(), "record appended");
        self.records.push(record);
    }

    /// Replaces the whole record at `index`, returning the previous one.
    /// An out-of-range index leaves the store untouched.
    pub fn replace_at(&mut self, index: usize, record: Record) -> Result<Record> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(SolarError::Index { index, len })?;
        debug!(index, week = record.week(), "record replaced");
        Ok(std::mem::replace(slot, record))
    }

    pub fn filter<P>(&self, predicate: P) -> Vec<Record>
    where
        P: Fn(&Record) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).cloned().collect()
    }

    /// Adopts `records` wholesale. No validation is applied here; loaded
    /// data is trusted.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        debug!(count = records.len(), "store replaced");
        self.records = records;
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Weather;
    use pretty_assertions::assert_eq;

    fn record(week: &str, energy: f64, weather: Weather) -> Record {
        Record::new(week, energy, weather).unwrap()
    }

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.append(record("Week 1", 10.0, Weather::Clear));
        store.append(record("Week 2", 20.0, Weather::Rainy));
        store.append(record("Week 3", 30.0, Weather::Cloudy));
        store
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let store = sample_store();
        let weeks: Vec<_> = store.iter().map(|r| r.week()).collect();
        assert_eq!(weeks, vec!["Week 1", "Week 2", "Week 3"]);
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_replace_at_returns_previous() {
        let mut store = sample_store();
        let previous = store
            .replace_at(1, record("Week 2", 25.0, Weather::Clear))
            .unwrap();

        assert_eq!(previous.total_energy(), 20.0);
        assert_eq!(store.get(1).unwrap().total_energy(), 25.0);
        assert_eq!(store.get(1).unwrap().weather(), Weather::Clear);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_at_out_of_range_leaves_store_unchanged() {
        let mut store = sample_store();
        let before = store.clone();

        let err = store
            .replace_at(3, record("Week 9", 1.0, Weather::Clear))
            .unwrap_err();
        assert!(matches!(err, SolarError::Index { index: 3, len: 3 }));
        assert_eq!(store, before);

        assert!(store.replace_at(usize::MAX, record("Week 9", 1.0, Weather::Clear)).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_replace_at_on_empty_store() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.replace_at(0, record("Week 1", 1.0, Weather::Clear)),
            Err(SolarError::Index { index: 0, len: 0 })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let store = sample_store();
        let filtered = store.filter(|r| r.total_energy() > 15.0);
        let weeks: Vec<_> = filtered.iter().map(|r| r.week()).collect();
        assert_eq!(weeks, vec!["Week 2", "Week 3"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_all() {
        let mut store = sample_store();
        store.replace_all(vec![record("Week 8", 5.0, Weather::Rainy)]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().week(), "Week 8");

        store.replace_all(Vec::new());
        assert!(store.is_empty());
    }
}
