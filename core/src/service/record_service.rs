use tracing::{info, warn};

use crate::error::{Result, SolarError};
use crate::model::record::Record;
use crate::repository::RecordRepository;
use crate::store::RecordStore;

/// A session: the in-memory store plus the repository it is persisted to.
pub struct RecordService<R: RecordRepository> {
    repo: R,
    store: RecordStore,
}

impl<R: RecordRepository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            store: RecordStore::new(),
        }
    }

    /// Creates a session pre-filled from the repository.
    pub fn open(repo: R) -> Result<Self> {
        let mut service = Self::new(repo);
        service.reload()?;
        Ok(service)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn add_records(&mut self, records: impl IntoIterator<Item = Record>) -> usize {
        let mut added = 0;
        for record in records {
            self.store.append(record);
            added += 1;
        }
        info!(added, total = self.store.len(), "records added");
        added
    }

    /// Replaces the entry at a 1-based display `position`.
    pub fn edit_record(&mut self, position: usize, record: Record) -> Result<Record> {
        let index = position.checked_sub(1).ok_or(SolarError::Index {
            index: 0,
            len: self.store.len(),
        });
        let result = index.and_then(|i| self.store.replace_at(i, record));
        if let Err(e) = &result {
            warn!(position, error = %e, "edit rejected");
        }
        result
    }

    /// Discards the store and re-reads the session repository.
    pub fn reload(&mut self) -> Result<usize> {
        let records = self.repo.load()?;
        let count = records.len();
        self.store.replace_all(records);
        Ok(count)
    }

    pub fn save(&self) -> Result<()> {
        self.repo.save(self.store.records())
    }

    /// Replaces the store with the contents of another repository.
    pub fn import_from<S: RecordRepository>(&mut self, source: &S) -> Result<usize> {
        let records = source.load()?;
        let count = records.len();
        self.store.replace_all(records);
        info!(count, "records imported");
        Ok(count)
    }

    pub fn export_to<S: RecordRepository>(&self, target: &S) -> Result<()> {
        target.save(self.store.records())?;
        info!(count = self.store.len(), "records exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Weather;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockRepo {
        records: RefCell<Vec<Record>>,
    }

    impl RecordRepository for MockRepo {
        fn load(&self) -> Result<Vec<Record>> {
            Ok(self.records.borrow().clone())
        }

        fn save(&self, records: &[Record]) -> Result<()> {
            *self.records.borrow_mut() = records.to_vec();
            Ok(())
        }
    }

    fn record(week: &str, energy: f64) -> Record {
        Record::new(week, energy, Weather::Clear).unwrap()
    }

    #[test]
    fn test_open_loads_existing_records() {
        let repo = MockRepo::default();
        repo.save(&[record("Week 1", 10.0)]).unwrap();

        let service = RecordService::open(repo).unwrap();
        assert_eq!(service.records(), &[record("Week 1", 10.0)]);
    }

    #[test]
    fn test_add_then_save() {
        let mut service = RecordService::new(MockRepo::default());
        let added = service.add_records(vec![record("Week 1", 10.0), record("Week 2", 20.0)]);
        assert_eq!(added, 2);

        service.save().unwrap();
        assert_eq!(service.repo.load().unwrap().len(), 2);
    }

    #[test]
    fn test_edit_uses_one_based_positions() {
        let mut service = RecordService::new(MockRepo::default());
        service.add_records(vec![record("Week 1", 10.0), record("Week 2", 20.0)]);

        let previous = service.edit_record(2, record("Week 2", 22.0)).unwrap();
        assert_eq!(previous.total_energy(), 20.0);
        assert_eq!(service.records()[1].total_energy(), 22.0);
    }

    #[test]
    fn test_edit_out_of_range_is_rejected() {
        let mut service = RecordService::new(MockRepo::default());
        service.add_records(vec![record("Week 1", 10.0)]);
        let before = service.store().clone();

        assert!(matches!(
            service.edit_record(0, record("Week 9", 1.0)),
            Err(SolarError::Index { .. })
        ));
        assert!(matches!(
            service.edit_record(2, record("Week 9", 1.0)),
            Err(SolarError::Index { index: 1, len: 1 })
        ));
        assert_eq!(service.store(), &before);
    }

    #[test]
    fn test_import_replaces_and_export_copies() {
        let mut service = RecordService::new(MockRepo::default());
        service.add_records(vec![record("Week 1", 10.0)]);

        let other = MockRepo::default();
        other.save(&[record("Week 5", 50.0), record("Week 6", 60.0)]).unwrap();

        assert_eq!(service.import_from(&other).unwrap(), 2);
        assert_eq!(service.records()[0].week(), "Week 5");

        let target = MockRepo::default();
        service.export_to(&target).unwrap();
        assert_eq!(target.load().unwrap(), service.records().to_vec());
    }
}
