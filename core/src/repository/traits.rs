use crate::error::Result;
use crate::model::record::Record;

/// Durable storage for the ordered record sequence.
pub trait RecordRepository {
    /// Reads every stored record in order. A missing source yields no records.
    fn load(&self) -> Result<Vec<Record>>;
    fn save(&self, records: &[Record]) -> Result<()>;
}
