use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, SolarError};
use crate::model::record::Record;
use crate::repository::traits::RecordRepository;

pub const DEFAULT_FILE_NAME: &str = "records.json";

/// Stores records as a pretty-printed JSON array.
#[derive(Clone, Debug)]
pub struct FileRecordRepository {
    file_path: PathBuf,
}

impl FileRecordRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// `<data dir>/solarlog/records.json`, falling back to the home
    /// directory and then the working directory.
    pub fn default_location() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("solarlog")
            .join(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn exists(&self) -> bool {
        self.file_path.exists()
    }

    /// Strict read: a missing file is reported as [`SolarError::NotFound`].
    pub fn read(&self) -> Result<Vec<Record>> {
        let file = File::open(&self.file_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SolarError::NotFound(self.file_path.clone()),
            _ => SolarError::Io(e),
        })?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)?;
        Ok(records)
    }
}

impl RecordRepository for FileRecordRepository {
    fn load(&self) -> Result<Vec<Record>> {
        match self.read() {
            Ok(records) => {
                info!(path = %self.file_path.display(), count = records.len(), "records loaded");
                Ok(records)
            }
            Err(SolarError::NotFound(path)) => {
                warn!(path = %path.display(), "data file does not exist, starting empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        info!(path = %self.file_path.display(), count = records.len(), "records saved");
        Ok(())
    }
}

pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn from_json(content: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Weather;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("Week 3", 120.5, Weather::Clear).unwrap(),
            Record::new("Week 1", 0.0, Weather::Rainy).unwrap(),
            Record::new("Week 1", 64.25, Weather::Cloudy)
                .unwrap()
                .with_month(1)
                .unwrap(),
        ]
    }

    #[test]
    fn test_save_then_load_preserves_records_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRecordRepository::new(dir.path().join("nested").join("solar.json"));

        repo.save(&sample()).unwrap();
        assert!(repo.exists());
        assert_eq!(repo.load().unwrap(), sample());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRecordRepository::new(dir.path().join("missing.json"));

        assert_eq!(repo.load().unwrap(), Vec::<Record>::new());
        assert!(matches!(repo.read(), Err(SolarError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let repo = FileRecordRepository::new(path);
        assert!(matches!(repo.load(), Err(SolarError::Json(_))));
    }

    #[test]
    fn test_load_trusts_stored_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"[{"week": "Week 5", "total_energy": -3.0, "weather": "Clear"}]"#,
        )
        .unwrap();

        let records = FileRecordRepository::new(path).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_energy(), -3.0);
        assert_eq!(records[0].month(), None);
    }

    #[test]
    fn test_json_round_trip() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"total_energy\": 120.5"));
        assert_eq!(from_json(&json).unwrap(), sample());
        assert_eq!(from_json("[]").unwrap(), Vec::<Record>::new());
    }
}
