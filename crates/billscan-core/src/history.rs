//! History store: a bounded list of past analyses on disk
//!
//! Storage is deliberately plain: one `history.json` file holding the record
//! list plus an `uploads/` directory of source images. The store owns the
//! list; records are immutable once appended and only leave via a wholesale
//! clear. The list is capped at the 50 most recent records, oldest evicted
//! first.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::image::BillImage;
use crate::models::{AnalysisRecord, BillData};

/// Maximum number of records retained; appending past this evicts the oldest
pub const MAX_RECORDS: usize = 50;

pub struct HistoryStore {
    history_file: PathBuf,
    uploads_dir: PathBuf,
}

impl HistoryStore {
    /// Open (or initialize) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let uploads_dir = root.join("uploads");
        std::fs::create_dir_all(&uploads_dir)?;
        let history_file = root.join("history.json");
        if !history_file.exists() {
            std::fs::write(&history_file, "[]")?;
        }
        Ok(Self {
            history_file,
            uploads_dir,
        })
    }

    /// Directory holding stored source images
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// All records, newest first.
    pub fn list(&self) -> Result<Vec<AnalysisRecord>> {
        let raw = std::fs::read_to_string(&self.history_file)?;
        let mut records: Vec<AnalysisRecord> = serde_json::from_str(&raw)?;
        records.sort_by(|a, b| b.raw_timestamp.cmp(&a.raw_timestamp));
        Ok(records)
    }

    /// Look up a single record by id.
    pub fn get(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Append a completed analysis, storing its source image when supplied.
    ///
    /// Returns the new record. Evicts beyond [`MAX_RECORDS`].
    pub fn append(&self, data: &BillData, image: Option<&BillImage>) -> Result<AnalysisRecord> {
        let image_path = match image {
            Some(image) => Some(self.store_image(image)?),
            None => None,
        };

        let now = Utc::now();
        let record = AnalysisRecord {
            id: record_id(data, now.timestamp_millis()),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            raw_timestamp: now.to_rfc3339(),
            data: data.clone(),
            image_path,
        };

        let mut records = self.list()?;
        records.insert(0, record.clone());
        records.truncate(MAX_RECORDS);
        self.write(&records)?;
        Ok(record)
    }

    /// Drop all records and stored images.
    pub fn clear(&self) -> Result<()> {
        self.write(&[])?;
        for entry in std::fs::read_dir(&self.uploads_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Content-addressed image storage: the filename is derived from a hash
    /// of the bytes, so re-analyzing the same photo doesn't duplicate it.
    fn store_image(&self, image: &BillImage) -> Result<String> {
        let digest = Sha256::digest(&image.bytes);
        let file_name = format!("{}.{}", &hex::encode(digest)[..16], image.mime.extension());
        std::fs::write(self.uploads_dir.join(&file_name), &image.bytes)?;
        Ok(format!("/uploads/{file_name}"))
    }

    fn write(&self, records: &[AnalysisRecord]) -> Result<()> {
        std::fs::write(&self.history_file, serde_json::to_string_pretty(records)?)?;
        Ok(())
    }
}

/// Record id: epoch millis plus a short content hash, unique enough for a
/// 50-entry list without pulling in a UUID dependency.
fn record_id(data: &BillData, millis: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.account_number.as_bytes());
    hasher.update(millis.to_le_bytes());
    format!("{}-{}", millis, &hex::encode(hasher.finalize())[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageMime;
    use crate::models::ConfidenceScores;

    fn sample_bill(account: &str) -> BillData {
        BillData {
            account_name: None,
            account_number: account.into(),
            service_address: None,
            statement_date: None,
            service_period_start: None,
            service_period_end: None,
            total_current_charges: 10.0,
            due_date: "2024-02-01".into(),
            confidence_scores: ConfidenceScores {
                overall: 0.9,
                account_name: None,
                account_number: 0.9,
                service_address: None,
                statement_date: None,
                total_current_charges: 0.9,
                due_date: 0.9,
            },
            usage_charts: vec![],
            line_items: vec![],
        }
    }

    #[test]
    fn test_append_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        let first = store.append(&sample_bill("A"), None).unwrap();
        let second = store.append(&sample_bill("B"), None).unwrap();

        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        // newest first
        assert_eq!(records[0].id, second.id);
        assert_eq!(store.get(&first.id).unwrap().unwrap().data.account_number, "A");
    }

    #[test]
    fn test_eviction_at_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        for i in 0..(MAX_RECORDS + 3) {
            store.append(&sample_bill(&format!("acct-{i}")), None).unwrap();
        }

        let records = store.list().unwrap();
        assert_eq!(records.len(), MAX_RECORDS);
        // the earliest appends were evicted
        assert!(records.iter().all(|r| r.data.account_number != "acct-0"));
    }

    #[test]
    fn test_image_stored_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path()).unwrap();

        let image = BillImage {
            mime: ImageMime::Png,
            bytes: vec![1, 2, 3, 4],
        };
        let record = store.append(&sample_bill("A"), Some(&image)).unwrap();
        let path = record.image_path.unwrap();
        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".png"));

        let file = store.uploads_dir().join(path.trim_start_matches("/uploads/"));
        assert!(file.exists());

        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(!file.exists());
    }

    #[test]
    fn test_reopen_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = HistoryStore::open(dir.path()).unwrap();
            store.append(&sample_bill("A"), None).unwrap();
        }
        let store = HistoryStore::open(dir.path()).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
