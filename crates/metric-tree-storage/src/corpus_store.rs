//! Append-only JSONL corpus file.
//!
//! One `CorpusRecord` per line. Readers tolerate damage: a line that does not
//! parse is skipped, and a missing file is an empty corpus. Writers are
//! serialized so concurrent appends never interleave within a line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use metric_tree_core::retrieval::{CorpusRecord, MetadataFilter};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

pub struct CorpusStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append records, creating the file and its directory on first use.
    ///
    /// Every record must carry a non-empty vector, and all vectors in one
    /// batch must share a width. Nothing is written if any record fails.
    pub fn append(&self, records: &[CorpusRecord]) -> StorageResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        validate_batch(records)?;

        let mut lines = Vec::with_capacity(records.len());
        for record in records {
            lines.push(serde_json::to_string(record)?);
        }

        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for line in &lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!(count = lines.len(), path = %self.path.display(), "Appended corpus records");
        Ok(lines.len())
    }

    /// Read every record matching `filter`, in file order.
    pub fn load(&self, filter: &MetadataFilter) -> StorageResult<Vec<CorpusRecord>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<CorpusRecord>(&line) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    skipped += 1;
                    debug!(line = index + 1, error = %e, "Skipping malformed corpus line");
                }
            }
        }

        debug!(loaded = records.len(), skipped, "Loaded corpus");
        Ok(records)
    }

    /// Number of readable records.
    pub fn count(&self) -> StorageResult<usize> {
        self.load(&MetadataFilter::default()).map(|r| r.len())
    }
}

fn validate_batch(records: &[CorpusRecord]) -> StorageResult<()> {
    let mut width: Option<usize> = None;
    for record in records {
        let len = match record.vector.as_deref() {
            Some(v) if !v.is_empty() => v.len(),
            _ => {
                return Err(StorageError::InvalidRecord {
                    id: record.id.clone(),
                    reason: "missing vector".into(),
                })
            }
        };
        match width {
            None => width = Some(len),
            Some(w) if w != len => {
                return Err(StorageError::InvalidRecord {
                    id: record.id.clone(),
                    reason: format!("vector width {} differs from batch width {}", len, w),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn record(id: &str, stage: &str) -> CorpusRecord {
        CorpusRecord::new(id, format!("text {}", id))
            .with_vector(vec![1.0, 0.0, 0.5])
            .with_stage(stage)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("none.jsonl"));
        assert!(store.load(&MetadataFilter::default()).unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_append_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("nested/data/rag_store.jsonl"));

        let written = store
            .append(&[record("a", "Activation"), record("b", "Retention")])
            .unwrap();
        assert_eq!(written, 2);
        store.append(&[record("c", "Activation")]).unwrap();

        let all = store.load(&MetadataFilter::default()).unwrap();
        assert_eq!(
            all.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(all[0], record("a", "Activation"));

        let activation = store
            .load(&MetadataFilter::new(None, Some("Activation".into())))
            .unwrap();
        assert_eq!(activation.len(), 2);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rag_store.jsonl");
        let store = CorpusStore::new(&path);
        store.append(&[record("a", "Activation")]).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id":"legacy","text":"no vector","vector":null}}"#).unwrap();
        drop(file);
        store.append(&[record("b", "Activation")]).unwrap();

        let all = store.load(&MetadataFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[1].vector.is_none());
    }

    #[test]
    fn test_invalid_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("rag_store.jsonl"));

        let no_vector = CorpusRecord::new("x", "t");
        assert!(matches!(
            store.append(&[record("a", "Activation"), no_vector]),
            Err(StorageError::InvalidRecord { .. })
        ));

        let wide = CorpusRecord::new("w", "t").with_vector(vec![1.0; 4]);
        assert!(store.append(&[record("a", "Activation"), wide]).is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(CorpusStore::new(dir.path().join("rag_store.jsonl")));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .append(&[record(&format!("{}-{}", t, i), "Activation")])
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.count().unwrap(), 200);
    }
}
