//! Durable conversion history backed by redb
//!
//! One record per job, keyed by the job id, JSON-encoded values. redb
//! transactions serialize writes per key; the blocking calls run on the
//! blocking thread pool behind an async facade so no executor thread
//! stalls on store I/O.

use std::path::Path;
use std::sync::Arc;

use jiff::Timestamp;
use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::error::{JobError, Result};
use crate::types::ConversionJob;

const JOBS: TableDefinition<&str, &[u8]> = TableDefinition::new("jobs");

#[derive(Clone)]
pub struct HistoryStore {
    db: Arc<Database>,
}

impl HistoryStore {
    /// Open or create the history database
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Storage`] when the file cannot be opened
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(storage_err)?;

        // Make sure the table exists so first reads don't fail
        let tx = db.begin_write().map_err(storage_err)?;
        {
            let _ = tx.open_table(JOBS).map_err(storage_err)?;
        }
        tx.commit().map_err(storage_err)?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert or replace a job record
    pub async fn upsert(&self, job: &ConversionJob) -> Result<()> {
        let db = Arc::clone(&self.db);
        let key = job.id.to_string();
        let value = encode(job)?;

        run_blocking(move || {
            let tx = db.begin_write().map_err(storage_err)?;
            {
                let mut table = tx.open_table(JOBS).map_err(storage_err)?;
                table
                    .insert(key.as_str(), value.as_slice())
                    .map_err(storage_err)?;
            }
            tx.commit().map_err(storage_err)
        })
        .await
    }

    /// Write a job record only if it still exists
    ///
    /// Returns `false` when the record was deleted concurrently; the
    /// write is then dropped rather than resurrecting the job.
    pub async fn update(&self, job: &ConversionJob) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let key = job.id.to_string();
        let value = encode(job)?;

        run_blocking(move || {
            let tx = db.begin_write().map_err(storage_err)?;
            let present = {
                let mut table = tx.open_table(JOBS).map_err(storage_err)?;
                if table.get(key.as_str()).map_err(storage_err)?.is_some() {
                    table
                        .insert(key.as_str(), value.as_slice())
                        .map_err(storage_err)?;
                    true
                } else {
                    false
                }
            };
            tx.commit().map_err(storage_err)?;
            Ok(present)
        })
        .await
    }

    /// Fetch a job record by id
    pub async fn get(&self, id: Uuid) -> Result<Option<ConversionJob>> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();

        run_blocking(move || {
            let tx = db.begin_read().map_err(storage_err)?;
            let table = tx.open_table(JOBS).map_err(storage_err)?;

            match table.get(key.as_str()).map_err(storage_err)? {
                Some(raw) => Ok(Some(decode(raw.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Remove a job record, reporting whether it existed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let key = id.to_string();

        run_blocking(move || {
            let tx = db.begin_write().map_err(storage_err)?;
            let removed = {
                let mut table = tx.open_table(JOBS).map_err(storage_err)?;
                table.remove(key.as_str()).map_err(storage_err)?.is_some()
            };
            tx.commit().map_err(storage_err)?;
            Ok(removed)
        })
        .await
    }

    /// Page through all records, newest first
    ///
    /// Ordered by `created_at` descending with ties broken by id
    /// descending, so pagination is deterministic.
    pub async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ConversionJob>> {
        let db = Arc::clone(&self.db);

        run_blocking(move || {
            let mut jobs = read_all(&db)?;
            jobs.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            Ok(jobs.into_iter().skip(offset).take(limit).collect())
        })
        .await
    }

    /// Remove every record created before `cutoff`, returning the removed
    /// records so the caller can clean up their audio files
    pub async fn purge_older_than(&self, cutoff: Timestamp) -> Result<Vec<ConversionJob>> {
        let db = Arc::clone(&self.db);

        run_blocking(move || {
            let stale: Vec<ConversionJob> = read_all(&db)?
                .into_iter()
                .filter(|job| job.created_at < cutoff)
                .collect();

            if stale.is_empty() {
                return Ok(stale);
            }

            let tx = db.begin_write().map_err(storage_err)?;
            {
                let mut table = tx.open_table(JOBS).map_err(storage_err)?;
                for job in &stale {
                    table
                        .remove(job.id.to_string().as_str())
                        .map_err(storage_err)?;
                }
            }
            tx.commit().map_err(storage_err)?;

            Ok(stale)
        })
        .await
    }
}

fn read_all(db: &Database) -> Result<Vec<ConversionJob>> {
    let tx = db.begin_read().map_err(storage_err)?;
    let table = tx.open_table(JOBS).map_err(storage_err)?;

    let mut jobs = Vec::new();
    for item in table.iter().map_err(storage_err)? {
        let (_, raw) = item.map_err(storage_err)?;
        jobs.push(decode(raw.value())?);
    }
    Ok(jobs)
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| JobError::Storage(format!("store task failed: {e}")))?
}

fn encode(job: &ConversionJob) -> Result<Vec<u8>> {
    serde_json::to_vec(job).map_err(|e| JobError::Storage(format!("encode record: {e}")))
}

fn decode(raw: &[u8]) -> Result<ConversionJob> {
    serde_json::from_slice(raw).map_err(|e| JobError::Storage(format!("decode record: {e}")))
}

fn storage_err<E: std::fmt::Display>(e: E) -> JobError {
    JobError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobStatus;

    fn store() -> (tempfile::TempDir, HistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(&dir.path().join("history.redb")).unwrap();
        (dir, store)
    }

    fn job(markdown: &str) -> ConversionJob {
        ConversionJob::new(
            None,
            markdown.to_string(),
            markdown.to_string(),
            "en_US-lessac-medium".to_string(),
        )
    }

    #[tokio::test]
    async fn upsert_get_roundtrip() {
        let (_dir, store) = store();
        let job = job("# One");

        store.upsert(&job).await.unwrap();
        let fetched = store.get(job.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, job.id);
        assert_eq!(fetched.source_markdown, "# One");
        assert_eq!(fetched.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn get_unknown_is_none() {
        let (_dir, store) = store();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_skips_deleted_records() {
        let (_dir, store) = store();
        let mut record = job("text");

        store.upsert(&record).await.unwrap();
        assert!(store.delete(record.id).await.unwrap());

        record.status = JobStatus::Completed;
        assert!(!store.update(&record).await.unwrap());
        assert!(store.get(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_missing() {
        let (_dir, store) = store();
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginates() {
        let (_dir, store) = store();

        let mut jobs = Vec::new();
        for i in 0..5 {
            let mut j = job(&format!("doc {i}"));
            // Spread creation times so ordering is unambiguous
            j.created_at = Timestamp::from_second(1_700_000_000 + i).unwrap();
            store.upsert(&j).await.unwrap();
            jobs.push(j);
        }

        let first_page = store.list(2, 0).await.unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].source_markdown, "doc 4");
        assert_eq!(first_page[1].source_markdown, "doc 3");

        let second_page = store.list(2, 2).await.unwrap();
        assert_eq!(second_page[0].source_markdown, "doc 2");

        // Successive pages cover the whole set exactly once
        let mut seen: Vec<Uuid> = Vec::new();
        for offset in (0..6).step_by(2) {
            for j in store.list(2, offset).await.unwrap() {
                seen.push(j.id);
            }
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn created_at_ties_break_by_id_descending() {
        let (_dir, store) = store();
        let ts = Timestamp::from_second(1_700_000_000).unwrap();

        for _ in 0..3 {
            let mut j = job("same instant");
            j.created_at = ts;
            store.upsert(&j).await.unwrap();
        }

        let listed = store.list(10, 0).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|j| j.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.redb");
        let record = job("durable");

        {
            let store = HistoryStore::open(&path).unwrap();
            store.upsert(&record).await.unwrap();
        }

        let store = HistoryStore::open(&path).unwrap();
        assert!(store.get(record.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn purge_removes_only_stale_records() {
        let (_dir, store) = store();

        let mut old = job("old");
        old.created_at = Timestamp::from_second(1_000_000_000).unwrap();
        store.upsert(&old).await.unwrap();

        let fresh = job("fresh");
        store.upsert(&fresh).await.unwrap();

        let cutoff = Timestamp::from_second(1_500_000_000).unwrap();
        let purged = store.purge_older_than(cutoff).await.unwrap();

        assert_eq!(purged.len(), 1);
        assert_eq!(purged[0].id, old.id);
        assert!(store.get(old.id).await.unwrap().is_none());
        assert!(store.get(fresh.id).await.unwrap().is_some());
    }
}
