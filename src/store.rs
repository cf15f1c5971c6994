use anyhow::{Result, anyhow};

use crate::models::Opportunity;

/// In-memory opportunity catalog. Volatile by design: rebuilt from the seed
/// set at process start, single-writer, no locking. Newest postings sit at
/// the front because insertion prepends.
#[derive(Debug)]
pub struct CatalogStore {
    records: Vec<Opportunity>,
    next_id: i64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Every record, newest first.
    pub fn all(&self) -> &[Opportunity] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Opportunity> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Prepends the record and returns its id. A caller-supplied id is kept
    /// only if it does not collide with an existing record; otherwise (or
    /// when the caller passes 0) the store assigns the next free id.
    pub fn insert(&mut self, mut record: Opportunity) -> i64 {
        if record.id <= 0 || self.get(record.id).is_some() {
            record.id = self.next_id;
        }
        self.next_id = self.next_id.max(record.id) + 1;
        let id = record.id;
        self.records.insert(0, record);
        id
    }

    /// Idempotent: removing an id the store has never seen is a no-op.
    pub fn remove(&mut self, id: i64) {
        self.records.retain(|r| r.id != id);
    }

    pub fn find_by_poster(&self, poster_user_id: i64) -> Vec<Opportunity> {
        self.records
            .iter()
            .filter(|r| r.posted_by_user_id == Some(poster_user_id))
            .cloned()
            .collect()
    }
}

/// Rejects records that should never reach the store. Runs on the create
/// path, before `insert`.
pub fn validate_record(record: &Opportunity) -> Result<()> {
    if record.title.trim().is_empty() {
        return Err(anyhow!("Opportunity title must not be empty"));
    }
    if record.organization.trim().is_empty() {
        return Err(anyhow!("Opportunity organization must not be empty"));
    }
    Ok(())
}
