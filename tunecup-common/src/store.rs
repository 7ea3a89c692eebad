//! Record stores
//!
//! A [`RecordStore`] owns one ordered collection of records, loaded once
//! from its storage collaborator. Every lookup is a linear scan over the
//! in-memory collection; every successful `add`/`remove` writes the whole
//! collection back before returning.

use crate::records::{Competitor, Record, Round, Submission, Vote};
use crate::storage::RecordStorage;
use crate::{Error, Result};
use std::fmt;
use tracing::{debug, warn};

pub type CompetitorStore = RecordStore<Competitor>;
pub type RoundStore = RecordStore<Round>;
pub type SubmissionStore = RecordStore<Submission>;
pub type VoteStore = RecordStore<Vote>;

/// Ordered, keyed collection of one record type
pub struct RecordStore<R: Record> {
    records: Vec<R>,
    storage: Box<dyn RecordStorage<R>>,
}

impl<R: Record> fmt::Debug for RecordStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("kind", &R::KIND)
            .field("records", &self.records.len())
            .field("storage", &self.storage.describe())
            .finish()
    }
}

impl<R: Record> RecordStore<R> {
    /// Load the collection from `storage`
    ///
    /// A failed load is fatal for this store and reported as [`Error::Load`].
    pub fn open(storage: impl RecordStorage<R> + 'static) -> Result<Self> {
        let records = storage.load().map_err(|e| Error::Load {
            store: R::KIND,
            reason: format!("{} ({})", e, storage.describe()),
        })?;

        debug!(
            "Opened {} store with {} records from {}",
            R::KIND,
            records.len(),
            storage.describe()
        );

        Ok(Self {
            records,
            storage: Box::new(storage),
        })
    }

    /// All records in load/insertion order
    pub fn get_all(&self) -> &[R] {
        &self.records
    }

    /// First record identified by `key`
    pub fn get_by_key(&self, key: &R::Key) -> Option<&R> {
        self.records.iter().find(|r| r.has_key(key))
    }

    /// All records matching `predicate`, order preserved
    pub fn find_all<P>(&self, predicate: P) -> Vec<&R>
    where
        P: Fn(&R) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append `record` and persist
    ///
    /// Returns `Ok(None)` without touching the store when a record with the
    /// same key already exists. When the write fails the record is dropped
    /// again and [`Error::Persist`] is returned.
    pub fn add(&mut self, record: R) -> Result<Option<&R>> {
        if self.records.iter().any(|r| r.same_key(&record)) {
            warn!("{} {} already exists, not added", R::KIND, record.key_label());
            return Ok(None);
        }

        let label = record.key_label();
        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        debug!("Added {} {}", R::KIND, label);
        Ok(self.records.last())
    }

    /// Remove the record identified by `key` and persist
    ///
    /// Returns `Ok(false)` when nothing matched. When the write fails the
    /// record is put back at its original position.
    pub fn remove(&mut self, key: &R::Key) -> Result<bool> {
        let Some(index) = self.records.iter().position(|r| r.has_key(key)) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }

        debug!("Removed {} {}", R::KIND, removed.key_label());
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.records).map_err(|e| {
            warn!(
                "Persisting {} store to {} failed: {}",
                R::KIND,
                self.storage.describe(),
                e
            );
            Error::Persist {
                store: R::KIND,
                reason: e.to_string(),
            }
        })
    }
}

impl RecordStore<Competitor> {
    /// First competitor with the given display name
    pub fn get_by_name(&self, name: &str) -> Option<&Competitor> {
        self.records.iter().find(|c| c.name == name)
    }
}

impl RecordStore<Round> {
    /// First round with the given name
    pub fn get_by_name(&self, name: &str) -> Option<&Round> {
        self.records.iter().find(|r| r.name == name)
    }
}

impl RecordStore<Submission> {
    pub fn get_by_submitter_id(&self, submitter_id: &str) -> Vec<&Submission> {
        self.find_all(|s| s.submitter_id == submitter_id)
    }

    pub fn get_by_round_id(&self, round_id: &str) -> Vec<&Submission> {
        self.find_all(|s| s.round_id == round_id)
    }
}

impl RecordStore<Vote> {
    pub fn get_by_track_ref(&self, track_ref: &str) -> Vec<&Vote> {
        self.find_all(|v| v.track_ref == track_ref)
    }

    pub fn get_by_voter_id(&self, voter_id: &str) -> Vec<&Vote> {
        self.find_all(|v| v.voter_id == voter_id)
    }

    pub fn get_by_round_id(&self, round_id: &str) -> Vec<&Vote> {
        self.find_all(|v| v.round_id == round_id)
    }
}
