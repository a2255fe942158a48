use std::collections::BTreeSet;
use std::future::Future;

use tracing::debug;

use super::ConsoleError;
use crate::models::{Person, PersonPatch};

/// A row the console can hold, identify and patch in place.
pub trait Record {
    type Patch;

    fn id(&self) -> i64;
    fn merge(&mut self, patch: &Self::Patch);
}

impl Record for Person {
    type Patch = PersonPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn merge(&mut self, patch: &PersonPatch) {
        self.apply(patch);
    }
}

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Per-page collection state: records, loading flag and last error.
///
/// Every fetch is tagged with a [`FetchTicket`]; only the completion carrying
/// the most recently issued ticket is applied, so an older response that
/// lands late never overwrites a newer one.
#[derive(Debug)]
pub struct ResourceStore<T> {
    records: Vec<T>,
    loading: bool,
    error: Option<String>,
    issued: u64,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            issued: 0,
        }
    }
}

impl<T: Record> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket(self.issued)
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<T>, ConsoleError>) -> bool {
        if ticket.0 != self.issued {
            debug!("dropping stale fetch #{} (latest #{})", ticket.0, self.issued);
            return false;
        }

        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub async fn fetch<F, Fut>(&mut self, load: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ConsoleError>>,
    {
        let ticket = self.begin_fetch();
        let result = load().await;
        self.complete_fetch(ticket, result)
    }

    /// Merges an accepted patch into the matching record without refetching.
    pub fn apply_local_change(&mut self, id: i64, patch: &T::Patch) -> bool {
        match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => {
                record.merge(patch);
                true
            }
            None => false,
        }
    }

    pub fn append(&mut self, record: T) {
        self.records.push(record);
    }

    /// Drops records from the local view. Nothing is deleted on the backend;
    /// the rows return on the next fetch.
    pub fn remove_local(&mut self, ids: &BTreeSet<i64>) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !ids.contains(&record.id()));
        before - self.records.len()
    }
}
