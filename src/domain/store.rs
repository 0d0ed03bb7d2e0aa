// src/domain/store.rs

use crate::domain::listing::ListingRecord;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The UI referenced a position that is not in the current batch.
    #[error("selection index {index} out of range for batch of {len}")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Empty,
    Populated,
}

/// The most recent batch of listings plus one selection flag per listing.
///
/// A batch is only ever replaced wholesale: `ingest` swaps both the records
/// and the flags, so selections never survive into the next search.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<ListingRecord>,
    selected: Vec<bool>,
    generation: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the batch with the normalised form of `raw_records`.
    pub fn ingest(&mut self, raw_records: &[Value]) {
        let records = raw_records.iter().map(ListingRecord::from_raw).collect();
        self.ingest_records(records);
    }

    pub fn ingest_records(&mut self, records: Vec<ListingRecord>) {
        self.selected = vec![false; records.len()];
        self.records = records;
        self.generation += 1;
    }

    /// Drops the current batch (new search came back empty or failed).
    pub fn clear(&mut self) {
        self.ingest_records(Vec::new());
    }

    pub fn set_selected(&mut self, index: usize, value: bool) -> Result<(), StoreError> {
        let len = self.selected.len();
        let flag = self
            .selected
            .get_mut(index)
            .ok_or(StoreError::OutOfRange { index, len })?;
        *flag = value;
        Ok(())
    }

    pub fn selected_records(&self) -> Vec<&ListingRecord> {
        self.records
            .iter()
            .zip(&self.selected)
            .filter_map(|(record, &selected)| selected.then_some(record))
            .collect()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bumped on every ingest; lets the UI detect submissions for an old batch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> StoreState {
        if self.is_empty() {
            StoreState::Empty
        } else {
            StoreState::Populated
        }
    }
}
