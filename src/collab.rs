//! Contracts for the collaborators the engine consults but does not own.
//!
//! The backend answers merge-region, used-range and dimension queries. Any
//! of these may fail; the engine logs the failure and falls back to its
//! plain behavior instead of propagating it.

use crate::error::Result;
use crate::types::{CellRange, DimensionEntry};

/// Merged-cell regions of the active sheet.
pub trait MergeLookup {
    /// Every merged region.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be queried.
    fn merged_regions(&self) -> Result<Vec<CellRange>>;

    /// The merged region containing `(row, col)`, if any.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be queried.
    fn merge_info(&self, row: u32, col: u32) -> Result<Option<CellRange>> {
        Ok(self
            .merged_regions()?
            .into_iter()
            .find(|region| region.contains(row, col)))
    }
}

/// Source of the sheet's used range, polled by the host.
pub trait UsedRangeSource {
    /// `(rowCount, colCount)` of the cells holding data.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be queried.
    fn used_range_counts(&self) -> Result<(u32, u32)>;
}

impl<F> UsedRangeSource for F
where
    F: Fn() -> Result<(u32, u32)>,
{
    fn used_range_counts(&self) -> Result<(u32, u32)> {
        self()
    }
}

/// Persistence for row heights and column widths.
pub trait DimensionStore {
    /// Every saved override, read once at document load.
    ///
    /// # Errors
    /// Returns an error when the saved dimensions cannot be read.
    fn load_all(&self) -> Result<Vec<DimensionEntry>>;

    /// Record one user resize. A non-positive size means the override was
    /// removed.
    ///
    /// # Errors
    /// Returns an error when the change cannot be saved.
    fn persist(&mut self, entry: &DimensionEntry) -> Result<()>;
}

/// In-memory merge table for hosts that already hold the region list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeTable {
    regions: Vec<CellRange>,
}

impl MergeTable {
    pub fn new(regions: Vec<CellRange>) -> Self {
        Self {
            regions: regions.into_iter().map(|r| r.normalized()).collect(),
        }
    }

    pub fn regions(&self) -> &[CellRange] {
        &self.regions
    }
}

impl MergeLookup for MergeTable {
    fn merged_regions(&self) -> Result<Vec<CellRange>> {
        Ok(self.regions.clone())
    }

    fn merge_info(&self, row: u32, col: u32) -> Result<Option<CellRange>> {
        Ok(self
            .regions
            .iter()
            .find(|region| region.contains(row, col))
            .copied())
    }
}

/// Dimension store that keeps entries in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDimensionStore {
    entries: Vec<DimensionEntry>,
}

impl MemoryDimensionStore {
    pub fn new(entries: Vec<DimensionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DimensionEntry] {
        &self.entries
    }
}

impl DimensionStore for MemoryDimensionStore {
    fn load_all(&self) -> Result<Vec<DimensionEntry>> {
        Ok(self.entries.clone())
    }

    fn persist(&mut self, entry: &DimensionEntry) -> Result<()> {
        self.entries.retain(|e| {
            !(e.index == entry.index && e.dimension_type == entry.dimension_type)
        });
        if entry.is_override() {
            self.entries.push(*entry);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::XlgridError;

    struct FailingMerges;

    impl MergeLookup for FailingMerges {
        fn merged_regions(&self) -> Result<Vec<CellRange>> {
            Err(XlgridError::MergeLookup("backend offline".into()))
        }
    }

    #[test]
    fn test_merge_table_normalizes() {
        let table = MergeTable::new(vec![CellRange::new(3, 3, 1, 1)]);
        assert_eq!(table.regions(), &[CellRange::new(1, 1, 3, 3)]);
        assert_eq!(table.merge_info(2, 2).unwrap(), Some(CellRange::new(1, 1, 3, 3)));
        assert_eq!(table.merge_info(0, 0).unwrap(), None);
    }

    #[test]
    fn test_default_merge_info_propagates_errors() {
        assert!(FailingMerges.merge_info(0, 0).is_err());
    }

    #[test]
    fn test_closure_used_range_source() {
        let source = || -> Result<(u32, u32)> { Ok((11, 6)) };
        assert_eq!(source.used_range_counts().unwrap(), (11, 6));
    }

    #[test]
    fn test_memory_store_replaces_and_removes() {
        let mut store = MemoryDimensionStore::default();
        store.persist(&DimensionEntry::column(2, 80.0)).unwrap();
        store.persist(&DimensionEntry::column(2, 120.0)).unwrap();
        store.persist(&DimensionEntry::row(2, 40.0)).unwrap();
        assert_eq!(store.entries().len(), 2);
        store.persist(&DimensionEntry::column(2, 0.0)).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![DimensionEntry::row(2, 40.0)]);
    }
}
