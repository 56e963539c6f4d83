use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::Region;

///
/// Per-position TSS counts of one region in one sample group.
///
/// Offsets are relative to `region.start`. The total is always the sum of
/// the per-position counts, so it can't drift from the positions it
/// summarises.
///
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCounts {
    region: Region,
    counts: BTreeMap<u32, u64>,
    total: u64,
}

impl RegionCounts {
    ///
    /// Build counts from `(offset, count)` pairs. Repeated offsets are summed.
    ///
    /// # Arguments
    /// - region: the region the offsets are relative to
    /// - counts: iterator of offset/count pairs
    pub fn new<I>(region: Region, counts: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (u32, u64)>,
    {
        let mut merged: BTreeMap<u32, u64> = BTreeMap::new();
        for (offset, count) in counts {
            if offset >= region.width() {
                return Err(CoreError::PositionOutsideRegion {
                    region: region.locus(),
                    position: region.start.saturating_add(offset),
                });
            }
            *merged.entry(offset).or_default() += count;
        }
        let total = merged.values().sum();

        Ok(RegionCounts {
            region,
            counts: merged,
            total,
        })
    }

    ///
    /// Build counts from a dense vector, index `i` being offset `i`.
    ///
    pub fn from_dense(region: Region, counts: &[u64]) -> Result<Self, CoreError> {
        let pairs = counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(i, c)| (i as u32, *c));
        RegionCounts::new(region, pairs)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count at an offset relative to the region start.
    pub fn count_at(&self, offset: u32) -> u64 {
        self.counts.get(&offset).copied().unwrap_or(0)
    }

    /// Iterate `(offset, count)` pairs in increasing offset order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts.iter().map(|(o, c)| (*o, *c))
    }

    /// Iterate `(absolute position, count)` pairs in increasing position order.
    pub fn iter_positions(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        let start = self.region.start;
        self.iter().map(move |(o, c)| (start + o, c))
    }
}
