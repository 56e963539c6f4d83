//! Pairing of comparable regions between two sample groups.
//!
//! Regions are paired within each chromosome/strand partition by greedy
//! nearest-neighbour assignment on interval midpoints. Every region takes
//! part in at most one pair. Candidates are visited closest first, so a
//! region whose only candidate is claimed by a closer competitor stays
//! unpaired. Ties are broken by the region ids of group 1, then group 2.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;
use tsrshift_core::models::{Region, SampleGroup, Strand};

use crate::errors::{EngineResult, ShiftError};

/// Two matched regions and the union span their counts are compared over.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusRegion {
    /// `chr:start-end:strand` of the union span.
    pub id: String,
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    /// Index of the paired region in sample group 1.
    pub index_1: usize,
    /// Index of the paired region in sample group 2.
    pub index_2: usize,
    pub region_id_1: String,
    pub region_id_2: String,
    /// Distance between the two interval midpoints, in bp.
    pub distance: f64,
}

impl ConsensusRegion {
    fn from_pair(index_1: usize, r1: &Region, index_2: usize, r2: &Region) -> Self {
        let start = r1.start.min(r2.start);
        let end = r1.end.max(r2.end);
        ConsensusRegion {
            id: format!("{}:{}-{}:{}", r1.chr, start, end, r1.strand),
            chr: r1.chr.clone(),
            start,
            end,
            strand: r1.strand,
            index_1,
            index_2,
            region_id_1: r1.id.clone(),
            region_id_2: r2.id.clone(),
            distance: r1.mid_point_x2().abs_diff(r2.mid_point_x2()) as f64 / 2.0,
        }
    }

    /// Number of positions in the union span.
    pub fn width(&self) -> usize {
        (self.end - self.start) as usize
    }

    ///
    /// Map an absolute coordinate to its index in the 5' to 3' oriented
    /// span: index 0 is `start` on `+`/`*` strands and `end - 1` on `-`.
    /// Returns `None` outside the span.
    ///
    pub fn oriented_index(&self, position: u32) -> Option<usize> {
        if position < self.start || position >= self.end {
            return None;
        }
        let offset = (position - self.start) as usize;
        if self.strand.is_reverse() {
            Some(self.width() - 1 - offset)
        } else {
            Some(offset)
        }
    }
}

struct Candidate<'a> {
    distance_x2: u64,
    index_1: usize,
    index_2: usize,
    region_1: &'a Region,
    region_2: &'a Region,
}

impl Candidate<'_> {
    fn order(&self, other: &Self) -> Ordering {
        self.distance_x2
            .cmp(&other.distance_x2)
            .then_with(|| self.region_1.id.cmp(&other.region_1.id))
            .then_with(|| self.region_2.id.cmp(&other.region_2.id))
            .then_with(|| self.region_1.start.cmp(&other.region_1.start))
            .then_with(|| self.region_2.start.cmp(&other.region_2.start))
            .then_with(|| self.index_1.cmp(&other.index_1))
            .then_with(|| self.index_2.cmp(&other.index_2))
    }
}

///
/// Pair regions of `group_1` with regions of `group_2`.
///
/// # Arguments
/// - group_1: reference sample group
/// - group_2: compared sample group
/// - max_distance: largest midpoint distance of a pair, inclusive
/// - min_threshold: minimum total count of both regions of a pair
///
/// Returns consensus regions sorted by chromosome, start, end and strand.
/// Unmatched and sub-threshold regions are dropped without error.
///
pub fn match_regions(
    group_1: &SampleGroup,
    group_2: &SampleGroup,
    max_distance: u32,
    min_threshold: u64,
) -> EngineResult<Vec<ConsensusRegion>> {
    if max_distance == 0 {
        return Err(ShiftError::InvalidMaxDistance(0));
    }
    if min_threshold == 0 {
        return Err(ShiftError::InvalidMinThreshold(0));
    }

    let max_distance_x2 = 2 * max_distance as u64;
    let partitions_2 = group_2.partition();
    let mut matched: Vec<ConsensusRegion> = Vec::new();

    for (key, indices_1) in group_1.partition() {
        let Some(indices_2) = partitions_2.get(&key) else {
            continue;
        };

        let passing_1: Vec<usize> = indices_1
            .into_iter()
            .filter(|i| group_1.regions()[*i].total() >= min_threshold)
            .collect();

        let mut passing_2: Vec<(u64, usize)> = indices_2
            .iter()
            .filter(|j| group_2.regions()[**j].total() >= min_threshold)
            .map(|j| (group_2.regions()[*j].region().mid_point_x2(), *j))
            .collect();
        passing_2.sort_unstable();

        debug!(
            chr = %key.0,
            strand = %key.1,
            passing_1 = passing_1.len(),
            passing_2 = passing_2.len(),
            "matching partition"
        );

        let mut candidates: Vec<Candidate> = Vec::new();
        for &i in &passing_1 {
            let region_1 = group_1.regions()[i].region();
            let mid_1 = region_1.mid_point_x2();
            let low = mid_1.saturating_sub(max_distance_x2);
            let high = mid_1 + max_distance_x2;

            let first = passing_2.partition_point(|(mid, _)| *mid < low);
            for &(mid_2, j) in passing_2[first..].iter().take_while(|(mid, _)| *mid <= high) {
                candidates.push(Candidate {
                    distance_x2: mid_1.abs_diff(mid_2),
                    index_1: i,
                    index_2: j,
                    region_1,
                    region_2: group_2.regions()[j].region(),
                });
            }
        }
        candidates.sort_by(|a, b| a.order(b));

        let mut claimed_1: HashSet<usize> = HashSet::new();
        let mut claimed_2: HashSet<usize> = HashSet::new();
        for candidate in candidates {
            if claimed_1.contains(&candidate.index_1) || claimed_2.contains(&candidate.index_2) {
                continue;
            }
            claimed_1.insert(candidate.index_1);
            claimed_2.insert(candidate.index_2);
            matched.push(ConsensusRegion::from_pair(
                candidate.index_1,
                candidate.region_1,
                candidate.index_2,
                candidate.region_2,
            ));
        }
    }

    matched.sort_by(|a, b| {
        a.chr
            .cmp(&b.chr)
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.strand.cmp(&b.strand))
            .then_with(|| a.region_id_1.cmp(&b.region_id_1))
    });

    Ok(matched)
}
