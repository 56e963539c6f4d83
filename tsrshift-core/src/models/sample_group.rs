use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::{CoreError, CoreResult};
use crate::models::{Region, RegionCounts, Strand};
use crate::utils::{get_dynamic_reader, remove_all_extensions};

///
/// SampleGroup struct, the per-region TSS counts of one condition.
/// Replicates are expected to be merged before they reach this point.
///
#[derive(Clone, Debug)]
pub struct SampleGroup {
    name: String,
    regions: Vec<RegionCounts>,
    path: Option<PathBuf>,
}

/// Accumulates the rows of one region id while a table is parsed.
struct PendingRegion {
    region: Region,
    counts: Vec<(u32, u64)>,
}

impl SampleGroup {
    ///
    /// Create a sample group from already aggregated regions.
    /// Regions are sorted by chromosome, start, end and strand.
    ///
    pub fn new(name: impl Into<String>, regions: Vec<RegionCounts>) -> Self {
        let mut group = SampleGroup {
            name: name.into(),
            regions,
            path: None,
        };
        group.sort();
        group
    }

    ///
    /// Parse a TSS count table.
    ///
    /// One row per TSS position with the columns
    /// `chr start end strand region_id position count`, where `position` is
    /// the absolute 0-based coordinate of the TSS. Rows with the same
    /// `region_id` are merged into one region.
    ///
    /// # Arguments
    /// - name: condition label of the group
    /// - reader: buffered source of the table
    pub fn from_reader<R: BufRead>(name: impl Into<String>, reader: R) -> CoreResult<Self> {
        let name = name.into();
        let mut order: Vec<String> = Vec::new();
        let mut pending: HashMap<String, PendingRegion> = HashMap::new();
        let mut first_line = true;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let trimmed = line.trim_end();

            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with("track")
                || trimmed.starts_with("browser")
            {
                continue;
            }

            let parts: Vec<&str> = trimmed.split('\t').collect();

            if first_line {
                first_line = false;
                if is_header(&parts) {
                    continue;
                }
            }

            if parts.len() < 7 {
                return Err(CoreError::ParseError {
                    line: line_no,
                    reason: format!("expected 7 columns, found {}", parts.len()),
                });
            }

            let start = parse_field::<u32>(parts[1], "start", line_no)?;
            let end = parse_field::<u32>(parts[2], "end", line_no)?;
            let strand: Strand = parts[3].parse()?;
            let id = parts[4];
            let position = parse_field::<u32>(parts[5], "position", line_no)?;
            let count = parse_field::<u64>(parts[6], "count", line_no)?;

            let region = Region::new(parts[0], start, end, strand, id)?;
            if !region.contains(position) {
                return Err(CoreError::PositionOutsideRegion {
                    region: region.locus(),
                    position,
                });
            }

            match pending.get_mut(id) {
                Some(entry) => {
                    if entry.region != region {
                        return Err(CoreError::ConflictingRegion(id.to_string()));
                    }
                    entry.counts.push((position - start, count));
                }
                None => {
                    order.push(id.to_string());
                    pending.insert(
                        id.to_string(),
                        PendingRegion {
                            region,
                            counts: vec![(position - start, count)],
                        },
                    );
                }
            }
        }

        let mut regions = Vec::with_capacity(order.len());
        for id in order {
            if let Some(entry) = pending.remove(&id) {
                regions.push(RegionCounts::new(entry.region, entry.counts)?);
            }
        }

        Ok(SampleGroup::new(name, regions))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    ///
    /// Same regions under a different condition label.
    ///
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn regions(&self) -> &[RegionCounts] {
        &self.regions
    }

    pub fn get(&self, index: usize) -> Option<&RegionCounts> {
        self.regions.get(index)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    ///
    /// Sum of all region totals in the group.
    ///
    pub fn total_count(&self) -> u64 {
        self.regions.iter().map(|r| r.total()).sum()
    }

    ///
    /// Sort regions by chromosome, start, end and strand.
    ///
    pub fn sort(&mut self) {
        self.regions.sort_by(|a, b| {
            let (a, b) = (a.region(), b.region());
            a.chr
                .cmp(&b.chr)
                .then_with(|| a.start.cmp(&b.start))
                .then_with(|| a.end.cmp(&b.end))
                .then_with(|| a.strand.cmp(&b.strand))
        });
    }

    ///
    /// Group region indices by chromosome and strand. Indices inside a
    /// partition keep the start-sorted order of the group.
    ///
    pub fn partition(&self) -> BTreeMap<(String, Strand), Vec<usize>> {
        let mut partitions: BTreeMap<(String, Strand), Vec<usize>> = BTreeMap::new();
        for (i, counts) in self.regions.iter().enumerate() {
            let region = counts.region();
            partitions
                .entry((region.chr.clone(), region.strand))
                .or_default()
                .push(i);
        }
        partitions
    }
}

/// Column header line: `chr start ...` or `chrom start ...` without `#`.
fn is_header(parts: &[&str]) -> bool {
    match parts {
        [chr, start, ..] => {
            (chr.eq_ignore_ascii_case("chr") || chr.eq_ignore_ascii_case("chrom"))
                && start.eq_ignore_ascii_case("start")
        }
        _ => false,
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, field: &str, line: usize) -> CoreResult<T> {
    value.parse::<T>().map_err(|_| CoreError::ParseError {
        line,
        reason: format!("can't parse {} from '{}'", field, value),
    })
}

impl TryFrom<&Path> for SampleGroup {
    type Error = CoreError;

    ///
    /// Read a sample group from a (optionally gzipped) TSS count table.
    /// The group is named after the file name without extensions.
    ///
    fn try_from(value: &Path) -> CoreResult<Self> {
        let reader = get_dynamic_reader(value)
            .map_err(|e| CoreError::FileReadError(format!("{:#}", e)))?;
        let mut group = SampleGroup::from_reader(remove_all_extensions(value), reader)?;

        if group.is_empty() {
            return Err(CoreError::EmptySampleGroup(value.display().to_string()));
        }

        group.path = Some(value.to_owned());
        Ok(group)
    }
}

impl TryFrom<&str> for SampleGroup {
    type Error = CoreError;

    fn try_from(value: &str) -> CoreResult<Self> {
        SampleGroup::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for SampleGroup {
    type Error = CoreError;

    fn try_from(value: PathBuf) -> CoreResult<Self> {
        SampleGroup::try_from(value.as_path())
    }
}

impl Display for SampleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleGroup '{}' with {} regions.", self.name, self.len())
    }
}

///
/// Read-only collection of sample groups, looked up by condition name.
///
#[derive(Clone, Debug, Default)]
pub struct SampleGroups {
    groups: BTreeMap<String, SampleGroup>,
}

impl SampleGroups {
    pub fn new() -> Self {
        SampleGroups::default()
    }

    ///
    /// Return a collection that also holds `group`. A group with the same
    /// name is replaced.
    ///
    pub fn with_group(mut self, group: SampleGroup) -> Self {
        self.groups.insert(group.name().to_string(), group);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SampleGroup> {
        self.groups.get(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<SampleGroup> for SampleGroups {
    fn from_iter<T: IntoIterator<Item = SampleGroup>>(iter: T) -> Self {
        iter.into_iter()
            .fold(SampleGroups::new(), |groups, g| groups.with_group(g))
    }
}
