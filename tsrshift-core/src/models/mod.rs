pub mod region;
pub mod region_counts;
pub mod sample_group;

// re-export for cleaner imports
pub use self::region::{Region, Strand};
pub use self::region_counts::RegionCounts;
pub use self::sample_group::{SampleGroup, SampleGroups};
