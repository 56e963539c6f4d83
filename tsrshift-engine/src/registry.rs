//! Caller-owned store of finished comparisons.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::results::Comparison;

/// Kind of analysis a comparison was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Analysis {
    TssShift,
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Analysis::TssShift => write!(f, "tss_shift"),
        }
    }
}

///
/// Comparisons keyed by analysis kind and comparison name.
///
/// Stored comparisons are shared and never mutated. Storing a comparison
/// under a name that is already taken replaces the old one and hands it
/// back to the caller.
///
#[derive(Debug, Default, Clone)]
pub struct ResultRegistry {
    comparisons: BTreeMap<(Analysis, String), Arc<Comparison>>,
}

impl ResultRegistry {
    pub fn new() -> Self {
        ResultRegistry::default()
    }

    pub fn register(&mut self, comparison: Comparison) -> Option<Arc<Comparison>> {
        let key = (Analysis::TssShift, comparison.name().to_string());
        self.comparisons.insert(key, Arc::new(comparison))
    }

    pub fn get(&self, analysis: Analysis, name: &str) -> Option<Arc<Comparison>> {
        self.comparisons
            .get(&(analysis, name.to_string()))
            .cloned()
    }

    pub fn names(&self, analysis: Analysis) -> impl Iterator<Item = &str> {
        self.comparisons
            .keys()
            .filter(move |(kind, _)| *kind == analysis)
            .map(|(_, name)| name.as_str())
    }

    pub fn remove(&mut self, analysis: Analysis, name: &str) -> Option<Arc<Comparison>> {
        self.comparisons.remove(&(analysis, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::config::ShiftConfig;
    use crate::results::{ComparisonParams, aggregate};

    fn comparison(name: &str, seed: u64) -> Comparison {
        let config = ShiftConfig::new(name, "a", "b");
        aggregate(name, ComparisonParams::from_config(&config, seed), Vec::new(), &[])
    }

    #[rstest]
    fn test_register_and_get() {
        let mut registry = ResultRegistry::new();
        assert!(registry.register(comparison("cmp", 1)).is_none());

        let stored = registry.get(Analysis::TssShift, "cmp").unwrap();
        assert_eq!(stored.seed(), 1);
        assert!(registry.get(Analysis::TssShift, "other").is_none());
    }

    #[rstest]
    fn test_register_replaces_and_returns_previous() {
        let mut registry = ResultRegistry::new();
        registry.register(comparison("cmp", 1));
        let held = registry.get(Analysis::TssShift, "cmp").unwrap();

        let previous = registry.register(comparison("cmp", 2)).unwrap();
        assert_eq!(previous.seed(), 1);
        assert_eq!(registry.get(Analysis::TssShift, "cmp").unwrap().seed(), 2);
        assert_eq!(registry.len(), 1);

        // readers holding the old comparison keep seeing it
        assert_eq!(held.seed(), 1);
    }

    #[rstest]
    fn test_names_sorted() {
        let mut registry = ResultRegistry::new();
        registry.register(comparison("zeta", 1));
        registry.register(comparison("alpha", 1));

        let names: Vec<&str> = registry.names(Analysis::TssShift).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);

        assert!(registry.remove(Analysis::TssShift, "alpha").is_some());
        assert_eq!(registry.len(), 1);
    }
}
