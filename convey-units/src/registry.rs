//! Conversion registry - directed, weighted edges between unit names
//!
//! An edge `source -> target` with weight `factor` means
//! `1 source == factor target`. Rule ingestion always inserts the inverse
//! edge alongside, so the graph is symmetric in practice.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use tracing::debug;

/// Registry of all known units and the direct conversions between them
///
/// Ordered maps keep neighbour iteration lexicographic, which makes path
/// discovery deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionRegistry {
    links: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        ConversionRegistry { links: BTreeMap::new() }
    }

    /// Insert or overwrite the single directed edge `source -> target`
    ///
    /// The factor is stored as given. Use [`add_rule`](Self::add_rule) to
    /// keep the graph symmetric.
    pub fn register_conversion(&mut self, source: &str, target: &str, factor: f64) {
        self.links
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string(), factor);
    }

    /// Insert `source -> target` at `factor` and its inverse at `1 / factor`
    pub fn add_rule(&mut self, source: &str, target: &str, factor: f64) {
        debug!(source, target, factor, "registering conversion rule");
        self.register_conversion(source, target, factor);
        self.register_conversion(target, source, 1.0 / factor);
    }

    /// Check whether a unit has been registered as a source
    pub fn has_unit(&self, unit: &str) -> bool {
        self.links.contains_key(unit)
    }

    /// Single-hop factor, if a direct edge exists
    pub fn direct_factor(&self, source: &str, target: &str) -> Option<f64> {
        self.links.get(source)?.get(target).copied()
    }

    /// Outgoing edges of a unit, in lexicographic order of the target
    pub fn neighbors<'a>(&'a self, unit: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.links
            .get(unit)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(target, factor)| (target.as_str(), *factor)))
    }

    /// All registered unit identifiers, sorted
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(|s| s.as_str())
    }

    /// Number of registered units
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Product of the hop factors along a path, `None` if a hop is missing
    pub fn path_factor<S: AsRef<str>>(&self, path: &[S]) -> Option<f64> {
        path.windows(2).try_fold(1.0, |acc, hop| {
            self.direct_factor(hop[0].as_ref(), hop[1].as_ref()).map(|f| acc * f)
        })
    }
}
