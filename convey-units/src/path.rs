//! Conversion path discovery
//!
//! Depth-first and first-success: the returned chain is *a* path, not
//! the shortest one. Factors are not considered during the search.

use std::collections::HashSet;
use tracing::debug;
use crate::ConversionRegistry;

/// Find a chain of units linking `source` to `target`
///
/// Returns the units in order `source, ..., target`, where every
/// consecutive pair has a direct edge. `None` when the target cannot be
/// reached or `source` is not registered. A direct edge always wins over
/// a longer route.
pub fn find_path(registry: &ConversionRegistry, source: &str, target: &str) -> Option<Vec<String>> {
    if !registry.has_unit(source) {
        return None;
    }
    if source == target {
        return Some(vec![source.to_string()]);
    }

    let mut visited = HashSet::new();
    let mut reversed = search(registry, &mut visited, source, target)?;
    reversed.reverse();

    debug!(source, target, hops = reversed.len() - 1, "found conversion path");
    Some(reversed)
}

/// Recursive step. The path is built target-first and reversed by the caller.
fn search<'a>(
    registry: &'a ConversionRegistry,
    visited: &mut HashSet<&'a str>,
    source: &'a str,
    target: &str,
) -> Option<Vec<String>> {
    visited.insert(source);

    if registry.direct_factor(source, target).is_some() {
        return Some(vec![target.to_string(), source.to_string()]);
    }

    for (next, _) in registry.neighbors(source) {
        if visited.contains(next) {
            continue;
        }
        if let Some(mut path) = search(registry, visited, next, target) {
            path.push(source.to_string());
            return Some(path);
        }
    }

    None
}
