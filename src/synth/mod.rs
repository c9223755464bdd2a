//! Topology-specific data model synthesis
//!
//! Both algorithms start from a cloned seed graph and edit it in place
//! rather than building a graph from first principles. The seed is the only
//! source of a presentation substructure the host is known to render, so
//! synthesis is restricted to relabeling, tail-shrinking, and clone-growing;
//! presentation points are never invented.

mod flat;
mod hierarchy;

pub use flat::synthesize_flat;
pub use hierarchy::{synthesize_hierarchy, HierarchyItem};

/// Post-condition report of a synthesis call
///
/// Hierarchy synthesis is bounded by the seed's shape: labels beyond what
/// the seed accommodates are dropped rather than grown, and the drop is
/// surfaced here instead of as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Labels the caller supplied
    pub requested: usize,
    /// Labels actually written into the graph
    pub placed: usize,
}

impl Placement {
    /// A placement where every requested label landed
    pub fn complete(count: usize) -> Self {
        Placement {
            requested: count,
            placed: count,
        }
    }

    /// Whether any requested label was dropped
    pub fn truncated(&self) -> bool {
        self.placed < self.requested
    }
}
