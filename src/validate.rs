//! Graph invariant validation
//!
//! Checks run over loaded edges when validation is enabled:
//! - weight strictly positive
//! - edge oriented forward (reverse traversal is modelled elsewhere)
//! - travel mode accessible
//! - no self-loops
//! - no two edges with the same (source, target)

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::formats::{NodeBasedEdge, TurnRestriction};
use crate::options::DuplicateCheck;
use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EdgeDefect {
    #[error("edge #{index} ({from} -> {to}) has non-positive weight {weight}")]
    NonPositiveWeight {
        index: usize,
        from: NodeId,
        to: NodeId,
        weight: i32,
    },

    #[error("edge #{index} ({from} -> {to}) is not oriented in forward direction")]
    NotForward {
        index: usize,
        from: NodeId,
        to: NodeId,
    },

    #[error("edge #{index} ({from} -> {to}) is inaccessible")]
    Inaccessible {
        index: usize,
        from: NodeId,
        to: NodeId,
    },

    #[error("edge #{index} is a loop on node {node}")]
    SelfLoop { index: usize, node: NodeId },

    #[error("multiple edges from {from} to {to}")]
    MultiEdge { from: NodeId, to: NodeId },

    #[error("edge #{index} ({from} -> {to}) references a node outside [0, {node_count})")]
    EndpointOutOfRange {
        index: usize,
        from: NodeId,
        to: NodeId,
        node_count: NodeId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("restriction #{index} references node {node} outside [0, {node_count})")]
pub struct RestrictionOutOfRange {
    pub index: usize,
    pub node: NodeId,
    pub node_count: NodeId,
}

fn edge_defect(index: usize, edge: &NodeBasedEdge) -> Option<EdgeDefect> {
    let (from, to) = (edge.source, edge.target);
    if edge.weight <= 0 {
        return Some(EdgeDefect::NonPositiveWeight {
            index,
            from,
            to,
            weight: edge.weight,
        });
    }
    if !edge.forward {
        return Some(EdgeDefect::NotForward { index, from, to });
    }
    if !edge.travel_mode.is_accessible() {
        return Some(EdgeDefect::Inaccessible { index, from, to });
    }
    if from == to {
        return Some(EdgeDefect::SelfLoop { index, node: from });
    }
    None
}

/// Validate an edge list without reordering it.
///
/// Per-edge defects are reported for the first offending edge in list order.
pub fn validate_edges(edges: &[NodeBasedEdge], strategy: DuplicateCheck) -> Result<(), EdgeDefect> {
    let per_edge = edges
        .par_iter()
        .enumerate()
        .find_map_first(|(index, edge)| edge_defect(index, edge));
    if let Some(defect) = per_edge {
        return Err(defect);
    }

    let multi = match strategy {
        DuplicateCheck::ParallelSort => find_multi_edge_sorted(edges),
        DuplicateCheck::HashSet => find_multi_edge_hashed(edges),
    };
    match multi {
        Some((from, to)) => Err(EdgeDefect::MultiEdge { from, to }),
        None => Ok(()),
    }
}

fn find_multi_edge_sorted(edges: &[NodeBasedEdge]) -> Option<(NodeId, NodeId)> {
    let mut keys: Vec<(NodeId, NodeId)> = edges.par_iter().map(|e| (e.source, e.target)).collect();
    keys.par_sort_unstable();
    keys.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
}

fn find_multi_edge_hashed(edges: &[NodeBasedEdge]) -> Option<(NodeId, NodeId)> {
    let mut seen: FxHashSet<(NodeId, NodeId)> =
        FxHashSet::with_capacity_and_hasher(edges.len(), Default::default());
    edges
        .iter()
        .map(|e| (e.source, e.target))
        .find(|&key| !seen.insert(key))
}

/// Check that every edge endpoint is a loaded node
pub fn check_edge_endpoints(edges: &[NodeBasedEdge], node_count: NodeId) -> Result<(), EdgeDefect> {
    let found = edges
        .par_iter()
        .enumerate()
        .find_first(|(_, e)| e.source >= node_count || e.target >= node_count);
    match found {
        Some((index, edge)) => Err(EdgeDefect::EndpointOutOfRange {
            index,
            from: edge.source,
            to: edge.target,
            node_count,
        }),
        None => Ok(()),
    }
}

/// Check that restrictions reference internal node ids of a graph with
/// `node_count` nodes.
///
/// The restriction loader never calls this; orchestrators that want to catch
/// files written with OSM ids instead of internal ids can.
pub fn check_restriction_ids(
    restrictions: &[TurnRestriction],
    node_count: NodeId,
) -> Result<(), RestrictionOutOfRange> {
    for (index, r) in restrictions.iter().enumerate() {
        if let Some(&node) = [r.from, r.via, r.to].iter().find(|&&n| n >= node_count) {
            return Err(RestrictionOutOfRange {
                index,
                node,
                node_count,
            });
        }
    }
    Ok(())
}
