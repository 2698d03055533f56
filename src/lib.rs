//! # Butterfly-load Library
//!
//! Reads the preprocessed road graph consumed by contraction and routing:
//! node coordinates with barrier / traffic-light flags, directed edges, and
//! turn restrictions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use butterfly_load::{load_graph_file, load_restrictions, LoadOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LoadOptions::default().with_validate(true);
//! let graph = load_graph_file("monaco.graph", &options)?;
//!
//! let mut restrictions = Vec::new();
//! load_restrictions("monaco.restrictions", &mut restrictions)?;
//!
//! println!("{} nodes, {} edges, {} restrictions",
//!          graph.node_count(), graph.edge_count(), restrictions.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod formats;
pub mod graph;
pub mod options;
pub mod validate;

/// Internal node id: dense index assigned by read order
pub type NodeId = u32;
/// Internal edge id
pub type EdgeId = u32;

pub use error::{ErrorCategory, LoadError, Result};
pub use formats::{
    check_fingerprint, load_edges, load_nodes, load_restrictions, verify_fingerprint,
    Fingerprint, NodeBasedEdge, NodeRecord, QueryNode, RestrictionKind, TravelMode,
    TurnRestriction,
};
pub use graph::{load_graph, load_graph_file, write_graph, LoadedGraph};
pub use options::{DuplicateCheck, LoadOptions};
pub use validate::{EdgeDefect, RestrictionOutOfRange};
