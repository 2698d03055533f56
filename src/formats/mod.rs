//! Binary file formats for the graph and restriction files

pub mod edges;
pub mod fingerprint;
pub mod io;
pub mod nodes;
pub mod restrictions;

pub use edges::{load_edges, write_edges, NodeBasedEdge, TravelMode};
pub use fingerprint::{check_fingerprint, verify_fingerprint, Fingerprint, FINGERPRINT_SIZE};
pub use io::Record;
pub use nodes::{load_nodes, write_nodes, NodeRecord, QueryNode, COORDINATE_PRECISION};
pub use restrictions::{
    load_restrictions, read_restrictions, write_restrictions, RestrictionKind, TurnRestriction,
};
