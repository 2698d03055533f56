//! Edge section of the graph file
//!
//! Format (little-endian), directly after the node section:
//!
//!   edge_count:   u32
//!   edge_count records (14 bytes each):
//!     source:      u32   // internal node id
//!     target:      u32   // internal node id
//!     weight:      i32   // > 0
//!     forward:     u8    // 0/1
//!     travel_mode: u8    // TravelMode, 0 = inaccessible

use std::io::{Read, Write};

use log::{debug, info};

use super::io::{decode_bool, i32_at, read_count, read_records, u32_at, write_records, Record};
use crate::error::{LoadError, Result};
use crate::options::LoadOptions;
use crate::validate::validate_edges;
use crate::{EdgeId, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TravelMode {
    Inaccessible = 0,
    Driving = 1,
    Cycling = 2,
    Walking = 3,
    Ferry = 4,
    Train = 5,
    PushingBike = 6,
    StepsUp = 8,
    StepsDown = 9,
    RiverUp = 10,
    RiverDown = 11,
    Route = 12,
}

impl TravelMode {
    pub fn is_accessible(self) -> bool {
        self != TravelMode::Inaccessible
    }
}

impl TryFrom<u8> for TravelMode {
    type Error = u8;

    fn try_from(byte: u8) -> std::result::Result<Self, u8> {
        Ok(match byte {
            0 => TravelMode::Inaccessible,
            1 => TravelMode::Driving,
            2 => TravelMode::Cycling,
            3 => TravelMode::Walking,
            4 => TravelMode::Ferry,
            5 => TravelMode::Train,
            6 => TravelMode::PushingBike,
            8 => TravelMode::StepsUp,
            9 => TravelMode::StepsDown,
            10 => TravelMode::RiverUp,
            11 => TravelMode::RiverDown,
            12 => TravelMode::Route,
            other => return Err(other),
        })
    }
}

/// Directed edge between two internal node ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBasedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: i32,
    pub forward: bool,
    pub travel_mode: TravelMode,
}

impl NodeBasedEdge {
    pub fn new(source: NodeId, target: NodeId, weight: i32, travel_mode: TravelMode) -> Self {
        Self {
            source,
            target,
            weight,
            forward: true,
            travel_mode,
        }
    }
}

impl Record for NodeBasedEdge {
    const SIZE: usize = 14;
    const NAME: &'static str = "edge";

    fn decode(bytes: &[u8], index: usize) -> Result<Self> {
        let travel_mode = TravelMode::try_from(bytes[13]).map_err(|byte| {
            LoadError::malformed(Self::NAME, index, format!("unknown travel mode {byte}"))
        })?;

        Ok(Self {
            source: u32_at(bytes, 0),
            target: u32_at(bytes, 4),
            weight: i32_at(bytes, 8),
            forward: decode_bool(bytes[12], Self::NAME, "forward", index)?,
            travel_mode,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.source.to_le_bytes());
        out.extend_from_slice(&self.target.to_le_bytes());
        out.extend_from_slice(&self.weight.to_le_bytes());
        out.push(self.forward as u8);
        out.push(self.travel_mode as u8);
    }
}

/// Read the edge section of a graph stream.
///
/// `edges` is cleared first and holds the edges in on-disk order afterwards,
/// whether or not validation ran. A zero edge count is rejected. On failure
/// `edges` is left empty.
pub fn load_edges<R: Read>(
    reader: &mut R,
    edges: &mut Vec<NodeBasedEdge>,
    options: &LoadOptions,
) -> Result<EdgeId> {
    edges.clear();
    let result = read_edges(reader, edges, options);
    if result.is_err() {
        edges.clear();
    }
    result
}

fn read_edges<R: Read>(
    reader: &mut R,
    edges: &mut Vec<NodeBasedEdge>,
    options: &LoadOptions,
) -> Result<EdgeId> {
    let m = read_count(reader, "edge count")?;
    info!("Importing m = {} edges", m);

    if m == 0 {
        return Err(LoadError::EmptyGraph);
    }

    read_records(reader, m as usize, edges, "edge records")?;

    if options.validate {
        debug!(
            "Validating {} loaded edges ({:?} duplicate check)...",
            edges.len(),
            options.duplicate_check
        );
        validate_edges(edges, options.duplicate_check)?;
    }

    info!("Graph loaded ok and has {} edges", edges.len());
    Ok(m)
}

/// Write the edge section of a graph stream
pub fn write_edges<W: Write>(writer: &mut W, edges: &[NodeBasedEdge]) -> std::io::Result<()> {
    write_records(writer, edges)
}
