//! Node section of the graph file
//!
//! Format (little-endian):
//!
//!   fingerprint:  [40]u8
//!   node_count:   u32
//!   node_count records (18 bytes each):
//!     lon:           i32   // 1e-7 degrees
//!     lat:           i32   // 1e-7 degrees
//!     osm_id:        i64
//!     barrier:       u8    // 0/1
//!     traffic_light: u8    // 0/1
//!
//! A record's position in the array is its internal node id.

use std::io::{Read, Write};

use log::info;

use super::fingerprint::{check_fingerprint, Fingerprint};
use super::io::{
    decode_bool, i32_at, i64_at, initial_capacity, read_count, read_records_with, Record,
};
use crate::error::Result;
use crate::NodeId;

/// Fixed-point scale of stored coordinates
pub const COORDINATE_PRECISION: f64 = 10_000_000.0;

/// A node as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    pub lon: i32,
    pub lat: i32,
    pub osm_id: i64,
    pub barrier: bool,
    pub traffic_light: bool,
}

impl NodeRecord {
    pub fn from_degrees(osm_id: i64, lat: f64, lon: f64) -> Self {
        Self {
            lon: (lon * COORDINATE_PRECISION).round() as i32,
            lat: (lat * COORDINATE_PRECISION).round() as i32,
            osm_id,
            barrier: false,
            traffic_light: false,
        }
    }
}

impl Record for NodeRecord {
    const SIZE: usize = 18;
    const NAME: &'static str = "node";

    fn decode(bytes: &[u8], index: usize) -> Result<Self> {
        Ok(Self {
            lon: i32_at(bytes, 0),
            lat: i32_at(bytes, 4),
            osm_id: i64_at(bytes, 8),
            barrier: decode_bool(bytes[16], Self::NAME, "barrier", index)?,
            traffic_light: decode_bool(bytes[17], Self::NAME, "traffic_light", index)?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.lon.to_le_bytes());
        out.extend_from_slice(&self.lat.to_le_bytes());
        out.extend_from_slice(&self.osm_id.to_le_bytes());
        out.push(self.barrier as u8);
        out.push(self.traffic_light as u8);
    }
}

/// In-memory node, indexed by internal id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryNode {
    pub lon: i32,
    pub lat: i32,
    pub osm_id: i64,
}

impl QueryNode {
    pub fn lon_deg(&self) -> f64 {
        self.lon as f64 / COORDINATE_PRECISION
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat as f64 / COORDINATE_PRECISION
    }
}

impl From<&NodeRecord> for QueryNode {
    fn from(record: &NodeRecord) -> Self {
        Self {
            lon: record.lon,
            lat: record.lat,
            osm_id: record.osm_id,
        }
    }
}

/// Read the fingerprint and node section of a graph stream.
///
/// The three output vectors are cleared first. On success `nodes[i]` is the
/// node with internal id `i`, and the barrier / traffic-light lists hold the
/// flagged ids in ascending order. On failure all three are left empty.
pub fn load_nodes<R: Read>(
    reader: &mut R,
    barrier_nodes: &mut Vec<NodeId>,
    traffic_lights: &mut Vec<NodeId>,
    nodes: &mut Vec<QueryNode>,
) -> Result<NodeId> {
    barrier_nodes.clear();
    traffic_lights.clear();
    nodes.clear();

    let result = read_nodes(reader, barrier_nodes, traffic_lights, nodes);
    if result.is_err() {
        barrier_nodes.clear();
        traffic_lights.clear();
        nodes.clear();
    }
    result
}

fn read_nodes<R: Read>(
    reader: &mut R,
    barrier_nodes: &mut Vec<NodeId>,
    traffic_lights: &mut Vec<NodeId>,
    nodes: &mut Vec<QueryNode>,
) -> Result<NodeId> {
    check_fingerprint(reader)?;

    let n = read_count(reader, "node count")?;
    info!("Importing n = {} nodes", n);

    nodes.reserve(initial_capacity(n as usize));
    read_records_with(reader, n as usize, "node records", |index, record: NodeRecord| {
        let id = index as NodeId;
        nodes.push(QueryNode::from(&record));
        if record.barrier {
            barrier_nodes.push(id);
        }
        if record.traffic_light {
            traffic_lights.push(id);
        }
    })?;

    barrier_nodes.shrink_to_fit();
    traffic_lights.shrink_to_fit();

    Ok(n)
}

/// Write the fingerprint and node section of a graph stream
pub fn write_nodes<W: Write>(
    writer: &mut W,
    fingerprint: &Fingerprint,
    nodes: &[NodeRecord],
) -> std::io::Result<()> {
    fingerprint.write_to(writer)?;
    super::io::write_records(writer, nodes)
}
