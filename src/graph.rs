//! Loading a complete graph file (node section followed by edge section)

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{LoadError, Result};
use crate::formats::{
    load_edges, load_nodes, write_edges, write_nodes, Fingerprint, NodeBasedEdge, NodeRecord,
    QueryNode,
};
use crate::options::LoadOptions;
use crate::validate::check_edge_endpoints;
use crate::NodeId;

/// Everything read from a graph file
#[derive(Debug, Default, Clone)]
pub struct LoadedGraph {
    pub nodes: Vec<QueryNode>,
    pub barrier_nodes: Vec<NodeId>,
    pub traffic_lights: Vec<NodeId>,
    pub edges: Vec<NodeBasedEdge>,
}

impl LoadedGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Load nodes then edges from one stream.
///
/// With validation enabled, edge endpoints are also checked against the
/// number of loaded nodes.
pub fn load_graph<R: Read>(reader: &mut R, options: &LoadOptions) -> Result<LoadedGraph> {
    let mut graph = LoadedGraph::default();

    let n = load_nodes(
        reader,
        &mut graph.barrier_nodes,
        &mut graph.traffic_lights,
        &mut graph.nodes,
    )?;
    load_edges(reader, &mut graph.edges, options)?;

    if options.validate {
        check_edge_endpoints(&graph.edges, n)?;
    }

    info!(
        "Loaded graph: {} nodes ({} barriers, {} traffic lights), {} edges",
        graph.nodes.len(),
        graph.barrier_nodes.len(),
        graph.traffic_lights.len(),
        graph.edges.len()
    );
    Ok(graph)
}

/// Open `path` and load the graph it contains
pub fn load_graph_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<LoadedGraph> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_graph(&mut BufReader::new(file), options)
}

/// Write a graph file
pub fn write_graph<P: AsRef<Path>>(
    path: P,
    fingerprint: &Fingerprint,
    nodes: &[NodeRecord],
    edges: &[NodeBasedEdge],
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_nodes(&mut writer, fingerprint, nodes)?;
    write_edges(&mut writer, edges)?;
    writer.flush()
}
