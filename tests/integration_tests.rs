//! Integration tests for butterfly-load
//!
//! Graph and restriction files are written to temporary files and loaded back
//! through the public API.

use std::fs::File;
use std::io::{BufReader, Write};

use butterfly_load::formats::{write_edges, write_nodes, write_restrictions};
use butterfly_load::validate::check_restriction_ids;
use butterfly_load::{
    load_edges, load_graph_file, load_nodes, load_restrictions, write_graph, DuplicateCheck,
    EdgeDefect, ErrorCategory, Fingerprint, LoadError, LoadOptions, NodeBasedEdge, NodeRecord,
    RestrictionKind, TravelMode, TurnRestriction,
};
use tempfile::NamedTempFile;

/// Square grid with edges to the right and down neighbours in both directions.
/// Every 5th node is a barrier, every 7th carries a traffic light.
fn grid(side: u32) -> (Vec<NodeRecord>, Vec<NodeBasedEdge>) {
    let mut nodes = Vec::new();
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            let mut node = NodeRecord::from_degrees(
                1_000_000 + id as i64 * 3,
                50.0 + row as f64 * 0.001,
                4.0 + col as f64 * 0.001,
            );
            node.barrier = id % 5 == 0;
            node.traffic_light = id % 7 == 3;
            nodes.push(node);
        }
    }

    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            if col + 1 < side {
                edges.push(NodeBasedEdge::new(id, id + 1, 12, TravelMode::Driving));
                edges.push(NodeBasedEdge::new(id + 1, id, 12, TravelMode::Driving));
            }
            if row + 1 < side {
                edges.push(NodeBasedEdge::new(id, id + side, 30, TravelMode::Cycling));
                edges.push(NodeBasedEdge::new(id + side, id, 30, TravelMode::Cycling));
            }
        }
    }
    edges.reverse();
    (nodes, edges)
}

fn validating() -> LoadOptions {
    LoadOptions::default().with_validate(true)
}

#[test]
fn test_graph_file_roundtrip() -> butterfly_load::Result<()> {
    let (nodes, edges) = grid(40);
    let tmp = NamedTempFile::new().unwrap();
    write_graph(tmp.path(), &Fingerprint::valid(), &nodes, &edges).unwrap();

    for strategy in [DuplicateCheck::ParallelSort, DuplicateCheck::HashSet] {
        let graph = load_graph_file(tmp.path(), &validating().with_duplicate_check(strategy))?;

        assert_eq!(graph.node_count(), nodes.len());
        for (i, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.osm_id, nodes[i].osm_id);
            assert_eq!((node.lat, node.lon), (nodes[i].lat, nodes[i].lon));
        }

        let expected_barriers: Vec<u32> = (0..nodes.len() as u32).filter(|i| i % 5 == 0).collect();
        let expected_lights: Vec<u32> = (0..nodes.len() as u32).filter(|i| i % 7 == 3).collect();
        assert_eq!(graph.barrier_nodes, expected_barriers);
        assert_eq!(graph.traffic_lights, expected_lights);
        assert!(graph.barrier_nodes.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(graph.edges, edges);
    }
    Ok(())
}

#[test]
fn test_stale_fingerprint_warns_and_loads() -> butterfly_load::Result<()> {
    let (nodes, edges) = grid(6);
    let stale = Fingerprint::new(0, 1, 2, [7u8; 16], [9u8; 16]);
    let tmp = NamedTempFile::new().unwrap();
    write_graph(tmp.path(), &stale, &nodes, &edges).unwrap();

    let mut reader = BufReader::new(File::open(tmp.path()).unwrap());
    let (mut barriers, mut lights, mut loaded_nodes) = (Vec::new(), Vec::new(), Vec::new());
    let n = load_nodes(&mut reader, &mut barriers, &mut lights, &mut loaded_nodes)?;
    let mut loaded_edges = Vec::new();
    let m = load_edges(&mut reader, &mut loaded_edges, &validating())?;

    assert_eq!(n as usize, nodes.len());
    assert_eq!(m as usize, edges.len());
    Ok(())
}

#[test]
fn test_edges_from_separate_stream() -> butterfly_load::Result<()> {
    let (nodes, edges) = grid(5);
    let node_file = NamedTempFile::new().unwrap();
    let edge_file = NamedTempFile::new().unwrap();
    {
        let mut w = node_file.reopen().unwrap();
        write_nodes(&mut w, &Fingerprint::valid(), &nodes).unwrap();
        let mut w = edge_file.reopen().unwrap();
        write_edges(&mut w, &edges).unwrap();
    }

    let mut loaded = Vec::new();
    let m = load_edges(
        &mut BufReader::new(File::open(edge_file.path()).unwrap()),
        &mut loaded,
        &validating(),
    )?;
    assert_eq!(m as usize, edges.len());
    assert_eq!(loaded, edges);
    Ok(())
}

#[test]
fn test_truncated_graph_file() {
    let (nodes, edges) = grid(8);
    let tmp = NamedTempFile::new().unwrap();
    write_graph(tmp.path(), &Fingerprint::valid(), &nodes, &edges).unwrap();

    let len = tmp.as_file().metadata().unwrap().len();
    tmp.as_file().set_len(len - 3).unwrap();

    let err = load_graph_file(tmp.path(), &validating()).unwrap_err();
    assert!(matches!(err, LoadError::Truncated { .. }));
    assert_eq!(err.category(), ErrorCategory::Io);
}

#[test]
fn test_duplicate_edge_in_file_is_contract_failure() {
    let (nodes, mut edges) = grid(4);
    let duplicate = edges[9];
    edges.insert(3, duplicate);
    let tmp = NamedTempFile::new().unwrap();
    write_graph(tmp.path(), &Fingerprint::valid(), &nodes, &edges).unwrap();

    let err = load_graph_file(tmp.path(), &validating()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::InvariantViolation(EdgeDefect::MultiEdge { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::Contract);

    let graph = load_graph_file(tmp.path(), &LoadOptions::default().with_validate(false)).unwrap();
    assert_eq!(graph.edges, edges);
}

#[test]
fn test_missing_graph_file() {
    let err = load_graph_file("/nonexistent/monaco.graph", &validating()).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
}

fn sample_restrictions() -> Vec<TurnRestriction> {
    vec![
        TurnRestriction {
            from: 0,
            via: 1,
            to: 2,
            kind: RestrictionKind::Prohibited,
        },
        TurnRestriction {
            from: 5,
            via: 6,
            to: 11,
            kind: RestrictionKind::Mandatory,
        },
        TurnRestriction {
            from: 24,
            via: 19,
            to: 18,
            kind: RestrictionKind::Prohibited,
        },
    ]
}

#[test]
fn test_restrictions_roundtrip() -> butterfly_load::Result<()> {
    let expected = sample_restrictions();
    let tmp = NamedTempFile::new().unwrap();
    write_restrictions(tmp.path(), &Fingerprint::valid(), &expected).unwrap();

    let mut restrictions = vec![expected[0]];
    let count = load_restrictions(tmp.path(), &mut restrictions)?;
    assert_eq!(count, 3);
    assert_eq!(restrictions, expected);

    // Restriction files carry internal ids of the 5x5 grid
    assert!(check_restriction_ids(&restrictions, 25).is_ok());
    Ok(())
}

#[test]
fn test_empty_restrictions() -> butterfly_load::Result<()> {
    let tmp = NamedTempFile::new().unwrap();
    write_restrictions(tmp.path(), &Fingerprint::valid(), &[]).unwrap();

    let mut restrictions = sample_restrictions();
    assert_eq!(load_restrictions(tmp.path(), &mut restrictions)?, 0);
    assert!(restrictions.is_empty());
    Ok(())
}

#[test]
fn test_restrictions_with_stale_fingerprint_rejected() {
    let valid = Fingerprint::valid();
    let stale = Fingerprint::new(valid.major, 0, 0, valid.contractor_digest, [3u8; 16]);
    let tmp = NamedTempFile::new().unwrap();
    write_restrictions(tmp.path(), &stale, &sample_restrictions()).unwrap();

    let mut restrictions = sample_restrictions();
    let err = load_restrictions(tmp.path(), &mut restrictions).unwrap_err();
    assert!(matches!(err, LoadError::IncompatibleFingerprint { .. }));
    assert_eq!(err.category(), ErrorCategory::StaleFormat);
    assert!(restrictions.is_empty());
}

#[test]
fn test_truncated_restrictions_leave_nothing() {
    let mut tmp = NamedTempFile::new().unwrap();
    Fingerprint::valid().write_to(&mut tmp).unwrap();
    tmp.write_all(&5u32.to_le_bytes()).unwrap();
    tmp.write_all(&[0u8; 13 * 2]).unwrap();
    tmp.flush().unwrap();

    let mut restrictions = Vec::new();
    let err = load_restrictions(tmp.path(), &mut restrictions).unwrap_err();
    assert!(matches!(err, LoadError::Truncated { .. }));
    assert!(restrictions.is_empty());
}

#[test]
fn test_oversized_counts_fail_as_truncated() {
    let (nodes, _) = grid(3);
    let mut graph = NamedTempFile::new().unwrap();
    write_nodes(&mut graph, &Fingerprint::valid(), &nodes).unwrap();
    graph.write_all(&u32::MAX.to_le_bytes()).unwrap();
    graph.write_all(&[0u8; 14]).unwrap();
    graph.flush().unwrap();

    let err = load_graph_file(graph.path(), &validating()).unwrap_err();
    assert!(matches!(err, LoadError::Truncated { context: "edge records" }));

    let mut restriction_file = NamedTempFile::new().unwrap();
    Fingerprint::valid().write_to(&mut restriction_file).unwrap();
    restriction_file.write_all(&u32::MAX.to_le_bytes()).unwrap();
    restriction_file.write_all(&[0u8; 13]).unwrap();
    restriction_file.flush().unwrap();

    let mut restrictions = sample_restrictions();
    let err = load_restrictions(restriction_file.path(), &mut restrictions).unwrap_err();
    assert!(matches!(err, LoadError::Truncated { context: "restriction records" }));
    assert!(restrictions.is_empty());
}
