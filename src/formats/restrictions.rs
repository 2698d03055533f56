//! Turn restriction file
//!
//! Format (little-endian):
//!
//!   fingerprint:        [40]u8   // verified strictly
//!   restriction_count:  u32
//!   restriction_count records (13 bytes each):
//!     from:  u32   // internal node id
//!     via:   u32   // internal node id
//!     to:    u32   // internal node id
//!     kind:  u8    // 0=Prohibited, 1=Mandatory
//!
//! Node ids are internal ids. The producer renumbers OSM ids before writing;
//! records are loaded verbatim.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use super::fingerprint::{verify_fingerprint, Fingerprint};
use super::io::{read_count, read_records, u32_at, write_records, Record};
use crate::error::{LoadError, Result};
use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RestrictionKind {
    /// The turn from -> via -> to is forbidden
    Prohibited = 0,
    /// Coming from `from` through `via`, the only allowed turn is to `to`
    Mandatory = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnRestriction {
    pub from: NodeId,
    pub via: NodeId,
    pub to: NodeId,
    pub kind: RestrictionKind,
}

impl Record for TurnRestriction {
    const SIZE: usize = 13;
    const NAME: &'static str = "restriction";

    fn decode(bytes: &[u8], index: usize) -> Result<Self> {
        let kind = match bytes[12] {
            0 => RestrictionKind::Prohibited,
            1 => RestrictionKind::Mandatory,
            other => {
                return Err(LoadError::malformed(
                    Self::NAME,
                    index,
                    format!("unknown restriction kind {other}"),
                ))
            }
        };

        Ok(Self {
            from: u32_at(bytes, 0),
            via: u32_at(bytes, 4),
            to: u32_at(bytes, 8),
            kind,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.from.to_le_bytes());
        out.extend_from_slice(&self.via.to_le_bytes());
        out.extend_from_slice(&self.to.to_le_bytes());
        out.push(self.kind as u8);
    }
}

/// Load a restriction file into `restrictions`.
///
/// The file's fingerprint must pass strict verification. `restrictions` is
/// cleared first and stays empty on any error.
pub fn load_restrictions<P: AsRef<Path>>(
    path: P,
    restrictions: &mut Vec<TurnRestriction>,
) -> Result<u32> {
    let path = path.as_ref();
    restrictions.clear();

    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    read_restrictions(&mut reader, &path.display().to_string(), restrictions)
}

/// Read a restriction stream (fingerprint, count, records).
///
/// `origin` names the stream in errors and logs. Same output contract as
/// [`load_restrictions`]: `restrictions` is cleared first and stays empty on
/// any error.
pub fn read_restrictions<R: Read>(
    reader: &mut R,
    origin: &str,
    restrictions: &mut Vec<TurnRestriction>,
) -> Result<u32> {
    restrictions.clear();
    let result = read_restriction_records(reader, origin, restrictions);
    if result.is_err() {
        restrictions.clear();
    }
    result
}

fn read_restriction_records<R: Read>(
    reader: &mut R,
    origin: &str,
    restrictions: &mut Vec<TurnRestriction>,
) -> Result<u32> {
    verify_fingerprint(reader, origin)?;

    let count = read_count(reader, "restriction count")?;
    if count > 0 {
        read_records(reader, count as usize, restrictions, "restriction records")?;
    }

    info!("Loaded {} turn restrictions from {}", count, origin);
    Ok(count)
}

/// Write a restriction file
pub fn write_restrictions<P: AsRef<Path>>(
    path: P,
    fingerprint: &Fingerprint,
    restrictions: &[TurnRestriction],
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    fingerprint.write_to(&mut writer)?;
    write_records(&mut writer, restrictions)?;
    writer.flush()
}
