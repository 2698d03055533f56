//! Fingerprint - fixed-size build marker at the head of every graph file
//!
//! Format (40 bytes, little-endian):
//!
//!   magic:             [u8; 4] = "BFLY"
//!   major:             u8
//!   minor:             u8
//!   patch:             u8
//!   checksum:          u8        // CRC-8/SMBUS over bytes 0..7
//!   contractor_digest: [u8; 16]  // SHA-256 prefix of the node/edge layout
//!   graph_digest:      [u8; 16]  // SHA-256 prefix of the restriction layout
//!
//! The digests hash a textual description of the record layouts, so changing
//! a record's fields changes the fingerprint without anyone bumping a version.

use std::fmt;
use std::io::{Read, Write};

use crc::{Crc, CRC_8_SMBUS};
use log::warn;
use sha2::{Digest, Sha256};

use crate::error::{LoadError, Result};

pub const FINGERPRINT_SIZE: usize = 40;

const MAGIC: [u8; 4] = *b"BFLY";
const FORMAT_MAJOR: u8 = 1;
const FORMAT_MINOR: u8 = 0;
const FORMAT_PATCH: u8 = 0;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

const CONTRACTOR_LAYOUT: &str = "node:lon=i32,lat=i32,osm_id=i64,barrier=u8,traffic_light=u8;\
                                 edge:source=u32,target=u32,weight=i32,forward=u8,travel_mode=u8";
const GRAPH_LAYOUT: &str = "restriction:from=u32,via=u32,to=u32,kind=u8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub magic: [u8; 4],
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub checksum: u8,
    pub contractor_digest: [u8; 16],
    pub graph_digest: [u8; 16],
}

fn layout_digest(layout: &str) -> [u8; 16] {
    let hash = Sha256::digest(layout.as_bytes());
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hash[..16]);
    digest
}

impl Fingerprint {
    /// Fingerprint of the running build
    pub fn valid() -> Self {
        Self::new(
            FORMAT_MAJOR,
            FORMAT_MINOR,
            FORMAT_PATCH,
            layout_digest(CONTRACTOR_LAYOUT),
            layout_digest(GRAPH_LAYOUT),
        )
    }

    /// Build a fingerprint with a correct checksum
    pub fn new(
        major: u8,
        minor: u8,
        patch: u8,
        contractor_digest: [u8; 16],
        graph_digest: [u8; 16],
    ) -> Self {
        let mut fp = Self {
            magic: MAGIC,
            major,
            minor,
            patch,
            checksum: 0,
            contractor_digest,
            graph_digest,
        };
        fp.checksum = fp.compute_checksum();
        fp
    }

    fn compute_checksum(&self) -> u8 {
        let bytes = self.to_bytes();
        CRC8.checksum(&bytes[..7])
    }

    /// Magic and checksum are intact
    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC && self.checksum == self.compute_checksum()
    }

    /// Compatible for reading nodes and edges
    pub fn test_contractor(&self, other: &Fingerprint) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.major == other.major
            && self.contractor_digest == other.contractor_digest
    }

    /// Compatible for reading restrictions and other graph utility files
    pub fn test_graph_util(&self, other: &Fingerprint) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.major == other.major
            && self.graph_digest == other.graph_digest
    }

    pub fn to_bytes(&self) -> [u8; FINGERPRINT_SIZE] {
        let mut bytes = [0u8; FINGERPRINT_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.major;
        bytes[5] = self.minor;
        bytes[6] = self.patch;
        bytes[7] = self.checksum;
        bytes[8..24].copy_from_slice(&self.contractor_digest);
        bytes[24..40].copy_from_slice(&self.graph_digest);
        bytes
    }

    pub fn from_bytes(bytes: &[u8; FINGERPRINT_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut contractor_digest = [0u8; 16];
        contractor_digest.copy_from_slice(&bytes[8..24]);
        let mut graph_digest = [0u8; 16];
        graph_digest.copy_from_slice(&bytes[24..40]);

        Self {
            magic,
            major: bytes[4],
            minor: bytes[5],
            patch: bytes[6],
            checksum: bytes[7],
            contractor_digest,
            graph_digest,
        }
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; FINGERPRINT_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| LoadError::read("fingerprint", e))?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/v{}.{}.{} contractor={} graph={}",
            String::from_utf8_lossy(&self.magic),
            self.major,
            self.minor,
            self.patch,
            hex::encode(self.contractor_digest),
            hex::encode(self.graph_digest)
        )
    }
}

/// Soft check used by the node/edge path: a mismatch is logged, not raised.
///
/// Returns whether the fingerprint is compatible. Fails only when the
/// fingerprint bytes cannot be read.
pub fn check_fingerprint<R: Read>(reader: &mut R) -> Result<bool> {
    let loaded = Fingerprint::read_from(reader)?;
    let compatible = loaded.test_contractor(&Fingerprint::valid());
    if !compatible {
        warn!(
            "graph was prepared with a different build ({}). Reprocess to get rid of this warning.",
            loaded
        );
    }
    Ok(compatible)
}

/// Strict check: an incompatible fingerprint rejects the input.
pub fn verify_fingerprint<R: Read>(reader: &mut R, origin: &str) -> Result<()> {
    let loaded = Fingerprint::read_from(reader)?;
    let expected = Fingerprint::valid();
    if !loaded.test_graph_util(&expected) {
        return Err(LoadError::IncompatibleFingerprint {
            origin: origin.to_string(),
            found: loaded.to_string(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}
