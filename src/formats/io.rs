//! Fixed-size record reading shared by the node, edge and restriction formats

use std::io::{Read, Write};

use crate::error::{LoadError, Result};

/// Records per block when bulk-reading a record array
const BLOCK_RECORDS: usize = 64 * 1024;

/// A fixed-width little-endian on-disk record
pub trait Record: Sized {
    /// Encoded width in bytes
    const SIZE: usize;
    /// Name used in error messages
    const NAME: &'static str;

    /// Decode from exactly `Self::SIZE` bytes. `index` is the record's
    /// position in its array and is only used for error reporting.
    fn decode(bytes: &[u8], index: usize) -> Result<Self>;

    /// Append exactly `Self::SIZE` bytes to `out`
    fn encode(&self, out: &mut Vec<u8>);
}

pub(crate) fn decode_bool(byte: u8, record: &'static str, field: &str, index: usize) -> Result<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(LoadError::malformed(
            record,
            index,
            format!("{field} byte must be 0 or 1, got {other}"),
        )),
    }
}

pub(crate) fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn i32_at(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn i64_at(bytes: &[u8], offset: usize) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    i64::from_le_bytes(buf)
}

/// Read a 4-byte little-endian element count
pub fn read_count<R: Read>(reader: &mut R, context: &'static str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| LoadError::read(context, e))?;
    Ok(u32::from_le_bytes(buf))
}

/// Decode `count` records, appending them to `out` in stream order.
///
/// Reads in blocks so memory overhead stays bounded for large arrays.
pub fn read_records<R: Read, T: Record>(
    reader: &mut R,
    count: usize,
    out: &mut Vec<T>,
    context: &'static str,
) -> Result<()> {
    out.reserve(initial_capacity(count));
    read_records_with(reader, count, context, |_, record| out.push(record))
}

/// Capacity to reserve before reading `count` records.
///
/// Capped at one block: the count comes from the file, and a corrupt count
/// must fail with `Truncated` on the first short block rather than allocate
/// for records that do not exist. Beyond the first block, vectors grow with
/// the data actually read.
pub(crate) fn initial_capacity(count: usize) -> usize {
    count.min(BLOCK_RECORDS)
}

/// Decode `count` records block by block, handing each to `visit` with its
/// index in the array.
pub fn read_records_with<R, T, F>(
    reader: &mut R,
    count: usize,
    context: &'static str,
    mut visit: F,
) -> Result<()>
where
    R: Read,
    T: Record,
    F: FnMut(usize, T),
{
    let mut buf = vec![0u8; initial_capacity(count.max(1)) * T::SIZE];
    let mut index = 0;

    while index < count {
        let block = BLOCK_RECORDS.min(count - index);
        let bytes = &mut buf[..block * T::SIZE];
        reader
            .read_exact(bytes)
            .map_err(|e| LoadError::read(context, e))?;

        for chunk in bytes.chunks_exact(T::SIZE) {
            visit(index, T::decode(chunk, index)?);
            index += 1;
        }
    }

    Ok(())
}

/// Write a u32 count followed by the encoded records
pub fn write_records<W: Write, T: Record>(writer: &mut W, records: &[T]) -> std::io::Result<()> {
    let count = u32::try_from(records.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} {} records exceed the u32 count field", records.len(), T::NAME),
        )
    })?;
    writer.write_all(&count.to_le_bytes())?;

    let mut buf = Vec::with_capacity(T::SIZE * records.len().min(BLOCK_RECORDS));
    for block in records.chunks(BLOCK_RECORDS) {
        buf.clear();
        for record in block {
            record.encode(&mut buf);
        }
        writer.write_all(&buf)?;
    }
    Ok(())
}
