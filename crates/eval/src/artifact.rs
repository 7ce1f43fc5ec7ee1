// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Versioned binary table files.
//!
//! Every table file starts with a 20 bytes header:
//!
//! ```text
//!   magic    [u8; 4]  file type
//!   major    u16
//!   minor    u16
//!   revision u16
//!   reserved u16      zero
//!   checksum u64      xxh3-64 of all the bytes after the header
//! ```
//!
//! followed by the table payload, all integers are little endian.
use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    io::{self, Read, Write},
};
use xxhash_rust::xxh3::Xxh3;

use crate::error::{Error, Result};

/// A table format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
    /// Revision.
    pub revision: u16,
}

impl Version {
    /// Creates a new version.
    pub const fn new(major: u16, minor: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// The header at the start of a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VersionHeader {
    pub magic: [u8; 4],
    pub version: Version,
    pub checksum: u64,
}

impl VersionHeader {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.magic)?;
        w.write_u16::<LE>(self.version.major)?;
        w.write_u16::<LE>(self.version.minor)?;
        w.write_u16::<LE>(self.version.revision)?;
        w.write_u16::<LE>(0)?;
        w.write_u64::<LE>(self.checksum)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0; 4];
        r.read_exact(&mut magic)?;
        let major = r.read_u16::<LE>()?;
        let minor = r.read_u16::<LE>()?;
        let revision = r.read_u16::<LE>()?;
        let _reserved = r.read_u16::<LE>()?;
        let checksum = r.read_u64::<LE>()?;

        Ok(Self {
            magic,
            version: Version::new(major, minor, revision),
            checksum,
        })
    }
}

/// A writer that only hashes the bytes written to it.
struct HashWriter(Xxh3);

impl Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a table file with the given magic and version.
///
/// The `payload` closure is called twice, first to compute the checksum that
/// goes in the header and then to write the payload after the header, so it
/// must write the same bytes both times.
pub(crate) fn write_artifact<W, F>(
    w: &mut W,
    magic: [u8; 4],
    version: Version,
    payload: F,
) -> Result<()>
where
    W: Write,
    F: Fn(&mut dyn Write) -> io::Result<()>,
{
    let mut hasher = HashWriter(Xxh3::new());
    payload(&mut hasher)?;

    let header = VersionHeader {
        magic,
        version,
        checksum: hasher.0.digest(),
    };

    header.write_to(w)?;
    payload(w)?;
    w.flush()?;

    Ok(())
}

/// A reader for the payload of a table file that hashes the bytes it reads.
pub(crate) struct ArtifactReader<R> {
    inner: R,
    hasher: Xxh3,
    checksum: u64,
}

impl<R: Read> ArtifactReader<R> {
    /// Reads and checks the file header.
    pub fn open(mut inner: R, magic: [u8; 4], version: Version) -> Result<Self> {
        let header = VersionHeader::read_from(&mut inner)?;
        if header.magic != magic {
            return Err(Error::BadMagic {
                expected: magic,
                found: header.magic,
            });
        }

        if header.version != version {
            return Err(Error::VersionMismatch {
                expected: version,
                found: header.version,
            });
        }

        Ok(Self {
            inner,
            hasher: Xxh3::new(),
            checksum: header.checksum,
        })
    }

    /// Checks that the payload has been fully read and its checksum matches.
    pub fn finish(mut self) -> Result<()> {
        let mut trailing = [0; 1];
        if self.read(&mut trailing)? != 0 {
            return Err(Error::Corrupted);
        }

        if self.hasher.digest() != self.checksum {
            return Err(Error::Corrupted);
        }

        Ok(())
    }
}

impl<R: Read> Read for ArtifactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Reads `count` little endian u32 values in chunks, so that a corrupted
/// count fails on a short read before allocating the whole vector.
pub(crate) fn read_u32_vec<R: Read>(r: &mut R, count: usize) -> io::Result<Vec<u32>> {
    const CHUNK: usize = 1 << 16;

    let mut values = Vec::with_capacity(count.min(CHUNK));
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(CHUNK);
        let start = values.len();
        values.resize(start + n, 0);
        r.read_u32_into::<LE>(&mut values[start..])?;
        remaining -= n;
    }

    Ok(values)
}

/// Writes u32 values in little endian order.
pub(crate) fn write_u32_slice(w: &mut dyn Write, values: &[u32]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(4 * values.len().min(1 << 16));
    for chunk in values.chunks(1 << 16) {
        buf.clear();
        for &v in chunk {
            buf.write_u32::<LE>(v)?;
        }
        w.write_all(&buf)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_SIZE: usize = 20;
    const MAGIC: [u8; 4] = *b"TEST";
    const VERSION: Version = Version::new(1, 2, 3);

    fn write_values(values: &[u32]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_artifact(&mut buf, MAGIC, VERSION, |w| {
            w.write_u32::<LE>(values.len() as u32)?;
            write_u32_slice(w, values)
        })
        .unwrap();
        buf
    }

    fn read_values(buf: &[u8]) -> Result<Vec<u32>> {
        let mut r = ArtifactReader::open(buf, MAGIC, VERSION)?;
        let count = r.read_u32::<LE>()? as usize;
        let values = read_u32_vec(&mut r, count)?;
        r.finish()?;
        Ok(values)
    }

    #[test]
    fn artifact_header_layout() {
        let buf = write_values(&[1, 2, 3]);
        assert_eq!(buf.len(), HEADER_SIZE + 4 * 4);
        assert_eq!(&buf[..4], b"TEST");
        assert_eq!(&buf[4..12], &[1, 0, 2, 0, 3, 0, 0, 0]);

        let checksum = xxhash_rust::xxh3::xxh3_64(&buf[HEADER_SIZE..]);
        assert_eq!(&buf[12..20], &checksum.to_le_bytes());
        assert_eq!(&buf[20..24], &[3, 0, 0, 0]);
    }

    #[test]
    fn artifact_read_write() {
        let values = (0..100_000).collect::<Vec<u32>>();
        let buf = write_values(&values);
        assert_eq!(read_values(&buf).unwrap(), values);
    }

    #[test]
    fn artifact_rejects_bad_files() {
        let buf = write_values(&[7, 8, 9]);

        let mut bad = buf.clone();
        bad[0] = b'X';
        assert!(matches!(read_values(&bad), Err(Error::BadMagic { .. })));

        let mut bad = buf.clone();
        bad[6] = 9;
        assert!(matches!(
            read_values(&bad),
            Err(Error::VersionMismatch { found, .. }) if found == Version::new(1, 9, 3)
        ));

        let mut bad = buf.clone();
        let last = bad.len() - 1;
        bad[last] ^= 0x40;
        assert!(matches!(read_values(&bad), Err(Error::Corrupted)));

        let mut bad = buf.clone();
        bad.push(0);
        assert!(matches!(read_values(&bad), Err(Error::Corrupted)));

        let bad = &buf[..buf.len() - 2];
        assert!(matches!(read_values(bad), Err(Error::Io(_))));
    }

    #[test]
    fn artifact_huge_count() {
        // A corrupted count fails without allocating the whole table.
        let mut buf = write_values(&[7, 8, 9]);
        let count = HEADER_SIZE..HEADER_SIZE + 4;
        buf[count].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read_values(&buf), Err(Error::Io(_))));
    }
}
