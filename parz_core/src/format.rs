//! PARZ1 container framing.
//!
//! The engine itself never touches a file; this module fixes the byte
//! layout a serializer needs so a subblock list survives a round-trip. A
//! container is a header followed either by subblock records or, when the
//! compressor gave up, by the raw input bytes (`FLAG_RAW`).

use std::io::{Read, Write};

use crate::config::Compression;
use crate::error::{Error, Result};
use crate::subblock::{Subblock, SubblockList};

/// Magic bytes opening every PARZ1 container.
pub const MAGIC: &[u8; 6] = b"PARZ1\n";

/// Fixed size of the container header in bytes.
///   magic[6] + version:u16 + codec_id:u16 + flags:u16 + item_size:u16
///   + subblock_count:u64 + raw_size:u64 + reserved[10]
///   = 6 + 2 + 2 + 2 + 2 + 8 + 8 + 10 = 40
pub const HEADER_SIZE: usize = 40;

/// Current container version.
pub const VERSION: u16 = 1;

// ── Flags ──────────────────────────────────────────────────────────────────

/// Subblocks carry xxh3-64 checksums.
pub const FLAG_CHECKSUMS: u16 = 1 << 0;

/// The payload was byte-shuffled before compression; `item_size` records
/// the width needed to unshuffle after decode.
pub const FLAG_SHUFFLED: u16 = 1 << 1;

/// The compressor gave up: the container stores the raw input verbatim and
/// `subblock_count` is 0.
pub const FLAG_RAW: u16 = 1 << 2;

// ── Codec IDs ──────────────────────────────────────────────────────────────

pub const CODEC_DEFLATE: u16 = 1;
pub const CODEC_LZ4: u16 = 2;
pub const CODEC_ZSTD: u16 = 3;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 40-byte PARZ1 header.
#[derive(Debug, Clone)]
pub struct ContainerHeader {
    pub version: u16,
    pub codec_id: u16,
    pub flags: u16,
    /// Shuffle item width; 1 when shuffling was off.
    pub item_size: u16,
    pub subblock_count: u64,
    /// Total uncompressed size of the contained data.
    pub raw_size: u64,
}

impl ContainerHeader {
    pub fn new(
        codec_id: u16,
        flags: u16,
        item_size: u16,
        subblock_count: u64,
        raw_size: u64,
    ) -> Self {
        Self {
            version: VERSION,
            codec_id,
            flags,
            item_size,
            subblock_count,
            raw_size,
        }
    }

    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..6].copy_from_slice(MAGIC);
        buf[6..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..10].copy_from_slice(&self.codec_id.to_le_bytes());
        buf[10..12].copy_from_slice(&self.flags.to_le_bytes());
        buf[12..14].copy_from_slice(&self.item_size.to_le_bytes());
        buf[14..22].copy_from_slice(&self.subblock_count.to_le_bytes());
        buf[22..30].copy_from_slice(&self.raw_size.to_le_bytes());
        // reserved[10] stays zero
        buf
    }

    /// Deserialize from `HEADER_SIZE` bytes, checking magic and version.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        if &buf[..6] != MAGIC {
            return Err(Error::InvalidContainer(
                "bad magic bytes — not a PARZ1 container".to_string(),
            ));
        }
        let header = Self {
            version: u16::from_le_bytes(buf[6..8].try_into().unwrap()),
            codec_id: u16::from_le_bytes(buf[8..10].try_into().unwrap()),
            flags: u16::from_le_bytes(buf[10..12].try_into().unwrap()),
            item_size: u16::from_le_bytes(buf[12..14].try_into().unwrap()),
            subblock_count: u64::from_le_bytes(buf[14..22].try_into().unwrap()),
            raw_size: u64::from_le_bytes(buf[22..30].try_into().unwrap()),
        };
        if header.version != VERSION {
            return Err(Error::InvalidContainer(format!(
                "unsupported container version {}",
                header.version
            )));
        }
        Ok(header)
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Read a header from `r`.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        r.read_exact(&mut buf)?;
        Self::from_bytes(&buf)
    }
}

// ── Subblock records ───────────────────────────────────────────────────────

/// Write the subblock records following a header. Each record is
/// `(uncompressed_size: u64 LE, payload_len: u64 LE, checksum: u64 LE,
/// payload)`; the count lives in the header.
pub fn write_subblocks<W: Write>(w: &mut W, subblocks: &[Subblock]) -> Result<()> {
    for sb in subblocks {
        w.write_all(&(sb.uncompressed_size as u64).to_le_bytes())?;
        w.write_all(&(sb.payload.len() as u64).to_le_bytes())?;
        w.write_all(&sb.checksum.to_le_bytes())?;
        w.write_all(&sb.payload)?;
    }
    Ok(())
}

/// Read `count` subblock records from `r`.
pub fn read_subblocks<R: Read>(r: &mut R, count: u64) -> Result<SubblockList> {
    let mut subblocks = Vec::with_capacity(count.min(1 << 20) as usize);
    let mut fixed = [0u8; 24];
    for _ in 0..count {
        r.read_exact(&mut fixed)?;
        let uncompressed_size = u64::from_le_bytes(fixed[0..8].try_into().unwrap()) as usize;
        let payload_len = u64::from_le_bytes(fixed[8..16].try_into().unwrap()) as usize;
        let checksum = u64::from_le_bytes(fixed[16..24].try_into().unwrap());

        if payload_len == 0 || uncompressed_size == 0 || payload_len > uncompressed_size {
            return Err(Error::InvalidContainer(format!(
                "bad subblock record (usize={uncompressed_size}, csize={payload_len})"
            )));
        }

        let mut payload = vec![0u8; payload_len];
        r.read_exact(&mut payload)?;

        subblocks.push(Subblock {
            payload,
            uncompressed_size,
            checksum,
        });
    }
    Ok(subblocks)
}

// ── Whole-container helpers ────────────────────────────────────────────────

/// Everything after a container header: either the raw input (give-up
/// fallback) or the subblock list.
#[derive(Debug)]
pub enum ContainerContents {
    Raw(Vec<u8>),
    Subblocks(SubblockList),
}

/// Serialize one compression result. An empty `subblocks` list means the
/// engine gave up; the container then stores `data` verbatim under
/// `FLAG_RAW` so decoding never needs the engine at all.
pub fn write_container<W: Write>(
    w: &mut W,
    codec_id: u16,
    config: &Compression,
    data: &[u8],
    subblocks: &[Subblock],
) -> Result<()> {
    let mut flags = 0u16;
    if config.checksums {
        flags |= FLAG_CHECKSUMS;
    }
    if config.shuffling_active() {
        flags |= FLAG_SHUFFLED;
    }
    if subblocks.is_empty() {
        flags |= FLAG_RAW;
    }

    let header = ContainerHeader::new(
        codec_id,
        flags,
        config.item_size.max(1) as u16,
        subblocks.len() as u64,
        data.len() as u64,
    );
    w.write_all(&header.to_bytes())?;

    if subblocks.is_empty() {
        w.write_all(data)?;
    } else {
        write_subblocks(w, subblocks)?;
    }
    Ok(())
}

/// Parse a full container from `r`.
pub fn read_container<R: Read>(r: &mut R) -> Result<(ContainerHeader, ContainerContents)> {
    let header = ContainerHeader::read_from(r)?;
    let contents = if header.has_flag(FLAG_RAW) {
        let mut raw = vec![0u8; header.raw_size as usize];
        r.read_exact(&mut raw)?;
        ContainerContents::Raw(raw)
    } else {
        ContainerContents::Subblocks(read_subblocks(r, header.subblock_count)?)
    };
    Ok((header, contents))
}

/// Decode configuration implied by a container header: the shuffle width
/// and switch must match what the compressor used.
pub fn decode_config(header: &ContainerHeader) -> Compression {
    Compression {
        item_size: header.item_size as usize,
        byte_shuffling: header.has_flag(FLAG_SHUFFLED),
        checksums: header.has_flag(FLAG_CHECKSUMS),
        ..Compression::default()
    }
}
