use std::io::Read;

use xxhash_rust::xxh3::Xxh3;

use crate::width::SampleWidth;

/// Magic bytes opening every raw_codec bitstream.
pub const MAGIC: &[u8; 4] = b"RAWC";

/// Current frame layout version.
pub const FRAME_VERSION: u16 = 1;

/// Fixed size of the frame header in bytes.
///   magic[4] + version:u16 + engine_id:u16 + sample_count:u64
///   + payload_len:u64 + sample_width:u8 + reserved[7] + checksum:u64
///   = 4 + 2 + 2 + 8 + 8 + 1 + 7 + 8 = 40
pub const HEADER_SIZE: usize = 40;

/// Header bytes covered by the checksum: everything before the checksum itself.
const CHECKED_LEN: usize = 32;

// ── Engine IDs ─────────────────────────────────────────────────────────────

pub const ENGINE_PASSTHROUGH: u16 = 0;
pub const ENGINE_RICE: u16 = 1;
pub const ENGINE_ZSTD: u16 = 2;
pub const ENGINE_LZ4: u16 = 3;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 40-byte frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u16,
    pub engine_id: u16,
    /// Number of samples the payload decodes to.
    pub sample_count: u64,
    /// Length of the engine payload following the header.
    pub payload_len: u64,
    /// Width of the raw samples that were compressed.
    pub sample_width: SampleWidth,
    /// xxhash3-64 of the first 32 header bytes followed by the payload.
    pub checksum: u64,
}

impl FrameHeader {
    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..4].copy_from_slice(MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.engine_id.to_le_bytes());
        buf[8..16].copy_from_slice(&self.sample_count.to_le_bytes());
        buf[16..24].copy_from_slice(&self.payload_len.to_le_bytes());
        buf[24] = self.sample_width.bytes() as u8;
        // buf[25..32] reserved, stays zero
        buf[32..40].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize from `HEADER_SIZE` bytes, checking magic, version and width.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> anyhow::Result<Self> {
        if &buf[..4] != MAGIC {
            anyhow::bail!("invalid magic bytes: not a raw_codec bitstream");
        }
        let version = u16::from_le_bytes(buf[4..6].try_into()?);
        if version != FRAME_VERSION {
            anyhow::bail!(
                "unsupported bitstream version {} (only version {} is supported)",
                version,
                FRAME_VERSION
            );
        }
        Ok(Self {
            version,
            engine_id: u16::from_le_bytes(buf[6..8].try_into()?),
            sample_count: u64::from_le_bytes(buf[8..16].try_into()?),
            payload_len: u64::from_le_bytes(buf[16..24].try_into()?),
            sample_width: SampleWidth::try_from(buf[24])?,
            checksum: u64::from_le_bytes(buf[32..40].try_into()?),
        })
    }

    /// Read and validate a header from the start of `src`.
    pub fn read_from<R: Read>(src: &mut R) -> anyhow::Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        src.read_exact(&mut buf)
            .map_err(|e| anyhow::anyhow!("bitstream too short for a frame header: {}", e))?;
        Self::from_bytes(&buf)
    }

    /// Checksum over this header's fields (the stored checksum excluded) and
    /// `payload`.
    pub fn compute_checksum(&self, payload: &[u8]) -> u64 {
        let bytes = self.to_bytes();
        let mut hasher = Xxh3::new();
        hasher.update(&bytes[..CHECKED_LEN]);
        hasher.update(payload);
        hasher.digest()
    }
}
