use raw_core::frame::ENGINE_ZSTD;
use raw_core::Engine;

use crate::{le_bytes_into_samples, samples_to_le_bytes};

const ZSTD_BLOCK_MAX: u64 = 128 * 1024;

/// Zstandard engine.
///
/// Samples are laid out as little-endian u32 words and the whole buffer is
/// compressed as one zstd frame at the configured level (default: 3).
///
/// Best for: data with repeated patterns rather than smooth trends.
pub struct ZstdEngine {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdEngine {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdEngine {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Engine for ZstdEngine {
    fn id(&self) -> u16 {
        ENGINE_ZSTD
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn encode_payload(&self, samples: &[u32]) -> anyhow::Result<Vec<u8>> {
        let raw = samples_to_le_bytes(samples);
        let compressed = zstd::bulk::compress(&raw, self.level)?;
        Ok(compressed)
    }

    fn max_samples(&self, payload: &[u8]) -> u64 {
        // Every zstd block decodes to at most 128 KiB and costs at least a
        // 3-byte block header.
        (payload.len() as u64 / 3 + 1) * (ZSTD_BLOCK_MAX / 4)
    }

    fn decode_payload(&self, payload: &[u8], out: &mut [u32]) -> anyhow::Result<()> {
        let raw = zstd::decode_all(payload)?;
        le_bytes_into_samples(&raw, out)
    }
}
