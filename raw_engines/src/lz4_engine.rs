use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use raw_core::frame::ENGINE_LZ4;
use raw_core::Engine;

use crate::{le_bytes_into_samples, samples_to_le_bytes};

/// LZ4 engine.
///
/// Fastest decode of the bundled engines, with the weakest ratio on smooth
/// signals.
pub struct Lz4Engine;

impl Engine for Lz4Engine {
    fn id(&self) -> u16 {
        ENGINE_LZ4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn encode_payload(&self, samples: &[u32]) -> anyhow::Result<Vec<u8>> {
        Ok(compress_prepend_size(&samples_to_le_bytes(samples)))
    }

    fn max_samples(&self, payload: &[u8]) -> u64 {
        // The payload opens with the decompressed size as a little-endian u32.
        match payload.get(..4) {
            Some(size) => u32::from_le_bytes([size[0], size[1], size[2], size[3]]) as u64 / 4,
            None => 0,
        }
    }

    fn decode_payload(&self, payload: &[u8], out: &mut [u32]) -> anyhow::Result<()> {
        let raw = decompress_size_prepended(payload)
            .map_err(|e| anyhow::anyhow!("lz4 decompress error: {}", e))?;
        le_bytes_into_samples(&raw, out)
    }
}
