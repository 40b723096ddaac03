use raw_core::frame::ENGINE_PASSTHROUGH;
use raw_core::Engine;

use crate::{le_bytes_into_samples, samples_to_le_bytes};

/// No-op engine: stores every sample verbatim as a little-endian u32.
///
/// Useful for verifying the frame and sample layers independently of any
/// compression.
pub struct PassThroughEngine;

impl Engine for PassThroughEngine {
    fn id(&self) -> u16 {
        ENGINE_PASSTHROUGH
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn encode_payload(&self, samples: &[u32]) -> anyhow::Result<Vec<u8>> {
        Ok(samples_to_le_bytes(samples))
    }

    fn max_samples(&self, payload: &[u8]) -> u64 {
        payload.len() as u64 / 4
    }

    fn decode_payload(&self, payload: &[u8], out: &mut [u32]) -> anyhow::Result<()> {
        le_bytes_into_samples(payload, out)
    }
}
