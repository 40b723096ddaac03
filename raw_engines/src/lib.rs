mod bits;
mod lz4_engine;
mod passthrough;
mod rice;
mod zstd_engine;

pub use lz4_engine::Lz4Engine;
pub use passthrough::PassThroughEngine;
pub use rice::RiceEngine;
pub use zstd_engine::ZstdEngine;

use raw_core::frame::{ENGINE_LZ4, ENGINE_PASSTHROUGH, ENGINE_RICE, ENGINE_ZSTD};
use raw_core::Engine;
use std::sync::Arc;

/// Engine names accepted by [`engine_from_name`], default first.
pub const ENGINE_NAMES: &[&str] = &["rice", "zstd", "lz4", "passthrough"];

/// Resolve an engine from the `engine_id` stored in a bitstream header.
///
/// Passed to `raw_core::Decoder::open` and `raw_core::decompress_file` so a
/// bitstream can be decoded without knowing which engine wrote it.
pub fn engine_by_id(id: u16) -> anyhow::Result<Arc<dyn Engine>> {
    match id {
        ENGINE_PASSTHROUGH => Ok(Arc::new(PassThroughEngine)),
        ENGINE_RICE => Ok(Arc::new(RiceEngine)),
        ENGINE_ZSTD => Ok(Arc::new(ZstdEngine::default())),
        ENGINE_LZ4 => Ok(Arc::new(Lz4Engine)),
        _ => anyhow::bail!(
            "unknown engine id {}; supported: 0 (passthrough), 1 (rice), 2 (zstd), 3 (lz4)",
            id
        ),
    }
}

/// Resolve an engine from its CLI name. `zstd_level` only applies to zstd.
pub fn engine_from_name(name: &str, zstd_level: i32) -> anyhow::Result<Box<dyn Engine>> {
    match name {
        "rice" | "r" => Ok(Box::new(RiceEngine)),
        "zstd" | "z" => Ok(Box::new(ZstdEngine::new(zstd_level))),
        "lz4" | "l" => Ok(Box::new(Lz4Engine)),
        "passthrough" | "pass" | "none" => Ok(Box::new(PassThroughEngine)),
        other => anyhow::bail!(
            "unknown engine '{}'. Valid options: {}",
            other,
            ENGINE_NAMES.join(", ")
        ),
    }
}

pub(crate) fn samples_to_le_bytes(samples: &[u32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Fill `out` from little-endian u32 words; the byte count must match exactly.
pub(crate) fn le_bytes_into_samples(bytes: &[u8], out: &mut [u32]) -> anyhow::Result<()> {
    if bytes.len() != out.len() * 4 {
        anyhow::bail!(
            "payload decodes to {} bytes but {} samples need {}",
            bytes.len(),
            out.len(),
            out.len() * 4
        );
    }
    for (slot, word) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *slot = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_ids_agree() {
        for name in ENGINE_NAMES {
            let by_name = engine_from_name(name, 3).unwrap();
            assert_eq!(by_name.name(), *name);
            let by_id = engine_by_id(by_name.id()).unwrap();
            assert_eq!(by_id.name(), *name);
        }
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        assert!(engine_by_id(99).is_err());
        let err = engine_from_name("brotli", 3).err().unwrap().to_string();
        assert!(err.contains("unknown engine"), "got: {err}");
    }
}
