use raw_core::frame::ENGINE_RICE;
use raw_core::Engine;

use crate::bits::{BitReader, BitWriter};

/// Samples sharing one Rice parameter.
const BLOCK_LEN: usize = 64;
/// Bits used to store each block's Rice parameter.
const K_BITS: u32 = 6;
/// A zig-zagged delta between two u32 samples fits in 33 bits.
const RAW_BITS: u32 = 33;
const MAX_K: u32 = RAW_BITS;
/// Quotients at or above this are escaped and stored raw.
const ESCAPE_Q: u32 = 24;

/// Adaptive Golomb-Rice engine.
///
/// Each sample is replaced by its difference from the previous one (the first
/// against zero), zig-zag mapped to an unsigned value, and Rice coded. The
/// Rice parameter `k` is picked per block of 64 samples by exact bit cost and
/// stored in 6 bits ahead of the block. A value whose quotient reaches 24 is
/// written as 24 one bits followed by the 33-bit value, which bounds the
/// worst case on noisy input.
///
/// Best for: slowly varying audio and sensor signals.
pub struct RiceEngine;

#[inline]
fn zigzag(d: i64) -> u64 {
    ((d << 1) ^ (d >> 63)) as u64
}

#[inline]
fn unzigzag(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

#[inline]
fn code_len(v: u64, k: u32) -> u64 {
    let q = v >> k;
    if q >= ESCAPE_Q as u64 {
        (ESCAPE_Q + RAW_BITS) as u64
    } else {
        q + 1 + k as u64
    }
}

fn best_k(block: &[u64]) -> u32 {
    (0..=MAX_K)
        .min_by_key(|&k| block.iter().map(|&v| code_len(v, k)).sum::<u64>())
        .unwrap_or(0)
}

fn residuals(samples: &[u32]) -> Vec<u64> {
    let mut prev = 0i64;
    samples
        .iter()
        .map(|&s| {
            let cur = s as i64;
            let r = zigzag(cur - prev);
            prev = cur;
            r
        })
        .collect()
}

impl Engine for RiceEngine {
    fn id(&self) -> u16 {
        ENGINE_RICE
    }

    fn name(&self) -> &'static str {
        "rice"
    }

    fn encode_payload(&self, samples: &[u32]) -> anyhow::Result<Vec<u8>> {
        let residuals = residuals(samples);
        let mut bw = BitWriter::with_capacity(samples.len());

        for block in residuals.chunks(BLOCK_LEN) {
            let k = best_k(block);
            bw.write_bits(k as u64, K_BITS);
            for &v in block {
                let q = v >> k;
                if q >= ESCAPE_Q as u64 {
                    bw.write_ones(ESCAPE_Q);
                    bw.write_bits(v, RAW_BITS);
                } else {
                    bw.write_ones(q as u32);
                    bw.write_bit(false);
                    bw.write_bits(v, k);
                }
            }
        }

        Ok(bw.finish())
    }

    fn max_samples(&self, payload: &[u8]) -> u64 {
        // Every sample costs at least one bit.
        payload.len() as u64 * 8
    }

    fn decode_payload(&self, payload: &[u8], out: &mut [u32]) -> anyhow::Result<()> {
        let mut br = BitReader::new(payload);
        let mut prev = 0i64;

        for block in out.chunks_mut(BLOCK_LEN) {
            let k = br.read_bits(K_BITS)? as u32;
            if k > MAX_K {
                anyhow::bail!("rice payload has invalid parameter k={}", k);
            }
            for slot in block.iter_mut() {
                let q = br.read_ones(ESCAPE_Q)?;
                let v = if q == ESCAPE_Q {
                    br.read_bits(RAW_BITS)?
                } else {
                    ((q as u64) << k) | br.read_bits(k)?
                };
                let cur = prev + unzigzag(v);
                *slot = u32::try_from(cur)
                    .map_err(|_| anyhow::anyhow!("rice payload decodes to out-of-range sample {}", cur))?;
                prev = cur;
            }
        }

        // Only zero padding of the final byte may remain.
        if br.remaining_bits() >= 8 {
            anyhow::bail!(
                "rice payload has {} undecoded bits after {} samples",
                br.remaining_bits(),
                out.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_covers_full_u32_delta_range() {
        for d in [0i64, 1, -1, 1234, -1234, u32::MAX as i64, -(u32::MAX as i64)] {
            let v = zigzag(d);
            assert!(v < 1u64 << RAW_BITS, "delta {d} needs more than {RAW_BITS} bits");
            assert_eq!(unzigzag(v), d);
        }
    }

    #[test]
    fn test_smooth_signal_compresses() {
        let samples: Vec<u32> = (0..4096u32).map(|i| 30_000 + (i % 200)).collect();
        let payload = RiceEngine.encode_payload(&samples).unwrap();
        assert!(
            payload.len() < samples.len(),
            "slow ramp should cost under one byte per sample, got {} bytes",
            payload.len()
        );

        let mut out = vec![0u32; samples.len()];
        RiceEngine.decode_payload(&payload, &mut out).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn test_extreme_jumps_use_escape() {
        let samples = vec![0, u32::MAX, 0, u32::MAX, 7, 1 << 31];
        let payload = RiceEngine.encode_payload(&samples).unwrap();
        let mut out = vec![0u32; samples.len()];
        RiceEngine.decode_payload(&payload, &mut out).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn test_count_mismatch_is_an_error() {
        let samples: Vec<u32> = (0..200).collect();
        let payload = RiceEngine.encode_payload(&samples).unwrap();

        let mut too_many = vec![0u32; 400];
        assert!(RiceEngine.decode_payload(&payload, &mut too_many).is_err());

        let mut too_few = vec![0u32; 10];
        assert!(RiceEngine.decode_payload(&payload, &mut too_few).is_err());
    }
}
