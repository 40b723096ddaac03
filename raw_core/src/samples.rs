use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::SampleError;
use crate::width::SampleWidth;

/// Combines one complete big-endian group into a sample.
type GroupDecoder = fn(&[u8]) -> u32;

fn decode_u8(group: &[u8]) -> u32 {
    group[0] as u32
}

fn decode_u16(group: &[u8]) -> u32 {
    u16::from_be_bytes([group[0], group[1]]) as u32
}

fn decode_u32(group: &[u8]) -> u32 {
    u32::from_be_bytes([group[0], group[1], group[2], group[3]])
}

fn group_decoder(width: SampleWidth) -> GroupDecoder {
    match width {
        SampleWidth::One => decode_u8,
        SampleWidth::Two => decode_u16,
        SampleWidth::Four => decode_u32,
    }
}

// ── Reader ─────────────────────────────────────────────────────────────────

/// Split `bytes` into `width`-byte big-endian groups.
///
/// The first byte of every group is the most significant. A trailing group
/// shorter than `width` is dropped, so the result always holds
/// `bytes.len() / width` samples.
pub fn parse_samples(bytes: &[u8], width: SampleWidth) -> Vec<u32> {
    let decode = group_decoder(width);
    let groups = bytes.chunks_exact(width.bytes());
    let dropped = groups.remainder().len();
    if dropped > 0 {
        debug!(dropped, width = width.bytes(), "ignoring incomplete trailing sample");
    }
    groups.map(decode).collect()
}

/// Read every complete sample from `src`.
pub fn read_samples_from<R: Read>(mut src: R, width: SampleWidth) -> Result<Vec<u32>, SampleError> {
    let mut bytes = Vec::new();
    src.read_to_end(&mut bytes)?;
    Ok(parse_samples(&bytes, width))
}

/// Open `path` and read it as a sequence of big-endian samples.
pub fn read_samples(path: impl AsRef<Path>, width: SampleWidth) -> Result<Vec<u32>, SampleError> {
    let path = path.as_ref();
    let samples = read_samples_from(File::open(path)?, width)?;
    debug!(path = %path.display(), samples = samples.len(), width = width.bytes(), "read samples");
    Ok(samples)
}

// ── Writer ─────────────────────────────────────────────────────────────────

/// Serialize `samples` as `width`-byte big-endian groups.
///
/// Each value is split into bytes from least to most significant and emitted
/// most significant first. Any bits left over after `width` bytes mean the
/// value does not fit, which is reported as [`SampleError::SampleOutOfRange`].
pub fn serialize_samples(samples: &[u32], width: SampleWidth) -> Result<Vec<u8>, SampleError> {
    let w = width.bytes();
    let mut out = Vec::with_capacity(samples.len() * w);
    let mut group = [0u8; 4];

    for (index, &value) in samples.iter().enumerate() {
        let mut rest = value as u64;
        for byte in group[..w].iter_mut() {
            *byte = (rest & 0xff) as u8;
            rest >>= 8;
        }
        if rest != 0 {
            return Err(SampleError::SampleOutOfRange {
                index,
                value,
                width: w as u8,
                max: width.max_value(),
            });
        }
        out.extend(group[..w].iter().rev());
    }

    Ok(out)
}

/// Serialize `samples` and write them to `dst`.
pub fn write_samples_to<W: Write>(
    samples: &[u32],
    width: SampleWidth,
    mut dst: W,
) -> Result<(), SampleError> {
    let bytes = serialize_samples(samples, width)?;
    dst.write_all(&bytes)?;
    dst.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `samples` to it.
///
/// The whole buffer is serialized before the file is touched, so a range
/// violation never leaves a partial output behind.
pub fn write_samples(
    samples: &[u32],
    width: SampleWidth,
    path: impl AsRef<Path>,
) -> Result<(), SampleError> {
    let path = path.as_ref();
    let bytes = serialize_samples(samples, width)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    debug!(path = %path.display(), bytes = bytes.len(), width = width.bytes(), "wrote samples");
    Ok(())
}
