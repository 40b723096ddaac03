use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::bitstream::{encode, Decoder};
use crate::engine::Engine;
use crate::samples::{read_samples, write_samples};
use crate::width::SampleWidth;

/// Summary of a finished compress run.
#[derive(Debug, Clone)]
pub struct CompressStats {
    pub samples: usize,
    /// Size of the raw input file, including any dropped trailing bytes.
    pub raw_bytes: u64,
    /// Size of the written bitstream, header included.
    pub compressed_bytes: u64,
}

impl CompressStats {
    /// Compression ratio (raw / compressed).
    pub fn ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            return 1.0;
        }
        self.raw_bytes as f64 / self.compressed_bytes as f64
    }
}

/// Summary of a finished decompress run.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    pub engine: &'static str,
    pub samples: usize,
    pub compressed_bytes: u64,
    pub raw_bytes: u64,
}

impl DecompressStats {
    /// Compression ratio (raw / compressed).
    pub fn ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            return 1.0;
        }
        self.raw_bytes as f64 / self.compressed_bytes as f64
    }
}

/// Read `input` as `width`-byte big-endian samples, encode them with
/// `engine`, and write the bitstream to `output` in a single write.
pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    width: SampleWidth,
    engine: &dyn Engine,
) -> anyhow::Result<CompressStats> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let raw_bytes = fs::metadata(input)
        .with_context(|| format!("opening input file {:?}", input))?
        .len();
    let samples = read_samples(input, width)
        .with_context(|| format!("reading samples from {:?}", input))?;

    let bitstream = encode(engine, &samples, width)?;
    fs::write(output, &bitstream).with_context(|| format!("writing output file {:?}", output))?;

    let stats = CompressStats {
        samples: samples.len(),
        raw_bytes,
        compressed_bytes: bitstream.len() as u64,
    };
    info!(
        engine = engine.name(),
        width = width.bytes(),
        samples = stats.samples,
        raw = stats.raw_bytes,
        compressed = stats.compressed_bytes,
        "compressed"
    );
    Ok(stats)
}

/// Decode the bitstream in `input` and write the samples to `output` as
/// `width`-byte big-endian groups.
///
/// `width` must match the width recorded when the bitstream was written.
///
/// The engine is picked from the bitstream header through `resolve`.
pub fn decompress_file<F>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    width: SampleWidth,
    resolve: F,
) -> anyhow::Result<DecompressStats>
where
    F: FnOnce(u16) -> anyhow::Result<Arc<dyn Engine>>,
{
    let (input, output) = (input.as_ref(), output.as_ref());

    // The file handle is consumed while opening the decoder.
    let file = File::open(input).with_context(|| format!("opening input file {:?}", input))?;
    let compressed_bytes = file.metadata()?.len();
    let decoder = Decoder::open(BufReader::new(file), resolve)
        .with_context(|| format!("decoding bitstream {:?}", input))?;
    if decoder.width() != width {
        anyhow::bail!(
            "sample width mismatch: {:?} holds {}-byte samples but {}-byte output was requested",
            input,
            decoder.width(),
            width
        );
    }
    let engine = decoder.engine_name();
    let mut samples = decoder.alloc_samples()?;
    decoder.fill(&mut samples)?;

    write_samples(&samples, width, output)
        .with_context(|| format!("writing reconstructed samples to {:?}", output))?;

    let stats = DecompressStats {
        engine,
        samples: samples.len(),
        compressed_bytes,
        raw_bytes: (samples.len() * width.bytes()) as u64,
    };
    info!(
        engine,
        width = width.bytes(),
        samples = stats.samples,
        raw = stats.raw_bytes,
        "decompressed"
    );
    Ok(stats)
}
