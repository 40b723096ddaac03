use std::io::Read;
use std::sync::Arc;

use tracing::debug;

use crate::engine::Engine;
use crate::frame::{FrameHeader, FRAME_VERSION, HEADER_SIZE};
use crate::width::SampleWidth;

/// Encode `samples` with `engine` and wrap the payload in a frame.
///
/// # Layout written
/// ```text
/// [HEADER: 40 bytes — magic, version, engine id, sample count, payload len, width, checksum]
/// [PAYLOAD: engine-specific]
/// ```
/// The sample count travels in the header, so decoding never relies on
/// guessing where the payload ends. The checksum covers the header fields as
/// well as the payload.
pub fn encode(engine: &dyn Engine, samples: &[u32], width: SampleWidth) -> anyhow::Result<Vec<u8>> {
    let payload = engine.encode_payload(samples)?;
    let mut header = FrameHeader {
        version: FRAME_VERSION,
        engine_id: engine.id(),
        sample_count: samples.len() as u64,
        payload_len: payload.len() as u64,
        sample_width: width,
        checksum: 0,
    };
    header.checksum = header.compute_checksum(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);

    debug!(
        engine = engine.name(),
        samples = samples.len(),
        payload = payload.len(),
        "encoded bitstream"
    );
    Ok(out)
}

/// Decoder for a single framed bitstream.
///
/// # Open sequence
/// 1. Read the 40-byte header (magic, version, engine id, sample count, width).
/// 2. Read exactly `payload_len` payload bytes and verify the checksum.
/// 3. Reject a sample count the engine says the payload cannot hold.
///
/// The caller then sizes a buffer with [`len`](Decoder::len) (or
/// [`alloc_samples`](Decoder::alloc_samples)) and hands it to
/// [`fill`](Decoder::fill).
pub struct Decoder {
    pub header: FrameHeader,
    payload: Vec<u8>,
    engine: Arc<dyn Engine>,
}

impl Decoder {
    /// Build a decoder for a bitstream that is known to use `engine`.
    pub fn new<R: Read>(mut src: R, engine: Arc<dyn Engine>) -> anyhow::Result<Self> {
        let header = FrameHeader::read_from(&mut src)?;
        if header.engine_id != engine.id() {
            anyhow::bail!(
                "engine mismatch: bitstream uses engine {} but provided engine has id {}",
                header.engine_id,
                engine.id()
            );
        }
        Self::with_header(header, src, engine)
    }

    /// Build a decoder, picking the engine from the id stored in the header.
    ///
    /// `resolve` is usually `raw_engines::engine_by_id`.
    pub fn open<R, F>(mut src: R, resolve: F) -> anyhow::Result<Self>
    where
        R: Read,
        F: FnOnce(u16) -> anyhow::Result<Arc<dyn Engine>>,
    {
        let header = FrameHeader::read_from(&mut src)?;
        let engine = resolve(header.engine_id)?;
        Self::with_header(header, src, engine)
    }

    fn with_header<R: Read>(
        header: FrameHeader,
        src: R,
        engine: Arc<dyn Engine>,
    ) -> anyhow::Result<Self> {
        // `take` bounds the read, so a corrupt length cannot force a huge allocation.
        let mut payload = Vec::new();
        src.take(header.payload_len).read_to_end(&mut payload)?;
        if payload.len() as u64 != header.payload_len {
            anyhow::bail!(
                "truncated bitstream: header announces {} payload bytes but only {} are present",
                header.payload_len,
                payload.len()
            );
        }

        let computed = header.compute_checksum(&payload);
        if computed != header.checksum {
            anyhow::bail!(
                "bitstream checksum mismatch: expected {:016x}, got {:016x}",
                header.checksum,
                computed
            );
        }

        let limit = engine.max_samples(&payload);
        if header.sample_count > limit {
            anyhow::bail!(
                "bitstream claims {} samples but its {}-byte {} payload holds at most {}",
                header.sample_count,
                payload.len(),
                engine.name(),
                limit
            );
        }
        usize::try_from(header.sample_count).map_err(|_| {
            anyhow::anyhow!("bitstream holds {} samples, too many for this platform", header.sample_count)
        })?;

        debug!(
            engine = engine.name(),
            samples = header.sample_count,
            payload = payload.len(),
            "opened bitstream"
        );
        Ok(Self {
            header,
            payload,
            engine,
        })
    }

    /// Number of samples the bitstream reconstructs.
    #[inline]
    pub fn len(&self) -> usize {
        self.header.sample_count as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of the raw samples the bitstream was compressed from.
    #[inline]
    pub fn width(&self) -> SampleWidth {
        self.header.sample_width
    }

    /// Name of the engine that produced this bitstream.
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Allocate a zeroed buffer of [`len`](Decoder::len) samples, reporting
    /// allocation failure as an error.
    pub fn alloc_samples(&self) -> anyhow::Result<Vec<u32>> {
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(self.len())
            .map_err(|e| anyhow::anyhow!("cannot allocate {} samples: {}", self.len(), e))?;
        samples.resize(self.len(), 0);
        Ok(samples)
    }

    /// Reconstruct the samples, in order, into `out`.
    ///
    /// `out` must hold exactly [`len`](Decoder::len) slots.
    pub fn fill(&self, out: &mut [u32]) -> anyhow::Result<()> {
        if out.len() != self.len() {
            anyhow::bail!(
                "output buffer holds {} samples but the bitstream has {}",
                out.len(),
                self.len()
            );
        }
        self.engine.decode_payload(&self.payload, out)
    }

    /// Allocate a buffer of the right size and fill it.
    pub fn into_samples(self) -> anyhow::Result<Vec<u32>> {
        let mut samples = self.alloc_samples()?;
        self.fill(&mut samples)?;
        Ok(samples)
    }
}
