/// Core compression abstraction for sample sequences.
///
/// Each `Engine` implementation:
/// - Is identified by a stable numeric `id()` stored in the bitstream frame.
/// - Works on samples of any width up to 32 bits. The width is a property of
///   the raw file, not of the bitstream, so engines never see it.
/// - Produces only the payload. Framing (magic, sample count, width, checksum) is
///   added by [`crate::bitstream::encode`] and stripped by
///   [`crate::bitstream::Decoder`].
pub trait Engine: Send + Sync {
    /// Stable engine ID stored in the frame header.
    fn id(&self) -> u16;

    /// Human-readable engine name for CLI display.
    fn name(&self) -> &'static str;

    /// Encode `samples` into an engine-specific payload.
    fn encode_payload(&self, samples: &[u32]) -> anyhow::Result<Vec<u8>>;

    /// Upper bound on the number of samples `payload` can decode to.
    ///
    /// The decoder rejects a header claiming more before allocating anything.
    fn max_samples(&self, payload: &[u8]) -> u64;

    /// Decode `payload` into `out`, which holds exactly as many slots as the
    /// frame recorded samples. A payload that yields more or fewer samples is
    /// an error.
    fn decode_payload(&self, payload: &[u8], out: &mut [u32]) -> anyhow::Result<()>;
}
