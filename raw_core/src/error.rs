use thiserror::Error;

/// Errors raised by the sample reader and writer.
#[derive(Debug, Error)]
pub enum SampleError {
    /// A width outside {1, 2, 4} reached the sample layer.
    #[error("unsupported sample width {0} (expected 1, 2 or 4 bytes)")]
    UnsupportedWidth(u8),
    /// A sample does not fit in the configured width. This means the
    /// bitstream was decompressed with a different width than it was
    /// compressed with.
    #[error("sample {index} has value {value}, above {max}, the largest {width}-byte value")]
    SampleOutOfRange {
        index: usize,
        value: u32,
        width: u8,
        max: u32,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
