pub mod bitstream;
pub mod engine;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod samples;
pub mod width;

pub use bitstream::{encode, Decoder};
pub use engine::Engine;
pub use error::SampleError;
pub use frame::{FrameHeader, HEADER_SIZE, MAGIC};
pub use pipeline::{compress_file, decompress_file, CompressStats, DecompressStats};
pub use samples::{
    parse_samples, read_samples, read_samples_from, serialize_samples, write_samples,
    write_samples_to,
};
pub use width::SampleWidth;
