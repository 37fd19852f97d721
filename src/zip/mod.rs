//! ZIP archive decoding.
//!
//! - [`structures`]: fixed records of the format (EOCD, ZIP64 records, headers)
//! - [`parser`]: central directory parsing over a [`ReadAt`](crate::io::ReadAt) source
//! - [`extractor`]: entry decompression and conversion to shell entries
//!
//! Supports STORED and DEFLATE entries and ZIP64 central directories.
//! Encrypted entries and multi-disk archives are rejected.

mod extractor;
mod parser;
mod structures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
