use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::archive::ArchiveEntry;
use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

const MAX_DEFLATE_RATIO: u64 = 1032;

/// Decodes entries of a ZIP archive into memory
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Decompress one entry and verify its checksum
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("{}: encrypted entries are not supported", entry.file_name);
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        let archive_size = self.parser.reader().size();
        if data_offset
            .checked_add(entry.compressed_size)
            .is_none_or(|end| end > archive_size)
        {
            bail!(
                "{}: {} bytes of data at {} run past the end of the archive ({} bytes)",
                entry.file_name,
                entry.compressed_size,
                data_offset,
                archive_size
            );
        }
        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await
            .with_context(|| format!("Failed to read data of {}", entry.file_name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                // DEFLATE expands at most 1032:1
                let hint = entry
                    .uncompressed_size
                    .min(entry.compressed_size.saturating_mul(MAX_DEFLATE_RATIO));
                let mut out = Vec::with_capacity(hint as usize);
                DeflateDecoder::new(raw.as_slice())
                    .read_to_end(&mut out)
                    .with_context(|| format!("Failed to inflate {}", entry.file_name))?;
                out
            }
            CompressionMethod::Unknown(method) => bail!(
                "{}: unsupported compression method {} (only STORED and DEFLATE are supported)",
                entry.file_name,
                method
            ),
        };

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!(
                "{}: CRC mismatch (expected {:08x}, got {:08x})",
                entry.file_name,
                entry.crc32,
                crc.sum()
            );
        }

        Ok(data)
    }

    /// Decode the whole archive into shell entries, file contents included
    pub async fn load_entries(&self) -> Result<Vec<ArchiveEntry>> {
        let files = self.list_files().await?;
        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            let content = if file.is_directory {
                None
            } else {
                Some(self.extract_to_memory(file).await?)
            };
            entries.push(ArchiveEntry {
                name: file.file_name.clone(),
                is_directory: file.is_directory,
                content,
            });
        }
        Ok(entries)
    }
}
