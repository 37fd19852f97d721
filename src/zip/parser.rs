//! Central directory parser.
//!
//! The archive is read from its tail: the End of Central Directory record
//! (or its ZIP64 counterpart) locates the central directory, which lists
//! every entry with its name, sizes and local header offset. Entry data is
//! only touched when the caller asks for it, see [`ZipExtractor`](super::ZipExtractor).

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Extra field header id carrying 64-bit sizes and offsets.
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Reads ZIP structures from any [`ReadAt`] source.
pub struct ZipParser<R: ReadAt> {
    reader: Arc<R>,
    size: u64,
}

/// Where the central directory lives and how many records it holds.
struct CentralDirectory {
    offset: u64,
    size: u64,
    entries: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find the End of Central Directory record and its offset.
    ///
    /// Archives without a comment keep the record in the last 22 bytes, so
    /// that spot is tried before scanning backwards through a possible
    /// comment.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        let record_size = EndOfCentralDirectory::SIZE as u64;
        if self.size < record_size {
            bail!("Not a valid ZIP file: {} bytes is too small", self.size);
        }

        let offset = self.size - record_size;
        let mut tail = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader.read_exact_at(offset, &mut tail).await?;
        if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && tail[20..22] == [0, 0] {
            return Ok((EndOfCentralDirectory::from_bytes(&tail)?, offset));
        }

        let window = (MAX_COMMENT_SIZE + record_size).min(self.size);
        let window_start = self.size - window;
        let mut buf = vec![0u8; window as usize];
        self.reader.read_exact_at(window_start, &mut buf).await?;

        let last_candidate = buf.len() - EndOfCentralDirectory::SIZE;
        for i in (0..=last_candidate).rev() {
            if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
                continue;
            }
            // The comment must run exactly to the end of the file
            let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
            if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                let eocd =
                    EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
                return Ok((eocd, window_start + i as u64));
            }
        }

        bail!("Not a valid ZIP file: end of central directory not found")
    }

    /// Read the ZIP64 End of Central Directory through the locator that
    /// sits right before the regular record.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .context("Invalid ZIP64 format: no room for the locator")?;
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;
        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;
        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    async fn central_directory(&self) -> Result<CentralDirectory> {
        let (eocd, eocd_offset) = self.find_eocd().await?;
        if eocd.is_multi_disk() {
            bail!("Multi-disk ZIP archives are not supported");
        }
        let cd = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            CentralDirectory {
                offset: eocd64.cd_offset,
                size: eocd64.cd_size,
                entries: eocd64.total_entries,
            }
        } else {
            CentralDirectory {
                offset: eocd.cd_offset as u64,
                size: eocd.cd_size as u64,
                entries: eocd.total_entries as u64,
            }
        };

        if cd.offset.saturating_add(cd.size) > self.size {
            bail!(
                "Central directory ({} bytes at {}) runs past the end of the archive",
                cd.size,
                cd.offset
            );
        }
        Ok(cd)
    }

    /// List every entry recorded in the central directory, in stored order.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let cd = self.central_directory().await?;

        let mut cd_data = vec![0u8; cd.size as usize];
        self.reader.read_exact_at(cd.offset, &mut cd_data).await?;

        let mut cursor = Cursor::new(cd_data.as_slice());
        let mut entries = Vec::with_capacity(cd.entries.min(u16::MAX as u64) as usize);
        for index in 0..cd.entries {
            let entry = parse_cdfh(&mut cursor)
                .with_context(|| format!("Failed to read central directory record {}", index))?;
            log::trace!("zip entry {}: {}", index, entry.file_name);
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Offset of an entry's data, just past its local header.
    ///
    /// The local header repeats the name and may carry a different extra
    /// field than the central directory, so its lengths are read again.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header for {}", entry.file_name);
        }

        let mut cursor = Cursor::new(&lfh_buf[26..]);
        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}

/// Parse one Central Directory File Header.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        bail!("Invalid Central Directory File Header");
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes)?;
    // Some Windows tools store backslash separators
    let file_name = String::from_utf8_lossy(&file_name_bytes).replace('\\', "/");
    let is_directory = file_name.ends_with('/');

    let extra_field_end = cursor.position() + extra_field_length as u64;
    while cursor.position() + 4 <= extra_field_end {
        let header_id = cursor.read_u16::<LittleEndian>()?;
        let field_size = cursor.read_u16::<LittleEndian>()? as u64;
        let field_end = cursor.position() + field_size;

        if header_id == ZIP64_EXTRA_ID {
            // Values only appear for header fields saturated at 0xFFFFFFFF, in this order
            if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                uncompressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                compressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                lfh_offset = cursor.read_u64::<LittleEndian>()?;
            }
        }
        cursor.set_position(field_end);
    }
    cursor.set_position(extra_field_end + file_comment_length as u64);

    Ok(ZipFileEntry {
        file_name,
        flags,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size,
        uncompressed_size,
        crc32,
        lfh_offset,
        is_directory,
    })
}
