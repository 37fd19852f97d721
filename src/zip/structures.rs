//! Fixed-layout ZIP records. All fields are little-endian.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use anyhow::{Result, bail};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// Check length and signature, returning a cursor over the fields after it
fn record_body<'a>(
    data: &'a [u8],
    signature: &[u8],
    min_size: usize,
    what: &str,
) -> Result<Cursor<&'a [u8]>> {
    if data.len() < min_size {
        bail!("Invalid {}: {} bytes, need {}", what, data.len(), min_size);
    }
    if &data[..4] != signature {
        bail!("Invalid {}: bad signature", what);
    }
    Ok(Cursor::new(&data[4..]))
}

/// End of Central Directory (EOCD), 22 bytes plus comment
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut c = record_body(data, Self::SIGNATURE, Self::SIZE, "End of Central Directory")?;
        Ok(Self {
            disk_number: c.read_u16::<LittleEndian>()?,
            disk_with_cd: c.read_u16::<LittleEndian>()?,
            disk_entries: c.read_u16::<LittleEndian>()?,
            total_entries: c.read_u16::<LittleEndian>()?,
            cd_size: c.read_u32::<LittleEndian>()?,
            cd_offset: c.read_u32::<LittleEndian>()?,
            comment_len: c.read_u16::<LittleEndian>()?,
        })
    }

    /// Saturated counts or offsets defer to the ZIP64 record
    pub fn is_zip64(&self) -> bool {
        self.disk_entries == u16::MAX
            || self.total_entries == u16::MAX
            || self.cd_size == u32::MAX
            || self.cd_offset == u32::MAX
    }

    pub fn is_multi_disk(&self) -> bool {
        self.disk_number != 0 || self.disk_with_cd != 0
    }
}

/// ZIP64 End of Central Directory Locator, 20 bytes
pub struct Zip64EOCDLocator {
    pub disk_with_eocd64: u32,
    pub eocd64_offset: u64,
    pub total_disks: u32,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut c = record_body(data, Self::SIGNATURE, Self::SIZE, "ZIP64 locator")?;
        Ok(Self {
            disk_with_eocd64: c.read_u32::<LittleEndian>()?,
            eocd64_offset: c.read_u64::<LittleEndian>()?,
            total_disks: c.read_u32::<LittleEndian>()?,
        })
    }
}

/// ZIP64 End of Central Directory, 56 bytes plus extensible data
pub struct Zip64EOCD {
    pub eocd64_size: u64,
    pub version_made_by: u16,
    pub version_needed: u16,
    pub disk_number: u32,
    pub disk_with_cd: u32,
    pub disk_entries: u64,
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut c = record_body(
            data,
            Self::SIGNATURE,
            Self::MIN_SIZE,
            "ZIP64 End of Central Directory",
        )?;
        Ok(Self {
            eocd64_size: c.read_u64::<LittleEndian>()?,
            version_made_by: c.read_u16::<LittleEndian>()?,
            version_needed: c.read_u16::<LittleEndian>()?,
            disk_number: c.read_u32::<LittleEndian>()?,
            disk_with_cd: c.read_u32::<LittleEndian>()?,
            disk_entries: c.read_u64::<LittleEndian>()?,
            total_entries: c.read_u64::<LittleEndian>()?,
            cd_size: c.read_u64::<LittleEndian>()?,
            cd_offset: c.read_u64::<LittleEndian>()?,
        })
    }
}

/// Central Directory File Header, 46 bytes plus variable fields
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// Local File Header, 30 bytes plus variable fields
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// General purpose flag bit marking an encrypted entry
pub const FLAG_ENCRYPTED: u16 = 0x0001;

/// Parsed ZIP file entry information
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub lfh_offset: u64,
    pub is_directory: bool,
}

impl ZipFileEntry {
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }
}
