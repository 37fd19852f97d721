//! Tar decoding on top of the `tar` crate.
//!
//! GNU long names and pax paths are resolved by `tar` itself. Links and
//! special files are skipped.

use std::io::Read;

use ::tar::EntryType;
use anyhow::{Context, Result};

use crate::archive::ArchiveEntry;

/// Read every file and directory of a tar stream, in archive order
pub fn load_entries<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ::tar::Archive::new(reader);
    let mut entries = Vec::new();

    for entry in archive.entries().context("Failed to read tar headers")? {
        let mut entry = entry?;
        let entry_type = entry.header().entry_type();
        let is_directory = match entry_type {
            EntryType::Directory => true,
            EntryType::Regular | EntryType::Continuous => false,
            other => {
                log::debug!("skipping tar entry of type {:?}", other);
                continue;
            }
        };

        let path = entry.path()?.to_string_lossy().into_owned();
        let name = entry_name(&path, is_directory);
        if name.is_empty() || name == "/" {
            continue;
        }

        let content = if is_directory {
            None
        } else {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .with_context(|| format!("Failed to read data of {}", name))?;
            Some(data)
        };
        log::trace!("tar entry: {}", name);
        entries.push(ArchiveEntry {
            name,
            is_directory,
            content,
        });
    }

    Ok(entries)
}

/// Strip `./` prefixes and give directories the trailing slash zip uses
fn entry_name(raw: &str, is_directory: bool) -> String {
    let mut name = raw.replace('\\', "/");
    while let Some(rest) = name.strip_prefix("./") {
        name = rest.to_string();
    }
    if is_directory && !name.ends_with('/') {
        name.push('/');
    }
    name
}
