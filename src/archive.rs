//! Archive loading.
//!
//! Validates the archive path, picks a decoder from the extension and turns
//! the archive into the flat entry list the shell navigates. The shell root
//! is the file name without its extension.

use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::error::ShellError;
use crate::io::LocalFileReader;
use crate::zip::ZipExtractor;

/// Container formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Longest suffix first so `.tar.gz` wins over a bare match
    const EXTENSIONS: [(&'static str, ArchiveFormat); 4] = [
        (".tar.gz", ArchiveFormat::TarGz),
        (".tgz", ArchiveFormat::TarGz),
        (".zip", ArchiveFormat::Zip),
        (".tar", ArchiveFormat::Tar),
    ];

    /// Detect the format and derive the root name from a file name.
    ///
    /// Matching is case-insensitive; a name that is only an extension is rejected.
    pub fn detect(file_name: &str) -> Option<(Self, String)> {
        let lower = file_name.to_ascii_lowercase();
        Self::EXTENSIONS.iter().find_map(|(ext, format)| {
            let stem_len = lower.strip_suffix(*ext)?.len();
            (stem_len > 0).then(|| (*format, file_name[..stem_len].to_string()))
        })
    }
}

/// One record of the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full '/'-separated path; directories end with '/'
    pub name: String,
    pub is_directory: bool,
    /// Decoded bytes, `None` for directories
    pub content: Option<Vec<u8>>,
}

impl ArchiveEntry {
    pub fn directory(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if !name.ends_with('/') {
            name.push('/');
        }
        Self {
            name,
            is_directory: true,
            content: None,
        }
    }

    pub fn file(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            content: Some(content.into()),
        }
    }
}

/// A decoded archive: root name plus entries in archive order
#[derive(Debug, Clone)]
pub struct Archive {
    pub path: PathBuf,
    pub format: ArchiveFormat,
    pub root: String,
    pub entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Validate `path` and decode the whole archive.
    ///
    /// Fails with [`ShellError::ArchiveNotFound`] or
    /// [`ShellError::UnsupportedExtension`] before touching the contents.
    pub async fn open(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(ShellError::ArchiveNotFound(path.to_path_buf()).into());
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (format, root) = ArchiveFormat::detect(&file_name)
            .ok_or_else(|| ShellError::UnsupportedExtension(path.to_path_buf()))?;

        let entries = match format {
            ArchiveFormat::Zip => {
                let reader = Arc::new(LocalFileReader::new(path)?);
                ZipExtractor::new(reader).load_entries().await
            }
            ArchiveFormat::Tar => {
                let data = tokio::fs::read(path).await?;
                crate::tar::load_entries(data.as_slice())
            }
            ArchiveFormat::TarGz => {
                let data = tokio::fs::read(path).await?;
                crate::tar::load_entries(GzDecoder::new(data.as_slice()))
            }
        }
        .with_context(|| format!("Failed to read archive {}", path.display()))?;

        log::info!(
            "loaded {} entries from {} ({:?})",
            entries.len(),
            path.display(),
            format
        );
        let prefix = format!("{}/", root);
        if !entries.iter().any(|e| e.name.starts_with(&prefix)) {
            log::warn!("no entry lives under '{}', the root will look empty", prefix);
        }

        Ok(Self {
            path: path.to_path_buf(),
            format,
            root,
            entries: with_implied_directories(entries),
        })
    }
}

/// Insert a directory entry for every ancestor that the archive never
/// recorded, right before the first entry below it, and drop repeated
/// directory markers.
pub fn with_implied_directories(entries: Vec<ArchiveEntry>) -> Vec<ArchiveEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());

    for entry in entries {
        let name = entry.name.trim_end_matches('/');
        for (i, _) in name.match_indices('/') {
            let ancestor = &entry.name[..=i];
            if seen.insert(ancestor.to_string()) {
                log::debug!("synthesizing directory entry {}", ancestor);
                out.push(ArchiveEntry::directory(ancestor));
            }
        }
        if entry.is_directory && !seen.insert(entry.name.clone()) {
            continue;
        }
        out.push(entry);
    }

    out
}
