//! Read-only queries over the flat entry list.
//!
//! Archives only expose names, so every answer is a prefix scan over all
//! entries. Nothing is cached between queries.

use crate::archive::ArchiveEntry;

/// Result of looking a path up as a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    File(&'a ArchiveEntry),
    Directory,
    Missing,
}

#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    entries: Vec<ArchiveEntry>,
}

/// Characters allowed in a listed child name
fn is_listable(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.')
}

impl EntryIndex {
    pub fn new(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Whether a directory entry lives at or below `path`.
    pub fn directory_exists(&self, path: &str) -> bool {
        let prefix = format!("{}/", path);
        self.entries
            .iter()
            .any(|e| e.is_directory && e.name.starts_with(&prefix))
    }

    /// Names directly under `path`, deduplicated in order of first discovery.
    ///
    /// An entry counts when its name is `path/` followed by exactly one
    /// segment, optionally ending in a slash. Segments made of anything other
    /// than ASCII letters, digits and dots are not listed.
    pub fn list_children(&self, path: &str) -> Vec<&str> {
        let prefix = format!("{}/", path);
        let mut children: Vec<&str> = Vec::new();
        for entry in &self.entries {
            let Some(rest) = entry.name.strip_prefix(&prefix) else {
                continue;
            };
            let segment = rest.strip_suffix('/').unwrap_or(rest);
            if is_listable(segment) && !children.contains(&segment) {
                children.push(segment);
            }
        }
        children
    }

    /// Find the entry named exactly `path`, ignoring a directory's trailing slash.
    pub fn resolve_file(&self, path: &str) -> Lookup<'_> {
        match self
            .entries
            .iter()
            .find(|e| e.name.strip_suffix('/').unwrap_or(&e.name) == path)
        {
            Some(entry) if entry.is_directory => Lookup::Directory,
            Some(entry) => Lookup::File(entry),
            None => Lookup::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> EntryIndex {
        EntryIndex::new(vec![
            ArchiveEntry::directory("root/"),
            ArchiveEntry::directory("root/subDir1/"),
            ArchiveEntry::file("root/subDir1/text1.txt", "first"),
            ArchiveEntry::file("root/file.txt", "top"),
            ArchiveEntry::file("root/my_notes.txt", "hidden from ls"),
        ])
    }

    #[test]
    fn directory_exists_needs_a_directory_entry() {
        let index = index();
        assert!(index.directory_exists("root"));
        assert!(index.directory_exists("root/subDir1"));
        assert!(!index.directory_exists("root/file.txt"));
        assert!(!index.directory_exists("root/sub"));
        assert!(!index.directory_exists("other"));
    }

    #[test]
    fn lists_direct_children_in_discovery_order() {
        let index = index();
        assert_eq!(index.list_children("root"), ["subDir1", "file.txt"]);
        assert_eq!(index.list_children("root/subDir1"), ["text1.txt"]);
        assert!(index.list_children("root/file.txt").is_empty());
    }

    #[test]
    fn listing_deduplicates_markers() {
        let index = EntryIndex::new(vec![
            ArchiveEntry::file("root/a", "file without extension"),
            ArchiveEntry::directory("root/a/"),
        ]);
        assert_eq!(index.list_children("root"), ["a"]);
    }

    #[test]
    fn resolve_file_is_three_way() {
        let index = index();
        assert!(matches!(
            index.resolve_file("root/subDir1/text1.txt"),
            Lookup::File(entry) if entry.content.as_deref() == Some(&b"first"[..])
        ));
        assert_eq!(index.resolve_file("root/subDir1"), Lookup::Directory);
        assert_eq!(index.resolve_file("root/nope.txt"), Lookup::Missing);
    }

    #[test]
    fn empty_index_knows_nothing() {
        let index = EntryIndex::default();
        assert!(!index.directory_exists("root"));
        assert!(index.list_children("root").is_empty());
        assert_eq!(index.resolve_file("root/x"), Lookup::Missing);
    }
}
