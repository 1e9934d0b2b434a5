use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EntryType {
    File,
    Directory,
}

/// Metadata snapshot of a file or directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    entry_type: EntryType,
    absolute_path: PathBuf,
    size: u64,
    created: Option<SystemTime>,
    modified: Option<SystemTime>,
    extension: Option<String>,
    file_count: Option<usize>,
}

impl Entry {
    pub(crate) fn file(absolute_path: PathBuf, metadata: &std::fs::Metadata) -> Entry {
        let extension = absolute_path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        Entry {
            entry_type: EntryType::File,
            size: metadata.len(),
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
            extension,
            file_count: None,
            absolute_path,
        }
    }

    pub(crate) fn directory(
        absolute_path: PathBuf,
        metadata: &std::fs::Metadata,
        total_size: u64,
        file_count: usize,
    ) -> Entry {
        Entry {
            entry_type: EntryType::Directory,
            absolute_path,
            size: total_size,
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
            extension: None,
            file_count: Some(file_count),
        }
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// File length, or the summed length of every regular file below a directory.
    /// Symbolic links are not followed.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// `None` where the platform does not record creation time.
    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Extension without the dot. Always `None` for directories.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Number of direct children, hidden ones included. Always `None` for files.
    pub fn file_count(&self) -> Option<usize> {
        self.file_count
    }
}
