//! Existence checks, creation, deletion, listing and metadata.
//!
//! Thin wrappers over `std::fs`. Every path goes through the virtual root first.

use std::cmp::Ordering;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use crate::FsError;
use crate::core::{Result, utils};
use crate::vfs::entry::Entry;
use crate::vfs::fast_fs::FastFS;

impl FastFS {
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.to_host(path)?.exists())
    }

    pub fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.to_host(path)?.is_file())
    }

    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.to_host(path)?.is_dir())
    }

    /// Creates an empty file if nothing exists at `path`. Existing content is kept.
    pub fn touch_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let host = self.to_host(path)?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&host)
            .map(|_| ())
            .map_err(|e| FsError::write_failure(&host, e))
    }

    pub fn delete_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let host = self.to_host(path)?;
        std::fs::remove_file(&host).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FsError::not_found(&host),
            _ => FsError::write_failure(&host, e),
        })
    }

    /// Creates the directory and its missing parents.
    pub fn touch_directory<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let host = self.to_host(path)?;
        std::fs::create_dir_all(&host).map_err(|e| FsError::write_failure(&host, e))
    }

    /// Removes the directory with everything below it.
    pub fn delete_directory<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let host = self.to_host(path)?;
        if !host.is_dir() {
            return Err(FsError::directory_not_found(&host));
        }
        std::fs::remove_dir_all(&host).map_err(|e| FsError::write_failure(&host, e))
    }

    /// Names of the visible entries of a directory, in lexicographic order.
    pub fn ls<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        let mut names = self.ls_all(path)?;
        names.retain(|name| !utils::is_hidden(name));
        Ok(names)
    }

    /// Like `ls`, hidden entries included. Names that are not valid UTF-8 are rejected.
    pub fn ls_all<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
        let host = self.to_host(path)?;
        if !host.is_dir() {
            return Err(FsError::directory_not_found(&host));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&host).map_err(|e| FsError::read_failure(&host, e))? {
            let entry = entry.map_err(|e| FsError::read_failure(&host, e))?;
            let name = entry.file_name().into_string().map_err(|name| {
                FsError::invalid_data(format!(
                    "the entry {} of {} is not valid UTF-8",
                    name.to_string_lossy(),
                    host.display()
                ))
            })?;
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Visible entries ordered by `key`. Entries with equal keys keep their `ls` order.
    pub fn sorted_ls<P, K, F>(&self, path: P, key: F, reverse: bool) -> Result<Vec<String>>
    where
        P: AsRef<Path>,
        K: Ord,
        F: Fn(&str) -> K,
    {
        self.try_sorted_ls(path, |name| Ok(key(name)), reverse)
    }

    /// Like `sorted_ls` with a fallible key. The first key error is returned as is.
    pub fn try_sorted_ls<P, K, F>(&self, path: P, key: F, reverse: bool) -> Result<Vec<String>>
    where
        P: AsRef<Path>,
        K: Ord,
        F: Fn(&str) -> Result<K>,
    {
        let mut keyed = self
            .ls(path)?
            .into_iter()
            .map(|name| Ok((key(&name)?, name)))
            .collect::<Result<Vec<_>>>()?;

        let order = |a: &(K, String), b: &(K, String)| -> Ordering { a.0.cmp(&b.0) };
        if reverse {
            keyed.sort_by(|a, b| order(b, a));
        } else {
            keyed.sort_by(order);
        }
        Ok(keyed.into_iter().map(|(_, name)| name).collect())
    }

    /// Extension of the file name in `path`, without the dot.
    pub fn extension<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        let name = path.as_ref().file_name()?.to_str()?;
        utils::extension_of(name).map(str::to_string)
    }

    pub fn file_info<P: AsRef<Path>>(&self, path: P) -> Result<Entry> {
        let host = self.to_host(path)?;
        let metadata = std::fs::metadata(&host).map_err(|e| FsError::read_failure(&host, e))?;
        if !metadata.is_file() {
            return Err(FsError::not_found(&host));
        }
        let absolute = utils::absolute(&host).map_err(|e| FsError::read_failure(&host, e))?;
        Ok(Entry::file(absolute, &metadata))
    }

    /// Directory metadata. The size is the total of every regular file below it.
    pub fn directory_info<P: AsRef<Path>>(&self, path: P) -> Result<Entry> {
        let host = self.to_host(path)?;
        if !host.is_dir() {
            return Err(FsError::directory_not_found(&host));
        }
        let metadata = std::fs::metadata(&host).map_err(|e| FsError::read_failure(&host, e))?;
        let file_count = std::fs::read_dir(&host)
            .map_err(|e| FsError::read_failure(&host, e))?
            .count();
        let total_size = total_size(&host).map_err(|e| FsError::read_failure(&host, e))?;
        let absolute = utils::absolute(&host).map_err(|e| FsError::read_failure(&host, e))?;
        Ok(Entry::directory(absolute, &metadata, total_size, file_count))
    }
}

/// Summed length of the regular files below `dir`. Symbolic links are skipped.
fn total_size(dir: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            total += total_size(&entry.path())?;
        } else {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}
