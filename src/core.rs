use std::path::{Path, PathBuf};

use crate::FsError;

pub type Result<T> = std::result::Result<T, FsError>;

/// Maps a logical (caller supplied) path to the physical path that is actually opened.
pub trait PathResolver {
    fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf>;
}

pub(crate) mod utils {
    use std::path::{Component, Path, PathBuf};

    /// Removes `.` components and folds `..` into its parent, without touching the disk.
    pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut result = PathBuf::new();
        for component in path.as_ref().components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if let Some(parent) = result.parent() {
                        result = parent.to_path_buf();
                    }
                }
                _ => result.push(component),
            }
        }
        result
    }

    /// Hidden entries start with a dot.
    pub fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }

    /// Extension without the leading dot, if any.
    pub fn extension_of(name: &str) -> Option<&str> {
        Path::new(name).extension().and_then(|ext| ext.to_str())
    }

    /// File name with its last extension removed. Names without an extension are returned as is.
    pub fn strip_extension(name: &str) -> &str {
        match extension_of(name) {
            Some(ext) => &name[..name.len() - ext.len() - 1],
            None => name,
        }
    }

    /// Absolute form of `path`, resolved against the process working directory when relative.
    pub fn absolute<P: AsRef<Path>>(path: P) -> std::io::Result<PathBuf> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return std::env::current_dir();
        }
        Ok(normalize(std::path::absolute(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize("/a/b/c/"), PathBuf::from("/a/b/c"));
        assert_eq!(normalize("/a/b/./c"), PathBuf::from("/a/b/c"));
        assert_eq!(normalize("/a/b/../c"), PathBuf::from("/a/c"));
        assert_eq!(normalize("/"), PathBuf::from("/"));
        assert_eq!(normalize("./files/a"), PathBuf::from("files/a"));
        assert_eq!(normalize(""), PathBuf::from(""));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("12.json"), "12");
        assert_eq!(strip_extension("3-run.pkl"), "3-run");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("README"), "README");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("0.json"), Some("json"));
        assert_eq!(extension_of("0"), None);
        assert_eq!(extension_of(".hidden"), None);
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".fastfs"));
        assert!(!is_hidden("0.json"));
    }
}
