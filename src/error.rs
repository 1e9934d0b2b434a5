//! Error types.
//!
//! `FsError` is the only error a caller of the public API ever sees. Codec bodies report
//! failures as `CodecError`; the guarded executor translates them once, attaching the path
//! of the file that was being read or written.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type of every public operation.
#[derive(Debug, Error)]
pub enum FsError {
    /// The file to read does not exist.
    #[error("the file {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// The directory does not exist.
    #[error("the directory {} does not exist", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// OS-level fault while writing.
    #[error("there was an error writing to {}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// OS-level fault while reading (the target exists).
    #[error("there was an error reading from {}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The value does not fit the target format.
    #[error("the provided data does not match the expected format for the file type: {0}")]
    InvalidData(#[source] anyhow::Error),

    /// The file content could not be decoded.
    #[error("the file {} could not be decoded: {cause}", .path.display())]
    CorruptFile {
        path: PathBuf,
        #[source]
        cause: anyhow::Error,
    },

    /// The virtual root configuration file exists but is malformed.
    #[error("the virtual root configuration {} is corrupt: {reason}", .path.display())]
    CorruptConfig { path: PathBuf, reason: String },

    /// Format tag or file extension outside the recognized set.
    #[error("the file type {file_type} is not supported. Supported types: {supported}")]
    UnsupportedFileType { file_type: String, supported: String },

    /// The library backing an optional codec is not available.
    #[error("the {0} library is not available; it is required for the requested format")]
    MissingDependency(&'static str),

    /// Bulk read found two entries resolving to the same name.
    #[error("duplicate files found in {}: {name}. File names should be unique", .path.display())]
    DuplicateFiles { path: PathBuf, name: String },
}

impl FsError {
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn directory_not_found(path: impl AsRef<Path>) -> Self {
        Self::DirectoryNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn write_failure(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::WriteFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Classifies a read-side OS error: absence becomes `NotFound`.
    pub fn read_failure(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::ReadFailure { path, source }
        }
    }

    pub fn invalid_data(explanation: impl Into<String>) -> Self {
        Self::InvalidData(anyhow::Error::msg(explanation.into()))
    }

    pub fn unsupported(file_type: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            file_type: file_type.into(),
            supported: crate::FileType::supported_names(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::DirectoryNotFound { .. })
    }
}

/// Failure reported by a codec body.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The value cannot be encoded in this format.
    #[error("{0}")]
    Invalid(anyhow::Error),

    /// The bytes cannot be decoded in this format.
    #[error("{0}")]
    Corrupt(anyhow::Error),

    #[error("the {0} library is not available")]
    MissingDependency(&'static str),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Direction of the guarded operation a codec error came out of.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum Direction {
    Read,
    Write,
}

impl CodecError {
    pub(crate) fn invalid(explanation: impl Into<String>) -> Self {
        Self::Invalid(anyhow::Error::msg(explanation.into()))
    }

    pub(crate) fn corrupt(explanation: impl Into<String>) -> Self {
        Self::Corrupt(anyhow::Error::msg(explanation.into()))
    }

    /// Translates into the public taxonomy.
    pub(crate) fn into_fs_error(self, path: &Path, direction: Direction) -> FsError {
        match (self, direction) {
            (CodecError::Io(e), Direction::Write) => FsError::write_failure(path, e),
            (CodecError::Io(e), Direction::Read) => FsError::read_failure(path, e),
            (CodecError::Invalid(cause), _) => FsError::InvalidData(cause),
            (CodecError::Corrupt(cause), _) => FsError::CorruptFile {
                path: path.to_path_buf(),
                cause,
            },
            (CodecError::MissingDependency(name), _) => FsError::MissingDependency(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_failure_classifies_absence() {
        let err = FsError::read_failure("a.json", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, FsError::NotFound { .. }));

        let err = FsError::read_failure(
            "a.json",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, FsError::ReadFailure { .. }));
    }

    #[test]
    fn test_codec_io_maps_by_direction() {
        let path = Path::new("x.bin");
        let err = CodecError::from(io::Error::other("disk full"));
        assert!(matches!(
            err.into_fs_error(path, Direction::Write),
            FsError::WriteFailure { .. }
        ));

        let err = CodecError::from(io::Error::other("bad sector"));
        assert!(matches!(
            err.into_fs_error(path, Direction::Read),
            FsError::ReadFailure { .. }
        ));
    }

    #[test]
    fn test_codec_invalid_and_corrupt_keep_cause() {
        let path = Path::new("x.json");
        let err = CodecError::invalid("key must be a string").into_fs_error(path, Direction::Write);
        assert!(err.to_string().contains("key must be a string"));

        let err = CodecError::corrupt("unexpected end").into_fs_error(path, Direction::Read);
        match err {
            FsError::CorruptFile { path, cause } => {
                assert_eq!(path, PathBuf::from("x.json"));
                assert_eq!(cause.to_string(), "unexpected end");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_lists_supported_types() {
        let err = FsError::unsupported(".xyz");
        let msg = err.to_string();
        assert!(msg.contains(".xyz"));
        assert!(msg.contains("JSON"));
        assert!(msg.contains("PICKLE"));
        assert!(msg.contains("YAML"));
    }
}
