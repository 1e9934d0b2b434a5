//! Guarded execution of codec bodies.
//!
//! Every read and write goes through `read_guarded` / `write_guarded`: the handle is opened
//! here, handed to the codec, and released when the function returns on any path (including
//! unwinding). OS faults and codec faults are translated into `FsError` exactly once, here.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::error::{CodecResult, Direction};
use crate::FsError;

/// How an existing target is treated when opened for writing.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum WriteMode {
    /// Replace the content.
    #[default]
    Truncate,
    /// Keep the content and write after it.
    Append,
}

/// Opens `path` for writing and runs `encode` against the buffered handle.
///
/// The parent directory must exist. OS faults become `WriteFailure`, codec faults keep their
/// classification (`InvalidData` for values the format cannot hold).
pub fn write_guarded<F>(path: &Path, mode: WriteMode, encode: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> CodecResult<()>,
{
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Truncate => options.write(true).truncate(true),
        WriteMode::Append => options.append(true),
    };
    let file = options
        .open(path)
        .map_err(|e| FsError::write_failure(path, e))?;

    let mut writer = BufWriter::new(file);
    encode(&mut writer).map_err(|e| e.into_fs_error(path, Direction::Write))?;
    writer
        .flush()
        .map_err(|e| FsError::write_failure(path, e))
}

/// Opens `path` for reading and runs `decode` against the buffered handle.
///
/// Absence becomes `NotFound`, other OS faults `ReadFailure`, undecodable content
/// `CorruptFile`.
pub fn read_guarded<T, F>(path: &Path, decode: F) -> Result<T>
where
    F: FnOnce(&mut dyn BufRead) -> CodecResult<T>,
{
    let file = File::open(path).map_err(|e| FsError::read_failure(path, e))?;
    let mut reader = BufReader::new(file);
    decode(&mut reader).map_err(|e| e.into_fs_error(path, Direction::Read))
}

/// Lazily consumed lines of a text file.
///
/// Unlike the guarded calls, the stream keeps its file open between calls to `next`. The
/// handle is released once the last line has been yielded, after the first error, on
/// `close`, or when the stream is dropped, whichever comes first. Lines are trimmed.
#[derive(Debug)]
pub struct LineStream {
    path: PathBuf,
    lines: Option<io::Lines<BufReader<File>>>,
}

impl LineStream {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FsError::read_failure(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: Some(BufReader::new(file).lines()),
        })
    }

    /// Physical path of the file being streamed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.lines.is_none()
    }

    /// Releases the handle. Further calls to `next` return `None`.
    pub fn close(&mut self) {
        self.lines = None;
    }

    fn classify(&self, err: io::Error) -> FsError {
        if err.kind() == io::ErrorKind::InvalidData {
            FsError::CorruptFile {
                path: self.path.clone(),
                cause: anyhow::Error::new(err).context("the file is not valid UTF-8 text"),
            }
        } else {
            FsError::read_failure(&self.path, err)
        }
    }
}

impl Iterator for LineStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;
        match lines.next() {
            Some(Ok(line)) => Some(Ok(line.trim().to_string())),
            Some(Err(err)) => {
                self.close();
                Some(Err(self.classify(err)))
            }
            None => {
                self.close();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use tempdir::TempDir;

    fn setup_test_env() -> TempDir {
        TempDir::new("guarded_test").unwrap()
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let temp_dir = setup_test_env();
        let path = temp_dir.path().join("a.txt");

        write_guarded(&path, WriteMode::Truncate, |w| Ok(w.write_all(b"first")?))?;
        write_guarded(&path, WriteMode::Append, |w| Ok(w.write_all(b" second")?))?;

        let content = read_guarded(&path, |r| {
            let mut s = String::new();
            r.read_to_string(&mut s)?;
            Ok(s)
        })?;
        assert_eq!(content, "first second");

        write_guarded(&path, WriteMode::Truncate, |w| Ok(w.write_all(b"x")?))?;
        assert_eq!(std::fs::read(&path).unwrap(), b"x");

        Ok(())
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let temp_dir = setup_test_env();
        let result = read_guarded(&temp_dir.path().join("missing.json"), |_| Ok(()));
        assert!(matches!(result, Err(FsError::NotFound { .. })));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = setup_test_env();
        let path = temp_dir.path().join("no_such_dir").join("a.txt");
        let result = write_guarded(&path, WriteMode::Truncate, |_| Ok(()));
        assert!(matches!(result, Err(FsError::WriteFailure { .. })));
    }

    #[test]
    fn test_write_to_directory_fails() {
        let temp_dir = setup_test_env();
        let result = write_guarded(temp_dir.path(), WriteMode::Truncate, |_| Ok(()));
        assert!(matches!(result, Err(FsError::WriteFailure { .. })));
    }

    #[test]
    fn test_codec_errors_are_translated() {
        let temp_dir = setup_test_env();
        let path = temp_dir.path().join("a.json");

        let result = write_guarded(&path, WriteMode::Truncate, |_| {
            Err(CodecError::invalid("not serializable"))
        });
        assert!(matches!(result, Err(FsError::InvalidData(_))));

        let result: Result<()> = read_guarded(&path, |_| Err(CodecError::corrupt("truncated")));
        match result {
            Err(FsError::CorruptFile { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_line_stream() -> Result<()> {
        let temp_dir = setup_test_env();
        let path = temp_dir.path().join("lines.txt");
        std::fs::write(&path, "one\n  two  \r\nthree").unwrap();

        let mut stream = LineStream::open(&path)?;
        assert_eq!(stream.path(), path.as_path());
        assert_eq!(stream.next().transpose()?, Some("one".to_string()));
        assert!(!stream.is_closed());

        let rest: Vec<String> = stream.by_ref().collect::<Result<_>>()?;
        assert_eq!(rest, vec!["two", "three"]);
        assert!(stream.is_closed());
        assert!(stream.next().is_none());

        Ok(())
    }

    #[test]
    fn test_line_stream_close() -> Result<()> {
        let temp_dir = setup_test_env();
        let path = temp_dir.path().join("lines.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let mut stream = LineStream::open(&path)?;
        stream.close();
        assert!(stream.is_closed());
        assert!(stream.next().is_none());

        Ok(())
    }

    #[test]
    fn test_line_stream_invalid_utf8() -> Result<()> {
        let temp_dir = setup_test_env();
        let path = temp_dir.path().join("bad.txt");
        std::fs::write(&path, [0x66, 0xff, 0x0a]).unwrap();

        let mut stream = LineStream::open(&path)?;
        assert!(matches!(
            stream.next(),
            Some(Err(FsError::CorruptFile { .. }))
        ));
        assert!(stream.is_closed());

        Ok(())
    }
}
