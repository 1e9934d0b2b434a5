//! Format-aware file access with a persisted virtual root directory.
//!
//! ### Overview
//!
//! `fastfs-kit` lets a program read and write many serialization formats through one API and
//! transparently redirects relative paths into a configurable "virtual root" directory, so
//! callers never have to prefix their paths by hand.
//!
//! **Key ideas**:
//! - **Virtual root**: `FastFS::initialize("files", true)` persists the root in a `.fastfs`
//!   file; from then on `a.json` is opened as `./files/a.json`. Absolute paths, the
//!   configuration file and paths already under the root are left alone.
//! - **Guarded I/O**: every read and write opens its handle, runs a codec and releases the
//!   handle on every exit path. Failures surface as one typed `FsError`.
//! - **Codecs**: pickle-like binary objects (`bincode`), JSON, CSV, INI, YAML, raw bytes and
//!   text, each behind the `Encoder` / `Decoder` traits.
//! - **Bulk directories**: `bulk_write` stores a collection as `0.json`, `1.json`, ...;
//!   `bulk_read` reads it back in index order.
//!
//! ### Example:
//! ```no_run
//! use fastfs_kit::{BulkReadOptions, FastFS};
//!
//! let mut fs = FastFS::new();
//! fs.initialize("files", true)?;
//!
//! fs.bulk_write("runs", &[10, 20, 30], "json", None)?;
//! let runs: Vec<i32> = fs.bulk_read("runs", BulkReadOptions::new())?.into_values();
//! assert_eq!(runs, [10, 20, 30]);
//! # Ok::<(), fastfs_kit::FsError>(())
//! ```

pub mod codec;
mod core;
mod error;
mod vfs;

pub use codec::{AsFileType, FileType};
pub use crate::core::{PathResolver, Result};
pub use error::{CodecError, CodecResult, FsError};
pub use vfs::{
    BulkContents, BulkReadOptions, CONFIG_FILE_NAME, Entry, EntryType, FastFS, LineStream,
    SortKey, VirtualRoot, VirtualRootConfig, WriteMode, indexed_file_name, read_guarded,
    write_guarded,
};
