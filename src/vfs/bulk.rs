//! Indexed directories of same-typed files.
//!
//! `bulk_write` stores the i-th value as `<i>[-<prefix>].<ext>`; `bulk_read` lists the
//! directory, orders the names by a sort key (the index by default) and decodes each file
//! according to its extension.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::FsError;
use crate::codec::{AsFileType, FileType};
use crate::core::{Result, utils};
use crate::vfs::fast_fs::FastFS;

/// Maps a file name to its position in a bulk read.
pub type SortKey = Box<dyn Fn(&str) -> Result<i64>>;

/// Options of `FastFS::bulk_read`.
#[derive(Default)]
pub struct BulkReadOptions {
    skip_unsupported: bool,
    sort_by: Option<SortKey>,
    sort_reverse: bool,
    prefix: Option<String>,
    include_names: bool,
}

impl BulkReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip files whose extension is not recognized instead of failing.
    pub fn skip_unsupported(mut self, skip: bool) -> Self {
        self.skip_unsupported = skip;
        self
    }

    /// Replaces the default index-based sort key.
    pub fn sort_by<F>(mut self, key: F) -> Self
    where
        F: Fn(&str) -> Result<i64> + 'static,
    {
        self.sort_by = Some(Box::new(key));
        self
    }

    pub fn sort_reverse(mut self, reverse: bool) -> Self {
        self.sort_reverse = reverse;
        self
    }

    /// Files are named `<index>-<prefix>.<ext>`; the default key reads the index before
    /// the first `-`.
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Return a name to value mapping instead of a plain sequence.
    pub fn include_names(mut self, include: bool) -> Self {
        self.include_names = include;
        self
    }
}

/// Result of a bulk read, in sort order.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkContents<T> {
    Values(Vec<T>),
    Named(IndexMap<String, T>),
}

impl<T> BulkContents<T> {
    pub fn len(&self) -> usize {
        match self {
            BulkContents::Values(values) => values.len(),
            BulkContents::Named(named) => named.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The decoded values, dropping names if any.
    pub fn into_values(self) -> Vec<T> {
        match self {
            BulkContents::Values(values) => values,
            BulkContents::Named(named) => named.into_values().collect(),
        }
    }
}

/// `<index>.<ext>`, or `<index>-<prefix>.<ext>` with a prefix.
pub fn indexed_file_name(index: usize, prefix: Option<&str>, file_type: FileType) -> String {
    match prefix {
        Some(prefix) => format!("{index}-{prefix}.{}", file_type.extension()),
        None => format!("{index}.{}", file_type.extension()),
    }
}

/// Index encoded in a bulk file name.
fn default_sort_key(name: &str, prefix: Option<&str>) -> Result<i64> {
    let index = match prefix {
        Some(_) => name.split_once('-').map_or(name, |(index, _)| index),
        None => utils::strip_extension(name),
    };
    index.parse::<i64>().map_err(|e| {
        FsError::InvalidData(
            anyhow::Error::new(e).context(format!("cannot derive an index from the file name {name}")),
        )
    })
}

fn ensure_unique(dir: &Path, names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(FsError::DuplicateFiles {
                path: dir.to_path_buf(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

impl FastFS {
    /// Writes `values` into `dir` (created when missing), one file per value, in order.
    ///
    /// `data_type` is a `FileType` or a tag name matched case-insensitively.
    pub fn bulk_write<P, T, F>(
        &self,
        dir: P,
        values: &[T],
        data_type: F,
        prefix: Option<&str>,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        T: Serialize,
        F: AsFileType,
    {
        let dir = dir.as_ref();
        let file_type = data_type.as_file_type()?;
        file_type.ensure_available()?;

        self.touch_directory(dir)?;
        debug!(
            directory = %dir.display(),
            count = values.len(),
            file_type = %file_type,
            "bulk write"
        );
        for (index, value) in values.iter().enumerate() {
            let name = indexed_file_name(index, prefix, file_type);
            self.write_as(dir.join(name), file_type, value)?;
        }
        Ok(())
    }

    /// Reads every visible file of `dir` back, ordered by the sort key.
    pub fn bulk_read<P, T>(&self, dir: P, options: BulkReadOptions) -> Result<BulkContents<T>>
    where
        P: AsRef<Path>,
        T: DeserializeOwned,
    {
        let dir = dir.as_ref();
        let names = match &options.sort_by {
            Some(key) => self.try_sorted_ls(dir, |name| key(name), options.sort_reverse)?,
            None => {
                let prefix = options.prefix.as_deref();
                self.try_sorted_ls(
                    dir,
                    |name| default_sort_key(name, prefix),
                    options.sort_reverse,
                )?
            }
        };
        ensure_unique(dir, &names)?;
        debug!(directory = %dir.display(), count = names.len(), "bulk read");

        let mut named = IndexMap::with_capacity(names.len());
        for name in names {
            let extension = utils::extension_of(&name);
            let Some(file_type) = extension.and_then(FileType::from_extension) else {
                if options.skip_unsupported {
                    warn!(file = %name, "skipping file of unsupported type");
                    continue;
                }
                let offending = extension.map_or_else(|| name.clone(), |ext| format!(".{ext}"));
                return Err(FsError::unsupported(offending));
            };
            let value = self.read_as(dir.join(&name), file_type)?;
            named.insert(name, value);
        }

        if options.include_names {
            Ok(BulkContents::Named(named))
        } else {
            Ok(BulkContents::Values(named.into_values().collect()))
        }
    }
}
