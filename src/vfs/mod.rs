mod bulk;
mod config;
mod entry;
mod fast_fs;
mod guarded;
mod listing;
mod root;

pub use bulk::{BulkContents, BulkReadOptions, SortKey, indexed_file_name};
pub use config::{CONFIG_FILE_NAME, VirtualRootConfig};
pub use entry::{Entry, EntryType};
pub use fast_fs::FastFS;
pub use guarded::{LineStream, WriteMode, read_guarded, write_guarded};
pub use root::VirtualRoot;
