use std::io::{BufRead, Write};

use super::{Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

pub(crate) const LIBRARY: &str = "hdf5";

/// Placeholder for HDF5 files.
///
/// The HDF5 bindings need the native library at build time, so they are not linked in.
/// Every call fails with `MissingDependency`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Hdf5Codec;

impl<T: ?Sized> Encoder<T> for Hdf5Codec {
    fn encode(&self, _writer: &mut dyn Write, _value: &T) -> CodecResult<()> {
        Err(CodecError::MissingDependency(LIBRARY))
    }
}

impl<T> Decoder<T> for Hdf5Codec {
    fn decode(&self, _reader: &mut dyn BufRead) -> CodecResult<T> {
        Err(CodecError::MissingDependency(LIBRARY))
    }
}
