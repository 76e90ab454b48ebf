/* Copyright (C) 2018 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

use std::path::PathBuf;

/// Returned by [`crate::reader::ByteReader`] when a read or seek runs past the end of the data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected end of data: {needed} bytes needed at offset {offset}, {available} available")]
pub struct ReadError {
    /// Position at which the read was attempted.
    pub offset: usize,
    /// Number of bytes the read required.
    pub needed: usize,
    /// Number of bytes left after `offset`.
    pub available: usize,
}

/// The ways in which a byte buffer fails to be a usable gettext catalog.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum InvalidCatalog {
    /// The data is shorter than the smallest possible catalog.
    #[error("not a gettext catalog: only {len} bytes")]
    TooShort {
        /// Length of the data.
        len: usize,
    },
    /// The first four bytes are neither magic number.
    #[error("not a gettext catalog: bad magic number {magic:#010x}")]
    BadMagic {
        /// The first four bytes, read as a little-endian integer.
        magic: u32,
    },
    /// Only revision 0 of the format is understood.
    #[error("not a gettext catalog: unsupported revision {revision}")]
    UnsupportedRevision {
        /// The revision found in the header.
        revision: u32,
    },
    /// An offset table or a string points outside the data.
    #[error("truncated gettext catalog: {0}")]
    Truncated(#[from] ReadError),
    /// The `Plural-Forms` metadata could not be compiled.
    #[error("invalid Plural-Forms '{rules}': {error}")]
    InvalidPluralForms {
        /// A copy of the plural forms that could not be parsed.
        rules: String,
        /// What the compiler complained about.
        error: String,
    },
}

/// This error type is returned when a [`crate::Catalog`] cannot be built.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The catalog file could not be opened or read.
    #[error("cannot open translation file '{}': {source}", path.display())]
    Io {
        /// The path that was given to the loader.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The data was read but is not a valid catalog.
    #[error(transparent)]
    Format(#[from] InvalidCatalog),
}

impl From<ReadError> for LoadError {
    fn from(error: ReadError) -> Self {
        Self::Format(InvalidCatalog::Truncated(error))
    }
}

/// Errors raised while substituting arguments into a translated template.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The template refers to an argument that was not supplied.
    #[error("placeholder refers to argument {index} but only {supplied} supplied")]
    MissingArgument {
        /// One-based index of the requested argument.
        index: usize,
        /// Number of arguments the caller passed.
        supplied: usize,
    },
    /// A `%` sequence that is not a valid placeholder.
    #[error("invalid placeholder at byte {position}: {reason}")]
    InvalidPlaceholder {
        /// Byte offset of the `%` that starts the placeholder.
        position: usize,
        /// What is wrong with it.
        reason: &'static str,
    },
}
