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

//! Decoder for binary `.mo` catalogs.
//!
//! ```text
//! offset  0: magic number, 0x950412de in the byte order of the file
//! offset  4: revision, always 0
//! offset  8: N, number of strings
//! offset 12: offset of the table of original strings
//! offset 16: offset of the table of translations
//! ```
//!
//! Each table holds N `(length, offset)` pairs of 32-bit integers. The translation of the
//! empty original string is the catalog header. Plural translations hold their variants
//! separated by NUL bytes, and plural originals are `singular\0plural`.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::error::{InvalidCatalog, ReadError};
use crate::reader::{ByteOrder, ByteReader};

/// The magic number as read from a little-endian catalog.
pub const MAGIC_LITTLE_ENDIAN: u32 = 0x950412de;
/// The magic number of a big-endian catalog, read as little-endian.
pub const MAGIC_BIG_ENDIAN: u32 = 0xde120495;

const MIN_LEN: usize = 10;

/// The content of a catalog: the translations and the raw header block.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MoFile {
    /// Variants keyed by original string. Keys are never empty.
    pub entries: HashMap<String, Box<[String]>>,
    /// The `Key: Value` lines of the catalog header, empty when there is none.
    pub metadata: String,
}

fn decode_string(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        std::borrow::Cow::Borrowed(s) => s.to_owned(),
        std::borrow::Cow::Owned(s) => {
            warn!("Invalid UTF-8 in catalog string, replaced: {:?}", s);
            s
        }
    }
}

fn read_at<'a>(
    reader: &mut ByteReader<'a>,
    length: u32,
    offset: u32,
) -> Result<&'a [u8], ReadError> {
    reader.seek(offset as usize)?;
    reader.read_bytes(length as usize)
}

/// Decodes a whole catalog held in memory.
pub fn decode(data: &[u8]) -> Result<MoFile, InvalidCatalog> {
    if data.len() < MIN_LEN {
        return Err(InvalidCatalog::TooShort { len: data.len() });
    }

    let magic = ByteReader::new(data, ByteOrder::Little).read_u32()?;
    let order = match magic {
        MAGIC_LITTLE_ENDIAN => ByteOrder::Little,
        MAGIC_BIG_ENDIAN => ByteOrder::Big,
        _ => return Err(InvalidCatalog::BadMagic { magic }),
    };

    let mut reader = ByteReader::new(data, order);
    reader.seek(4)?;
    let revision = reader.read_u32()?;
    if revision != 0 {
        return Err(InvalidCatalog::UnsupportedRevision { revision });
    }
    let total = reader.read_u32()? as usize;
    let originals_offset = reader.read_u32()? as usize;
    let translations_offset = reader.read_u32()? as usize;
    debug!(
        "MO catalog: {:?} endian, {} strings, originals at {:#x}, translations at {:#x}",
        order, total, originals_offset, translations_offset
    );

    reader.seek(originals_offset)?;
    let originals = reader.read_u32s(total.saturating_mul(2))?;
    reader.seek(translations_offset)?;
    let translations = reader.read_u32s(total.saturating_mul(2))?;

    let mut mo = MoFile::default();
    let pairs = originals.chunks_exact(2).zip(translations.chunks_exact(2));
    for (index, (original, translation)) in pairs.enumerate() {
        // A zero-length original is the header index; its offset is never read.
        let original = match original[0] {
            0 => &[][..],
            length => read_at(&mut reader, length, original[1])?,
        };
        let (length, offset) = (translation[0], translation[1]);
        if length == 0 {
            trace!("Entry {}: empty translation, skipped", index);
            continue;
        }
        let translation = read_at(&mut reader, length, offset)?;

        if original.is_empty() {
            trace!("Entry {}: catalog header, {} bytes", index, translation.len());
            if !mo.metadata.is_empty() {
                mo.metadata.push('\n');
            }
            mo.metadata.push_str(&decode_string(translation));
            continue;
        }

        let msgid = match original.iter().position(|b| *b == 0) {
            Some(end) => &original[..end],
            None => original,
        };
        if msgid.is_empty() {
            trace!("Entry {}: original starts with NUL, skipped", index);
            continue;
        }
        let variants: Box<[String]> = translation.split(|b| *b == 0).map(decode_string).collect();
        trace!("Entry {}: {} variant(s)", index, variants.len());
        mo.entries.insert(decode_string(msgid), variants);
    }
    Ok(mo)
}
