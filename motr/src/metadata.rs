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

//! The header entry of a catalog: the translation of the empty message id.

use std::collections::HashMap;

/// Parses `Key: Value` lines into a map.
///
/// Lines without a `": "` separator are skipped. Keys are trimmed, values are kept verbatim,
/// and a later occurrence of a key replaces an earlier one.
pub fn parse(block: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    extend(&mut metadata, block);
    metadata
}

/// Same as [`parse`], adding to an existing map.
pub fn extend(metadata: &mut HashMap<String, String>, block: &str) {
    metadata.extend(block.split('\n').filter_map(|line| {
        let (key, value) = line.split_once(": ")?;
        Some((key.trim().to_owned(), value.to_owned()))
    }));
}
