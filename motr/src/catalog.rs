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

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::error::{InvalidCatalog, LoadError};
use crate::mo_file::{self, MoFile};
use crate::metadata;
use crate::plural::PluralForms;

/// Use this type to load `.mo` files in your application for translations.
///
/// Construct the `Catalog` from either a path via [`Self::from_path`] or the file contents via
/// [`Self::from_bytes`] / [`Self::from_vec_u8`].
///
/// `Catalog` implements the [`crate::Translator`] trait. It is never modified after it is built,
/// so it can be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Option<String>,
    /// Variants indexed by message id: index 0 is the singular, then the plural forms.
    entries: HashMap<String, Box<[String]>>,
    metadata: HashMap<String, String>,
    plural_forms: PluralForms,
}

impl Catalog {
    /// Constructs a `Catalog` from the `.mo` file at the given path.
    ///
    /// A file that cannot be opened or read gives [`LoadError::Io`]; a file that is not a valid
    /// catalog gives [`LoadError::Format`].
    pub fn from_path(path: impl AsRef<Path>, locale: Option<String>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let io_error = |source| LoadError::Io {
            path: path.to_owned(),
            source,
        };
        let data = {
            let mut file = std::fs::File::open(path).map_err(io_error)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data).map_err(io_error)?;
            data
        };
        Self::from_bytes(&data, locale)
    }

    /// Constructs a `Catalog` from the given raw vec u8 that must be valid `.mo` file contents.
    pub fn from_vec_u8(data: Vec<u8>, locale: Option<String>) -> Result<Self, LoadError> {
        Self::from_bytes(&data, locale)
    }

    /// Constructs a `Catalog` from `.mo` file contents.
    pub fn from_bytes(data: &[u8], locale: Option<String>) -> Result<Self, LoadError> {
        Ok(Self::new(mo_file::decode(data)?, locale)?)
    }

    fn new(mo: MoFile, locale: Option<String>) -> Result<Self, InvalidCatalog> {
        let metadata = metadata::parse(&mo.metadata);
        let plural_forms = PluralForms::from_metadata(&metadata)?;
        info!(
            "Loaded catalog for locale {:?}: {} messages, {} plural forms",
            locale,
            mo.entries.len(),
            plural_forms.nplurals()
        );
        Ok(Self {
            locale,
            entries: mo.entries,
            metadata,
            plural_forms,
        })
    }

    /// The locale given when the catalog was loaded.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// The catalog header, e.g. `Language` or `Plural-Forms`.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn plural_forms(&self) -> &PluralForms {
        &self.plural_forms
    }

    /// Number of translated messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All variants stored for `message_id`.
    pub fn variants(&self, message_id: &str) -> Option<&[String]> {
        self.entries.get(message_id).map(|variants| &**variants)
    }

    fn lookup<'a>(&'a self, message_id: &'a str, n: Option<i64>) -> &'a str {
        if message_id.is_empty() {
            return message_id;
        }
        let Some(variants) = self.entries.get(message_id) else {
            return message_id;
        };
        let index = n.and_then(|n| self.plural_forms.select(n)).unwrap_or(0);
        variants
            .get(index)
            .or_else(|| variants.first())
            .map_or(message_id, String::as_str)
    }

    /// Captures the plain data of the catalog, see [`Snapshot`].
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            locale: self.locale.clone(),
            entries: self
                .entries
                .iter()
                .map(|(key, variants)| (key.clone(), variants.to_vec()))
                .collect(),
            metadata: self.metadata.clone(),
            plural_forms: self.plural_forms.source().to_owned(),
        }
    }

    /// Rebuilds a catalog from a [`Snapshot`], compiling its plural forms again.
    ///
    /// Fails like loading a file would when the plural forms are invalid. Entries with an empty
    /// message id or without any variant are dropped.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, LoadError> {
        let plural_forms = PluralForms::compile(&snapshot.plural_forms)?;
        let entries = snapshot
            .entries
            .into_iter()
            .filter(|(key, variants)| {
                let keep = !key.is_empty() && !variants.is_empty();
                if !keep {
                    warn!("Dropping invalid snapshot entry {:?}", key);
                }
                keep
            })
            .map(|(key, variants)| (key, variants.into_boxed_slice()))
            .collect();
        Ok(Self {
            locale: snapshot.locale,
            entries,
            metadata: snapshot.metadata,
            plural_forms,
        })
    }
}

impl crate::Translator for Catalog {
    fn gettext<'a>(&'a self, message_id: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(self.lookup(message_id, None))
    }

    fn ngettext<'a>(&'a self, message_id: &'a str, n: i64) -> Cow<'a, str> {
        Cow::Borrowed(self.lookup(message_id, Some(n)))
    }

    fn locale(&self) -> Option<&str> {
        Catalog::locale(self)
    }
}

/// The data a [`Catalog`] is made of, for storing a loaded catalog elsewhere.
///
/// With the `serde` feature this can be serialized with any serde format.
/// [`Catalog::from_snapshot`] turns it back into a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub locale: Option<String>,
    pub entries: HashMap<String, Vec<String>>,
    pub metadata: HashMap<String, String>,
    /// The `Plural-Forms` header the catalog was compiled with.
    pub plural_forms: String,
}
