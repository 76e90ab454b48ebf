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

//! # Gettext catalogs without gettext
//!
//! This crate loads compiled gettext catalogs (`.mo` files) into memory and translates
//! messages with them, including plural forms and printf-like arguments.
//! Nothing depends on a global locale: the [`Catalog`] to use is picked by the caller.
//!
//! Example:
//!
//! ```no_run
//! use motr::{translate, Catalog, Translator};
//!
//! let catalog = Catalog::from_path("locale/cs/LC_MESSAGES/app.mo", Some("cs".into()))?;
//! println!("{}", catalog.gettext("Hello world!"));
//! // The first argument is the count that picks the plural form.
//! println!("{}", translate!(catalog, "%d dog", 5)?);
//! // Translations can reorder the arguments.
//! println!("{}", translate!(catalog, "User %2$s has got %1$d dog.", 2, "John")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The `Plural-Forms` header of a catalog is compiled to a small expression tree when the
//! catalog is loaded, so a catalog with a rule outside of the C subset used by gettext is
//! rejected up front rather than at translation time.

use std::borrow::Cow;

mod catalog;
mod error;
mod metadata;
mod mo_file;
mod plural;
mod reader;
pub mod runtime_format;

pub use catalog::{Catalog, Snapshot};
pub use error::{FormatError, InvalidCatalog, LoadError, ReadError};
pub use plural::{PluralForms, PluralParseError, DEFAULT_PLURAL_FORMS};
pub use runtime_format::Arg;

/// Looks up translated messages.
///
/// [`Catalog`] is the `.mo` backed implementation. Missing translations are never an error:
/// implementations return the message id itself.
pub trait Translator {
    /// The singular translation of `message_id`.
    fn gettext<'a>(&'a self, message_id: &'a str) -> Cow<'a, str>;

    /// The translation of `message_id` in the plural form selected by `n`.
    fn ngettext<'a>(&'a self, message_id: &'a str, n: i64) -> Cow<'a, str>;

    fn locale(&self) -> Option<&str> {
        None
    }

    /// Translates and formats `message_id`.
    ///
    /// The first argument, if any, is also the count: when it is an integer it selects the
    /// plural form, otherwise the singular is used. When arguments are given, the translation
    /// is a template in which all of them, the count included, are substituted (see
    /// [`runtime_format`]). Without arguments the translation is returned as is.
    fn translate<'a>(
        &'a self,
        message_id: &'a str,
        args: &[Arg],
    ) -> Result<Cow<'a, str>, FormatError> {
        let translated = match args.first().and_then(Arg::as_count) {
            Some(n) => self.ngettext(message_id, n),
            None => self.gettext(message_id),
        };
        if args.is_empty() {
            return Ok(translated);
        }
        runtime_format::sprintf(&translated, args).map(Cow::Owned)
    }
}

/// Macro used to translate and format a string with a [`Translator`].
///
/// ```
/// # use motr::{translate, Snapshot, Catalog};
/// # let catalog = Catalog::from_snapshot(Snapshot {
/// #     plural_forms: motr::DEFAULT_PLURAL_FORMS.into(),
/// #     ..Default::default()
/// # }).unwrap();
/// // Without translation, the message id is formatted.
/// assert_eq!(translate!(catalog, "%d files in %s", 3, "/tmp").unwrap(), "3 files in /tmp");
/// assert_eq!(translate!(catalog, "100%").unwrap(), "100%");
/// ```
///
/// The arguments are converted with [`Arg::from`]; the first one is the plural count.
#[macro_export]
macro_rules! translate {
    ($translator:expr, $msgid:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::Translator as _;
        ($translator).translate($msgid, &[$($crate::Arg::from($arg)),*])
    }};
}
