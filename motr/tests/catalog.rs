mod common;

use std::io::Write;
use std::sync::Arc;

use common::{czech, fixture_path, Endian, MoBuilder, CZECH_PLURAL_FORMS};
use motr::{translate, Arg, Catalog, InvalidCatalog, LoadError, Translator, DEFAULT_PLURAL_FORMS};

fn czech_catalog() -> Catalog {
    Catalog::from_path(fixture_path("cs.mo"), Some("cs".to_owned())).unwrap()
}

#[test]
fn get_locale() {
    assert_eq!(czech_catalog().locale(), Some("cs"));
    let data = czech().build(Endian::Little);
    assert_eq!(Catalog::from_bytes(&data, None).unwrap().locale(), None);
}

#[test]
fn translate_simple() {
    let catalog = czech_catalog();
    assert_eq!(catalog.gettext("Hello world!"), "Ahoj světe!");
    assert_eq!(translate!(catalog, "Hello world!").unwrap(), "Ahoj světe!");
}

#[test]
fn translate_and_format() {
    let catalog = czech_catalog();
    // "John" sits in the count slot: not an integer, so the singular is used.
    assert_eq!(translate!(catalog, "This is %s.", "John").unwrap(), "Toto je John.");
    // An integer count is the first argument, so `%s` takes it and "John" is unused.
    assert_eq!(translate!(catalog, "This is %s.", 1, "John").unwrap(), "Toto je 1.");
}

#[test]
fn translate_plurals() {
    let catalog = czech_catalog();
    assert_eq!(translate!(catalog, "%d dog", 1).unwrap(), "1 pes");
    assert_eq!(translate!(catalog, "%d dog", 2).unwrap(), "2 psi");
    assert_eq!(translate!(catalog, "%d dog", 5).unwrap(), "5 psů");
    assert_eq!(catalog.ngettext("%d dog", 4), "%d psi");
    assert_eq!(catalog.ngettext("%d dog", 0), "%d psů");
}

#[test]
fn translate_and_format_plurals() {
    let catalog = czech_catalog();
    let user = "User %2$s has got %1$d dog.";
    assert_eq!(translate!(catalog, user, 1, "John").unwrap(), "Uživatel John má 1 psa.");
    assert_eq!(translate!(catalog, user, 2, "John").unwrap(), "Uživatel John má 2 psy.");
    assert_eq!(translate!(catalog, user, 5, "John").unwrap(), "Uživatel John má 5 psů.");
}

#[test]
fn fixture_matches_builder() {
    let from_file = czech_catalog();
    let built = Catalog::from_bytes(&czech().build(Endian::Little), Some("cs".into())).unwrap();
    assert_eq!(from_file.len(), built.len());
    for msgid in ["Hello world!", "This is %s.", "%d dog", "User %2$s has got %1$d dog."] {
        assert_eq!(from_file.variants(msgid), built.variants(msgid), "{msgid}");
    }
    assert_eq!(from_file.metadata()["Language"], "cs");
    assert_eq!(from_file.plural_forms().nplurals(), 3);
    assert_eq!(
        from_file.plural_forms().source(),
        "nplurals=3; plural=(n==1) ? 0 : ((n>=2 && n<=4) ? 1 : 2);"
    );
}

#[test]
fn both_byte_orders() {
    let little = Catalog::from_bytes(&czech().build(Endian::Little), None).unwrap();
    let big = Catalog::from_bytes(&czech().build(Endian::Big), None).unwrap();
    assert_eq!(little.to_snapshot(), big.to_snapshot());
    assert_eq!(big.ngettext("%d dog", 3), "%d psi");
}

#[test]
fn deterministic() {
    let data = czech().build(Endian::Big);
    let first = Catalog::from_bytes(&data, None).unwrap().to_snapshot();
    let second = Catalog::from_vec_u8(data, None).unwrap().to_snapshot();
    assert_eq!(first, second);
}

#[test]
fn passthrough() {
    let catalog = czech_catalog();
    for message in ["Goodbye", "hello world!", "%d cat", " ", "Language"] {
        assert_eq!(catalog.gettext(message), message);
        assert_eq!(catalog.ngettext(message, 3), message);
    }
    // The empty message id never returns the catalog header.
    assert_eq!(catalog.gettext(""), "");
    assert_eq!(catalog.ngettext("", 2), "");
    assert_eq!(translate!(catalog, "").unwrap(), "");
    // Untranslated strings are still formatted.
    assert_eq!(translate!(catalog, "%d cats", 3).unwrap(), "3 cats");
}

#[test]
fn plural_id_is_not_a_key() {
    let catalog = czech_catalog();
    assert_eq!(catalog.gettext("%d dogs"), "%d dogs");
    assert_eq!(catalog.variants("%d dog").map(<[String]>::len), Some(3));
    assert_eq!(catalog.variants("%d dog\0%d dogs"), None);
}

#[test]
fn empty_translation_is_absent() {
    let data = czech()
        .message("Untranslated", "")
        .message("Translated", "Přeloženo")
        .build(Endian::Little);
    let catalog = Catalog::from_bytes(&data, None).unwrap();
    assert_eq!(catalog.gettext("Untranslated"), "Untranslated");
    assert_eq!(catalog.variants("Untranslated"), None);
    assert_eq!(catalog.gettext("Translated"), "Přeloženo");
}

#[test]
fn default_plural_forms() {
    let data = MoBuilder::new()
        .header("Language: de\n")
        .plural("%d file", "%d files", &["%d Datei", "%d Dateien"])
        .build(Endian::Little);
    let catalog = Catalog::from_bytes(&data, Some("de".into())).unwrap();
    assert_eq!(catalog.plural_forms().source(), DEFAULT_PLURAL_FORMS);
    assert_eq!(translate!(catalog, "%d file", 1).unwrap(), "1 Datei");
    assert_eq!(translate!(catalog, "%d file", 0).unwrap(), "0 Dateien");
    assert_eq!(translate!(catalog, "%d file", 3).unwrap(), "3 Dateien");

    // No header at all.
    let data = MoBuilder::new().message("Yes", "Ja").build(Endian::Big);
    let catalog = Catalog::from_bytes(&data, None).unwrap();
    assert!(catalog.metadata().is_empty());
    assert_eq!(catalog.plural_forms().nplurals(), 2);
    assert_eq!(catalog.gettext("Yes"), "Ja");
}

#[test]
fn more_forms_than_variants() {
    let data = MoBuilder::new()
        .header(&format!("Plural-Forms: {CZECH_PLURAL_FORMS}\n"))
        .plural("%d day", "%d days", &["%d den", "%d dny"])
        .build(Endian::Little);
    let catalog = Catalog::from_bytes(&data, None).unwrap();
    assert_eq!(translate!(catalog, "%d day", 3).unwrap(), "3 dny");
    assert_eq!(translate!(catalog, "%d day", 9).unwrap(), "9 den");
}

#[test]
fn count_slot() {
    let catalog = czech_catalog();
    let args = [Arg::from(2u64), Arg::from("ignored")];
    assert_eq!(catalog.translate("%d dog", &args).unwrap(), "2 psi");
    assert_eq!(catalog.translate("%d dog", &[Arg::Float(2.0)]).unwrap(), "2 pes");
    assert_eq!(catalog.translate("%d dog", &[Arg::from(-3)]).unwrap(), "-3 psů");
}

#[test]
fn format_errors() {
    let catalog = czech_catalog();
    assert_eq!(
        translate!(catalog, "User %2$s has got %1$d dog.", 1).unwrap_err(),
        motr::FormatError::MissingArgument {
            index: 2,
            supplied: 1
        }
    );
    assert!(matches!(
        translate!(catalog, "Progress: 50%! %d", 3),
        Err(motr::FormatError::InvalidPlaceholder { position: 12, .. })
    ));
    // Without arguments nothing is interpreted.
    assert_eq!(translate!(catalog, "Progress: 50%").unwrap(), "Progress: 50%");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.mo");
    match Catalog::from_path(&path, None) {
        Err(LoadError::Io { path: reported, source }) => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected {other:?}"),
    }
    // A directory can be opened on some platforms, but never read as a catalog.
    assert!(Catalog::from_path(dir.path(), None).is_err());
}

#[test]
fn invalid_files_are_format_errors() {
    let mut short = tempfile::NamedTempFile::new().unwrap();
    short.write_all(&[0xde, 0x12, 0x04, 0x95, 0, 0, 0, 0, 0]).unwrap();
    assert!(matches!(
        Catalog::from_path(short.path(), None),
        Err(LoadError::Format(InvalidCatalog::TooShort { len: 9 }))
    ));

    let mut garbage = tempfile::NamedTempFile::new().unwrap();
    garbage.write_all(b"msgid \"\"\nmsgstr \"\"\n").unwrap();
    assert!(matches!(
        Catalog::from_path(garbage.path(), None),
        Err(LoadError::Format(InvalidCatalog::BadMagic { .. }))
    ));

    let revision = czech().revision(1).build(Endian::Little);
    assert!(matches!(
        Catalog::from_bytes(&revision, None),
        Err(LoadError::Format(InvalidCatalog::UnsupportedRevision { revision: 1 }))
    ));

    let data = czech().build(Endian::Big);
    for len in [10, 19, 20, 40, data.len() - 2] {
        assert!(
            matches!(
                Catalog::from_bytes(&data[..len], None),
                Err(LoadError::Format(InvalidCatalog::Truncated(_)))
            ),
            "len {len}"
        );
    }
    assert!(Catalog::from_bytes(&[], None).is_err());
}

#[test]
fn invalid_plural_forms() {
    for rule in [
        "nplurals=2; plural=n != 1",
        "nplurals=2; plural=system('ls');",
        "nplurals=2;plural=n != 1;",
        "plural=n != 1;",
    ] {
        let data = MoBuilder::new()
            .header(&format!("Plural-Forms: {rule}\n"))
            .message("Yes", "Ano")
            .build(Endian::Little);
        match Catalog::from_bytes(&data, None) {
            Err(LoadError::Format(InvalidCatalog::InvalidPluralForms { rules, .. })) => {
                assert_eq!(rules, rule)
            }
            other => panic!("{rule}: unexpected {other:?}"),
        }
    }
}

#[test]
fn shared_between_threads() {
    let catalog = Arc::new(czech_catalog());
    std::thread::scope(|scope| {
        for n in 0..8i64 {
            let catalog = Arc::clone(&catalog);
            scope.spawn(move || {
                for _ in 0..100 {
                    let expected = match n {
                        1 => "pes",
                        2..=4 => "psi",
                        _ => "psů",
                    };
                    assert_eq!(
                        translate!(catalog, "%d dog", n).unwrap(),
                        format!("{n} {expected}")
                    );
                }
            });
        }
    });
}
