#![cfg(feature = "serde")]

mod common;

use std::fs;

use common::{czech, Endian};
use motr::{translate, Catalog, Snapshot, Translator};

#[test]
fn json_round_trip() {
    let catalog = Catalog::from_bytes(&czech().build(Endian::Little), Some("cs".into())).unwrap();
    let json = serde_json::to_string(&catalog.to_snapshot()).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, catalog.to_snapshot());

    let restored = Catalog::from_snapshot(snapshot).unwrap();
    assert_eq!(restored.locale(), Some("cs"));
    assert_eq!(restored.gettext("Hello world!"), "Ahoj světe!");
    assert_eq!(translate!(restored, "%d dog", 3).unwrap(), "3 psi");
    assert_eq!(translate!(restored, "%d dog", 11).unwrap(), "11 psů");
}

#[test]
fn stored_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cs.json");
    let catalog = Catalog::from_bytes(&czech().build(Endian::Big), Some("cs".into())).unwrap();
    fs::write(&path, serde_json::to_vec_pretty(&catalog.to_snapshot()).unwrap()).unwrap();

    let snapshot: Snapshot = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let restored = Catalog::from_snapshot(snapshot).unwrap();
    assert_eq!(restored.to_snapshot(), catalog.to_snapshot());
    assert_eq!(
        translate!(restored, "User %2$s has got %1$d dog.", 1, "John").unwrap(),
        "Uživatel John má 1 psa."
    );
}

#[test]
fn hand_written_snapshot() {
    let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
        "locale": "fr",
        "entries": {
            "Yes": ["Oui"],
            "%d file": ["%d fichier", "%d fichiers"],
            "": ["header"],
            "Nothing": []
        },
        "metadata": { "Language": "fr" },
        "plural_forms": "nplurals=2; plural=(n > 1);"
    }))
    .unwrap();
    let catalog = Catalog::from_snapshot(snapshot).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.gettext("Yes"), "Oui");
    assert_eq!(translate!(catalog, "%d file", 0).unwrap(), "0 fichier");
    assert_eq!(translate!(catalog, "%d file", 2).unwrap(), "2 fichiers");
    assert_eq!(catalog.gettext("Nothing"), "Nothing");

    let broken: Snapshot = serde_json::from_value(serde_json::json!({
        "locale": null,
        "entries": {},
        "metadata": {},
        "plural_forms": "nplurals=2; plural=n +;"
    }))
    .unwrap();
    assert!(Catalog::from_snapshot(broken).is_err());
}
