//! Builds `.mo` catalogs in memory, laid out like msgfmt does without a hash table.
#![allow(dead_code)]

#[derive(Clone, Copy, Debug)]
pub enum Endian {
    Little,
    Big,
}

pub const CZECH_PLURAL_FORMS: &str = "nplurals=3; plural=(n==1)?0:((n>=2&&n<=4)?1:2);";

#[derive(Clone, Default)]
pub struct MoBuilder {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    revision: u32,
}

impl MoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(self, header: &str) -> Self {
        self.raw(b"", header.as_bytes())
    }

    pub fn message(self, msgid: &str, msgstr: &str) -> Self {
        self.raw(msgid.as_bytes(), msgstr.as_bytes())
    }

    pub fn plural(self, msgid: &str, msgid_plural: &str, msgstr: &[&str]) -> Self {
        let original = format!("{msgid}\0{msgid_plural}");
        self.raw(original.as_bytes(), msgstr.join("\0").as_bytes())
    }

    pub fn raw(mut self, original: &[u8], translation: &[u8]) -> Self {
        self.entries.push((original.to_vec(), translation.to_vec()));
        self
    }

    pub fn revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    pub fn build(&self, endian: Endian) -> Vec<u8> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let n = entries.len() as u32;
        let originals_offset = 28;
        let translations_offset = originals_offset + 8 * n;
        let strings_offset = translations_offset + 8 * n;

        let mut strings = Vec::new();
        let mut original_table = Vec::new();
        let mut translation_table = Vec::new();
        for (original, _) in &entries {
            original_table.extend([original.len() as u32, strings_offset + strings.len() as u32]);
            strings.extend_from_slice(original);
            strings.push(0);
        }
        for (_, translation) in &entries {
            translation_table.extend([
                translation.len() as u32,
                strings_offset + strings.len() as u32,
            ]);
            strings.extend_from_slice(translation);
            strings.push(0);
        }

        let header = [
            0x950412de,
            self.revision,
            n,
            originals_offset,
            translations_offset,
            0,
            strings_offset,
        ];
        let mut data: Vec<u8> = header
            .iter()
            .chain(&original_table)
            .chain(&translation_table)
            .flat_map(|value| match endian {
                Endian::Little => value.to_le_bytes(),
                Endian::Big => value.to_be_bytes(),
            })
            .collect();
        data.extend(strings);
        data
    }
}

/// The catalog of `tests/data/cs.po`, built in memory.
pub fn czech() -> MoBuilder {
    MoBuilder::new()
        .header(&format!(
            "Language: cs\nContent-Type: text/plain; charset=UTF-8\nPlural-Forms: {CZECH_PLURAL_FORMS}\n"
        ))
        .message("Hello world!", "Ahoj světe!")
        .message("This is %s.", "Toto je %s.")
        .plural("%d dog", "%d dogs", &["%d pes", "%d psi", "%d psů"])
        .plural(
            "User %2$s has got %1$d dog.",
            "User %2$s has got %1$d dogs.",
            &[
                "Uživatel %2$s má %1$d psa.",
                "Uživatel %2$s má %1$d psy.",
                "Uživatel %2$s má %1$d psů.",
            ],
        )
}

pub fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
