use arbitrary::Arbitrary;
use po_translate_helpers::catalog::{Entry, Metadata};
use po_translate_helpers::Catalog;

/// An arbitrary entry for building catalogs.
#[derive(Arbitrary, Debug)]
pub struct FuzzEntry<'a> {
    pub context: Option<&'a str>,
    pub source: &'a str,
    pub translation: &'a str,
    pub fuzzy: bool,
}

/// Generate a random Catalog for fuzzing.
pub fn create_catalog(entries: &[FuzzEntry]) -> Catalog {
    let mut catalog = Catalog::new(Metadata::for_language("ko"));
    for (idx, entry) in entries.iter().enumerate() {
        if entry.source.is_empty() {
            continue;
        }
        let mut builder = Entry::build_singular(entry.source)
            .with_location("foo.py", Some(idx + 1))
            .with_translation(entry.translation);
        if let Some(context) = entry.context {
            builder = builder.with_context(context);
        }
        if entry.fuzzy {
            builder = builder.with_flag("fuzzy");
        }
        catalog.append_or_update(builder.done());
    }
    catalog
}
