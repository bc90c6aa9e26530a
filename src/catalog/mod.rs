// Copyright 2026 OpenStack i18n contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! In-memory Gettext catalogs.
//!
//! A [`Catalog`] is an ordered list of [`Entry`] values plus the header
//! [`Metadata`]. Entries keep the exact text they were parsed from until
//! they are modified, which lets [`Catalog::save`] reproduce untouched
//! entries byte for byte.

mod metadata;
mod parse;
mod write;

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

use crate::error::Result;
use crate::key::{identity_key, IdentityKey};

pub use metadata::{Metadata, PluralForms};

/// Highest number of plural forms any language uses.
pub const MAX_PLURAL_FORMS: usize = 6;

/// The flag marking machine-suggested or unreviewed translations.
pub const FUZZY: &str = "fuzzy";

/// A `#:` reference to where a message was extracted from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: String,
    pub line: Option<usize>,
}

impl Location {
    /// Parse a single reference token such as `nova/api.py:42`.
    pub fn parse(token: &str) -> Location {
        match token.rsplit_once(':') {
            Some((file, line)) if !file.is_empty() => match line.parse() {
                Ok(line) => Location {
                    file: file.to_string(),
                    line: Some(line),
                },
                Err(_) => Location {
                    file: token.to_string(),
                    line: None,
                },
            },
            _ => Location {
                file: token.to_string(),
                line: None,
            },
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file),
            None => f.write_str(&self.file),
        }
    }
}

/// One translatable unit of a catalog.
///
/// The identity fields (context, source and plural source) can only be
/// set when the entry is built. Everything else can be changed, and any
/// effective change makes the entry render canonically on save.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    context: Option<String>,
    source: String,
    source_plural: Option<String>,
    translation: String,
    plural_translations: BTreeMap<usize, String>,
    flags: Vec<String>,
    locations: Vec<Location>,
    translator_comments: Vec<String>,
    extracted_comments: Vec<String>,
    previous: Vec<String>,
    obsolete: bool,
    line: usize,
    raw: Option<String>,
}

impl Entry {
    /// Start building an entry without plural forms.
    pub fn build_singular(source: impl Into<String>) -> EntryBuilder {
        EntryBuilder {
            entry: Entry {
                source: source.into(),
                ..Entry::default()
            },
        }
    }

    /// Start building an entry with plural forms.
    pub fn build_plural(source: impl Into<String>, source_plural: impl Into<String>) -> EntryBuilder {
        EntryBuilder {
            entry: Entry {
                source: source.into(),
                source_plural: Some(source_plural.into()),
                ..Entry::default()
            },
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_plural(&self) -> Option<&str> {
        self.source_plural.as_deref()
    }

    /// The singular translation. Empty means untranslated.
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Plural translations by plural-form index.
    pub fn plural_translations(&self) -> &BTreeMap<usize, String> {
        &self.plural_translations
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_fuzzy(&self) -> bool {
        self.has_flag(FUZZY)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn translator_comments(&self) -> &[String] {
        &self.translator_comments
    }

    pub fn extracted_comments(&self) -> &[String] {
        &self.extracted_comments
    }

    /// The `#|` lines describing the previous source text.
    pub fn previous(&self) -> &[String] {
        &self.previous
    }

    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn is_plural(&self) -> bool {
        self.source_plural.is_some()
    }

    /// Is this the header entry (empty source without context)?
    pub fn is_header(&self) -> bool {
        !self.obsolete && self.source.is_empty() && self.context().unwrap_or_default().is_empty()
    }

    /// Line where the entry started in the parsed file, or 0 for
    /// entries built in memory.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn key(&self) -> IdentityKey {
        identity_key(self)
    }

    /// Is the entry still formatted exactly as it was parsed?
    pub fn is_pristine(&self) -> bool {
        self.raw.is_some()
    }

    pub(crate) fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn set_translation(&mut self, translation: impl Into<String>) {
        let translation = translation.into();
        if self.translation != translation {
            self.translation = translation;
            self.raw = None;
        }
    }

    pub fn set_plural_translations(&mut self, translations: BTreeMap<usize, String>) {
        if self.plural_translations != translations {
            self.plural_translations = translations;
            self.raw = None;
        }
    }

    /// Copy both the singular and the plural translations of `other`.
    pub fn copy_translation_from(&mut self, other: &Entry) {
        self.set_translation(other.translation.clone());
        self.set_plural_translations(other.plural_translations.clone());
    }

    /// Turn the entry into a template: no translation text at all.
    pub fn clear_translation(&mut self) {
        self.set_translation(String::new());
        self.set_plural_translations(BTreeMap::new());
    }

    pub fn add_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
            self.raw = None;
        }
    }

    pub fn remove_flag(&mut self, flag: &str) {
        if self.has_flag(flag) {
            self.flags.retain(|f| f != flag);
            self.raw = None;
        }
    }
}

/// Builder for [`Entry`], see [`Entry::build_singular`] and
/// [`Entry::build_plural`].
#[derive(Debug)]
pub struct EntryBuilder {
    entry: Entry,
}

impl EntryBuilder {
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.entry.context = Some(context.into());
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.entry.translation = translation.into();
        self
    }

    pub fn with_plural_translation(mut self, index: usize, translation: impl Into<String>) -> Self {
        self.entry.plural_translations.insert(index, translation.into());
        self
    }

    pub fn with_flag(mut self, flag: &str) -> Self {
        self.entry.add_flag(flag);
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: Option<usize>) -> Self {
        self.entry.locations.push(Location {
            file: file.into(),
            line,
        });
        self
    }

    pub fn with_translator_comment(mut self, comment: impl Into<String>) -> Self {
        self.entry.translator_comments.push(comment.into());
        self
    }

    pub fn with_extracted_comment(mut self, comment: impl Into<String>) -> Self {
        self.entry.extracted_comments.push(comment.into());
        self
    }

    pub fn with_previous(mut self, previous: impl Into<String>) -> Self {
        self.entry.previous.push(previous.into());
        self
    }

    pub fn obsolete(mut self) -> Self {
        self.entry.obsolete = true;
        self
    }

    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.entry.line = line;
        self
    }

    pub(crate) fn with_raw(mut self, raw: String) -> Self {
        self.entry.raw = Some(raw);
        self
    }

    pub fn done(self) -> Entry {
        self.entry
    }
}

/// Mutable access to an entry stored in a [`Catalog`].
///
/// Only the translation and the flags can be changed. The identity of
/// the entry is fixed so that the catalog index stays valid.
#[derive(Debug)]
pub struct EntryMut<'a>(&'a mut Entry);

impl EntryMut<'_> {
    pub fn set_translation(&mut self, translation: impl Into<String>) {
        self.0.set_translation(translation);
    }

    pub fn set_plural_translations(&mut self, translations: BTreeMap<usize, String>) {
        self.0.set_plural_translations(translations);
    }

    pub fn copy_translation_from(&mut self, other: &Entry) {
        self.0.copy_translation_from(other);
    }

    pub fn clear_translation(&mut self) {
        self.0.clear_translation();
    }

    pub fn add_flag(&mut self, flag: &str) {
        self.0.add_flag(flag);
    }

    pub fn remove_flag(&mut self, flag: &str) {
        self.0.remove_flag(flag);
    }
}

impl Deref for EntryMut<'_> {
    type Target = Entry;

    fn deref(&self) -> &Entry {
        self.0
    }
}

/// A Gettext catalog: header metadata plus entries in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    header: Option<Entry>,
    metadata: Metadata,
    entries: Vec<Entry>,
    index: HashMap<IdentityKey, usize>,
    /// Comment lines after the last entry, as read.
    trailer: Option<String>,
}

impl Catalog {
    /// Create an empty catalog with the given metadata.
    pub fn new(metadata: Metadata) -> Catalog {
        Catalog {
            metadata,
            ..Catalog::default()
        }
    }

    /// Create an empty catalog sharing the header of `other`.
    ///
    /// The header is carried over unchanged, so it is written exactly
    /// as it was read.
    pub fn with_header_of(other: &Catalog) -> Catalog {
        Catalog {
            header: other.header.clone(),
            metadata: other.metadata.clone(),
            ..Catalog::default()
        }
    }

    /// Parse a catalog from the bytes of a PO or POT file.
    pub fn load(bytes: &[u8]) -> Result<Catalog> {
        parse::parse(bytes)
    }

    /// Serialize the catalog in Gettext PO format.
    pub fn save(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    pub fn header(&self) -> Option<&Entry> {
        self.header.as_ref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Change the metadata. The header will be rendered anew on save.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        if let Some(header) = &mut self.header {
            header.raw = None;
        }
        &mut self.metadata
    }

    /// Apply [`Metadata::ensure_defaults`]. The header keeps its original
    /// text unless a field had to be added or changed.
    ///
    /// Returns `true` if the metadata changed.
    pub fn ensure_default_metadata(&mut self, language: Option<&str>) -> bool {
        let mut metadata = self.metadata.clone();
        metadata.ensure_defaults(language);
        if metadata == self.metadata {
            return false;
        }
        *self.metadata_mut() = metadata;
        true
    }

    /// Find the live entry with the given key.
    ///
    /// Obsolete entries and the header are never returned.
    pub fn lookup(&self, key: &IdentityKey) -> Option<&Entry> {
        self.index.get(key).map(|&idx| &self.entries[idx])
    }

    pub fn lookup_mut(&mut self, key: &IdentityKey) -> Option<EntryMut<'_>> {
        let idx = *self.index.get(key)?;
        Some(EntryMut(&mut self.entries[idx]))
    }

    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.index.contains_key(key)
    }

    /// All entries except the header, including obsolete ones.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = EntryMut<'_>> {
        self.entries.iter_mut().map(EntryMut)
    }

    /// Entries which are neither obsolete nor the header.
    pub fn live_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| !entry.is_obsolete())
    }

    /// Number of entries, not counting the header.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add `entry` at the end, or replace the live entry with the same key.
    ///
    /// A header entry replaces the current header; the metadata is
    /// kept and rendered into the new header on save.
    pub fn append_or_update(&mut self, mut entry: Entry) {
        if entry.is_header() {
            entry.raw = None;
            self.header = Some(entry);
            return;
        }
        if entry.is_obsolete() {
            self.entries.push(entry);
            return;
        }
        match self.index.get(&entry.key()) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.index.insert(entry.key(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub(crate) fn from_parts(
        header: Option<Entry>,
        metadata: Metadata,
        entries: Vec<Entry>,
        index: HashMap<IdentityKey, usize>,
        trailer: Option<String>,
    ) -> Catalog {
        Catalog {
            header,
            metadata,
            entries,
            index,
            trailer,
        }
    }

    pub(crate) fn trailer(&self) -> Option<&str> {
        self.trailer.as_deref()
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write::write_catalog(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_location_parse() {
        assert_eq!(
            Location::parse("nova/api.py:42"),
            Location {
                file: String::from("nova/api.py"),
                line: Some(42)
            }
        );
        assert_eq!(Location::parse("doc/index.rst").line, None);
        assert_eq!(Location::parse("C:weird").file, "C:weird");
        assert_eq!(Location::parse(":12").file, ":12");
    }

    #[test]
    fn test_append_or_update_replaces_live_entry() {
        let mut catalog = Catalog::new(Metadata::new());
        catalog.append_or_update(Entry::build_singular("a").done());
        catalog.append_or_update(Entry::build_singular("b").done());
        catalog.append_or_update(Entry::build_singular("a").with_translation("A").done());

        let sources = catalog.entries().map(Entry::source).collect::<Vec<_>>();
        assert_eq!(sources, ["a", "b"]);
        let key = IdentityKey::new(None, "a", None);
        assert_eq!(catalog.lookup(&key).map(Entry::translation), Some("A"));
    }

    #[test]
    fn test_lookup_skips_obsolete_entries() {
        let mut catalog = Catalog::new(Metadata::new());
        catalog.append_or_update(Entry::build_singular("old").obsolete().done());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup(&IdentityKey::new(None, "old", None)).is_none());
        assert_eq!(catalog.live_entries().count(), 0);
    }

    #[test]
    fn test_setters_only_dirty_on_change() {
        let mut catalog =
            Catalog::load(b"msgid \"a\"\nmsgstr \"A\"\n").expect("Could not parse");
        let key = IdentityKey::new(None, "a", None);
        let mut entry = catalog.lookup_mut(&key).unwrap();
        entry.set_translation("A");
        entry.remove_flag(FUZZY);
        assert!(entry.is_pristine());
        entry.set_translation("B");
        assert!(!entry.is_pristine());
    }

    #[test]
    fn test_metadata_mut_rerenders_header() {
        let mut catalog = Catalog::load(
            b"msgid \"\"\nmsgstr \"\"\n\"Language: ko\\n\"\n",
        )
        .unwrap();
        assert!(catalog.header().unwrap().is_pristine());
        catalog.metadata_mut().set("Language", "ja");
        assert!(!catalog.header().unwrap().is_pristine());
        let saved = String::from_utf8(catalog.save()).unwrap();
        assert!(saved.contains("\"Language: ja\\n\""));
    }

    #[test]
    fn test_ensure_default_metadata() {
        let text = "msgid \"\"\nmsgstr \"\"\n\"Language: ko\\n\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n";
        let mut catalog = Catalog::load(text.as_bytes()).unwrap();
        assert!(!catalog.ensure_default_metadata(Some("ja")));
        assert!(catalog.header().unwrap().is_pristine());
        assert_eq!(String::from_utf8(catalog.save()).unwrap(), text);

        let mut catalog = Catalog::load(b"msgid \"\"\nmsgstr \"\"\n\"Language: ko\\n\"\n").unwrap();
        assert!(catalog.ensure_default_metadata(None));
        assert_eq!(catalog.metadata().language(), Some("ko"));
        let saved = String::from_utf8(catalog.save()).unwrap();
        assert!(saved.contains("\"Content-Type: text/plain; charset=UTF-8\\n\""));

        let mut catalog = Catalog::load(b"msgid \"a\"\nmsgstr \"\"\n").unwrap();
        assert!(catalog.ensure_default_metadata(Some("ja")));
        assert_eq!(catalog.metadata().language(), Some("ja"));
        assert_eq!(Catalog::load(&catalog.save()).unwrap().metadata(), catalog.metadata());
    }

    #[test]
    fn test_entry_mut_cannot_change_identity() {
        let mut catalog = Catalog::new(Metadata::new());
        catalog.append_or_update(Entry::build_plural("%d file", "%d files").done());
        for mut entry in catalog.entries_mut() {
            entry.set_plural_translations(BTreeMap::from([
                (0, String::from("%d fichier")),
                (1, String::from("%d fichiers")),
            ]));
        }
        let key = IdentityKey::new(None, "%d file", Some("%d files"));
        assert_eq!(catalog.lookup(&key).unwrap().plural_translations().len(), 2);
    }
}
