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


//! Find the entries which still need translating.
//!
//! Both operations return a fresh template: translations are dropped,
//! the `fuzzy` flag is removed and the header of the reference catalog
//! is carried over unchanged.

use crate::catalog::{Catalog, Entry, FUZZY};
use crate::state::{classify, TranslationState};

/// Turn a copy of `entry` into a translation request.
pub(crate) fn template_entry(entry: &Entry) -> Entry {
    let mut entry = entry.clone();
    entry.clear_translation();
    entry.remove_flag(FUZZY);
    entry
}

/// Entries of `new` whose identity key does not exist in `old`.
///
/// This detects source strings added or edited between two revisions
/// of a project. The order of `new` is preserved and so is its header.
pub fn new_entries(old: &Catalog, new: &Catalog) -> Catalog {
    let mut diff = Catalog::with_header_of(new);
    for entry in new.live_entries() {
        if !old.contains(&entry.key()) {
            diff.append_or_update(template_entry(entry));
        }
    }
    log::info!(
        "{} of {} entries are new",
        diff.len(),
        new.live_entries().count()
    );
    diff
}

/// Entries of `source` which are not translated in `translated`.
///
/// An entry is kept when its key is absent from `translated` or when
/// the matching entry there is untranslated. With `translated` set to
/// `None` (nothing has been translated yet) every live entry of
/// `source` is kept.
pub fn remaining_work(source: &Catalog, translated: Option<&Catalog>) -> Catalog {
    let Some(translated) = translated else {
        log::warn!(
            "No translated catalog available, treating all {} entries as untranslated",
            source.live_entries().count()
        );
        return remaining_work(source, Some(&Catalog::default()));
    };

    let mut remaining = Catalog::with_header_of(source);
    let mut already_translated = 0;
    for entry in source.live_entries() {
        let state = translated
            .lookup(&entry.key())
            .map_or(TranslationState::Untranslated, classify);
        if state == TranslationState::Translated {
            already_translated += 1;
            continue;
        }
        remaining.append_or_update(template_entry(entry));
    }
    log::info!(
        "{already_translated} entries already translated, {} remaining",
        remaining.len()
    );
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Metadata;
    use crate::key::IdentityKey;
    use pretty_assertions::assert_eq;

    fn create_catalog(translations: &[(&str, &str)]) -> Catalog {
        let mut catalog = Catalog::new(Metadata::for_language("ko"));
        for (source, translation) in translations {
            catalog.append_or_update(
                Entry::build_singular(*source)
                    .with_translation(*translation)
                    .done(),
            );
        }
        catalog
    }

    fn sources(catalog: &Catalog) -> Vec<&str> {
        catalog.entries().map(Entry::source).collect()
    }

    #[test]
    fn test_new_entries() {
        let old = create_catalog(&[("a", ""), ("b", "")]);
        let new = create_catalog(&[("c", ""), ("a", ""), ("b changed", ""), ("b", "")]);
        assert_eq!(sources(&new_entries(&old, &new)), ["c", "b changed"]);
    }

    #[test]
    fn test_new_entries_empty_iff_all_keys_known() {
        let old = create_catalog(&[("a", ""), ("b", ""), ("c", "")]);
        let new = create_catalog(&[("b", ""), ("a", "")]);
        assert!(new_entries(&old, &new).is_empty());

        let mut grown = new.clone();
        grown.append_or_update(Entry::build_singular("d").done());
        assert_eq!(new_entries(&old, &grown).len(), new_entries(&old, &new).len() + 1);
    }

    #[test]
    fn test_new_entries_is_a_template_with_new_header() {
        let old = create_catalog(&[]);
        let mut new = Catalog::load(
            br#"msgid ""
msgstr ""
"Project-Id-Version: nova 2025.1\n"

#: nova/api.py:3
#, fuzzy, python-format
msgid "Hello %s"
msgstr "Bonjour %s"

#~ msgid "Gone"
#~ msgstr ""
"#,
        )
        .unwrap();
        new.metadata_mut().set("Language", "fr");

        let diff = new_entries(&old, &new);
        assert_eq!(diff.metadata(), new.metadata());
        assert_eq!(diff.len(), 1);
        let entry = diff.entries().next().unwrap();
        assert_eq!(entry.translation(), "");
        assert_eq!(entry.flags(), ["python-format"]);
        assert_eq!(entry.locations().len(), 1);
    }

    #[test]
    fn test_new_entries_context_matters() {
        let mut old = create_catalog(&[]);
        old.append_or_update(Entry::build_singular("Open").with_context("menu").done());
        let mut new = create_catalog(&[]);
        new.append_or_update(Entry::build_singular("Open").with_context("door").done());
        assert_eq!(new_entries(&old, &new).len(), 1);
    }

    #[test]
    fn test_remaining_work() {
        let source = create_catalog(&[("a", ""), ("b", ""), ("c", ""), ("d", "")]);
        let translated = create_catalog(&[("a", "A"), ("b", " "), ("d", "D"), ("x", "X")]);
        let remaining = remaining_work(&source, Some(&translated));
        assert_eq!(sources(&remaining), ["b", "c"]);
        assert_eq!(remaining.metadata(), source.metadata());
    }

    #[test]
    fn test_remaining_work_clears_translations_and_fuzzy() {
        let mut source = create_catalog(&[]);
        source.append_or_update(
            Entry::build_singular("a")
                .with_translation("stale")
                .with_flag(FUZZY)
                .with_flag("python-format")
                .done(),
        );
        source.append_or_update(
            Entry::build_plural("%d file", "%d files")
                .with_plural_translation(0, "old")
                .done(),
        );
        let remaining = remaining_work(&source, Some(&create_catalog(&[])));
        let entries = remaining.entries().collect::<Vec<_>>();
        assert_eq!(entries[0].translation(), "");
        assert_eq!(entries[0].flags(), ["python-format"]);
        assert!(entries[1].plural_translations().is_empty());
    }

    #[test]
    fn test_remaining_work_plural_state() {
        let mut source = create_catalog(&[]);
        source.append_or_update(Entry::build_plural("%d file", "%d files").done());
        source.append_or_update(Entry::build_plural("%d disk", "%d disks").done());
        let mut translated = create_catalog(&[]);
        translated.append_or_update(
            Entry::build_plural("%d file", "%d files")
                .with_plural_translation(0, "")
                .with_plural_translation(1, "%d fichiers")
                .done(),
        );
        translated.append_or_update(
            Entry::build_plural("%d disk", "%d disks")
                .with_plural_translation(0, "")
                .done(),
        );
        let remaining = remaining_work(&source, Some(&translated));
        assert_eq!(
            remaining.entries().map(Entry::key).collect::<Vec<_>>(),
            [IdentityKey::new(None, "%d disk", Some("%d disks"))]
        );
    }

    #[test]
    fn test_remaining_work_ignores_obsolete_translations() {
        let source = create_catalog(&[("a", "")]);
        let mut translated = create_catalog(&[]);
        translated.append_or_update(Entry::build_singular("a").with_translation("A").obsolete().done());
        assert_eq!(sources(&remaining_work(&source, Some(&translated))), ["a"]);
    }

    #[test]
    fn test_remaining_work_without_translations() {
        let mut source = create_catalog(&[("a", "A"), ("b", "")]);
        source.append_or_update(Entry::build_singular("c").obsolete().done());
        let remaining = remaining_work(&source, None);
        assert_eq!(sources(&remaining), ["a", "b"]);
        assert_eq!(remaining.metadata().language(), Some("ko"));
    }

    #[test]
    fn test_remaining_work_keeps_header_bytes() {
        let source = Catalog::load(
            b"# header comment\nmsgid \"\"\nmsgstr \"\"\n\"Language: ko\\n\"\n\nmsgid \"a\"\nmsgstr \"\"\n",
        )
        .unwrap();
        let remaining = remaining_work(&source, None);
        assert_eq!(remaining.save(), source.save());
    }
}
