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


//! Translation-state classification.
//!
//! Every component decides whether an entry needs work through
//! [`classify`], so the rules live in exactly one place:
//!
//! - the header and obsolete entries are [`TranslationState::Exempt`],
//! - a plural entry is translated if at least one plural form is not
//!   blank,
//! - a singular entry is translated if its translation is not blank.
//!
//! The fuzzy flag does not change the state.

use crate::catalog::Entry;

/// The derived translation state of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranslationState {
    /// The header or an obsolete entry. Never put out for translation.
    Exempt,
    Translated,
    Untranslated,
}

/// Is `text` empty or whitespace only?
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Classify `entry`.
pub fn classify(entry: &Entry) -> TranslationState {
    if entry.is_obsolete() || entry.is_header() {
        return TranslationState::Exempt;
    }
    let translated = if entry.is_plural() {
        entry
            .plural_translations()
            .values()
            .any(|translation| !is_blank(translation))
    } else {
        !is_blank(entry.translation())
    };
    if translated {
        TranslationState::Translated
    } else {
        TranslationState::Untranslated
    }
}

/// Shorthand for `classify(entry) == TranslationState::Translated`.
pub fn is_translated(entry: &Entry) -> bool {
    classify(entry) == TranslationState::Translated
}

/// Shorthand for `classify(entry) == TranslationState::Untranslated`.
pub fn is_untranslated(entry: &Entry) -> bool {
    classify(entry) == TranslationState::Untranslated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FUZZY};
    use pretty_assertions::assert_eq;
    use TranslationState::*;

    #[test]
    fn test_classify_singular() {
        let cases = [
            ("", Untranslated),
            (" ", Untranslated),
            ("\n\t ", Untranslated),
            ("x", Translated),
            ("  padded  ", Translated),
            ("번역", Translated),
        ];
        for (translation, expected) in cases {
            let entry = Entry::build_singular("source")
                .with_translation(translation)
                .done();
            assert_eq!(classify(&entry), expected, "translation {translation:?}");
        }
    }

    #[test]
    fn test_classify_plural() {
        let cases: [(&[(usize, &str)], TranslationState); 6] = [
            (&[], Untranslated),
            (&[(0, "")], Untranslated),
            (&[(0, ""), (1, " ")], Untranslated),
            (&[(0, "one")], Translated),
            (&[(0, ""), (1, "many")], Translated),
            (&[(0, "a"), (1, "b"), (2, "c"), (5, "")], Translated),
        ];
        for (plurals, expected) in cases {
            let mut builder = Entry::build_plural("%d file", "%d files");
            for (idx, translation) in plurals {
                builder = builder.with_plural_translation(*idx, *translation);
            }
            assert_eq!(classify(&builder.done()), expected, "plurals {plurals:?}");
        }
    }

    #[test]
    fn test_plural_entry_ignores_singular_translation() {
        let entry = Entry::build_plural("%d file", "%d files")
            .with_translation("stray")
            .done();
        assert_eq!(classify(&entry), Untranslated);
    }

    #[test]
    fn test_obsolete_is_exempt_regardless_of_translation() {
        let cases = [
            Entry::build_singular("a").obsolete().done(),
            Entry::build_singular("a").with_translation("A").obsolete().done(),
            Entry::build_plural("a", "as").obsolete().done(),
            Entry::build_plural("a", "as")
                .with_plural_translation(0, "A")
                .obsolete()
                .done(),
        ];
        for entry in cases {
            assert_eq!(classify(&entry), Exempt, "{entry:?}");
        }
    }

    #[test]
    fn test_header_is_exempt_regardless_of_translation() {
        let cases = [
            Entry::build_singular("").done(),
            Entry::build_singular("").with_translation("Language: ko\n").done(),
            Entry::build_singular("").with_context("").done(),
        ];
        for entry in cases {
            assert_eq!(classify(&entry), Exempt, "{entry:?}");
        }
        let catalog = Catalog::load(b"msgid \"\"\nmsgstr \"Language: ko\\n\"\n").unwrap();
        assert_eq!(classify(catalog.header().unwrap()), Exempt);
    }

    #[test]
    fn test_empty_source_with_context_is_not_a_header() {
        let entry = Entry::build_singular("").with_context("ctx").done();
        assert_eq!(classify(&entry), Untranslated);
    }

    #[test]
    fn test_fuzzy_does_not_change_state() {
        let translated = Entry::build_singular("a")
            .with_translation("A")
            .with_flag(FUZZY)
            .done();
        let untranslated = Entry::build_singular("a").with_flag(FUZZY).done();
        assert_eq!(classify(&translated), Translated);
        assert_eq!(classify(&untranslated), Untranslated);
    }

    #[test]
    fn test_classification_is_total() {
        let catalog = Catalog::load(
            br#"msgid ""
msgstr "Language: ko\n"

msgid "a"
msgstr ""

msgid "b"
msgstr "B"

msgid "c"
msgid_plural "cs"
msgstr[0] ""
msgstr[1] "C"

#~ msgid "d"
#~ msgstr "D"
"#,
        )
        .unwrap();
        let states = catalog.entries().map(classify).collect::<Vec<_>>();
        assert_eq!(states, [Untranslated, Translated, Translated, Exempt]);
        assert!(is_untranslated(catalog.entries().next().unwrap()));
        assert!(is_translated(catalog.entries().nth(1).unwrap()));
    }
}
