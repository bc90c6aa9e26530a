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


use std::fmt::{self, Display, Formatter};

use crate::catalog::Catalog;
use crate::state::{classify, TranslationState};

/// Counts of entry states in a catalog.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CatalogStats {
    pub language: String,
    pub translated_count: usize,
    pub untranslated_count: usize,
    pub fuzzy_translated_count: usize,
    pub fuzzy_untranslated_count: usize,
    /// Obsolete entries, which never need translation.
    pub obsolete_count: usize,
}

impl CatalogStats {
    /// Returns the number of live entries.
    pub fn total(&self) -> usize {
        self.translated_count
            + self.untranslated_count
            + self.fuzzy_translated_count
            + self.fuzzy_untranslated_count
    }

    /// Entries still needing a translation, fuzzy or not.
    pub fn missing(&self) -> usize {
        self.untranslated_count + self.fuzzy_untranslated_count
    }

    pub fn translated_percent(&self) -> f64 {
        match self.total() {
            0 => 100.0,
            total => {
                let translated = self.translated_count + self.fuzzy_translated_count;
                100.0 * translated as f64 / total as f64
            }
        }
    }

    /// Returns counts of entry states in the given catalog.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self {
            language: catalog.metadata().language().unwrap_or_default().to_string(),
            ..Self::default()
        };
        for entry in catalog.entries() {
            match classify(entry) {
                TranslationState::Exempt => stats.obsolete_count += 1,
                TranslationState::Translated if entry.is_fuzzy() => {
                    stats.fuzzy_translated_count += 1
                }
                TranslationState::Translated => stats.translated_count += 1,
                TranslationState::Untranslated if entry.is_fuzzy() => {
                    stats.fuzzy_untranslated_count += 1
                }
                TranslationState::Untranslated => stats.untranslated_count += 1,
            }
        }
        stats
    }
}

impl Display for CatalogStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let language = if self.language.is_empty() {
            "template"
        } else {
            &self.language
        };
        write!(
            f,
            "{}: {} ({}, {}) / {}, {:.1}% translated, {} obsolete",
            language,
            self.translated_count,
            self.fuzzy_translated_count,
            self.fuzzy_untranslated_count,
            self.total(),
            self.translated_percent(),
            self.obsolete_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_for_catalog() {
        let catalog = Catalog::load(
            "msgid \"\"\nmsgstr \"\"\n\"Language: ko\\n\"\n\n\
             msgid \"a\"\nmsgstr \"A\"\n\n\
             #, fuzzy\nmsgid \"b\"\nmsgstr \"B\"\n\n\
             #, fuzzy\nmsgid \"c\"\nmsgstr \"\"\n\n\
             msgid \"d\"\nmsgstr \" \"\n\n\
             #~ msgid \"e\"\n#~ msgstr \"\"\n"
                .as_bytes(),
        )
        .unwrap();
        let stats = CatalogStats::for_catalog(&catalog);
        assert_eq!(
            stats,
            CatalogStats {
                language: String::from("ko"),
                translated_count: 1,
                untranslated_count: 1,
                fuzzy_translated_count: 1,
                fuzzy_untranslated_count: 1,
                obsolete_count: 1,
            }
        );
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.missing(), 2);
        assert_eq!(
            stats.to_string(),
            "ko: 1 (1, 1) / 4, 50.0% translated, 1 obsolete"
        );
    }

    #[test]
    fn test_empty_template() {
        let stats = CatalogStats::for_catalog(&Catalog::default());
        assert_eq!(stats.total(), 0);
        assert_eq!(
            stats.to_string(),
            "template: 0 (0, 0) / 0, 100.0% translated, 0 obsolete"
        );
    }
}
