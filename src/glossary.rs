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


//! Glossary post-processing.
//!
//! A [`Glossary`] maps English source terms to their agreed target
//! terms. [`Glossary::apply`] is a conservative correction pass: it only
//! rewrites a translation when the source term leaked into it verbatim
//! and the target term is absent. [`Glossary::verify`] reports entries
//! whose translation lacks the expected target term and changes nothing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::{NoExpand, Regex, RegexBuilder};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::key::IdentityKey;
use crate::state::{is_blank, is_translated};

/// A compiled glossary term.
#[derive(Debug, Clone)]
struct Term {
    source: String,
    target: String,
    /// Finds the term in source text, with Unicode word boundaries.
    mention: Regex,
    /// Finds the term left verbatim in a translation. Only ASCII letters
    /// delimit it, so a particle written directly after the term, as in
    /// "Availability Zone을", does not hide it.
    leak: Regex,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_ascii_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Pattern text for `source`, with `boundary` on each side where the
/// term starts or ends with a character accepted by `is_word`.
///
/// Words may be separated by a space, a hyphen, an underscore or
/// nothing at all, and a term ending in a letter may take a trailing
/// `s` or `es`.
fn term_pattern(source: &str, boundary: &str, is_word: fn(char) -> bool) -> String {
    let words = source
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>();
    let first = words.first().and_then(|word| word.chars().next());
    let last = words.last().and_then(|word| word.chars().next_back());
    let words = words.into_iter().map(regex::escape).collect::<Vec<_>>();

    let mut pattern = String::new();
    if first.is_some_and(is_word) {
        pattern.push_str(boundary);
    }
    pattern.push_str(&words.join(r"[-_\s]?"));
    if last.is_some_and(char::is_alphabetic) {
        pattern.push_str("(?:e?s)?");
    }
    if last.is_some_and(is_word) {
        pattern.push_str(boundary);
    }
    pattern
}

impl Term {
    /// Compile `source` into case-insensitive patterns.
    fn new(source: &str, target: &str) -> Result<Term> {
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|err| Error::Glossary {
                    term: source.to_string(),
                    source: err,
                })
        };
        Ok(Term {
            source: source.to_string(),
            target: target.to_string(),
            mention: compile(&term_pattern(source, r"\b", is_word_char))?,
            leak: compile(&term_pattern(source, r"(?-u:\b)", is_ascii_word_char))?,
        })
    }

    /// Replace a leaked source term in `text`, unless the target term is
    /// already there.
    fn correct(&self, text: &str) -> String {
        if text.contains(&self.target) || !self.leak.is_match(text) {
            return text.to_string();
        }
        self.leak
            .replace_all(text, NoExpand(&self.target))
            .into_owned()
    }
}

/// A missing glossary term in a translated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryViolation {
    pub key: IdentityKey,
    pub source_term: String,
    pub expected_target: String,
    /// Line of the entry in the file it was loaded from.
    pub line: usize,
}

/// Source term to target term mapping with compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    /// Longest source terms first, so that "Availability Zone" is
    /// corrected before "Zone".
    terms: Vec<Term>,
}

impl Glossary {
    pub fn new(terms: &BTreeMap<String, String>) -> Result<Glossary> {
        let mut compiled = Vec::with_capacity(terms.len());
        for (source, target) in terms {
            if is_blank(source) || is_blank(target) {
                log::warn!("Ignoring incomplete glossary term {source:?} -> {target:?}");
                continue;
            }
            compiled.push(Term::new(source, target)?);
        }
        compiled.sort_by(|a, b| {
            b.source
                .chars()
                .count()
                .cmp(&a.source.chars().count())
                .then_with(|| a.source.cmp(&b.source))
        });
        Ok(Glossary { terms: compiled })
    }

    /// Load a glossary from a JSON object of source to target terms.
    pub fn load_json(path: &Path) -> Result<Glossary> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingInput {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(Error::io(path, err)),
        };
        let terms: BTreeMap<String, String> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Glossary::new(&terms)
    }

    /// Build a glossary from the translated, singular entries of a
    /// catalog. When a source appears with several contexts, the first
    /// translation wins.
    pub fn from_catalog(catalog: &Catalog) -> Result<Glossary> {
        let mut terms = BTreeMap::new();
        for entry in catalog.live_entries() {
            if entry.is_plural() || !is_translated(entry) {
                continue;
            }
            terms
                .entry(entry.source().trim().to_string())
                .or_insert_with(|| entry.translation().trim().to_string());
        }
        Glossary::new(&terms)
    }

    /// Write the glossary as a JSON object, for caching.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_map()).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
        fs::write(path, json + "\n").map_err(|err| Error::io(path, err))
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.terms
            .iter()
            .map(|term| (term.source.clone(), term.target.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Correct leaked source terms in the translations of `catalog`.
    ///
    /// Only translated entries whose source mentions a term are looked
    /// at. Returns the keys of the entries which changed.
    pub fn apply(&self, catalog: &mut Catalog) -> Vec<IdentityKey> {
        let mut changed = Vec::new();
        for mut entry in catalog.entries_mut() {
            if !is_translated(&entry) {
                continue;
            }
            let mut translation = entry.translation().to_string();
            let mut plurals = entry.plural_translations().clone();
            for term in &self.terms {
                let mentioned = term.mention.is_match(entry.source())
                    || entry
                        .source_plural()
                        .is_some_and(|plural| term.mention.is_match(plural));
                if !mentioned {
                    continue;
                }
                translation = term.correct(&translation);
                for value in plurals.values_mut() {
                    *value = term.correct(value);
                }
            }

            if translation != entry.translation() || &plurals != entry.plural_translations() {
                log::debug!("Glossary corrected {}", entry.key());
                entry.set_translation(translation);
                entry.set_plural_translations(plurals);
                changed.push(entry.key());
            }
        }
        log::info!("Glossary changed {} entries", changed.len());
        changed
    }

    /// Find translated entries whose source mentions a term but whose
    /// translation lacks the target term. Logs one warning per violation.
    pub fn verify(&self, catalog: &Catalog) -> Vec<GlossaryViolation> {
        let mut violations = Vec::new();
        for entry in catalog.live_entries() {
            if !is_translated(entry) {
                continue;
            }
            let translations = if entry.is_plural() {
                entry
                    .plural_translations()
                    .values()
                    .map(String::as_str)
                    .filter(|value| !is_blank(value))
                    .collect::<Vec<_>>()
            } else {
                vec![entry.translation()]
            };
            for term in &self.terms {
                if !term.mention.is_match(entry.source()) {
                    continue;
                }
                if translations.iter().all(|value| value.contains(&term.target)) {
                    continue;
                }
                log::warn!(
                    "Line {}: {:?} should be translated as {:?}",
                    entry.line(),
                    term.source,
                    term.target
                );
                violations.push(GlossaryViolation {
                    key: entry.key(),
                    source_term: term.source.clone(),
                    expected_target: term.target.clone(),
                    line: entry.line(),
                });
            }
        }
        violations
    }
}
