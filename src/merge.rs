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


//! Merge translated results back into a catalog.
//!
//! [`merge`] takes three catalogs:
//!
//! - `base`: the catalog being completed, possibly partially translated,
//! - `scope`: the entries that were put out for translation, usually
//!   produced by [`crate::extract::remaining_work`],
//! - `result`: the translations that came back.
//!
//! Only entries of `base` whose key is in `scope` can change, and an
//! existing translation is never overwritten unless
//! [`MergeOptions::overwrite_translated`] is set. Entries of `result`
//! are always found by key; their order is irrelevant.

use std::collections::HashSet;

use crate::catalog::{Catalog, FUZZY};
use crate::key::IdentityKey;
use crate::state::{classify, TranslationState};

/// Policy knobs for [`merge_with_options`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Replace translations which already exist in `base` when `result`
    /// has a different non-blank translation.
    pub overwrite_translated: bool,
}

/// What a merge did, for reporting to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Keys which received a translation from `result`.
    pub updated: Vec<IdentityKey>,
    /// In-scope keys for which `result` had no usable translation.
    pub missing: Vec<IdentityKey>,
    /// In-scope keys which do not exist in `base`.
    pub inconsistent: Vec<IdentityKey>,
}

impl MergeReport {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Has every in-scope entry been accounted for with a translation?
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// The outcome of a merge: the merged catalog and the report.
#[derive(Clone, Debug)]
pub struct Merged {
    pub catalog: Catalog,
    pub report: MergeReport,
}

/// Merge `result` into `base`, limited to the keys of `scope`.
pub fn merge(base: &Catalog, scope: &Catalog, result: &Catalog) -> Merged {
    merge_with_options(base, scope, result, MergeOptions::default())
}

/// Like [`merge`], with an explicit policy.
pub fn merge_with_options(
    base: &Catalog,
    scope: &Catalog,
    result: &Catalog,
    options: MergeOptions,
) -> Merged {
    let mut report = MergeReport::default();

    let mut in_scope = HashSet::new();
    for entry in scope.live_entries() {
        let key = entry.key();
        if base.contains(&key) {
            in_scope.insert(key);
        } else {
            log::warn!(
                "Entry {key} (line {}) is in scope but missing from the base catalog, skipping",
                entry.line()
            );
            report.inconsistent.push(key);
        }
    }

    let mut merged = base.clone();
    for mut entry in merged.entries_mut() {
        if entry.is_obsolete() {
            continue;
        }
        let key = entry.key();
        if !in_scope.contains(&key) {
            continue;
        }

        let base_state = classify(&entry);
        if base_state == TranslationState::Translated && !options.overwrite_translated {
            continue;
        }

        let translation = result
            .lookup(&key)
            .filter(|candidate| classify(candidate) == TranslationState::Translated);
        match translation {
            Some(candidate) => {
                let unchanged = entry.translation() == candidate.translation()
                    && entry.plural_translations() == candidate.plural_translations();
                if unchanged {
                    continue;
                }
                log::debug!("Updating {key}");
                entry.copy_translation_from(candidate);
                entry.remove_flag(FUZZY);
                report.updated.push(key);
            }
            None if base_state == TranslationState::Translated => {}
            None => {
                log::debug!("No translation for {key}");
                report.missing.push(key);
            }
        }
    }

    log::info!(
        "Merged {} translations, {} still missing",
        report.updated_count(),
        report.missing_count()
    );
    if !report.inconsistent.is_empty() {
        log::warn!(
            "{} in-scope entries were not found in the base catalog",
            report.inconsistent.len()
        );
    }

    Merged {
        catalog: merged,
        report,
    }
}
