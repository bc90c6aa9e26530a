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


//! Translation batches.
//!
//! A template is split into small JSON files which an external
//! translation process answers one at a time. The answered files are
//! collected back into a `result` catalog for [`crate::merge`].
//!
//! Each batch file is a JSON array of items:
//!
//! ```json
//! [
//!   {"msgctxt": "button", "msgid": "Launch", "msgstr": "시작"},
//!   {"msgid": "%d file", "msgid_plural": "%d files", "msgstr_plural": ["파일 %d개"]}
//! ]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::extract::template_entry;
use crate::key::IdentityKey;

/// Number of entries per batch file unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// One request, and possibly its answer, in a batch file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgctxt: Option<String>,
    pub msgid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgid_plural: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgstr: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub msgstr_plural: Vec<String>,
}

impl BatchItem {
    pub fn key(&self) -> IdentityKey {
        IdentityKey::new(
            self.msgctxt.as_deref().filter(|ctx| !ctx.is_empty()),
            &self.msgid,
            self.msgid_plural.as_deref(),
        )
    }
}

/// Split the live entries of `template` into batches of at most
/// `batch_size` requests.
pub fn split(template: &Catalog, batch_size: usize) -> Vec<Vec<BatchItem>> {
    let items = template
        .live_entries()
        .map(|entry| BatchItem {
            msgctxt: entry.context().map(str::to_string),
            msgid: entry.source().to_string(),
            msgid_plural: entry.source_plural().map(str::to_string),
            ..BatchItem::default()
        })
        .collect::<Vec<_>>();
    items
        .chunks(batch_size.max(1))
        .map(<[BatchItem]>::to_vec)
        .collect()
}

/// Write `batches` as `batch_0001.json`, `batch_0002.json`, ... in `dir`.
pub fn write_batches(dir: &Path, batches: &[Vec<BatchItem>]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;
    let mut paths = Vec::with_capacity(batches.len());
    for (idx, batch) in batches.iter().enumerate() {
        let path = dir.join(format!("batch_{:04}.json", idx + 1));
        let json = serde_json::to_string_pretty(batch).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json + "\n").map_err(|err| Error::io(&path, err))?;
        paths.push(path);
    }
    log::info!("Wrote {} batch files to {}", paths.len(), dir.display());
    Ok(paths)
}

/// Read every `*.json` file in `dir`, in file name order.
pub fn read_batches(dir: &Path) -> Result<Vec<BatchItem>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingInput {
                path: dir.to_path_buf(),
            })
        }
        Err(err) => return Err(Error::io(dir, err)),
    };
    let mut paths = Vec::new();
    for dir_entry in read_dir {
        let path = dir_entry.map_err(|err| Error::io(dir, err))?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut items = Vec::new();
    for path in paths {
        let bytes = fs::read(&path).map_err(|err| Error::io(&path, err))?;
        let batch: Vec<BatchItem> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Json {
                path: path.clone(),
                source,
            })?;
        log::debug!("Read {} items from {}", batch.len(), path.display());
        items.extend(batch);
    }
    Ok(items)
}

/// Build a `result` catalog from answered batch items.
///
/// Every live entry of `template` appears in the result, in template
/// order. Entries without an answer stay blank. Items whose key is not
/// in `template` are skipped with a warning. When a key is answered
/// twice, the last answer wins.
pub fn collect(template: &Catalog, items: &[BatchItem]) -> Catalog {
    let mut answers = HashMap::new();
    for item in items {
        let key = item.key();
        if template.contains(&key) {
            answers.insert(key, item);
        } else {
            log::warn!("Batch item {key} is not in the template, skipping");
        }
    }

    let mut result = Catalog::with_header_of(template);
    let mut answered = 0;
    for entry in template.live_entries() {
        let mut entry = template_entry(entry);
        if let Some(item) = answers.get(&entry.key()) {
            if entry.is_plural() {
                let plurals = item
                    .msgstr_plural
                    .iter()
                    .cloned()
                    .enumerate()
                    .collect();
                entry.set_plural_translations(plurals);
            } else {
                entry.set_translation(item.msgstr.clone().unwrap_or_default());
            }
            answered += 1;
        }
        result.append_or_update(entry);
    }
    log::info!(
        "Collected {answered} answers for {} template entries",
        result.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entry, Metadata};
    use crate::state::{classify, TranslationState};
    use pretty_assertions::assert_eq;

    fn create_template() -> Catalog {
        let mut template = Catalog::new(Metadata::for_language("ko"));
        template.append_or_update(Entry::build_singular("Launch").with_context("button").done());
        template.append_or_update(Entry::build_singular("Volumes").done());
        template.append_or_update(Entry::build_plural("%d file", "%d files").done());
        template.append_or_update(Entry::build_singular("Gone").obsolete().done());
        template
    }

    #[test]
    fn test_split() {
        let batches = split(&create_template(), 2);
        assert_eq!(batches.len(), 2);
        assert_eq!(
            batches[0],
            [
                BatchItem {
                    msgctxt: Some(String::from("button")),
                    msgid: String::from("Launch"),
                    ..BatchItem::default()
                },
                BatchItem {
                    msgid: String::from("Volumes"),
                    ..BatchItem::default()
                },
            ]
        );
        assert_eq!(batches[1][0].msgid_plural.as_deref(), Some("%d files"));
    }

    #[test]
    fn test_split_zero_batch_size() {
        assert_eq!(split(&create_template(), 0).len(), 3);
    }

    #[test]
    fn test_batch_json_format() {
        let json = serde_json::to_string(&split(&create_template(), 20)[0]).unwrap();
        assert_eq!(
            json,
            r#"[{"msgctxt":"button","msgid":"Launch"},{"msgid":"Volumes"},{"msgid":"%d file","msgid_plural":"%d files"}]"#
        );
    }

    #[test]
    fn test_write_read_collect() {
        let template = create_template();
        let dir = tempfile::tempdir().unwrap();
        let paths = write_batches(dir.path(), &split(&template, 2)).unwrap();
        assert_eq!(
            paths,
            [
                dir.path().join("batch_0001.json"),
                dir.path().join("batch_0002.json")
            ]
        );

        fs::write(
            dir.path().join("batch_0001.json"),
            r#"[
              {"msgctxt": "button", "msgid": "Launch", "msgstr": "시작"},
              {"msgid": "Volumes", "msgstr": ""},
              {"msgid": "Unknown", "msgstr": "?"}
            ]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("batch_0002.json"),
            r#"[{"msgid": "%d file", "msgid_plural": "%d files", "msgstr_plural": ["파일 %d개"]}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let items = read_batches(dir.path()).unwrap();
        assert_eq!(items.len(), 4);
        let result = collect(&template, &items);
        assert_eq!(result.len(), 3);
        assert_eq!(result.metadata(), template.metadata());

        let launch = result
            .lookup(&IdentityKey::new(Some("button"), "Launch", None))
            .unwrap();
        assert_eq!(launch.translation(), "시작");
        let volumes = result.lookup(&IdentityKey::new(None, "Volumes", None)).unwrap();
        assert_eq!(classify(volumes), TranslationState::Untranslated);
        let files = result
            .lookup(&IdentityKey::new(None, "%d file", Some("%d files")))
            .unwrap();
        assert_eq!(files.plural_translations()[&0], "파일 %d개");
    }

    #[test]
    fn test_read_batches_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_batches(&dir.path().join("missing")),
            Err(Error::MissingInput { .. })
        ));
        fs::write(dir.path().join("batch_0001.json"), "{}").unwrap();
        assert!(matches!(
            read_batches(dir.path()),
            Err(Error::Json { .. })
        ));
    }
}
