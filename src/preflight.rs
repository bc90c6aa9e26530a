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


//! Pre-flight materialization of working files.
//!
//! Some workflows expect a translated catalog to exist before anything
//! has been translated. Creating it is an explicit step which runs before
//! any catalog is loaded, never a side effect of extraction or merging.

use std::path::Path;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::files::write_catalog;

/// Create `path` as a header-only catalog when it does not exist.
///
/// The header is copied from `header_of`. Returns whether a file was
/// created; an existing file is left untouched.
pub fn ensure_catalog_file(path: &Path, header_of: &Catalog) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    log::info!("Creating empty catalog {}", path.display());
    write_catalog(path, &Catalog::with_header_of(header_of))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entry, Metadata};
    use crate::files::read_catalog;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_creates_header_only_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target/ko/nova.po");
        let mut template = Catalog::new(Metadata::for_language("ko"));
        template.append_or_update(Entry::build_singular("Instance").done());

        assert!(ensure_catalog_file(&path, &template).unwrap());
        let created = read_catalog(&path).unwrap();
        assert!(created.is_empty());
        assert_eq!(created.metadata(), template.metadata());
    }

    #[test]
    fn test_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nova.po");
        fs::write(&path, "msgid \"a\"\nmsgstr \"A\"\n").unwrap();

        assert!(!ensure_catalog_file(&path, &Catalog::default()).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "msgid \"a\"\nmsgstr \"A\"\n"
        );
    }
}
