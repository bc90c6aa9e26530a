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


//! Reading and writing catalogs on disk.
//!
//! The reconciliation functions never touch the filesystem; the CLI goes
//! through these helpers so that a missing required input is reported
//! as [`Error::MissingInput`] instead of a bare I/O error.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Load the catalog at `path`, which must exist.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    read_catalog_if_exists(path)?.ok_or_else(|| Error::MissingInput {
        path: path.to_path_buf(),
    })
}

/// Load the catalog at `path`, or `None` if there is no such file.
pub fn read_catalog_if_exists(path: &Path) -> Result<Option<Catalog>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::io(path, err)),
    };
    log::debug!("Loading {}", path.display());
    Catalog::load(&bytes).map(Some)
}

/// Save `catalog` to `path`, creating parent directories as needed.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    create_parent_dir(path)?;
    fs::write(path, catalog.save()).map_err(|err| Error::io(path, err))?;
    log::info!("Wrote {} entries to {}", catalog.len(), path.display());
    Ok(())
}

pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Metadata;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ko.po");
        assert!(read_catalog_if_exists(&path).unwrap().is_none());
        match read_catalog(&path) {
            Err(Error::MissingInput { path: missing }) => assert_eq!(missing, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ko/LC_MESSAGES/nova.po");
        let catalog = Catalog::new(Metadata::for_language("ko"));
        write_catalog(&path, &catalog).unwrap();
        assert_eq!(read_catalog(&path).unwrap().metadata(), catalog.metadata());
    }

    #[test]
    fn test_read_unparseable_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.po");
        fs::write(&path, "msgid \"unterminated\nmsgstr \"\"\n").unwrap();
        assert!(matches!(read_catalog(&path), Err(Error::Parse { line: 1, .. })));
    }
}
