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


//! Append-only JSON log of pipeline runs.
//!
//! The log file holds a JSON array of [`RunRecord`]s, one per command
//! invocation, so that runs over many languages can be compared later.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::files::create_parent_dir;

/// One run of a pipeline command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: String,
    pub command: String,
    pub inputs: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub dry_run: bool,
    /// Named counters, such as `updated` and `missing`.
    #[serde(default)]
    pub counts: BTreeMap<String, usize>,
}

impl RunRecord {
    pub fn new(command: &str) -> RunRecord {
        let now = chrono::Local::now();
        RunRecord {
            timestamp: now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            command: command.to_string(),
            inputs: Vec::new(),
            output: None,
            dry_run: false,
            counts: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, path: &Path) -> Self {
        self.inputs.push(path.to_path_buf());
        self
    }

    pub fn with_output(mut self, path: &Path) -> Self {
        self.output = Some(path.to_path_buf());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_count(mut self, name: &str, count: usize) -> Self {
        self.counts.insert(name.to_string(), count);
        self
    }
}

/// Append `record` to the JSON array in `path`, creating the file if
/// needed. A file holding a single object is turned into an array.
pub fn append_run_record(path: &Path, record: &RunRecord) -> Result<()> {
    let json_error = |source| Error::Json {
        path: path.to_path_buf(),
        source,
    };
    let mut records = match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes).map_err(json_error)? {
            Value::Array(records) => records,
            other => vec![other],
        },
        Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(Error::io(path, err)),
    };
    records.push(serde_json::to_value(record).map_err(json_error)?);

    let json = serde_json::to_string_pretty(&records).map_err(json_error)?;
    create_parent_dir(path)?;
    fs::write(path, json + "\n").map_err(|err| Error::io(path, err))?;
    log::debug!("Appended run record to {}", path.display());
    Ok(())
}
