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


//! Optional `po-translate.toml` configuration.
//!
//! ```toml
//! glossary = "glossary/ko.json"
//! batch_size = 10
//! run_log = "experiments.json"
//!
//! [files]
//! project = "nova"
//! languages = ["ko", "ja"]
//! template = "data/pot/{project}.pot"
//! translated = "data/po/{lang}/{project}.po"
//! fallback = "data/target/{lang}/{project}.pot"
//! ```
//!
//! Command line flags always take precedence over these values.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::error::{Error, Result};

/// File name looked up in the working directory when no configuration
/// file is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "po-translate.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Glossary used by the glossary commands, JSON or PO.
    pub glossary: Option<PathBuf>,
    /// Entries per translation batch file.
    pub batch_size: usize,
    /// JSON file to which run records are appended.
    pub run_log: Option<PathBuf>,
    pub files: FileLayout,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            glossary: None,
            batch_size: DEFAULT_BATCH_SIZE,
            run_log: None,
            files: FileLayout::default(),
        }
    }
}

/// Where the catalogs of a project live, as path templates.
///
/// `{project}` and `{lang}` are replaced in each template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLayout {
    pub project: Option<String>,
    pub languages: Vec<String>,
    /// The POT template of the project.
    pub template: Option<String>,
    /// The translated catalog of a language.
    pub translated: Option<String>,
    /// Catalog used as the source of remaining work when the translated
    /// catalog of a language does not exist.
    pub fallback: Option<String>,
}

impl FileLayout {
    pub fn template_path(&self, language: &str) -> Option<PathBuf> {
        self.expand(self.template.as_deref()?, language)
    }

    pub fn translated_path(&self, language: &str) -> Option<PathBuf> {
        self.expand(self.translated.as_deref()?, language)
    }

    pub fn fallback_path(&self, language: &str) -> Option<PathBuf> {
        self.expand(self.fallback.as_deref()?, language)
    }

    fn expand(&self, template: &str, language: &str) -> Option<PathBuf> {
        let mut path = template.replace("{lang}", language);
        if path.contains("{project}") {
            match &self.project {
                Some(project) => path = path.replace("{project}", project),
                None => {
                    log::warn!("Path template {template:?} needs a project name");
                    return None;
                }
            }
        }
        Some(PathBuf::from(path))
    }
}

impl Config {
    /// Parse a configuration file.
    pub fn load(path: &Path) -> Result<Config> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Error::MissingInput {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(Error::io(path, err)),
        };
        toml::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.exists() {
            log::info!("Using configuration from {DEFAULT_CONFIG_FILE}");
            Config::load(default)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("po-translate.toml");
        fs::write(
            &path,
            r#"
            glossary = "glossary/ko.json"
            batch_size = 10

            [files]
            project = "nova"
            languages = ["ko", "ja"]
            translated = "data/po/{lang}/{project}.po"
            fallback = "data/target/{lang}/{project}.pot"
            "#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.glossary, Some(PathBuf::from("glossary/ko.json")));
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.run_log, None);
        assert_eq!(config.files.languages, ["ko", "ja"]);
        assert_eq!(
            config.files.translated_path("ko"),
            Some(PathBuf::from("data/po/ko/nova.po"))
        );
        assert_eq!(
            config.files.fallback_path("ja"),
            Some(PathBuf::from("data/target/ja/nova.pot"))
        );
        assert_eq!(config.files.template_path("ko"), None);
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_template_without_project() {
        let layout = FileLayout {
            template: Some(String::from("pot/{project}.pot")),
            ..FileLayout::default()
        };
        assert_eq!(layout.template_path("ko"), None);
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "batch_size = \"many\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
        fs::write(&path, "unknown = 1\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(Error::MissingInput { .. })
        ));
    }
}
