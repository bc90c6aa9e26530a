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


//! Catalog header metadata.

use crate::catalog::MAX_PLURAL_FORMS;
use crate::error::{Error, ParseErrorKind, Result};

/// Header fields of a catalog, in the order they appear in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Metadata {
        Metadata::default()
    }

    /// Metadata for a new UTF-8 catalog in `language`.
    ///
    /// The fields are the ones msginit writes, with placeholders where
    /// msginit would ask the translator.
    pub fn for_language(language: &str) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.set("Project-Id-Version", "PACKAGE VERSION");
        metadata.set("Report-Msgid-Bugs-To", "");
        metadata.set("POT-Creation-Date", "YEAR-MO-DA HO:MI+ZONE");
        metadata.set("PO-Revision-Date", "YEAR-MO-DA HO:MI+ZONE");
        metadata.set("Last-Translator", "FULL NAME <EMAIL@ADDRESS>");
        metadata.set("Language-Team", "LANGUAGE <LL@li.org>");
        metadata.set("Language", language);
        metadata.set("MIME-Version", "1.0");
        metadata.set("Content-Type", "text/plain; charset=UTF-8");
        metadata.set("Content-Transfer-Encoding", "8bit");
        metadata.set("Plural-Forms", default_plural_forms(language));
        metadata
    }

    /// Parse the `msgstr` of a header entry.
    ///
    /// `line` is used for error reporting.
    pub(crate) fn parse(text: &str, line: usize) -> Result<Metadata> {
        let mut metadata = Metadata::new();
        for header_line in text.split('\n') {
            if header_line.trim().is_empty() {
                continue;
            }
            let (key, value) = header_line.split_once(':').ok_or_else(|| {
                Error::parse(line, ParseErrorKind::MalformedHeader(header_line.to_string()))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::parse(
                    line,
                    ParseErrorKind::MalformedHeader(header_line.to_string()),
                ));
            }
            metadata.fields.push((key.to_string(), value.trim().to_string()));
        }

        if let Some(plural_forms) = metadata.get("Plural-Forms") {
            if !is_template_plural_forms(plural_forms) {
                PluralForms::parse(plural_forms).ok_or_else(|| {
                    Error::parse(
                        line,
                        ParseErrorKind::InvalidPluralForms(plural_forms.to_string()),
                    )
                })?;
            }
        }

        Ok(metadata)
    }

    /// Look up a field. Keys are compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Set a field, keeping its position if it already exists.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn language(&self) -> Option<&str> {
        self.get("Language").filter(|language| !language.is_empty())
    }

    /// Parsed `Plural-Forms`, if present and not a template placeholder.
    pub fn plural_forms(&self) -> Option<PluralForms> {
        self.get("Plural-Forms")
            .filter(|value| !is_template_plural_forms(value))
            .and_then(PluralForms::parse)
    }

    /// Does the `Content-Type` declare UTF-8?
    pub fn is_utf8(&self) -> bool {
        self.get("Content-Type")
            .is_some_and(|value| value.to_ascii_lowercase().contains("charset=utf-8"))
    }

    /// Make sure the catalog declares a UTF-8 `Content-Type` and, if
    /// missing and known, a `Language`.
    pub fn ensure_defaults(&mut self, language: Option<&str>) {
        if !self.is_utf8() {
            self.set("Content-Type", "text/plain; charset=UTF-8");
        }
        if let Some(language) = language {
            if self.language().is_none() {
                self.set("Language", language);
            }
        }
    }
}

/// Plural rule for languages without plural distinctions, and the
/// Germanic rule for everything else.
fn default_plural_forms(language: &str) -> &'static str {
    let base = language.split(['_', '-']).next().unwrap_or_default();
    match base {
        "ja" | "ko" | "zh" | "vi" | "th" | "id" | "ms" => "nplurals=1; plural=0;",
        _ => "nplurals=2; plural=(n != 1);",
    }
}

/// xgettext writes placeholders into fresh templates.
fn is_template_plural_forms(value: &str) -> bool {
    value.contains("nplurals=INTEGER")
}

/// The `Plural-Forms` header: number of forms and the selection rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluralForms {
    pub nplurals: usize,
    pub plural: String,
}

impl PluralForms {
    /// Parse a value such as `nplurals=2; plural=(n != 1);`.
    pub fn parse(value: &str) -> Option<PluralForms> {
        let mut nplurals = None;
        let mut plural = None;
        for part in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=')?;
            match key.trim() {
                "nplurals" => nplurals = value.trim().parse::<usize>().ok(),
                "plural" => plural = Some(value.trim().to_string()),
                _ => return None,
            }
        }
        let nplurals = nplurals.filter(|n| (1..=MAX_PLURAL_FORMS).contains(n))?;
        let plural = plural.filter(|p| !p.is_empty())?;
        Some(PluralForms { nplurals, plural })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        let metadata = Metadata::parse(
            "Project-Id-Version: nova\nLanguage: ko\nContent-Type: text/plain; charset=UTF-8\n",
            1,
        )
        .unwrap();
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            [
                ("Project-Id-Version", "nova"),
                ("Language", "ko"),
                ("Content-Type", "text/plain; charset=UTF-8"),
            ]
        );
        assert!(metadata.is_utf8());
        assert_eq!(metadata.language(), Some("ko"));
    }

    #[test]
    fn test_parse_header_without_separator() {
        let err = Metadata::parse("Language ko\n", 3).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                line: 3,
                kind: ParseErrorKind::MalformedHeader(_)
            }
        ));
    }

    #[test]
    fn test_parse_invalid_plural_forms() {
        for value in [
            "nplurals=; plural=n;",
            "nplurals=0; plural=0;",
            "nplurals=9; plural=n;",
            "nplurals=2;",
            "plural=(n != 1);",
            "nplurals=2 plural=(n != 1)",
        ] {
            let header = format!("Plural-Forms: {value}\n");
            assert!(
                matches!(
                    Metadata::parse(&header, 1),
                    Err(Error::Parse {
                        kind: ParseErrorKind::InvalidPluralForms(_),
                        ..
                    })
                ),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_template_plural_forms_are_accepted() {
        let metadata =
            Metadata::parse("Plural-Forms: nplurals=INTEGER; plural=EXPRESSION;\n", 1).unwrap();
        assert_eq!(metadata.plural_forms(), None);
    }

    #[test]
    fn test_plural_forms() {
        assert_eq!(
            PluralForms::parse("nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : 1);"),
            Some(PluralForms {
                nplurals: 3,
                plural: String::from("(n%10==1 && n%100!=11 ? 0 : 1)")
            })
        );
    }

    #[test]
    fn test_set_keeps_position() {
        let mut metadata = Metadata::for_language("ko");
        let position = |metadata: &Metadata| {
            metadata
                .iter()
                .position(|(k, _)| k == "Content-Type")
                .unwrap()
        };
        let before = position(&metadata);
        metadata.set("content-type", "text/plain; charset=ASCII");
        assert_eq!(position(&metadata), before);
        assert!(!metadata.is_utf8());
        metadata.ensure_defaults(Some("ja"));
        assert!(metadata.is_utf8());
        assert_eq!(metadata.language(), Some("ko"));
    }

    #[test]
    fn test_for_language_defaults() {
        let metadata = Metadata::for_language("ko");
        assert!(metadata.is_utf8());
        assert_eq!(metadata.language(), Some("ko"));
        assert_eq!(metadata.plural_forms().map(|forms| forms.nplurals), Some(1));
        for key in [
            "Project-Id-Version",
            "POT-Creation-Date",
            "PO-Revision-Date",
            "Language-Team",
        ] {
            assert!(metadata.get(key).is_some(), "{key} is missing");
        }
        assert_eq!(
            Metadata::for_language("pt_BR").plural_forms().map(|forms| forms.nplurals),
            Some(2)
        );
    }

    #[test]
    fn test_ensure_defaults_fills_missing_fields() {
        let mut metadata = Metadata::new();
        metadata.ensure_defaults(Some("ja"));
        assert_eq!(
            metadata.iter().collect::<Vec<_>>(),
            [
                ("Content-Type", "text/plain; charset=UTF-8"),
                ("Language", "ja"),
            ]
        );
    }
}
