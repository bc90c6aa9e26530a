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

//! Error types for catalog reconciliation.
//!
//! Only defects which make an operation impossible are errors. Missing
//! translations, scope inconsistencies and glossary violations are
//! reported as values so that a single bad entry never aborts the
//! processing of a whole catalog.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for catalog operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog could not be parsed.
    #[error("parse error on line {line}: {kind}")]
    Parse {
        /// One-based line number where the defect was detected.
        line: usize,
        /// What is wrong with the input.
        kind: ParseErrorKind,
    },

    /// A required input file does not exist.
    #[error("required input is missing: {}", path.display())]
    MissingInput {
        /// The path which was expected to exist.
        path: PathBuf,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON document (glossary, batch file, run log) is malformed.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file is malformed.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// A glossary term cannot be turned into a pattern.
    #[error("invalid glossary term {term:?}: {source}")]
    Glossary {
        /// The source term.
        term: String,
        /// The underlying error.
        #[source]
        source: regex::Error,
    },
}

/// The specific defect behind an [`Error::Parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    /// A quoted string is missing its closing quote.
    #[error("unterminated string")]
    UnterminatedString,

    /// A backslash escape is not one of the Gettext escapes.
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),

    /// The line does not start with a known keyword, comment or string.
    #[error("unexpected line {0:?}")]
    UnexpectedLine(String),

    /// A continuation string appears before any keyword.
    #[error("string continuation without a preceding keyword")]
    OrphanContinuation,

    /// A keyword appears in an invalid position.
    #[error("unexpected keyword {0}")]
    UnexpectedKeyword(String),

    /// An entry has a `msgctxt` but no `msgid`.
    #[error("entry has no msgid")]
    MissingMsgid,

    /// An entry has a `msgid` but no `msgstr`.
    #[error("entry has no msgstr")]
    MissingMsgstr,

    /// A plural translation index is malformed or out of range.
    #[error("invalid plural index {0:?}")]
    InvalidPluralIndex(String),

    /// `msgstr[N]` is used on an entry without `msgid_plural`, or the
    /// other way around.
    #[error("plural and singular forms are mixed")]
    PluralMismatch,

    /// The header entry is not the first entry, or appears twice.
    #[error("header entry must appear once, before all other entries")]
    MisplacedHeader,

    /// A header line is not of the form `Key: value`.
    #[error("malformed header line {0:?}")]
    MalformedHeader(String),

    /// The `Plural-Forms` header cannot be understood.
    #[error("invalid Plural-Forms header {0:?}")]
    InvalidPluralForms(String),

    /// Two live entries share the same identity key.
    #[error("duplicate entry {0}")]
    DuplicateEntry(String),
}

impl Error {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        Error::Parse { line, kind }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
