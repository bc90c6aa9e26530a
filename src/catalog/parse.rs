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


//! Parser for the Gettext PO/POT format.
//!
//! The parser is line based. Every entry remembers the exact lines it
//! was read from (comments included) so that it can be written back
//! unchanged.

use std::collections::{BTreeMap, HashMap};

use super::{Catalog, Entry, Location, Metadata, MAX_PLURAL_FORMS};
use crate::error::{Error, ParseErrorKind, Result};
use crate::key::IdentityKey;

const BOM: &str = "\u{feff}";

/// Which string a continuation line extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Source,
    SourcePlural,
    Translation,
    Plural(usize),
}

/// An entry whose lines are still being read.
#[derive(Debug, Default)]
struct Pending {
    first_line: usize,
    raw: String,
    context: Option<String>,
    source: Option<String>,
    source_plural: Option<String>,
    translation: Option<String>,
    plurals: BTreeMap<usize, String>,
    flags: Vec<String>,
    locations: Vec<Location>,
    translator_comments: Vec<String>,
    extracted_comments: Vec<String>,
    previous: Vec<String>,
    obsolete: bool,
    field: Option<Field>,
}

impl Pending {
    fn has_keyword(&self) -> bool {
        self.field.is_some()
    }

    fn is_complete(&self) -> bool {
        self.translation.is_some() || !self.plurals.is_empty()
    }

    fn has_content(&self) -> bool {
        !self.raw.is_empty()
    }

    fn start(&mut self, line: usize) {
        if !self.has_content() {
            self.first_line = line;
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Context => self.context.get_or_insert_with(String::new),
            Field::Source => self.source.get_or_insert_with(String::new),
            Field::SourcePlural => self.source_plural.get_or_insert_with(String::new),
            Field::Translation => self.translation.get_or_insert_with(String::new),
            Field::Plural(idx) => self.plurals.entry(idx).or_default(),
        }
    }

    fn into_entry(mut self) -> Result<Entry> {
        let Some(source) = self.source.take() else {
            return Err(Error::parse(self.first_line, ParseErrorKind::MissingMsgid));
        };
        if !self.is_complete() {
            return Err(Error::parse(self.first_line, ParseErrorKind::MissingMsgstr));
        }
        if !self.raw.ends_with('\n') {
            self.raw.push('\n');
        }
        Ok(Entry {
            context: self.context,
            source,
            source_plural: self.source_plural,
            translation: self.translation.unwrap_or_default(),
            plural_translations: self.plurals,
            flags: self.flags,
            locations: self.locations,
            translator_comments: self.translator_comments,
            extracted_comments: self.extracted_comments,
            previous: self.previous,
            obsolete: self.obsolete,
            line: self.first_line,
            raw: Some(self.raw),
        })
    }
}

/// Collects finished entries and enforces the catalog invariants.
#[derive(Debug, Default)]
struct Builder {
    header: Option<Entry>,
    metadata: Metadata,
    entries: Vec<Entry>,
    index: HashMap<IdentityKey, usize>,
}

impl Builder {
    fn push(&mut self, entry: Entry) -> Result<()> {
        if entry.is_header() {
            if self.header.is_some() || !self.entries.is_empty() {
                return Err(Error::parse(entry.line, ParseErrorKind::MisplacedHeader));
            }
            self.metadata = Metadata::parse(&entry.translation, entry.line)?;
            self.header = Some(entry);
            return Ok(());
        }
        if !entry.is_obsolete() {
            let key = entry.key();
            if self.index.contains_key(&key) {
                return Err(Error::parse(
                    entry.line,
                    ParseErrorKind::DuplicateEntry(key.to_string()),
                ));
            }
            self.index.insert(key, self.entries.len());
        }
        self.entries.push(entry);
        Ok(())
    }

    fn finish(&mut self, pending: &mut Pending) -> Result<()> {
        let pending = std::mem::take(pending);
        let entry = pending.into_entry()?;
        self.push(entry)
    }
}

/// Parse the bytes of a PO or POT file.
pub(crate) fn parse(bytes: &[u8]) -> Result<Catalog> {
    let text =
        std::str::from_utf8(bytes).map_err(|_| Error::parse(1, ParseErrorKind::InvalidUtf8))?;
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut builder = Builder::default();
    let mut pending = Pending::default();

    for (idx, raw_line) in text.split_inclusive('\n').enumerate() {
        let lineno = idx + 1;
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // Blank lines end an entry. Comments without keywords stay
            // pending and attach to the next entry.
            if pending.has_keyword() {
                builder.finish(&mut pending)?;
            }
            continue;
        }

        let (obsolete, content) = match trimmed.strip_prefix("#~") {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        if let Some(comment) = content.strip_prefix('#') {
            // An entry followed directly by the comments of the next one.
            if pending.has_keyword() {
                if !pending.is_complete() {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedLine(line.to_string()),
                    ));
                }
                builder.finish(&mut pending)?;
            }
            pending.start(lineno);
            pending.raw.push_str(raw_line);
            parse_comment(&mut pending, comment);
            continue;
        }
        if obsolete {
            if let Some(previous) = content.strip_prefix('|') {
                pending.start(lineno);
                pending.raw.push_str(raw_line);
                pending.previous.push(previous.trim_start().to_string());
                continue;
            }
        }

        if content.starts_with('"') {
            let field = pending
                .field
                .ok_or_else(|| Error::parse(lineno, ParseErrorKind::OrphanContinuation))?;
            let value = parse_string(content, lineno)?;
            pending.raw.push_str(raw_line);
            pending.field_mut(field).push_str(&value);
            continue;
        }

        let (keyword, rest) = split_keyword(content);
        let field = match keyword {
            "msgctxt" => {
                if pending.is_complete() {
                    builder.finish(&mut pending)?;
                } else if pending.has_keyword() {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedKeyword(keyword.to_string()),
                    ));
                }
                Field::Context
            }
            "msgid" => {
                if pending.is_complete() {
                    builder.finish(&mut pending)?;
                } else if pending.source.is_some() {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedKeyword(keyword.to_string()),
                    ));
                }
                Field::Source
            }
            "msgid_plural" => {
                if pending.source.is_none()
                    || pending.source_plural.is_some()
                    || pending.is_complete()
                {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedKeyword(keyword.to_string()),
                    ));
                }
                Field::SourcePlural
            }
            "msgstr" => {
                if pending.source.is_none() || pending.is_complete() {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedKeyword(keyword.to_string()),
                    ));
                }
                if pending.source_plural.is_some() {
                    return Err(Error::parse(lineno, ParseErrorKind::PluralMismatch));
                }
                Field::Translation
            }
            _ => match plural_index(keyword, lineno)? {
                Some(index) => {
                    if pending.source.is_none()
                        || pending.translation.is_some()
                        || pending.plurals.contains_key(&index)
                    {
                        return Err(Error::parse(
                            lineno,
                            ParseErrorKind::UnexpectedKeyword(keyword.to_string()),
                        ));
                    }
                    if pending.source_plural.is_none() {
                        return Err(Error::parse(lineno, ParseErrorKind::PluralMismatch));
                    }
                    Field::Plural(index)
                }
                None => {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedLine(line.to_string()),
                    ))
                }
            },
        };

        if pending.has_keyword() && pending.obsolete != obsolete {
            return Err(Error::parse(
                lineno,
                ParseErrorKind::UnexpectedKeyword(keyword.to_string()),
            ));
        }
        let value = parse_string(rest, lineno)?;
        pending.start(lineno);
        pending.raw.push_str(raw_line);
        pending.obsolete = obsolete;
        pending.field = Some(field);
        *pending.field_mut(field) = value;
    }

    let mut trailer = None;
    if pending.has_keyword() {
        builder.finish(&mut pending)?;
    } else if pending.has_content() {
        log::debug!(
            "Keeping trailing comments starting on line {}",
            pending.first_line
        );
        let mut raw = pending.raw;
        if !raw.ends_with('\n') {
            raw.push('\n');
        }
        trailer = Some(raw);
    }

    Ok(Catalog::from_parts(
        builder.header,
        builder.metadata,
        builder.entries,
        builder.index,
        trailer,
    ))
}

/// Split `msgid "foo"` into `("msgid", "\"foo\"")`.
fn split_keyword(content: &str) -> (&str, &str) {
    let end = content
        .find(|c: char| c.is_whitespace() || c == '"')
        .unwrap_or(content.len());
    (&content[..end], &content[end..])
}

/// Parse the index of `msgstr[N]`, or return `None` for other keywords.
fn plural_index(keyword: &str, lineno: usize) -> Result<Option<usize>> {
    let Some(index) = keyword
        .strip_prefix("msgstr[")
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Ok(None);
    };
    match index.parse::<usize>() {
        Ok(index) if index < MAX_PLURAL_FORMS => Ok(Some(index)),
        _ => Err(Error::parse(
            lineno,
            ParseErrorKind::InvalidPluralIndex(index.to_string()),
        )),
    }
}

/// Sort a comment line (without its leading `#`) into the entry.
fn parse_comment(pending: &mut Pending, comment: &str) {
    if let Some(flags) = comment.strip_prefix(',') {
        pending.flags.extend(
            flags
                .split(',')
                .map(str::trim)
                .filter(|flag| !flag.is_empty())
                .map(String::from),
        );
    } else if let Some(references) = comment.strip_prefix(':') {
        pending
            .locations
            .extend(references.split_whitespace().map(Location::parse));
    } else if let Some(extracted) = comment.strip_prefix('.') {
        pending.extracted_comments.push(strip_one_space(extracted).to_string());
    } else if let Some(previous) = comment.strip_prefix('|') {
        pending.previous.push(strip_one_space(previous).to_string());
    } else {
        pending.translator_comments.push(strip_one_space(comment).to_string());
    }
}

fn strip_one_space(text: &str) -> &str {
    text.strip_prefix(' ').unwrap_or(text)
}

/// Parse a quoted and escaped PO string.
///
/// `text` must hold exactly one string, optionally surrounded by
/// whitespace.
fn parse_string(text: &str, lineno: usize) -> Result<String> {
    let text = text.trim();
    let Some(body) = text.strip_prefix('"') else {
        return Err(Error::parse(
            lineno,
            ParseErrorKind::UnexpectedLine(text.to_string()),
        ));
    };

    let mut value = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((pos, c)) = chars.next() {
        match c {
            '"' => {
                let trailing = &body[pos + 1..];
                if !trailing.trim().is_empty() {
                    return Err(Error::parse(
                        lineno,
                        ParseErrorKind::UnexpectedLine(text.to_string()),
                    ));
                }
                return Ok(value);
            }
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(Error::parse(lineno, ParseErrorKind::UnterminatedString));
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '"' => '"',
                    '\\' => '\\',
                    'a' => '\u{07}',
                    'b' => '\u{08}',
                    'f' => '\u{0c}',
                    'v' => '\u{0b}',
                    other => {
                        return Err(Error::parse(lineno, ParseErrorKind::InvalidEscape(other)))
                    }
                });
            }
            _ => value.push(c),
        }
    }
    Err(Error::parse(lineno, ParseErrorKind::UnterminatedString))
}
