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


//! Serializer for the Gettext PO/POT format.

use std::fmt::{self, Formatter, Write};

use super::{Catalog, Entry, Metadata};

/// Width used when wrapping `#:` reference lines, as GNU gettext does.
const REFERENCE_WIDTH: usize = 79;

pub(super) fn write_catalog(catalog: &Catalog, f: &mut Formatter) -> fmt::Result {
    let mut first = true;
    match catalog.header() {
        Some(header) => {
            match header.raw() {
                Some(raw) => f.write_str(raw)?,
                None => write_header(header, catalog.metadata(), f)?,
            }
            first = false;
        }
        None if !catalog.metadata().is_empty() => {
            write_header(&Entry::default(), catalog.metadata(), f)?;
            first = false;
        }
        None => {}
    }

    let nplurals = catalog
        .metadata()
        .plural_forms()
        .map_or(2, |forms| forms.nplurals);
    for entry in catalog.entries() {
        if !first {
            f.write_char('\n')?;
        }
        first = false;
        match entry.raw() {
            Some(raw) => f.write_str(raw)?,
            None => write_entry(entry, nplurals, f)?,
        }
    }
    if let Some(trailer) = catalog.trailer() {
        if !first {
            f.write_char('\n')?;
        }
        f.write_str(trailer)?;
    }
    Ok(())
}

fn write_header(header: &Entry, metadata: &Metadata, f: &mut Formatter) -> fmt::Result {
    write_comments(header, f)?;
    write_field(f, "", "msgid", "")?;
    f.write_str("msgstr \"\"\n")?;
    for (key, value) in metadata.iter() {
        writeln!(f, "\"{}\"", escape(&format!("{key}: {value}\n")))?;
    }
    Ok(())
}

fn write_comments(entry: &Entry, f: &mut Formatter) -> fmt::Result {
    for comment in entry.translator_comments() {
        write_comment_line(f, "#", comment)?;
    }
    for comment in entry.extracted_comments() {
        write_comment_line(f, "#.", comment)?;
    }

    let mut line = String::from("#:");
    for location in entry.locations() {
        let location = location.to_string();
        if line.len() > 2 && line.len() + 1 + location.len() > REFERENCE_WIDTH {
            writeln!(f, "{line}")?;
            line.truncate(2);
        }
        line.push(' ');
        line.push_str(&location);
    }
    if line.len() > 2 {
        writeln!(f, "{line}")?;
    }

    if !entry.flags().is_empty() {
        writeln!(f, "#, {}", entry.flags().join(", "))?;
    }
    let previous_marker = if entry.is_obsolete() { "#~|" } else { "#|" };
    for previous in entry.previous() {
        write_comment_line(f, previous_marker, previous)?;
    }
    Ok(())
}

fn write_comment_line(f: &mut Formatter, marker: &str, text: &str) -> fmt::Result {
    if text.is_empty() {
        writeln!(f, "{marker}")
    } else {
        writeln!(f, "{marker} {text}")
    }
}

fn write_entry(entry: &Entry, nplurals: usize, f: &mut Formatter) -> fmt::Result {
    write_comments(entry, f)?;
    let prefix = if entry.is_obsolete() { "#~ " } else { "" };
    if let Some(context) = entry.context() {
        write_field(f, prefix, "msgctxt", context)?;
    }
    write_field(f, prefix, "msgid", entry.source())?;
    match entry.source_plural() {
        Some(source_plural) => {
            write_field(f, prefix, "msgid_plural", source_plural)?;
            let translations = entry.plural_translations();
            let count = translations
                .keys()
                .next_back()
                .map_or(nplurals, |&last| nplurals.max(last + 1));
            for idx in 0..count {
                let translation = translations.get(&idx).map_or("", String::as_str);
                write_field(f, prefix, &format!("msgstr[{idx}]"), translation)?;
            }
        }
        None => write_field(f, prefix, "msgstr", entry.translation())?,
    }
    Ok(())
}

/// Write `keyword "value"`, splitting multi-line values after each
/// newline the way msgmerge does.
fn write_field(f: &mut Formatter, prefix: &str, keyword: &str, value: &str) -> fmt::Result {
    let lines = value.split_inclusive('\n').collect::<Vec<_>>();
    if lines.len() > 1 {
        writeln!(f, "{prefix}{keyword} \"\"")?;
        for line in lines {
            writeln!(f, "{prefix}\"{}\"", escape(line))?;
        }
        Ok(())
    } else {
        writeln!(f, "{prefix}{keyword} \"{}\"", escape(value))
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\u{07}' => escaped.push_str("\\a"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0b}' => escaped.push_str("\\v"),
            '\u{0c}' => escaped.push_str("\\f"),
            _ => escaped.push(c),
        }
    }
    escaped
}
