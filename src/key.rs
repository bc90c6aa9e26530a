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


//! Entry identity.
//!
//! Two entries are the same translatable unit if and only if their
//! context, source text and plural source text are equal. Comparison is
//! exact: no whitespace or case normalization takes place, since the
//! text sent for translation is the source string verbatim.

use std::fmt::{self, Display, Formatter};

use crate::catalog::Entry;

/// The identity of an entry across catalogs.
///
/// A missing context and an empty context are the same, and so are a
/// missing and an empty plural source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub context: String,
    pub source: String,
    pub source_plural: String,
}

impl IdentityKey {
    pub fn new(context: Option<&str>, source: &str, source_plural: Option<&str>) -> Self {
        IdentityKey {
            context: context.unwrap_or_default().to_string(),
            source: source.to_string(),
            source_plural: source_plural.unwrap_or_default().to_string(),
        }
    }

    /// Is this the key of a header entry?
    pub fn is_header(&self) -> bool {
        self.source.is_empty() && self.context.is_empty()
    }
}

/// Compute the identity key of `entry`.
pub fn identity_key(entry: &Entry) -> IdentityKey {
    IdentityKey::new(entry.context(), entry.source(), entry.source_plural())
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.context.is_empty() {
            write!(f, "[{}] ", self.context)?;
        }
        write!(f, "{:?}", self.source)?;
        if !self.source_plural.is_empty() {
            write!(f, " / {:?}", self.source_plural)?;
        }
        Ok(())
    }
}
