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


//! Helpers for machine translation of Gettext catalogs.
//!
//! The functions here implement the reconciliation steps of a
//! translation pipeline which sends untranslated strings to a language
//! model and merges the answers back:
//!
//! 1. [`extract::new_entries`] finds strings added between two
//!    revisions of a template.
//! 2. [`extract::remaining_work`] finds strings a translated catalog
//!    still lacks.
//! 3. [`batch`] splits the work into request files and collects the
//!    answers into a result catalog.
//! 4. [`merge::merge`] writes the answers back, never touching entries
//!    outside the requested scope or entries which already have a
//!    translation.
//! 5. [`glossary::Glossary`] corrects and verifies terminology.
//!
//! All of these operate on in-memory [`Catalog`]s. Files are only read
//! and written by [`files`] and [`preflight`].

pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod files;
pub mod glossary;
pub mod key;
pub mod logger;
pub mod merge;
pub mod preflight;
pub mod runlog;
pub mod state;
pub mod stats;

pub use catalog::{Catalog, Entry};
pub use error::{Error, Result};
pub use key::{identity_key, IdentityKey};
pub use state::{classify, TranslationState};
