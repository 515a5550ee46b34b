//! MIME type to filename extension table.
//!
//! The built-in table covers the audio and image types that media import
//! receives from browsers and the clipboard. Extra entries can be appended
//! through [`TableBuilder`] before a table is frozen; a built table exposes no
//! way to mutate it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::trace;

use crate::error::{ErrorKind, MediaExtError, MediaExtResult};

/// Built-in mappings, in lookup-table order.
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    ("audio/mpeg", ".mp3"),
    ("audio/ogg", ".oga"),
    ("audio/opus", ".opus"),
    ("audio/wav", ".wav"),
    ("audio/webm", ".weba"),
    ("audio/aac", ".aac"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/svg+xml", ".svg"),
    ("image/webp", ".webp"),
    ("image/avif", ".avif"),
];

static BUILTIN: Lazy<MimeExtensionTable> =
    Lazy::new(|| MimeExtensionTable::from_builtin(MimeMatching::Exact));

/// How MIME type keys are compared on lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeMatching {
    /// Byte-for-byte comparison with the supplied string.
    #[default]
    Exact,
    /// ASCII case-insensitive comparison (`Image/PNG` matches `image/png`).
    IgnoreAsciiCase,
}

impl MimeMatching {
    fn normalize(self, mime: &str) -> String {
        match self {
            MimeMatching::Exact => mime.to_string(),
            MimeMatching::IgnoreAsciiCase => mime.to_ascii_lowercase(),
        }
    }
}

/// Immutable mapping from MIME type to canonical extension (leading dot included).
#[derive(Debug, Clone)]
pub struct MimeExtensionTable {
    matching: MimeMatching,
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl MimeExtensionTable {
    /// The process-wide built-in table, matched exactly.
    pub fn builtin() -> &'static MimeExtensionTable {
        &BUILTIN
    }

    pub fn builder() -> TableBuilder {
        TableBuilder::new(MimeMatching::Exact)
    }

    /// Built-in entries under the given matching policy.
    pub fn from_builtin(matching: MimeMatching) -> Self {
        let mut builder = TableBuilder::new(matching);
        builder.extend_builtin();
        builder.build()
    }

    pub fn lookup(&self, mime: &str) -> Option<&str> {
        let found = match self.matching {
            MimeMatching::Exact => self.index.get(mime),
            MimeMatching::IgnoreAsciiCase => self.index.get(&mime.to_ascii_lowercase()),
        };
        found.map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_mime(&self, mime: &str) -> bool {
        self.lookup(mime).is_some()
    }

    pub fn matching(&self) -> MimeMatching {
        self.matching
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as `(mime, extension)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, e)| (m.as_str(), e.as_str()))
    }
}

impl Default for MimeExtensionTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Accumulates entries for a [`MimeExtensionTable`].
#[derive(Debug)]
pub struct TableBuilder {
    matching: MimeMatching,
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TableBuilder {
    pub fn new(matching: MimeMatching) -> Self {
        Self {
            matching,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends the built-in mappings.
    pub fn with_builtin(mut self) -> Self {
        self.extend_builtin();
        self
    }

    fn extend_builtin(&mut self) {
        for (mime, ext) in BUILTIN_ENTRIES {
            let key = self.matching.normalize(mime);
            self.push(key, mime, ext);
        }
    }

    /// Appends one mapping.
    ///
    /// Fails when `extension` is not a single dotted segment (`.mp3`), or when
    /// `mime` is already mapped under this builder's matching policy.
    pub fn insert(&mut self, mime: &str, extension: &str) -> MediaExtResult<&mut Self> {
        validate_extension(extension)?;

        let key = self.matching.normalize(mime);
        if self.index.contains_key(&key) {
            return Err(MediaExtError::new(
                ErrorKind::DuplicateMime,
                format!("MIME type already mapped: {}", mime),
            ));
        }

        self.push(key, mime, extension);
        Ok(self)
    }

    fn push(&mut self, key: String, mime: &str, extension: &str) {
        trace!(mime, extension, "adding MIME extension mapping");
        self.index.insert(key, self.entries.len());
        self.entries.push((mime.to_string(), extension.to_string()));
    }

    pub fn build(self) -> MimeExtensionTable {
        MimeExtensionTable {
            matching: self.matching,
            entries: self.entries,
            index: self.index,
        }
    }
}

fn validate_extension(extension: &str) -> MediaExtResult<()> {
    let valid = match extension.strip_prefix('.') {
        Some(rest) => !rest.is_empty() && !rest.contains('.'),
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(MediaExtError::new(
            ErrorKind::InvalidExtension,
            format!("extension must be a single dotted segment: {:?}", extension),
        ))
    }
}
