//! Extension resolution for imported media.
//!
//! A filename that already ends in something that looks like an extension is
//! left alone, whatever MIME type accompanies it. Otherwise the MIME type is
//! looked up in a [`MimeExtensionTable`] and the mapped extension is appended.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use tracing::{debug, trace, Level};

use crate::config::{ResolverConfig, DEFAULT_MAX_EXTENSION_LEN};
use crate::error::{ErrorKind, MediaExtError, MediaExtResult};
use crate::table::{MimeExtensionTable, MimeMatching, TableBuilder};

static DEFAULT_RESOLVER: Lazy<ExtensionResolver> = Lazy::new(ExtensionResolver::new);

/// Appends an extension derived from `mime` when `filename` has no usable one.
///
/// Uses the built-in table with exact MIME matching. See
/// [`ExtensionResolver::add_extension_based_on_mime`].
pub fn add_extension_based_on_mime(filename: &str, mime: &str) -> String {
    DEFAULT_RESOLVER.add_extension_based_on_mime(filename, mime)
}

#[derive(Debug, Clone)]
pub struct ExtensionResolver {
    table: Cow<'static, MimeExtensionTable>,
    max_extension_len: usize,
}

impl ExtensionResolver {
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(MimeExtensionTable::builtin()),
            max_extension_len: DEFAULT_MAX_EXTENSION_LEN,
        }
    }

    /// Resolver over a custom table, with the default extension length limit.
    ///
    /// Fails when a table extension would not itself count as an extension,
    /// since names resolved with it would keep growing on every call.
    pub fn with_table(table: MimeExtensionTable) -> MediaExtResult<Self> {
        Self::checked(Cow::Owned(table), DEFAULT_MAX_EXTENSION_LEN)
    }

    pub fn from_config(config: &ResolverConfig) -> MediaExtResult<Self> {
        if config.max_extension_len == 0 {
            return Err(MediaExtError::new(
                ErrorKind::InvalidConfig,
                "max_extension_len must be at least 1",
            ));
        }

        let builtin_only =
            config.mime_matching == MimeMatching::Exact && config.extra_mappings.is_empty();
        let table = if builtin_only {
            Cow::Borrowed(MimeExtensionTable::builtin())
        } else {
            let mut builder = TableBuilder::new(config.mime_matching).with_builtin();
            for (mime, ext) in &config.extra_mappings {
                builder.insert(mime, ext)?;
            }
            Cow::Owned(builder.build())
        };

        let resolver = Self::checked(table, config.max_extension_len)?;

        debug!(
            entries = resolver.table.len(),
            matching = ?resolver.table.matching(),
            max_extension_len = config.max_extension_len,
            "extension resolver configured"
        );

        Ok(resolver)
    }

    fn checked(
        table: Cow<'static, MimeExtensionTable>,
        max_extension_len: usize,
    ) -> MediaExtResult<Self> {
        let resolver = Self {
            table,
            max_extension_len,
        };

        for (mime, ext) in resolver.table.iter() {
            if !resolver.is_usable(ext.trim_start_matches('.')) {
                return Err(MediaExtError::new(
                    ErrorKind::InvalidConfig,
                    format!(
                        "extension {} for {} is not recognised as an extension (max length {})",
                        ext, mime, max_extension_len
                    ),
                ));
            }
        }

        Ok(resolver)
    }

    pub fn table(&self) -> &MimeExtensionTable {
        &self.table
    }

    /// Returns `filename` with an extension appended when it lacks a usable
    /// one and `mime` is in the table; otherwise returns it unchanged.
    ///
    /// A trailing segment that is not a usable extension (`version.2`) stays
    /// in place and the new extension goes after it (`version.2.png`).
    pub fn add_extension_based_on_mime(&self, filename: &str, mime: &str) -> String {
        if let Some(ext) = self.usable_extension(filename) {
            trace!(filename, extension = ext, "filename already has an extension");
            if tracing::enabled!(Level::DEBUG) && self.agreement(ext, mime) == Some(false) {
                debug!(filename, mime, "existing extension does not match MIME type, keeping it");
            }
            return filename.to_string();
        }

        match self.table.lookup(mime) {
            Some(ext) => {
                trace!(filename, mime, extension = ext, "appending extension from MIME type");
                let mut resolved = String::with_capacity(filename.len() + ext.len());
                resolved.push_str(filename);
                resolved.push_str(ext);
                resolved
            }
            None => {
                trace!(filename, mime, "no extension known for MIME type");
                filename.to_string()
            }
        }
    }

    /// The trailing extension of `filename`, without its dot, if it counts as
    /// one: ASCII alphanumeric, at least one letter, and at most
    /// `max_extension_len` characters.
    pub fn usable_extension<'a>(&self, filename: &'a str) -> Option<&'a str> {
        let dot = filename.rfind('.')?;
        let ext = &filename[dot + 1..];
        self.is_usable(ext).then_some(ext)
    }

    fn is_usable(&self, ext: &str) -> bool {
        !ext.is_empty()
            && ext.len() <= self.max_extension_len
            && ext.chars().all(|c| c.is_ascii_alphanumeric())
            && ext.chars().any(|c| c.is_ascii_alphabetic())
    }

    pub fn has_usable_extension(&self, filename: &str) -> bool {
        self.usable_extension(filename).is_some()
    }

    /// Whether the extension `filename` already carries is plausible for `mime`.
    ///
    /// `None` when there is no usable extension, or when neither the table nor
    /// the system MIME database knows any extension for `mime`.
    pub fn extension_agrees_with_mime(&self, filename: &str, mime: &str) -> Option<bool> {
        let ext = self.usable_extension(filename)?;
        self.agreement(ext, mime)
    }

    fn agreement(&self, ext: &str, mime: &str) -> Option<bool> {
        let mapped = self.table.lookup(mime).map(|e| e.trim_start_matches('.'));
        let known = mime_guess::get_mime_extensions_str(mime);
        if mapped.is_none() && known.is_none() {
            return None;
        }

        let agrees = mapped.is_some_and(|m| m.eq_ignore_ascii_case(ext))
            || known.is_some_and(|exts| exts.iter().any(|k| k.eq_ignore_ascii_case(ext)));
        Some(agrees)
    }
}

impl Default for ExtensionResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_dot() {
        let resolver = ExtensionResolver::new();
        assert_eq!(resolver.usable_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(resolver.usable_extension("image.png"), Some("png"));
        assert_eq!(resolver.usable_extension("audio"), None);
    }

    #[test]
    fn numeric_and_empty_segments_are_not_extensions() {
        let resolver = ExtensionResolver::new();
        assert_eq!(resolver.usable_extension("version.2"), None);
        assert_eq!(resolver.usable_extension("trailing."), None);
        assert_eq!(resolver.usable_extension("v1.0.10"), None);
    }

    #[test]
    fn mixed_alphanumeric_is_an_extension() {
        let resolver = ExtensionResolver::new();
        assert_eq!(resolver.usable_extension("clip.mp4"), Some("mp4"));
        assert_eq!(resolver.usable_extension("page.HTML"), Some("HTML"));
    }

    #[test]
    fn leading_dot_segment_counts_as_extension() {
        let resolver = ExtensionResolver::new();
        assert_eq!(resolver.usable_extension(".mp3"), Some("mp3"));
        assert_eq!(resolver.usable_extension(".hidden.png"), Some("png"));
        assert_eq!(resolver.add_extension_based_on_mime(".hidden", "image/png"), ".hidden");
    }

    #[test]
    fn rejects_long_and_non_ascii_segments() {
        let resolver = ExtensionResolver::new();
        assert_eq!(resolver.usable_extension("notes.thisistoolong"), None);
        assert_eq!(resolver.usable_extension("photo.jpé"), None);
        assert_eq!(resolver.usable_extension("my file.p g"), None);
    }

    #[test]
    fn max_extension_len_is_configurable() {
        let config = ResolverConfig {
            max_extension_len: 4,
            ..ResolverConfig::default()
        };
        let resolver = ExtensionResolver::from_config(&config).unwrap();
        assert!(resolver.has_usable_extension("a.avif"));
        assert!(!resolver.has_usable_extension("a.jpeg2k"));
        assert_eq!(
            resolver.add_extension_based_on_mime("scan.jpeg2k", "image/png"),
            "scan.jpeg2k.png"
        );
    }

    #[test]
    fn max_extension_len_below_table_extensions_is_rejected() {
        let config = ResolverConfig {
            max_extension_len: 3,
            ..ResolverConfig::default()
        };
        let err = ExtensionResolver::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.message().contains(".avif") || err.message().contains(".opus"));
    }

    #[test]
    fn unrecognisable_extra_extensions_are_rejected() {
        for ext in [".123", ".verylongextension", ".c++"] {
            let mut config = ResolverConfig::default();
            config.extra_mappings.insert("application/x-test".to_string(), ext.to_string());
            let err = ExtensionResolver::from_config(&config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig, "accepted {}", ext);
        }
    }

    #[test]
    fn custom_table_is_checked() {
        let mut builder = MimeExtensionTable::builder();
        builder.insert("application/x-test", ".7z1").unwrap();
        assert!(ExtensionResolver::with_table(builder.build()).is_ok());

        let mut builder = MimeExtensionTable::builder();
        builder.insert("application/x-test", ".001").unwrap();
        let err = ExtensionResolver::with_table(builder.build()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn zero_max_extension_len_is_rejected() {
        let config = ResolverConfig {
            max_extension_len: 0,
            ..ResolverConfig::default()
        };
        let err = ExtensionResolver::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn default_config_borrows_builtin_table() {
        let resolver = ExtensionResolver::from_config(&ResolverConfig::default()).unwrap();
        assert!(matches!(resolver.table, Cow::Borrowed(_)));
    }
}
