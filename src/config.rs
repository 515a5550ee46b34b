use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::MediaExtResult;
use crate::table::MimeMatching;

pub const DEFAULT_MAX_EXTENSION_LEN: usize = 10;

fn default_max_extension_len() -> usize {
    DEFAULT_MAX_EXTENSION_LEN
}

/// Policy knobs for an [`ExtensionResolver`](crate::ExtensionResolver).
///
/// ```json
/// {
///   "mime_matching": "ignore_ascii_case",
///   "max_extension_len": 8,
///   "extra_mappings": { "video/mp4": ".mp4" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mime_matching: MimeMatching,
    /// Trailing segments longer than this are not treated as extensions.
    #[serde(default = "default_max_extension_len")]
    pub max_extension_len: usize,
    /// Appended after the built-in table; must not repeat a built-in MIME type.
    #[serde(default)]
    pub extra_mappings: BTreeMap<String, String>,
}

impl ResolverConfig {
    pub fn from_json_str(json: &str) -> MediaExtResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mime_matching: MimeMatching::default(),
            max_extension_len: DEFAULT_MAX_EXTENSION_LEN,
            extra_mappings: BTreeMap::new(),
        }
    }
}
