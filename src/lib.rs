//! # mediaext
//!
//! Resolves the filename extension of a media asset being imported into a
//! collection, from its current name and the MIME type it arrived with.
//!
//! ## Overview
//!
//! Media often reaches a collection without a trustworthy name: a pasted
//! image, a file downloaded from a URL with no suffix, an audio clip from the
//! clipboard. The caller usually knows the MIME type (from an HTTP header or
//! the clipboard payload), so the missing extension can be derived from it.
//!
//! ## Core Concepts
//!
//! - **MimeExtensionTable**: immutable MIME type -> extension mapping
//! - **ExtensionResolver**: decides whether a name already has an extension and appends one if not
//! - **ResolverConfig**: matching policy, extension length limit and extra mappings
//!
//! ## Example
//!
//! ```
//! use mediaext::add_extension_based_on_mime;
//!
//! assert_eq!(add_extension_based_on_mime("audio", "audio/mpeg"), "audio.mp3");
//! assert_eq!(add_extension_based_on_mime("image.png", "image/jpeg"), "image.png");
//! assert_eq!(add_extension_based_on_mime("version.2", "image/png"), "version.2.png");
//! assert_eq!(add_extension_based_on_mime("file", "application/unknown"), "file");
//! ```

pub mod config;
pub mod error;
pub mod resolver;
pub mod table;

pub use config::ResolverConfig;
pub use error::{ErrorKind, MediaExtError, MediaExtResult};
pub use resolver::{add_extension_based_on_mime, ExtensionResolver};
pub use table::{MimeExtensionTable, MimeMatching, TableBuilder};
