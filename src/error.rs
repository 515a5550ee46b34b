use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Extension is empty, lacks its leading dot, or contains another dot.
    InvalidExtension,
    /// MIME type is already mapped in the table being built.
    DuplicateMime,
    /// Resolver configuration could not be parsed.
    InvalidConfig,
}

#[derive(Debug)]
pub struct MediaExtError {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl MediaExtError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MediaExtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for MediaExtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &dyn std::error::Error)
    }
}

impl From<serde_json::Error> for MediaExtError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::InvalidConfig, err.to_string(), Box::new(err))
    }
}

pub type MediaExtResult<T> = Result<T, MediaExtError>;
