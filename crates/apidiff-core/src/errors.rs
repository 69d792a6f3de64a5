use crate::model::Side;
use apidiff_core_types::RequestId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ApiDiffError
pub type Result<T> = std::result::Result<T, ApiDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log filtering and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration/Path
    InvalidConfig,
    RootNotFound,

    // Discovery
    MissingVersion,
    EmptyArtifactSet,
    Traversal,

    // Comparison/Report
    ExternalService,
    ReportWrite,
    Cleanup,

    // Integration/IO
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::RootNotFound => "ERR_ROOT_NOT_FOUND",
            ExErrorKind::MissingVersion => "ERR_MISSING_VERSION",
            ExErrorKind::EmptyArtifactSet => "ERR_EMPTY_ARTIFACT_SET",
            ExErrorKind::Traversal => "ERR_TRAVERSAL",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::ReportWrite => "ERR_REPORT_WRITE",
            ExErrorKind::Cleanup => "ERR_CLEANUP",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Produced at the release-pair boundary. Carries classification fields for
/// programmatic handling and the pair/run context for diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    pair: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            pair: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add release-pair context
    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        self.pair = Some(pair.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the release-pair context, if any
    pub fn pair(&self) -> Option<&str> {
        self.pair.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(pair) = &self.pair {
            write!(f, " (pair: {})", pair)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for pipeline operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiDiffError {
    /// A release root directory does not exist
    #[error("Unable to find {side} Root Path: {}", path.display())]
    ReleaseRootNotFound { side: Side, path: PathBuf },

    /// The properties file holding the version could not be read
    #[error("Unable to read properties {}: {message}", path.display())]
    PropertiesUnreadable { path: PathBuf, message: String },

    /// The version key is absent and the version policy requires it
    #[error("Key {key} not found in {}", path.display())]
    MissingVersionKey { path: PathBuf, key: String },

    /// Visiting an entry of the artifact tree failed
    #[error("Artifact walk failed at {}: {message}", path.display())]
    Traversal { path: PathBuf, message: String },

    /// A whole release side produced no artifacts
    #[error("No artifacts found for {side} release under {}", root.display())]
    EmptyArtifactSet { side: Side, root: PathBuf },

    /// The external comparison engine failed
    #[error("Comparison engine failed: {message}")]
    Comparator { message: String },

    /// Writing the report documents failed
    #[error("Unable to write report {}: {message}", path.display())]
    ReportWrite { path: PathBuf, message: String },

    /// Rewriting the report failed
    #[error("Unable to clean report {}: {message}", path.display())]
    Cleanup { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Uncategorised filesystem failure
    #[error("I/O failure during {op} on {}: {message}", path.display())]
    Io {
        op: String,
        path: PathBuf,
        message: String,
    },
}

impl From<ApiDiffError> for ExError {
    fn from(err: ApiDiffError) -> Self {
        let message = err.to_string();
        match err {
            ApiDiffError::ReleaseRootNotFound { path, .. } => {
                ExError::new(ExErrorKind::RootNotFound)
                    .with_op("validate_roots")
                    .with_path(path)
                    .with_message(message)
            }
            ApiDiffError::PropertiesUnreadable { path, .. } => ExError::new(ExErrorKind::Io)
                .with_op("load_version")
                .with_path(path)
                .with_message(message),
            ApiDiffError::MissingVersionKey { path, .. } => {
                ExError::new(ExErrorKind::MissingVersion)
                    .with_op("load_version")
                    .with_path(path)
                    .with_message(message)
            }
            ApiDiffError::Traversal { path, .. } => ExError::new(ExErrorKind::Traversal)
                .with_op("locate_artifacts")
                .with_path(path)
                .with_message(message),
            ApiDiffError::EmptyArtifactSet { root, .. } => {
                ExError::new(ExErrorKind::EmptyArtifactSet)
                    .with_op("compare")
                    .with_path(root)
                    .with_message(message)
            }
            ApiDiffError::Comparator { .. } => ExError::new(ExErrorKind::ExternalService)
                .with_op("compare")
                .with_message(message),
            ApiDiffError::ReportWrite { path, .. } => ExError::new(ExErrorKind::ReportWrite)
                .with_op("emit_report")
                .with_path(path)
                .with_message(message),
            ApiDiffError::Cleanup { path, .. } => ExError::new(ExErrorKind::Cleanup)
                .with_op("cleanup_report")
                .with_path(path)
                .with_message(message),
            ApiDiffError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            ApiDiffError::Io { op, path, .. } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_path(path)
                .with_message(message),
        }
    }
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ApiDiffError {
    ApiDiffError::Io {
        op: operation.to_string(),
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
