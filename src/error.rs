//! Error taxonomy shared by every submission path.

use thiserror::Error;

/// Substrings (lower-cased) that mark a `gh` failure as a platform rate limit.
const RATE_LIMIT_MARKERS: &[&str] = &["rate limit", "rate-limit", "ratelimit"];

/// Whether a failed external call is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Throttled by the platform; resolves on its own after a delay.
    Transient,
    /// Everything else: bad payload, permissions, network partition, ...
    Fatal,
}

/// Classify a failure from its diagnostic text.
///
/// This is the only place that looks at error text to decide retryability;
/// the retry executor itself only ever inspects [`FailureKind`].
pub fn classify_failure(diagnostic: &str) -> FailureKind {
    let lower = diagnostic.to_lowercase();
    if RATE_LIMIT_MARKERS.iter().any(|marker| lower.contains(marker)) {
        FailureKind::Transient
    } else {
        FailureKind::Fatal
    }
}

/// A failed invocation of the external `gh` client.
#[derive(Debug, Clone, Error)]
#[error("gh command failed: {message}")]
pub struct GhError {
    pub kind: FailureKind,
    /// Exit status of the `gh` process, if it ran at all.
    pub status: Option<i32>,
    /// Diagnostic text surfaced verbatim to the operator.
    pub message: String,
}

impl GhError {
    /// Build an error from a finished process, classifying it by its stderr.
    pub fn from_output(status: Option<i32>, stderr: &str) -> Self {
        let message = stderr.trim().to_string();
        Self {
            kind: classify_failure(&message),
            status,
            message,
        }
    }

    /// The process could not be started or its output could not be read.
    pub fn launch(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Fatal,
            status: None,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

/// Every way a single `prpost` invocation can fail.
///
/// `Resolution` and `Validation` are reported before anything is posted.
/// Note that authorship lookups never surface here: the authorship guard
/// treats any lookup failure as "not self-authored", so a transient error can
/// let a `REQUEST_CHANGES` through to the platform, which then rejects it.
#[derive(Debug, Error)]
pub enum PostError {
    /// Missing or malformed command-line input. No external call was made.
    #[error("{0}")]
    UserInput(String),

    /// The identifier could not be mapped to a pull request, or its head
    /// commit could not be fetched.
    #[error("could not resolve pull request: {0}")]
    Resolution(String),

    /// A structured payload was malformed or missing required keys.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// The external client failed (after any retries).
    #[error(transparent)]
    Transport(#[from] GhError),

    /// The temporary artifact could not be written.
    #[error("failed to prepare temporary content: {0}")]
    TempContent(#[from] std::io::Error),

    /// The operator interrupted the run.
    #[error("interrupted by user")]
    Interrupted,
}

impl PostError {
    /// Process exit status for this error.
    ///
    /// Transport failures exit with the underlying `gh` status when it is
    /// known and representable; everything else exits 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            PostError::Transport(err) => err
                .status
                .and_then(|status| u8::try_from(status).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

pub type PostResult<T> = std::result::Result<T, PostError>;
