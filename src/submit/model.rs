//! Review payload types and their boundary validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{PostError, PostResult};
use crate::github::is_commit_sha;

/// Review verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    #[default]
    Comment,
    Approve,
    RequestChanges,
}

impl ReviewEvent {
    /// Flag understood by `gh pr review`.
    pub fn gh_flag(self) -> &'static str {
        match self {
            ReviewEvent::Comment => "--comment",
            ReviewEvent::Approve => "--approve",
            ReviewEvent::RequestChanges => "--request-changes",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewEvent::Comment => "COMMENT",
            ReviewEvent::Approve => "APPROVE",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
        }
    }
}

/// Which version of the diff a line belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// The new version.
    #[default]
    #[value(name = "RIGHT")]
    Right,
    /// The old version.
    #[value(name = "LEFT")]
    Left,
}

/// A single line or line-range comment on a file in the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCommentSpec {
    pub path: String,
    pub line: u32,
    pub start_line: Option<u32>,
    pub side: Side,
    pub body: String,
    pub commit_sha: Option<String>,
}

/// Request body of `POST /repos/{owner}/{repo}/pulls/{number}/comments`.
#[derive(Debug, Serialize)]
pub(crate) struct InlineCommentRequest<'a> {
    body: &'a str,
    commit_id: &'a str,
    path: &'a str,
    line: u32,
    side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_side: Option<Side>,
}

impl InlineCommentSpec {
    pub fn new(path: impl Into<String>, line: u32, side: Side, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line,
            start_line: None,
            side,
            body: body.into(),
            commit_sha: None,
        }
    }

    pub fn with_start_line(mut self, start_line: Option<u32>) -> Self {
        self.start_line = start_line;
        self
    }

    /// Range start and end always share a side.
    pub fn start_side(&self) -> Option<Side> {
        self.start_line.map(|_| self.side)
    }

    pub fn validate(&self) -> PostResult<()> {
        if self.path.trim().is_empty() {
            return Err(PostError::UserInput("--file must not be empty".into()));
        }
        if self.body.trim().is_empty() {
            return Err(PostError::UserInput("--body must not be empty".into()));
        }
        if self.line == 0 {
            return Err(PostError::UserInput("--line must be 1 or greater".into()));
        }
        if let Some(start) = self.start_line {
            if start == 0 || start > self.line {
                return Err(PostError::UserInput(format!(
                    "--start-line ({}) must be between 1 and --line ({})",
                    start, self.line
                )));
            }
        }
        if let Some(sha) = &self.commit_sha {
            if !is_commit_sha(sha) {
                return Err(PostError::UserInput(format!("invalid commit SHA '{}'", sha)));
            }
        }
        Ok(())
    }

    /// Wire form, anchored at `commit_id`. A given start line is always
    /// sent together with a matching `start_side`.
    pub(crate) fn to_request<'a>(&'a self, commit_id: &'a str) -> InlineCommentRequest<'a> {
        InlineCommentRequest {
            body: &self.body,
            commit_id,
            path: &self.path,
            line: self.line,
            side: self.side,
            start_line: self.start_line,
            start_side: self.start_side(),
        }
    }
}

/// One entry of a batch review's `comments` array.
///
/// Only the fields `prpost` checks are typed; everything else, including a
/// per-comment `commit_id`, is passed to GitHub untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchComment {
    pub path: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /repos/{owner}/{repo}/pulls/{number}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPayload {
    pub event: ReviewEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub comments: Vec<BatchComment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReviewPayload {
    /// Load and validate a batch file.
    pub fn from_file(path: &Path) -> PostResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PostError::Validation(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse a batch document.
    ///
    /// The shape is checked before any field is interpreted: the root must be
    /// an object with both `event` and `comments`.
    pub fn parse(content: &str) -> PostResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| PostError::Validation(format!("not valid JSON: {}", e)))?;
        let Value::Object(root) = &value else {
            return Err(PostError::Validation(
                "expected a JSON object like {\"event\": \"COMMENT\", \"comments\": [...]}".into(),
            ));
        };
        for key in ["event", "comments"] {
            if !root.contains_key(key) {
                return Err(PostError::Validation(format!(
                    "missing required key '{}' (expected {{\"event\": \"COMMENT|APPROVE|REQUEST_CHANGES\", \"comments\": [...]}})",
                    key
                )));
            }
        }

        let payload: Self = serde_json::from_value(value)
            .map_err(|e| PostError::Validation(e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> PostResult<()> {
        for (i, comment) in self.comments.iter().enumerate() {
            if comment.path.trim().is_empty() {
                return Err(PostError::Validation(format!("comments[{}]: empty path", i)));
            }
            if comment.body.trim().is_empty() {
                return Err(PostError::Validation(format!("comments[{}]: empty body", i)));
            }
            if comment.line == Some(0) {
                return Err(PostError::Validation(format!("comments[{}]: line must be 1 or greater", i)));
            }
            if let (Some(start), Some(line)) = (comment.start_line, comment.line) {
                if start == 0 || start > line {
                    return Err(PostError::Validation(format!(
                        "comments[{}]: start_line ({}) must be between 1 and line ({})",
                        i, start, line
                    )));
                }
            }
            if let Some(sha) = &comment.commit_id {
                if !is_commit_sha(sha) {
                    return Err(PostError::Validation(format!(
                        "comments[{}]: invalid commit_id '{}'",
                        i, sha
                    )));
                }
            }
        }
        Ok(())
    }
}
