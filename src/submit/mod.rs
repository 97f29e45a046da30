//! The four ways of posting feedback: review, comment, inline, inline batch.
//!
//! Each one validates its input, resolves what it needs from GitHub, writes
//! the payload to a scoped temporary file and hands that file to `gh`
//! through the retry executor.

mod batch;
mod comment;
mod inline;
pub mod model;
mod review;

pub use model::{BatchComment, InlineCommentSpec, ReviewEvent, ReviewPayload, Side};

use crate::github::{is_self_authored, GhClient};
use crate::retry::RetryExecutor;

/// What kind of feedback was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Review,
    Comment,
    Inline,
    Batch,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub kind: SubmissionKind,
    /// Review state actually sent, for reviews and batches.
    pub event: Option<ReviewEvent>,
    /// `REQUEST_CHANGES` was turned into `COMMENT` because the PR is ours.
    pub downgraded: bool,
    /// Number of inline comments carried.
    pub comments: usize,
    /// Link to the created object, when GitHub returned one.
    pub url: Option<String>,
}

impl Submitted {
    fn new(kind: SubmissionKind) -> Self {
        Self {
            kind,
            event: None,
            downgraded: false,
            comments: 0,
            url: None,
        }
    }
}

/// Posts feedback through a [`GhClient`].
pub struct Submitter<'a> {
    client: &'a dyn GhClient,
    retry: RetryExecutor,
}

impl<'a> Submitter<'a> {
    pub fn new(client: &'a dyn GhClient, retry: RetryExecutor) -> Self {
        Self { client, retry }
    }

    /// GitHub refuses `REQUEST_CHANGES` on your own pull request, so ask
    /// for it only when someone else opened the PR.
    async fn effective_event(&self, identifier: &str, requested: ReviewEvent) -> (ReviewEvent, bool) {
        if requested != ReviewEvent::RequestChanges {
            return (requested, false);
        }
        if is_self_authored(self.client, identifier).await {
            tracing::info!(
                identifier,
                "cannot request changes on your own pull request, posting as COMMENT"
            );
            (ReviewEvent::Comment, true)
        } else {
            (requested, false)
        }
    }
}

/// Pull the `html_url` out of a REST response, or take a bare URL printed by
/// `gh pr comment`.
fn response_url(stdout: &str) -> Option<String> {
    let stdout = stdout.trim();
    if stdout.starts_with("http") && !stdout.contains(char::is_whitespace) {
        return Some(stdout.to_string());
    }
    serde_json::from_str::<serde_json::Value>(stdout)
        .ok()?
        .get("html_url")?
        .as_str()
        .map(str::to_string)
}
