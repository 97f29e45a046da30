use super::{response_url, ReviewEvent, SubmissionKind, Submitted, Submitter};
use crate::content::{with_temp_content, Content};
use crate::error::{PostError, PostResult};

impl Submitter<'_> {
    /// Submit a summary review.
    ///
    /// `REQUEST_CHANGES` on the caller's own pull request is sent as
    /// `COMMENT` instead, and the outcome is marked as downgraded.
    pub async fn review(
        &self,
        identifier: &str,
        requested: ReviewEvent,
        body: &str,
    ) -> PostResult<Submitted> {
        if body.trim().is_empty() {
            return Err(PostError::UserInput("--body must not be empty".into()));
        }

        let (event, downgraded) = self.effective_event(identifier, requested).await;
        tracing::info!(identifier, event = event.as_str(), "submitting review");

        let stdout = with_temp_content(Content::Text(body), ".md", |path| async move {
            self.retry
                .execute("review", || self.client.pr_review(identifier, event, &path))
                .await
                .map_err(PostError::from)
        })
        .await?;

        Ok(Submitted {
            event: Some(event),
            downgraded,
            url: response_url(&stdout),
            ..Submitted::new(SubmissionKind::Review)
        })
    }
}
