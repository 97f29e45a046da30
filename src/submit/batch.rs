use super::{response_url, ReviewPayload, SubmissionKind, Submitted, Submitter};
use crate::content::{with_temp_content, Content};
use crate::error::{PostError, PostResult};
use crate::github::resolve;

impl Submitter<'_> {
    /// Submit a review carrying many inline comments in one request.
    ///
    /// GitHub records either the whole review or nothing, so there is no
    /// per-comment recovery. Per-comment `commit_id` values are sent as given.
    pub async fn batch(&self, identifier: &str, mut payload: ReviewPayload) -> PostResult<Submitted> {
        let pr = resolve(self.client, identifier).await?;

        let (event, downgraded) = self.effective_event(identifier, payload.event).await;
        payload.event = event;

        let endpoint = pr.api_path("reviews");
        let comments = payload.comments.len();
        tracing::info!(
            url = %pr.url,
            event = event.as_str(),
            comments,
            "submitting batch review"
        );

        let content = Content::json(&payload)?;
        let stdout = with_temp_content(content, ".json", |input| async move {
            self.retry
                .execute("inline-batch", || self.client.api_post(&endpoint, &input))
                .await
                .map_err(PostError::from)
        })
        .await?;

        Ok(Submitted {
            event: Some(event),
            downgraded,
            comments,
            url: response_url(&stdout),
            ..Submitted::new(SubmissionKind::Batch)
        })
    }
}
