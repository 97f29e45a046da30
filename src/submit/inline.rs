use super::{response_url, InlineCommentSpec, SubmissionKind, Submitted, Submitter};
use crate::content::{with_temp_content, Content};
use crate::error::{PostError, PostResult};
use crate::github::{head_commit, resolve};

impl Submitter<'_> {
    /// Post one comment anchored to a line (or line range) of the diff.
    ///
    /// The comment is pinned to the pull request's head commit, looked up
    /// fresh for every call. Any `commit_sha` already on `spec` is replaced.
    pub async fn inline(&self, identifier: &str, spec: InlineCommentSpec) -> PostResult<Submitted> {
        spec.validate()?;

        let pr = resolve(self.client, identifier).await?;
        let sha = head_commit(self.client, identifier).await?;
        let spec = InlineCommentSpec {
            commit_sha: Some(sha),
            ..spec
        };
        let commit_id = spec.commit_sha.as_deref().unwrap_or_default();

        let endpoint = pr.api_path("comments");
        tracing::info!(
            url = %pr.url,
            path = %spec.path,
            line = spec.line,
            start_line = ?spec.start_line,
            commit = commit_id,
            "posting inline comment"
        );

        let content = Content::json(&spec.to_request(commit_id))?;
        let stdout = with_temp_content(content, ".json", |input| async move {
            self.retry
                .execute("inline", || self.client.api_post(&endpoint, &input))
                .await
                .map_err(PostError::from)
        })
        .await?;

        Ok(Submitted {
            comments: 1,
            url: response_url(&stdout),
            ..Submitted::new(SubmissionKind::Inline)
        })
    }
}
