use super::{response_url, SubmissionKind, Submitted, Submitter};
use crate::content::{with_temp_content, Content};
use crate::error::{PostError, PostResult};

impl Submitter<'_> {
    /// Post a standalone conversation comment. No review state is involved.
    pub async fn comment(&self, identifier: &str, body: &str) -> PostResult<Submitted> {
        if body.trim().is_empty() {
            return Err(PostError::UserInput("--body must not be empty".into()));
        }

        tracing::info!(identifier, "posting comment");
        let stdout = with_temp_content(Content::Text(body), ".md", |path| async move {
            self.retry
                .execute("comment", || self.client.pr_comment(identifier, &path))
                .await
                .map_err(PostError::from)
        })
        .await?;

        Ok(Submitted {
            url: response_url(&stdout),
            ..Submitted::new(SubmissionKind::Comment)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhError;
    use crate::github::testing::{Call, FakeGh};
    use crate::retry::{RetryExecutor, RetryPolicy};

    #[tokio::test]
    async fn test_comment_posts_body_from_file() {
        let body = "Thanks!\n\n```rust\nlet x = \"$(rm -rf /)\";\n```\n";
        let gh = FakeGh::new()
            .with_submissions(vec![Ok("https://github.com/o/r/pull/3#issuecomment-1\n")]);
        let submitted = Submitter::new(&gh, RetryExecutor::new(RetryPolicy::default()))
            .comment("feature/login", body)
            .await
            .unwrap();

        assert_eq!(submitted.kind, SubmissionKind::Comment);
        assert_eq!(submitted.event, None);
        assert_eq!(
            submitted.url.as_deref(),
            Some("https://github.com/o/r/pull/3#issuecomment-1")
        );
        assert_eq!(
            gh.calls(),
            vec![Call::PrComment {
                identifier: "feature/login".into(),
                body: body.into(),
            }]
        );
        assert!(gh.files().iter().all(|path| !path.exists()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_comment_retries_rate_limit() {
        let gh = FakeGh::new().with_submissions(vec![
            Err(GhError::from_output(Some(1), "You have exceeded a secondary rate limit")),
            Ok(""),
        ]);
        Submitter::new(&gh, RetryExecutor::new(RetryPolicy::default()))
            .comment("3", "hello")
            .await
            .unwrap();
        assert_eq!(gh.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_comment_rejected() {
        let gh = FakeGh::new();
        let err = Submitter::new(&gh, RetryExecutor::new(RetryPolicy::default()))
            .comment("3", "")
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::UserInput(_)));
        assert!(gh.calls().is_empty());
    }
}
