use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::Config;
use crate::error::{GhError, PostError, PostResult};
use crate::submit::ReviewEvent;

/// The operations `prpost` needs from the GitHub client.
///
/// Payloads are always passed by file path; the implementation never sees
/// body text on its argument list.
#[async_trait]
pub trait GhClient: Send + Sync {
    /// `gh pr view <identifier> --json <field> --jq <jq>`
    async fn pr_view(&self, identifier: &str, field: &str, jq: &str) -> Result<String, GhError>;

    /// Login of the authenticated user.
    async fn current_user(&self) -> Result<String, GhError>;

    /// Post a conversation comment whose body is read from `body_file`.
    async fn pr_comment(&self, identifier: &str, body_file: &Path) -> Result<String, GhError>;

    /// Submit a review whose body is read from `body_file`.
    async fn pr_review(
        &self,
        identifier: &str,
        event: ReviewEvent,
        body_file: &Path,
    ) -> Result<String, GhError>;

    /// `POST` to a REST endpoint with the request body read from `input_file`.
    async fn api_post(&self, endpoint: &str, input_file: &Path) -> Result<String, GhError>;
}

/// Locate the `gh` executable before anything is submitted.
pub fn require_gh(program: &str) -> PostResult<PathBuf> {
    which::which(program).map_err(|_| {
        PostError::UserInput(format!(
            "'{}' not found. Install the GitHub CLI from https://cli.github.com/ and run `gh auth login`.",
            program
        ))
    })
}

/// Arguments for a REST `POST` through `gh api`.
pub fn api_post_args(endpoint: &str, api_version: &str, input_file: &Path) -> Vec<String> {
    vec![
        "api".to_string(),
        endpoint.to_string(),
        "--method".to_string(),
        "POST".to_string(),
        "-H".to_string(),
        "Accept: application/vnd.github+json".to_string(),
        "-H".to_string(),
        format!("X-GitHub-Api-Version: {}", api_version),
        "--input".to_string(),
        input_file.display().to_string(),
    ]
}

fn review_args(identifier: &str, event: ReviewEvent, body_file: &Path) -> Vec<String> {
    vec![
        "pr".to_string(),
        "review".to_string(),
        identifier.to_string(),
        event.gh_flag().to_string(),
        "--body-file".to_string(),
        body_file.display().to_string(),
    ]
}

fn comment_args(identifier: &str, body_file: &Path) -> Vec<String> {
    vec![
        "pr".to_string(),
        "comment".to_string(),
        identifier.to_string(),
        "--body-file".to_string(),
        body_file.display().to_string(),
    ]
}

/// [`GhClient`] backed by the `gh` executable.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    api_version: String,
}

impl GhCli {
    pub fn new(config: &Config) -> Self {
        Self {
            program: config.gh_program.clone(),
            api_version: config.api_version.clone(),
        }
    }

    /// Execute gh CLI command and return stdout.
    ///
    /// The child is killed if this future is dropped, so an interrupted run
    /// never leaves `gh` reading a file that is about to disappear.
    async fn run(&self, args: &[String]) -> Result<String, GhError> {
        tracing::debug!(program = %self.program, ?args, "running gh");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GhError::launch(format!("'{}' not found - is the GitHub CLI installed?", self.program))
                } else {
                    GhError::launch(format!("Failed to execute '{}': {}", self.program, e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = GhError::from_output(output.status.code(), &stderr);
            tracing::debug!(status = ?err.status, kind = ?err.kind, "gh failed");
            return Err(err);
        }

        String::from_utf8(output.stdout)
            .map_err(|_| GhError::launch("gh output contains invalid UTF-8"))
    }
}

#[async_trait]
impl GhClient for GhCli {
    async fn pr_view(&self, identifier: &str, field: &str, jq: &str) -> Result<String, GhError> {
        let args = ["pr", "view", identifier, "--json", field, "--jq", jq].map(String::from);
        self.run(&args).await
    }

    async fn current_user(&self) -> Result<String, GhError> {
        let args = ["api", "user", "--jq", ".login"].map(String::from);
        self.run(&args).await
    }

    async fn pr_comment(&self, identifier: &str, body_file: &Path) -> Result<String, GhError> {
        self.run(&comment_args(identifier, body_file)).await
    }

    async fn pr_review(
        &self,
        identifier: &str,
        event: ReviewEvent,
        body_file: &Path,
    ) -> Result<String, GhError> {
        self.run(&review_args(identifier, event, body_file)).await
    }

    async fn api_post(&self, endpoint: &str, input_file: &Path) -> Result<String, GhError> {
        self.run(&api_post_args(endpoint, &self.api_version, input_file)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_api_post_args_carry_headers_and_input_file() {
        let args = api_post_args(
            "repos/octo/demo/pulls/7/comments",
            "2022-11-28",
            Path::new("/tmp/prpost-x.json"),
        );
        assert_eq!(
            args,
            vec![
                "api",
                "repos/octo/demo/pulls/7/comments",
                "--method",
                "POST",
                "-H",
                "Accept: application/vnd.github+json",
                "-H",
                "X-GitHub-Api-Version: 2022-11-28",
                "--input",
                "/tmp/prpost-x.json",
            ]
        );
    }

    #[test]
    fn test_review_args_use_state_flag_and_body_file() {
        let args = review_args("12", ReviewEvent::RequestChanges, Path::new("/tmp/b.md"));
        assert_eq!(
            args,
            vec!["pr", "review", "12", "--request-changes", "--body-file", "/tmp/b.md"]
        );
        let args = comment_args("feature/x", Path::new("/tmp/b.md"));
        assert_eq!(args, vec!["pr", "comment", "feature/x", "--body-file", "/tmp/b.md"]);
    }

    #[test]
    fn test_require_gh_missing_program() {
        let err = require_gh("__prpost_nonexistent_gh__").unwrap_err();
        assert!(matches!(err, PostError::UserInput(_)));
        assert!(err.to_string().contains("gh auth login"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_stderr_and_status() {
        let cli = GhCli {
            program: "sh".to_string(),
            api_version: "2022-11-28".to_string(),
        };
        let args = ["-c", "echo 'API rate limit exceeded' >&2; exit 3"].map(String::from);
        let err = cli.run(&args).await.unwrap_err();
        assert_eq!(err.status, Some(3));
        assert_eq!(err.kind, FailureKind::Transient);
        assert_eq!(err.message, "API rate limit exceeded");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_returns_stdout() {
        let cli = GhCli {
            program: "sh".to_string(),
            api_version: "2022-11-28".to_string(),
        };
        let args = ["-c", "printf 'https://github.com/o/r/pull/1\\n'"].map(String::from);
        let out = cli.run(&args).await.unwrap();
        assert_eq!(out, "https://github.com/o/r/pull/1\n");
    }

    #[tokio::test]
    async fn test_run_missing_program_is_fatal() {
        let cli = GhCli {
            program: "__prpost_nonexistent_gh__".to_string(),
            api_version: "2022-11-28".to_string(),
        };
        let err = cli.current_user().await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Fatal);
        assert_eq!(err.status, None);
        assert!(err.message.contains("not found"));
    }
}
