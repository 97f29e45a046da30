use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{PostError, PostResult};
use crate::github::{require_gh, GhCli};
use crate::retry::RetryExecutor;
use crate::submit::{
    InlineCommentSpec, ReviewEvent, ReviewPayload, Side, SubmissionKind, Submitted, Submitter,
};

#[derive(Parser, Debug)]
#[command(name = "prpost")]
#[command(about = "Post reviews, comments and inline comments to GitHub pull requests")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.config/prpost/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a review (comment, approve or request changes)
    #[command(group(ArgGroup::new("state").multiple(false)))]
    Review {
        /// Pull request number, URL or branch name
        pr: String,
        /// Review body
        #[arg(long)]
        body: String,
        /// Approve the pull request
        #[arg(long, group = "state")]
        approve: bool,
        /// Request changes (posted as a comment on your own pull request)
        #[arg(long, group = "state")]
        request_changes: bool,
        /// Comment without a verdict (default)
        #[arg(long, group = "state")]
        comment: bool,
    },
    /// Post a comment on the conversation tab
    Comment {
        /// Pull request number, URL or branch name
        pr: String,
        /// Comment body
        #[arg(long)]
        body: String,
    },
    /// Post one inline comment on a line or line range
    Inline {
        /// Pull request number, URL or branch name
        pr: String,
        /// File path as shown in the diff
        #[arg(long)]
        file: String,
        /// Last line of the commented range
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        line: u32,
        /// First line of a multi-line range
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        start_line: Option<u32>,
        /// Side of the diff
        #[arg(long, value_enum, default_value_t = Side::Right)]
        side: Side,
        /// Comment body
        #[arg(long)]
        body: String,
    },
    /// Submit several inline comments as a single review from a JSON file
    InlineBatch {
        /// Pull request number, URL or branch name
        pr: String,
        /// File like {"event": "COMMENT", "body": "...", "comments": [...]}
        #[arg(long)]
        json: PathBuf,
    },
}

/// A validated request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Review {
        pr: String,
        event: ReviewEvent,
        body: String,
    },
    Comment {
        pr: String,
        body: String,
    },
    Inline {
        pr: String,
        spec: InlineCommentSpec,
    },
    Batch {
        pr: String,
        payload: ReviewPayload,
    },
}

fn require_body(body: String) -> PostResult<String> {
    if body.trim().is_empty() {
        return Err(PostError::UserInput("--body must not be empty".into()));
    }
    Ok(body)
}

impl Command {
    /// Check all local input, including reading the batch file, without
    /// touching the network.
    pub fn prepare(self) -> PostResult<Request> {
        match self {
            Command::Review {
                pr,
                body,
                approve,
                request_changes,
                comment: _,
            } => {
                let event = if approve {
                    ReviewEvent::Approve
                } else if request_changes {
                    ReviewEvent::RequestChanges
                } else {
                    ReviewEvent::Comment
                };
                Ok(Request::Review {
                    pr,
                    event,
                    body: require_body(body)?,
                })
            }
            Command::Comment { pr, body } => Ok(Request::Comment {
                pr,
                body: require_body(body)?,
            }),
            Command::Inline {
                pr,
                file,
                line,
                start_line,
                side,
                body,
            } => {
                let spec = InlineCommentSpec::new(file, line, side, body).with_start_line(start_line);
                spec.validate()?;
                Ok(Request::Inline { pr, spec })
            }
            Command::InlineBatch { pr, json } => {
                if !json.is_file() {
                    return Err(PostError::Validation(format!(
                        "JSON file not found: {}",
                        json.display()
                    )));
                }
                let payload = ReviewPayload::from_file(&json)?;
                Ok(Request::Batch { pr, payload })
            }
        }
    }
}

impl Request {
    pub async fn send(self, submitter: &Submitter<'_>) -> PostResult<Submitted> {
        match self {
            Request::Review { pr, event, body } => submitter.review(&pr, event, &body).await,
            Request::Comment { pr, body } => submitter.comment(&pr, &body).await,
            Request::Inline { pr, spec } => submitter.inline(&pr, spec).await,
            Request::Batch { pr, payload } => submitter.batch(&pr, payload).await,
        }
    }
}

/// One-line summary for the operator.
pub fn describe(submitted: &Submitted) -> String {
    let what = match submitted.kind {
        SubmissionKind::Review => format!(
            "Review submitted ({})",
            submitted.event.unwrap_or_default().as_str()
        ),
        SubmissionKind::Comment => "Comment posted".to_string(),
        SubmissionKind::Inline => "Inline comment posted".to_string(),
        SubmissionKind::Batch => format!(
            "Batch review submitted ({}, {} comments)",
            submitted.event.unwrap_or_default().as_str(),
            submitted.comments
        ),
    };
    match &submitted.url {
        Some(url) => format!("{}: {}", what, url),
        None => what,
    }
}

/// Validate, locate `gh`, and submit. Ctrl-C aborts the submission; dropping
/// it kills the running `gh` process and removes its temporary file.
pub async fn run(command: Command, config: &Config) -> PostResult<Submitted> {
    let request = command.prepare()?;
    require_gh(&config.gh_program)?;

    let client = GhCli::new(config);
    let submitter = Submitter::new(&client, RetryExecutor::new(config.retry));

    tokio::select! {
        result = request.send(&submitter) => result,
        Ok(()) = tokio::signal::ctrl_c() => Err(PostError::Interrupted),
    }
}
