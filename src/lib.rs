//! Post review feedback to GitHub pull requests through the `gh` CLI.
//!
//! Four submission shapes are supported: summary reviews, conversation
//! comments, single inline comments and batched inline reviews. Payloads are
//! handed to `gh` through scoped temporary files, rate-limited calls are
//! retried with exponential backoff, and `REQUEST_CHANGES` on your own pull
//! request is posted as a `COMMENT`.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod github;
pub mod retry;
pub mod submit;
