pub mod authorship;
mod client;
pub mod reference;
#[cfg(test)]
pub(crate) mod testing;

// Explicit re-exports - only export what is actually used
pub use authorship::is_self_authored;
pub use client::{require_gh, GhCli, GhClient};
pub use reference::{head_commit, is_commit_sha, resolve, PullRequestRef};
