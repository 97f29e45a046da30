use crate::error::{PostError, PostResult};

use super::client::GhClient;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// A pull request identified by owner, repository and number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    /// Canonical `https://github.com/<owner>/<repo>/pull/<number>` URL.
    pub url: String,
}

impl PullRequestRef {
    /// Parse a pull request URL such as `https://github.com/octo/demo/pull/7`.
    ///
    /// A missing scheme and trailing segments like `/files` or
    /// `#discussion_r1` are accepted. Only github.com is recognised: `gh api`
    /// calls carry no host, so a URL for any other host returns `None`.
    pub fn parse_url(input: &str) -> Option<Self> {
        let input = input.trim();
        let rest = match input.split_once("://") {
            Some((scheme, rest)) if scheme == "https" || scheme == "http" => rest,
            Some(_) => return None,
            None => input,
        };
        let rest = rest.split(['?', '#']).next().unwrap_or_default();

        let segments: Vec<&str> = rest.split('/').collect();
        let [host, owner, repo, pull, number, ..] = segments.as_slice() else {
            return None;
        };
        if !GITHUB_HOSTS.contains(&host.to_ascii_lowercase().as_str()) {
            return None;
        }
        if *pull != "pull" || owner.is_empty() || repo.is_empty() {
            return None;
        }
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: u64 = number.parse().ok().filter(|n| *n > 0)?;
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
            url: format!("https://github.com/{}/{}/pull/{}", owner, repo, number),
        })
    }

    /// REST path below this pull request, e.g. `repos/o/r/pulls/7/comments`.
    pub fn api_path(&self, sub_resource: &str) -> String {
        format!(
            "repos/{}/{}/pulls/{}/{}",
            self.owner, self.repo, self.number, sub_resource
        )
    }
}

/// Resolve a PR number, URL or branch name to a [`PullRequestRef`].
///
/// URLs are parsed locally. Anything else costs exactly one `gh pr view`
/// lookup for the canonical URL, which is then parsed the same way.
pub async fn resolve(client: &dyn GhClient, identifier: &str) -> PostResult<PullRequestRef> {
    if let Some(pr) = PullRequestRef::parse_url(identifier) {
        tracing::debug!(identifier, url = %pr.url, "resolved pull request from URL");
        return Ok(pr);
    }

    let url = client
        .pr_view(identifier, "url", ".url")
        .await
        .map_err(|e| PostError::Resolution(format!("{}: {}", identifier, e.message)))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(PostError::Resolution(format!(
            "no pull request found for '{}'",
            identifier
        )));
    }

    let pr = PullRequestRef::parse_url(url).ok_or_else(|| {
        PostError::Resolution(format!("unrecognised pull request URL '{}'", url))
    })?;
    tracing::debug!(identifier, url = %pr.url, "resolved pull request via gh");
    Ok(pr)
}

/// Whether `sha` is an abbreviated or full hexadecimal commit hash.
pub fn is_commit_sha(sha: &str) -> bool {
    (7..=40).contains(&sha.len()) && sha.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Current head commit of the pull request. Always fetched, never cached:
/// a stale SHA makes GitHub reject the comment anchor.
pub async fn head_commit(client: &dyn GhClient, identifier: &str) -> PostResult<String> {
    let sha = client
        .pr_view(identifier, "headRefOid", ".headRefOid")
        .await
        .map_err(|e| {
            PostError::Resolution(format!(
                "failed to fetch head commit of '{}': {}",
                identifier, e.message
            ))
        })?;
    let sha = sha.trim();
    if !is_commit_sha(sha) {
        return Err(PostError::Resolution(format!(
            "head commit of '{}' is not a valid SHA: '{}'",
            identifier, sha
        )));
    }
    Ok(sha.to_string())
}
