use super::client::GhClient;

fn clean_login(raw: &str) -> Option<String> {
    let login = raw.trim().trim_matches('"');
    (!login.is_empty() && login != "null").then(|| login.to_string())
}

async fn lookup(client: &dyn GhClient, identifier: &str) -> Result<bool, String> {
    let author = client
        .pr_view(identifier, "author", ".author.login")
        .await
        .map_err(|e| format!("author lookup failed: {}", e.message))?;
    let author = clean_login(&author).ok_or("pull request has no author login")?;

    let me = client
        .current_user()
        .await
        .map_err(|e| format!("user lookup failed: {}", e.message))?;
    let me = clean_login(&me).ok_or("authenticated user has no login")?;

    Ok(author == me)
}

/// Whether the authenticated user opened this pull request.
///
/// Any lookup failure yields `false`. The result only ever relaxes a
/// `REQUEST_CHANGES` into a `COMMENT`, so not knowing is treated as "someone
/// else's PR" and the command carries on.
pub async fn is_self_authored(client: &dyn GhClient, identifier: &str) -> bool {
    match lookup(client, identifier).await {
        Ok(own) => {
            tracing::debug!(identifier, own, "checked pull request authorship");
            own
        }
        Err(reason) => {
            tracing::debug!(identifier, %reason, "authorship unknown, assuming not self-authored");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhError;
    use crate::github::testing::{Call, FakeGh};

    #[tokio::test]
    async fn test_same_login_is_self_authored() {
        let gh = FakeGh::new().with_logins("octocat\n", "\"octocat\"\n");
        assert!(is_self_authored(&gh, "7").await);
    }

    #[tokio::test]
    async fn test_different_login_is_not_self_authored() {
        let gh = FakeGh::new().with_logins("octocat", "hubot");
        assert!(!is_self_authored(&gh, "7").await);
    }

    // Failures never propagate; they read as "not self-authored".

    #[tokio::test]
    async fn test_author_lookup_failure_returns_false() {
        let gh = FakeGh::new()
            .with_view("author", Err(GhError::from_output(Some(1), "HTTP 502")))
            .with_user(Ok("octocat"));
        assert!(!is_self_authored(&gh, "7").await);
        // the user lookup is skipped once the author is unknown
        assert!(!gh.calls().contains(&Call::CurrentUser));
    }

    #[tokio::test]
    async fn test_user_lookup_failure_returns_false() {
        let gh = FakeGh::new()
            .with_view("author", Ok("octocat"))
            .with_user(Err(GhError::launch("network unreachable")));
        assert!(!is_self_authored(&gh, "7").await);
    }

    #[tokio::test]
    async fn test_empty_logins_return_false() {
        let gh = FakeGh::new().with_logins("", "");
        assert!(!is_self_authored(&gh, "7").await);

        let gh = FakeGh::new().with_logins("null", "null");
        assert!(!is_self_authored(&gh, "7").await);
    }

    #[tokio::test]
    async fn test_nothing_scripted_returns_false() {
        let gh = FakeGh::new();
        assert!(!is_self_authored(&gh, "7").await);
    }
}
