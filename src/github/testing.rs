//! Scripted in-memory [`GhClient`] for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::client::GhClient;
use crate::error::GhError;
use crate::submit::ReviewEvent;

/// One recorded call. File-backed payloads are captured as their contents at
/// call time, together with the path so tests can check it was removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PrView {
        identifier: String,
        field: String,
    },
    CurrentUser,
    PrComment {
        identifier: String,
        body: String,
    },
    PrReview {
        identifier: String,
        event: ReviewEvent,
        body: String,
    },
    ApiPost {
        endpoint: String,
        input: String,
    },
}

#[derive(Default)]
pub struct FakeGh {
    views: HashMap<String, Result<String, GhError>>,
    user: Option<Result<String, GhError>>,
    submissions: Mutex<VecDeque<Result<String, GhError>>>,
    calls: Mutex<Vec<Call>>,
    files: Mutex<Vec<PathBuf>>,
}

impl FakeGh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response for `gh pr view --json <field>`.
    pub fn with_view(mut self, field: &str, response: Result<&str, GhError>) -> Self {
        self.views
            .insert(field.to_string(), response.map(str::to_string));
        self
    }

    pub fn with_user(mut self, response: Result<&str, GhError>) -> Self {
        self.user = Some(response.map(str::to_string));
        self
    }

    /// Queue responses for submission calls (comment, review, api post), in
    /// order. Once the queue is empty every submission succeeds.
    pub fn with_submissions(self, responses: Vec<Result<&str, GhError>>) -> Self {
        *self.submissions.lock().unwrap() = responses
            .into_iter()
            .map(|r| r.map(str::to_string))
            .collect();
        self
    }

    /// Configure the PR author and the authenticated user.
    pub fn with_logins(self, author: &str, me: &str) -> Self {
        self.with_view("author", Ok(author)).with_user(Ok(me))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every file path handed to the fake.
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read(&self, path: &Path) -> String {
        self.files.lock().unwrap().push(path.to_path_buf());
        fs::read_to_string(path).unwrap()
    }

    fn next_submission(&self) -> Result<String, GhError> {
        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[async_trait]
impl GhClient for FakeGh {
    async fn pr_view(&self, identifier: &str, field: &str, _jq: &str) -> Result<String, GhError> {
        self.record(Call::PrView {
            identifier: identifier.to_string(),
            field: field.to_string(),
        });
        self.views
            .get(field)
            .cloned()
            .unwrap_or_else(|| Err(GhError::from_output(Some(1), "no response scripted")))
    }

    async fn current_user(&self) -> Result<String, GhError> {
        self.record(Call::CurrentUser);
        self.user
            .clone()
            .unwrap_or_else(|| Err(GhError::from_output(Some(1), "no response scripted")))
    }

    async fn pr_comment(&self, identifier: &str, body_file: &Path) -> Result<String, GhError> {
        let body = self.read(body_file);
        self.record(Call::PrComment {
            identifier: identifier.to_string(),
            body,
        });
        self.next_submission()
    }

    async fn pr_review(
        &self,
        identifier: &str,
        event: ReviewEvent,
        body_file: &Path,
    ) -> Result<String, GhError> {
        let body = self.read(body_file);
        self.record(Call::PrReview {
            identifier: identifier.to_string(),
            event,
            body,
        });
        self.next_submission()
    }

    async fn api_post(&self, endpoint: &str, input_file: &Path) -> Result<String, GhError> {
        let input = self.read(input_file);
        self.record(Call::ApiPost {
            endpoint: endpoint.to_string(),
            input,
        });
        self.next_submission()
    }
}
