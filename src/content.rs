//! Scoped temporary files used to hand long text and JSON payloads to `gh`.
//!
//! Review bodies and batch payloads can be arbitrarily long and full of shell
//! metacharacters, so they are never passed as arguments. Instead they are
//! written to a private temporary file whose path is given to `gh`
//! (`--body-file` / `--input`). The file is removed when the owning
//! [`TempContent`] is dropped, which covers success, error and cancellation.

use serde::Serialize;
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::PostResult;

/// What to write into the temporary artifact.
#[derive(Debug, Clone)]
pub enum Content<'a> {
    Text(&'a str),
    Json(serde_json::Value),
}

impl<'a> Content<'a> {
    /// Structured payload. Object keys end up sorted, so the file is stable
    /// for identical input.
    pub fn json<T: Serialize>(payload: &T) -> io::Result<Self> {
        let value = serde_json::to_value(payload).map_err(io::Error::other)?;
        Ok(Content::Json(value))
    }

    fn to_bytes(&self) -> io::Result<Vec<u8>> {
        match self {
            Content::Text(text) => Ok(text.as_bytes().to_vec()),
            // serde_json writes non-ASCII characters literally
            Content::Json(value) => serde_json::to_vec_pretty(value).map_err(io::Error::other),
        }
    }
}

/// A temporary file that is deleted on drop.
#[derive(Debug)]
pub struct TempContent {
    file: NamedTempFile,
}

impl TempContent {
    pub fn write(content: &Content<'_>, suffix: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("prpost-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(&content.to_bytes()?)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Write `content` to a temporary file, run `operation` with its path, and
/// remove the file before returning, whatever the outcome.
pub async fn with_temp_content<T, F, Fut>(
    content: Content<'_>,
    suffix: &str,
    operation: F,
) -> PostResult<T>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = PostResult<T>>,
{
    let temp = TempContent::write(&content, suffix)?;
    tracing::debug!(path = %temp.path().display(), "wrote temporary content");
    let result = operation(temp.path().to_path_buf()).await;
    drop(temp);
    result
}
