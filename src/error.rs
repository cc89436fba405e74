//! Error types for post loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading posts from disk
#[derive(Error, Debug)]
pub enum PostError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No post document found for `{slug}` in {dir:?}")]
    MissingDocument { slug: String, dir: PathBuf },

    #[error("Malformed front-matter in {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Missing required front-matter field `{field}` in {path:?}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Post folder name is not valid UTF-8: {0}")]
    InvalidSlug(String),
}

impl PostError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PostError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a single-post lookup should report this as "no such post"
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            PostError::Io { .. } | PostError::MissingDocument { .. } | PostError::InvalidSlug(_)
        )
    }
}

pub type Result<T, E = PostError> = std::result::Result<T, E>;
