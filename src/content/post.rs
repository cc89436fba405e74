//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::frontmatter::{parse_date_string, Metadata};

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Folder name of the post
    pub slug: String,

    pub title: String,

    pub description: String,

    /// Publication date, verbatim from the front-matter
    pub published_at: String,

    pub tags: Vec<String>,

    /// Raw markdown body
    pub content: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Post {
    pub fn new(slug: String, metadata: Metadata, content: String) -> Self {
        Self {
            slug,
            title: metadata.title,
            description: metadata.description,
            published_at: metadata.published_at,
            tags: metadata.tags,
            content,
            extra: metadata.extra,
        }
    }

    /// `published_at` interpreted as a calendar date, if it is one
    pub fn published_date(&self) -> Option<NaiveDateTime> {
        parse_date_string(&self.published_at)
    }

    /// Project the post onto a listing card
    pub fn summary(&self, blog_path: &str, max_tags: usize) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.published_at.clone(),
            tags: self.tags.iter().take(max_tags).cloned().collect(),
            href: format!("{}/{}", blog_path.trim_end_matches('/'), self.slug),
        }
    }
}

/// Sort posts newest first. Posts whose date can't be interpreted go last,
/// otherwise the existing order is kept.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_key(|p| std::cmp::Reverse(p.published_date()));
}

/// What a listing page needs to show for one post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub tags: Vec<String>,
    pub href: String,
}
