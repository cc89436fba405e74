//! Content module - loads posts and renders their markdown

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{FrontMatter, Metadata};
pub use loader::PostRepository;
pub use markdown::MarkdownRenderer;
pub use post::{sort_newest_first, Post, PostSummary};
