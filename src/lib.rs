//! folio: the blog pipeline of a portfolio site
//!
//! Posts live in `content/blog/<slug>/index.mdx` as Markdown with a YAML
//! front-matter block. This crate loads them, orders them newest first and
//! renders their bodies to HTML with syntax-highlighted code blocks.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{MarkdownRenderer, Post, PostRepository, PostSummary};

/// The blog application, rooted at a site directory
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Directory with one folder per post
    pub posts_dir: PathBuf,
    renderer: Arc<MarkdownRenderer>,
}

impl Folio {
    /// Create a new instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        let renderer = Arc::new(MarkdownRenderer::with_options(&config.highlight));
        Self {
            config,
            posts_dir,
            renderer,
        }
    }

    pub fn repository(&self) -> PostRepository {
        PostRepository::new(&self.posts_dir, self.config.index_files.clone())
    }

    /// Render a post body to HTML
    pub fn render_post(&self, post: &Post) -> Result<String> {
        self.renderer.render(&post.content)
    }

    /// Listing cards for every post, newest first
    pub async fn summaries(&self) -> Result<Vec<PostSummary>> {
        let posts = self.repository().list_posts().await?;
        Ok(posts.iter().map(|p| self.summary(p)).collect())
    }

    pub fn summary(&self, post: &Post) -> PostSummary {
        post.summary(&self.config.blog_path, self.config.summary_tags)
    }
}
