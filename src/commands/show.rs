//! Show a single post

use anyhow::{bail, Result};

use crate::content::Post;
use crate::Folio;

/// Print one post's metadata and raw body
pub async fn run(folio: &Folio, slug: &str, json: bool) -> Result<()> {
    let Some(post) = folio.repository().get_post(slug).await? else {
        bail!("Post not found: {}", slug);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        print!("{}", format_post(&post));
    }

    Ok(())
}

fn format_post(post: &Post) -> String {
    let mut out = String::new();
    out.push_str(&format!("title:       {}\n", post.title));
    out.push_str(&format!("description: {}\n", post.description));
    out.push_str(&format!("publishedAt: {}\n", post.published_at));
    out.push_str(&format!("tags:        {}\n", post.tags.join(", ")));
    out.push('\n');
    out.push_str(&post.content);
    if !post.content.ends_with('\n') {
        out.push('\n');
    }
    out
}
