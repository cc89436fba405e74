//! Render a post body to HTML

use anyhow::{bail, Result};

use crate::Folio;

/// Print the rendered HTML of one post
pub async fn run(folio: &Folio, slug: &str) -> Result<()> {
    let Some(post) = folio.repository().get_post(slug).await? else {
        bail!("Post not found: {}", slug);
    };

    let html = folio.render_post(&post)?;
    print!("{}", html);

    Ok(())
}
