//! List posts

use anyhow::Result;

use crate::content::PostSummary;
use crate::Folio;

/// Print every post, newest first
pub async fn run(folio: &Folio, json: bool) -> Result<()> {
    let summaries = folio.summaries().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print!("{}", format_table(&summaries));
    }

    Ok(())
}

/// Print the slug of every post folder
pub async fn slugs(folio: &Folio) -> Result<()> {
    for slug in folio.repository().slugs().await? {
        println!("{}", slug);
    }
    Ok(())
}

fn format_table(summaries: &[PostSummary]) -> String {
    let mut out = format!("Posts ({}):\n", summaries.len());
    for post in summaries {
        out.push_str(&format!("  {} - {} [{}]", post.date, post.title, post.href));
        if !post.tags.is_empty() {
            out.push_str(&format!(" #{}", post.tags.join(" #")));
        }
        out.push('\n');
    }
    out
}
