//! Post loader - reads post folders from the posts directory

use futures::future::try_join_all;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::frontmatter::FrontMatter;
use super::post::{sort_newest_first, Post};
use crate::error::{PostError, Result};

/// Loads posts from `<root>/<slug>/index.mdx`
#[derive(Debug, Clone)]
pub struct PostRepository {
    root: PathBuf,
    index_files: Vec<String>,
}

impl PostRepository {
    /// Create a repository over an explicit posts directory
    pub fn new<P: Into<PathBuf>>(root: P, index_files: Vec<String>) -> Self {
        Self {
            root: root.into(),
            index_files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all post folders, sorted.
    ///
    /// Folders whose name is not a valid slug (`.git`, `my post`) are skipped.
    pub async fn slugs(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| PostError::io(&self.root, e))?;

        let mut slugs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PostError::io(&self.root, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| PostError::io(entry.path(), e))?;
            if !file_type.is_dir() {
                continue;
            }

            let slug = entry
                .file_name()
                .into_string()
                .map_err(|name| PostError::InvalidSlug(name.to_string_lossy().into_owned()))?;
            if !is_valid_slug(&slug) {
                tracing::warn!("Skipping folder {:?}: not a valid post slug", entry.path());
                continue;
            }
            slugs.push(slug);
        }

        slugs.sort();
        Ok(slugs)
    }

    /// Load every post, newest first.
    ///
    /// All documents are read concurrently; the first failure aborts the listing.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let slugs = self.slugs().await?;
        tracing::debug!("Loading {} posts from {:?}", slugs.len(), self.root);

        let mut posts = try_join_all(slugs.iter().map(|slug| self.load_post(slug))).await?;
        sort_newest_first(&mut posts);

        Ok(posts)
    }

    /// Look up a single post.
    ///
    /// Returns `Ok(None)` when there is no such post or its document can't be
    /// read. A document that exists but has bad front-matter is an error.
    pub async fn get_post(&self, slug: &str) -> Result<Option<Post>> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected post slug {:?}", slug);
            return Ok(None);
        }

        match self.load_post(slug).await {
            Ok(post) => Ok(Some(post)),
            Err(e) if e.is_absence() => {
                if let PostError::Io { source, .. } = &e {
                    tracing::warn!("Error reading blog post {}: {}", slug, source);
                } else {
                    tracing::debug!("{}", e);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Read and parse the document of one post folder
    async fn load_post(&self, slug: &str) -> Result<Post> {
        let (path, document) = self.read_document(slug).await?;

        let (fm, body) = FrontMatter::parse(&document).map_err(|e| PostError::Malformed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let metadata = fm
            .validate()
            .map_err(|field| PostError::MissingField { path, field })?;

        Ok(Post::new(slug.to_string(), metadata, body.to_string()))
    }

    /// Find the first existing document in a post folder and read it
    async fn read_document(&self, slug: &str) -> Result<(PathBuf, String)> {
        let dir = self.root.join(slug);

        for name in &self.index_files {
            let path = dir.join(name);
            match fs::read_to_string(&path).await {
                Ok(document) => return Ok((path, document)),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(PostError::io(path, e)),
            }
        }

        Err(PostError::MissingDocument {
            slug: slug.to_string(),
            dir,
        })
    }
}

/// A slug must be a single URL-safe path segment
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && slug
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn write_post(root: &Path, slug: &str, date: &str) {
        let dir = root.join(slug);
        stdfs::create_dir_all(&dir).unwrap();
        stdfs::write(
            dir.join("index.mdx"),
            format!(
                "---\ntitle: \"{slug}\"\ndescription: \"About {slug}\"\npublishedAt: \"{date}\"\ntags: [\"t\"]\n---\n\nBody of {slug}\n"
            ),
        )
        .unwrap();
    }

    fn repo(dir: &TempDir) -> PostRepository {
        PostRepository::new(
            dir.path().join("content/blog"),
            vec!["index.mdx".to_string(), "index.md".to_string()],
        )
    }

    fn posts_root(dir: &TempDir) -> PathBuf {
        let root = dir.path().join("content/blog");
        stdfs::create_dir_all(&root).unwrap();
        root
    }

    #[tokio::test]
    async fn test_hello_world_scenario() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        stdfs::create_dir_all(root.join("hello-world")).unwrap();
        stdfs::write(
            root.join("hello-world/index.mdx"),
            "---\ntitle: \"Hello\"\ndescription: \"First post\"\npublishedAt: \"2024-01-01\"\ntags: [\"intro\"]\n---\n\n# Hi",
        )
        .unwrap();

        let post = repo(&dir).get_post("hello-world").await.unwrap().unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.description, "First post");
        assert_eq!(post.published_at, "2024-01-01");
        assert_eq!(post.tags, vec!["intro"]);
        assert_eq!(post.content, "# Hi");
        assert!(post.extra.is_empty());
    }

    #[tokio::test]
    async fn test_list_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "first", "2024-01-01");
        write_post(&root, "third", "2024-03-01");
        write_post(&root, "second", "2024-02-01");

        let posts = repo(&dir).list_posts().await.unwrap();
        let dates: Vec<_> = posts.iter().map(|p| p.published_at.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
        for post in &posts {
            assert!(!post.content.contains("publishedAt"));
            assert_eq!(post.content, format!("Body of {}\n", post.slug));
        }
    }

    #[tokio::test]
    async fn test_list_one_post_per_folder_ignores_files() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "a", "2024-01-01");
        write_post(&root, "b", "2024-01-02");
        stdfs::write(root.join(".DS_Store"), "junk").unwrap();
        stdfs::write(root.join("README.md"), "not a post").unwrap();

        let repo = repo(&dir);
        assert_eq!(repo.slugs().await.unwrap(), vec!["a", "b"]);
        assert_eq!(repo.list_posts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_folders_with_unusable_names_are_skipped() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "kept", "2024-01-01");
        stdfs::create_dir_all(root.join(".hidden")).unwrap();
        write_post(&root, "my post", "2024-02-01");

        let repo = repo(&dir);
        assert_eq!(repo.slugs().await.unwrap(), vec!["kept"]);

        let posts = repo.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        for post in &posts {
            let found = repo.get_post(&post.slug).await.unwrap().unwrap();
            assert_eq!(found.slug, post.slug);
        }
    }

    #[tokio::test]
    async fn test_unreadable_document() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "good", "2024-01-01");
        stdfs::create_dir_all(root.join("binary")).unwrap();
        stdfs::write(root.join("binary/index.mdx"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let repo = repo(&dir);
        assert!(repo.get_post("binary").await.unwrap().is_none());
        assert!(repo.get_post("good").await.unwrap().is_some());

        let err = repo.list_posts().await.unwrap_err();
        assert!(matches!(err, PostError::Io { .. }));
    }

    #[tokio::test]
    async fn test_index_md_fallback() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        stdfs::create_dir_all(root.join("plain")).unwrap();
        stdfs::write(
            root.join("plain/index.md"),
            "---\ntitle: P\ndescription: D\npublishedAt: 2023-05-05\n---\ntext",
        )
        .unwrap();

        let post = repo(&dir).get_post("plain").await.unwrap().unwrap();
        assert_eq!(post.content, "text");
    }

    #[tokio::test]
    async fn test_get_every_listed_slug() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "one", "2024-01-01");
        write_post(&root, "two", "2024-06-01");

        let repo = repo(&dir);
        for slug in repo.slugs().await.unwrap() {
            let post = repo.get_post(&slug).await.unwrap().unwrap();
            assert_eq!(post.slug, slug);
        }
    }

    #[tokio::test]
    async fn test_get_missing_post_is_none() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "exists", "2024-01-01");
        stdfs::create_dir_all(root.join("empty-folder")).unwrap();

        let repo = repo(&dir);
        assert!(repo.get_post("nope").await.unwrap().is_none());
        assert!(repo.get_post("empty-folder").await.unwrap().is_none());
        assert!(repo.get_post("../exists").await.unwrap().is_none());
        assert!(repo.get_post("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_post_without_root_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(repo(&dir).get_post("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_malformed_post_is_error() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        stdfs::create_dir_all(root.join("bad")).unwrap();
        stdfs::write(root.join("bad/index.mdx"), "---\ntitle: Only a title\n---\nbody").unwrap();

        let err = repo(&dir).get_post("bad").await.unwrap_err();
        assert!(matches!(
            err,
            PostError::MissingField {
                field: "description",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_list_fails_fast() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "good", "2024-01-01");
        stdfs::create_dir_all(root.join("broken")).unwrap();
        stdfs::write(root.join("broken/index.mdx"), "---\ntitle: [oops\n---\n").unwrap();

        let err = repo(&dir).list_posts().await.unwrap_err();
        assert!(matches!(err, PostError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_list_folder_without_document_fails() {
        let dir = TempDir::new().unwrap();
        let root = posts_root(&dir);
        write_post(&root, "good", "2024-01-01");
        stdfs::create_dir_all(root.join("drafts")).unwrap();

        let err = repo(&dir).list_posts().await.unwrap_err();
        assert!(matches!(err, PostError::MissingDocument { .. }));
    }

    #[tokio::test]
    async fn test_list_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let err = repo(&dir).list_posts().await.unwrap_err();
        assert!(matches!(err, PostError::Io { .. }));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post_2024.v2"));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("a b"));
        assert!(!is_valid_slug(""));
    }
}
