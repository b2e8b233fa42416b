use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use spdlog::{debug, warn};

use crate::content::content_file::{ContentFile, CONTENT_EXTENSION};
use crate::content::ContentError;
use crate::post::{BlogPost, BlogPostMeta};
use crate::post_list::PostList;

/// Blog posts read from a flat directory of `.mdx` files.
///
/// Every call goes back to the file system; nothing is cached between calls.
pub struct BlogRepository {
    root_dir: PathBuf,
}

impl BlogRepository {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        BlogRepository {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Published posts, newest first. Drafts are left out and files that fail to
    /// parse are skipped with a warning.
    pub fn list_posts(&self) -> Result<Vec<BlogPostMeta>, ContentError> {
        let mut posts: Vec<BlogPostMeta> = self.load_all()?
            .into_iter()
            .map(BlogPost::into_meta)
            .filter(|meta| !meta.draft)
            .collect();

        // Stable sort: equal dates keep file name order
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// Looks a post up by slug, drafts included so preview links keep working.
    pub fn get_post(&self, slug: &str) -> Result<Option<BlogPost>, ContentError> {
        if !Self::is_valid_slug(slug) {
            return Ok(None);
        }

        let file_path = self.root_dir.join(format!("{}.{}", slug, CONTENT_EXTENSION));
        if !file_path.is_file() {
            return Ok(None);
        }

        let content_file = ContentFile::from_file(file_path)?;
        BlogPost::from_content_file(&content_file).map(Some)
    }

    pub fn list_slugs(&self) -> Result<Vec<String>, ContentError> {
        self.post_list()
            .retrieve_slugs()
            .map_err(|source| self.io_error(source))
    }

    pub fn list_posts_by_tag(&self, tag: &str) -> Result<Vec<BlogPostMeta>, ContentError> {
        let posts = self.list_posts()?
            .into_iter()
            .filter(|post| post.tags.iter().any(|t| t == tag))
            .collect();
        Ok(posts)
    }

    /// Every tag used by a published post, deduplicated and sorted.
    pub fn list_all_tags(&self) -> Result<Vec<String>, ContentError> {
        let tags: BTreeSet<String> = self.list_posts()?
            .into_iter()
            .flat_map(|post| post.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }

    fn load_all(&self) -> Result<Vec<BlogPost>, ContentError> {
        let files = self.post_list()
            .retrieve_files()
            .map_err(|source| self.io_error(source))?;

        let mut posts = Vec::with_capacity(files.len());
        for file_path in files {
            let post = ContentFile::from_file(file_path)
                .and_then(|file| BlogPost::from_content_file(&file));
            match post {
                Ok(post) => {
                    debug!("Loaded post {}", post.meta.slug);
                    posts.push(post);
                }
                Err(e) => warn!("Skipping post: {}", e),
            }
        }
        Ok(posts)
    }

    fn post_list(&self) -> PostList {
        PostList {
            root_dir: self.root_dir.clone(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ContentError {
        ContentError::Io {
            path: self.root_dir.clone(),
            source,
        }
    }

    fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug != "."
            && slug != ".."
            && !slug.contains(['/', '\\', '\0'])
    }
}
