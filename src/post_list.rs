use std::path::PathBuf;
use std::{fs, io};

use crate::content::content_file::ContentFile;

pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    /// Content files directly under the root directory, ordered by file name.
    /// A missing root directory yields no files.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        if !self.root_dir.is_dir() {
            return Ok(vec![]);
        }

        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir.as_path())?;
        for entry in entries.flatten() {
            // Follows symlinks, as lookups by slug do
            let path = entry.path();
            if path.is_file() && ContentFile::slug_of(&path).is_some() {
                posts.push(path);
            }
        }

        posts.sort();
        Ok(posts)
    }

    pub fn retrieve_slugs(&self) -> io::Result<Vec<String>> {
        let slugs = self.retrieve_files()?
            .iter()
            .filter_map(|path| ContentFile::slug_of(path))
            .collect();
        Ok(slugs)
    }
}
