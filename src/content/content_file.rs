use std::fs;
use std::path::{Path, PathBuf};

use crate::content::ContentError;

pub const CONTENT_EXTENSION: &str = "mdx";

pub struct ContentFile {
    pub slug: String,
    pub file_path: PathBuf,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(file_path: PathBuf) -> Result<ContentFile, ContentError> {
        let slug = match Self::slug_of(&file_path) {
            None => return Err(ContentError::Unsupported { path: file_path }),
            Some(slug) => slug,
        };

        let raw_content = fs::read_to_string(&file_path).map_err(|source| ContentError::Io {
            path: file_path.clone(),
            source,
        })?;

        Ok(ContentFile {
            slug,
            file_path,
            raw_content,
        })
    }

    /// File name without the content extension, if the extension matches.
    pub fn slug_of(file_path: &Path) -> Option<String> {
        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext == CONTENT_EXTENSION => {}
            _ => return None,
        }
        let stem = file_path.file_stem()?.to_str()?;
        if stem.is_empty() {
            return None;
        }
        Some(stem.to_string())
    }
}
