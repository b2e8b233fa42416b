use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::content::front_matter::FrontMatterError;

pub mod content_file;
pub mod front_matter;
pub mod markdown_renderer;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Error reading content file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed content file {}: {}", .path.display(), .source)]
    Malformed {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("Unsupported content file {}", .path.display())]
    Unsupported { path: PathBuf },

    #[error("Error rendering markdown: {0}")]
    Render(String),
}
