pub mod config;
pub mod content;
pub mod content_cache;
pub mod logger;
pub mod notes;
pub mod post;
pub mod post_list;
pub mod post_repository;
pub mod server;
pub mod text_utils;
pub mod view;
#[cfg(test)]
mod test_data;

pub use notes::feed_client::NotesClient;
pub use notes::music_embed::{detect_music_embed, MusicEmbed, Platform};
pub use notes::Note;
pub use post::{BlogPost, BlogPostMeta};
pub use post_repository::BlogRepository;
pub use view::rss_renderer::render_feed;
