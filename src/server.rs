use std::io;
use std::sync::Arc;

use chrono::Duration;
use ntex::web;
use serde::Serialize;
use spdlog::{error, info};

use crate::config::{Config, SiteMetadata};
use crate::content::markdown_renderer::render_markdown;
use crate::content::ContentError;
use crate::content_cache::{ContentCache, Expire};
use crate::notes::feed_client::NotesClient;
use crate::notes::music_embed::{detect_music_embed, MusicEmbed, Platform};
use crate::notes::Note;
use crate::post::BlogPost;
use crate::post_repository::BlogRepository;
use crate::view::rss_renderer::render_feed;

const NOTES_KEY: &str = "notes";
const NOTES_TTL_MINUTES: i64 = 60;
const FEED_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

pub struct AppState {
    pub site: SiteMetadata,
    pub repository: BlogRepository,
    pub notes: NotesClient,
    pub notes_cache: ContentCache<Vec<NoteItem>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        AppState {
            site: config.site.clone(),
            repository: BlogRepository::new(config.paths.content_dir.clone()),
            notes: NotesClient::new(config.microblog.feed_url.clone()),
            notes_cache: ContentCache::new(),
        }
    }
}

#[derive(Serialize)]
struct PostView {
    #[serde(flatten)]
    post: BlogPost,
    html: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct NoteItem {
    #[serde(flatten)]
    pub note: Note,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicItem>,
}

#[derive(Serialize, Debug, Clone)]
pub struct MusicItem {
    pub platform: Platform,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        let music = detect_music_embed(&note.content_html).map(|embed: MusicEmbed| MusicItem {
            embed_url: embed.embed_url(),
            platform: embed.platform,
            url: embed.url,
        });
        NoteItem { note, music }
    }
}

fn json_response<T: Serialize>(value: &T) -> web::HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error serializing response: {}", e)),
    }
}

fn content_error(what: &str, e: ContentError) -> web::HttpResponse {
    error!("Error loading {}: {}", what, e);
    web::HttpResponse::InternalServerError()
        .body(format!("Error loading {}", what))
}

#[web::get("/feed.xml")]
async fn feed(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    // The feed always answers; a broken content directory reads as an empty blog
    let posts = state.repository.list_posts().unwrap_or_else(|e| {
        error!("Error listing posts for the feed: {}", e);
        vec![]
    });

    match render_feed(&posts, &state.site) {
        Ok(xml) => web::HttpResponse::Ok()
            .content_type("application/xml")
            .header("Cache-Control", FEED_CACHE_CONTROL)
            .body(xml),
        Err(e) => {
            error!("Error rendering feed: {}", e);
            web::HttpResponse::InternalServerError()
                .body("Error rendering feed")
        }
    }
}

#[web::get("/api/posts")]
async fn list_posts(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match state.repository.list_posts() {
        Ok(posts) => json_response(&posts),
        Err(e) => content_error("posts", e),
    }
}

#[web::get("/api/posts/{slug}")]
async fn view_post(slug: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let slug = slug.into_inner();

    let post = match state.repository.get_post(&slug) {
        Ok(Some(post)) => post,
        Ok(None) => {
            return web::HttpResponse::NotFound()
                .body(format!("Post {} not found", slug));
        }
        Err(e) => return content_error(&format!("post {}", slug), e),
    };

    let html = match render_markdown(&post.content) {
        Ok(html) => html,
        Err(e) => return content_error(&format!("post {}", slug), e),
    };

    json_response(&PostView { post, html })
}

#[web::get("/api/slugs")]
async fn list_slugs(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match state.repository.list_slugs() {
        Ok(slugs) => json_response(&slugs),
        Err(e) => content_error("slugs", e),
    }
}

#[web::get("/api/tags")]
async fn list_tags(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match state.repository.list_all_tags() {
        Ok(tags) => json_response(&tags),
        Err(e) => content_error("tags", e),
    }
}

#[web::get("/api/tags/{tag}")]
async fn list_posts_by_tag(tag: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let tag = tag.into_inner();
    match state.repository.list_posts_by_tag(&tag) {
        Ok(posts) => json_response(&posts),
        Err(e) => content_error(&format!("posts tagged {}", tag), e),
    }
}

#[web::get("/api/notes")]
async fn list_notes(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    if let Some(notes) = state.notes_cache.get(NOTES_KEY) {
        return json_response(notes.as_ref());
    }

    let notes: Vec<NoteItem> = state.notes.fetch_notes().await
        .into_iter()
        .map(NoteItem::from)
        .collect();

    // Empty results are not kept, so the next request tries the feed again
    if notes.is_empty() {
        return json_response(&notes);
    }

    let notes = state.notes_cache.add(NOTES_KEY, notes, Expire::After(Duration::minutes(NOTES_TTL_MINUTES)));
    json_response(notes.as_ref())
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;

    info!("Reading posts from {}", config.paths.content_dir.display());
    match config.microblog.feed_url {
        Some(ref url) => info!("Notes feed: {}", url),
        None => info!("Notes feed disabled"),
    }

    let app_state = Arc::new(AppState::from_config(&config));

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(feed)
            .service(list_posts)
            .service(view_post)
            .service(list_slugs)
            .service(list_tags)
            .service(list_posts_by_tag)
            .service(list_notes)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
