use std::fmt;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Bandcamp,
    SoundCloud,
    Spotify,
    Apple,
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Bandcamp => "bandcamp",
            Platform::SoundCloud => "soundcloud",
            Platform::Spotify => "spotify",
            Platform::Apple => "apple",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicEmbed {
    pub platform: Platform,
    pub url: String,
}

lazy_static! {
    // Checked in this order. The first platform with a match wins, wherever it sits in the text.
    static ref PLATFORM_PATTERNS: Vec<(Platform, Regex)> = vec![
        (Platform::Bandcamp, Regex::new(r#"href="(https?://[^"]*\.bandcamp\.com/[^"]*)""#).unwrap()),
        (Platform::SoundCloud, Regex::new(r#"href="(https?://soundcloud\.com/[^"]*)""#).unwrap()),
        (Platform::Spotify, Regex::new(r#"href="(https?://open\.spotify\.com/[^"]*)""#).unwrap()),
        (Platform::Apple, Regex::new(r#"href="(https?://music\.apple\.com/[^"]*)""#).unwrap()),
    ];

    static ref SPOTIFY_REGEX: Regex = Regex::new(
        r"open\.spotify\.com/(?P<kind>track|album|playlist|episode)/(?P<id>[a-zA-Z0-9]+)"
    ).unwrap();

    static ref APPLE_REGEX: Regex = Regex::new(
        r"music\.apple\.com/(?P<country>[a-z]{2})/(?P<rest>.+)"
    ).unwrap();
}

const SOUNDCLOUD_WIDGET_OPTIONS: &str = "color=%23333333&auto_play=false&hide_related=true&show_comments=false&show_user=true&show_reposts=false&show_teaser=false&visual=true";

pub fn detect_music_embed(html: &str) -> Option<MusicEmbed> {
    PLATFORM_PATTERNS.iter().find_map(|(platform, regex)| {
        regex.captures(html)
            .and_then(|cap| cap.get(1))
            .map(|url| MusicEmbed {
                platform: *platform,
                url: url.as_str().to_string(),
            })
    })
}

impl MusicEmbed {
    /// URL of the platform's embeddable player, if it has one for this link.
    /// Bandcamp players need an album id the link does not carry, so those stay plain links.
    pub fn embed_url(&self) -> Option<String> {
        match self.platform {
            Platform::Spotify => SPOTIFY_REGEX.captures(&self.url).map(|cap| {
                format!("https://open.spotify.com/embed/{}/{}?utm_source=generator&theme=0",
                        &cap["kind"], &cap["id"])
            }),
            Platform::SoundCloud => {
                let query = serde_urlencoded::to_string([("url", self.url.as_str())]).ok()?;
                Some(format!("https://w.soundcloud.com/player/?{}&{}", query, SOUNDCLOUD_WIDGET_OPTIONS))
            }
            Platform::Apple => APPLE_REGEX.captures(&self.url).map(|cap| {
                format!("https://embed.music.apple.com/{}/{}", &cap["country"], &cap["rest"])
            }),
            Platform::Bandcamp => None,
        }
    }
}
