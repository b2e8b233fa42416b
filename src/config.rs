use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

pub const DEFAULT_SITE_URL: &str = "https://jessicaphan.com";
pub const DEFAULT_CONTENT_DIR: &str = "content/blog";

pub const ENV_SITE_URL: &str = "SITE_URL";
pub const ENV_MICROBLOG_FEED_URL: &str = "MICROBLOG_FEED_URL";
pub const ENV_CONTENT_DIR: &str = "CONTENT_DIR";

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SiteMetadata {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    pub url: Option<String>,
}

impl SiteMetadata {
    /// Origin used in feed links, without a trailing slash.
    pub fn site_url(&self) -> String {
        let url = self.url.as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_SITE_URL);
        url.trim_end_matches('/').to_string()
    }
}

#[derive(Deserialize)]
pub struct Paths {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            content_dir: default_content_dir(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct Microblog {
    pub feed_url: Option<String>,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: SiteMetadata,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub microblog: Microblog,
    pub server: Server,
    pub log: Option<Log>,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"))?;
    let rest = path.strip_prefix("${exe_dir}")
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;
    Ok(exe_dir.join(rest))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_toml(cfg_content: &str) -> io::Result<Config> {
        toml::from_str::<Config>(cfg_content).map_err(|e| io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e)))
    }

    /// Environment values win over the file. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = non_empty(lookup(ENV_SITE_URL)) {
            self.site.url = Some(url);
        }
        if let Some(url) = non_empty(lookup(ENV_MICROBLOG_FEED_URL)) {
            self.microblog.feed_url = Some(url);
        }
        if let Some(dir) = non_empty(lookup(ENV_CONTENT_DIR)) {
            self.paths.content_dir = PathBuf::from(dir);
        }
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    let mut cfg = Config::from_toml(&cfg_content)?;
    cfg.apply_overrides(|key| env::var(key).ok());

    cfg.paths.content_dir = parse_path(cfg.paths.content_dir)?;
    if let Some(ref mut log) = cfg.log {
        if let Some(location) = log.location.take() {
            log.location = Some(parse_path(location)?);
        }
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const CONFIG: &str = r##"
[site]
name = "Jessica Phan"
tagline = "Designer & developer"

[server]
address = "0.0.0.0"
port = 3000
"##;

    #[test]
    fn test_minimal_config() {
        let cfg = Config::from_toml(CONFIG).unwrap();
        assert_eq!(cfg.site.name, "Jessica Phan");
        assert_eq!(cfg.site.url, None);
        assert_eq!(cfg.site.site_url(), DEFAULT_SITE_URL);
        assert_eq!(cfg.paths.content_dir, PathBuf::from("content/blog"));
        assert!(cfg.microblog.feed_url.is_none());
        assert!(cfg.log.is_none());
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn test_full_config() {
        let cfg = Config::from_toml(r##"
[site]
name = "J"
tagline = "T"
url = "https://example.com/"

[paths]
content_dir = "/srv/blog"

[microblog]
feed_url = "https://micro.blog/feed.json"

[server]
address = "127.0.0.1"
port = 8001

[log]
level = "Debug"
log_to_console = true
"##).unwrap();
        assert_eq!(cfg.site.site_url(), "https://example.com");
        assert_eq!(cfg.paths.content_dir, PathBuf::from("/srv/blog"));
        assert_eq!(cfg.microblog.feed_url.as_deref(), Some("https://micro.blog/feed.json"));
        assert!(cfg.log.unwrap().log_to_console);
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml("[site]\nname = 3").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_overrides() {
        let mut cfg = Config::from_toml(CONFIG).unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_SITE_URL, "https://custom-domain.com"),
            (ENV_MICROBLOG_FEED_URL, "https://micro.blog/feed.json?username=test"),
            (ENV_CONTENT_DIR, ""),
        ].into_iter().collect();

        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.site.site_url(), "https://custom-domain.com");
        assert_eq!(cfg.microblog.feed_url.as_deref(), Some("https://micro.blog/feed.json?username=test"));
        assert_eq!(cfg.paths.content_dir, PathBuf::from("content/blog"));
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, CONFIG).unwrap();
        assert!(read_config(&path).is_ok());

        let err = read_config(&dir.path().join("missing.toml")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_exe_dir_path() {
        let path = parse_path(PathBuf::from("${exe_dir}/content/blog")).unwrap();
        assert!(path.ends_with("content/blog"));
        assert!(!path.starts_with("${exe_dir}"));

        let path = parse_path(PathBuf::from("content/blog")).unwrap();
        assert_eq!(path, PathBuf::from("content/blog"));
    }
}
