use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;

use folio::content::content_file::CONTENT_EXTENSION;

#[derive(Parser, Debug)]
#[command(version, about = "Creates a new draft post", long_about = None)]
struct Args {
    /// Post title. The slug is derived from it
    #[arg(short, long)]
    title: String,

    /// Short summary used in listings and the feed
    #[arg(short, long, default_value = "")]
    description: String,

    /// Comma separated tags
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Directory to write the post to. Prints to stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn slug_from_title(title: &str) -> String {
    let ascii = unidecode::unidecode(title).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn render_post(title: &str, description: &str, tags: &[String], date: &NaiveDate) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: {}", yaml_quote(title));
    let _ = writeln!(&mut buf, "date: \"{}\"", date.format("%Y-%m-%d"));
    let _ = writeln!(&mut buf, "description: {}", yaml_quote(description));
    let tags: Vec<String> = tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(yaml_quote)
        .collect();
    let _ = writeln!(&mut buf, "tags: [{}]", tags.join(", "));
    let _ = writeln!(&mut buf, "draft: true");
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "Write your post here.");

    buf
}

fn main() -> Result<()> {
    let args = Args::parse();

    let slug = slug_from_title(&args.title);
    if slug.is_empty() {
        bail!("Title '{}' does not produce a usable slug", args.title);
    }

    let post = render_post(&args.title, &args.description, &args.tags, &Utc::now().date_naive());

    let Some(dir) = args.output else {
        print!("{}", post);
        return Ok(());
    };

    let path = dir.join(format!("{}.{}", slug, CONTENT_EXTENSION));
    println!("Creating file {}", path.display());
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    file.write_all(post.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use folio::content::front_matter::parse_front_matter;

    use super::*;

    #[test]
    fn test_slug_from_title() {
        assert_eq!(slug_from_title("Designing with Constraints"), "designing-with-constraints");
        assert_eq!(slug_from_title("  Café & Crème -- Notes!  "), "cafe-creme-notes");
        assert_eq!(slug_from_title("???"), "");
    }

    #[test]
    fn test_render_post_parses_back() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let tags = vec!["design".to_string(), " ".to_string(), "process".to_string()];
        let post = render_post("Say \"hi\"", "Short", &tags, &date);

        let parsed = parse_front_matter(&post).unwrap();
        assert_eq!(parsed.get_str("title"), Some("Say \"hi\""));
        assert_eq!(parsed.get_str("date"), Some("2025-01-20"));
        assert_eq!(parsed.get_str("description"), Some("Short"));
        assert!(parsed.body.contains("Write your post here."));
    }
}
