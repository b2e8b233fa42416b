use serde::{Deserialize, Deserializer, Serialize};

pub mod feed_client;
pub mod music_embed;

/// A micro-blog note, as handed to the notes page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: String,
    pub content_html: String,
    pub date_published: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Feed {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
pub struct FeedItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_html: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_published: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl From<FeedItem> for Note {
    fn from(item: FeedItem) -> Self {
        // An explicit image wins, then the first attachment
        let attachment_url = item.attachments
            .and_then(|attachments| attachments.into_iter().next())
            .map(|attachment| attachment.url);
        let image = item.image
            .filter(|url| !url.is_empty())
            .or(attachment_url)
            .filter(|url| !url.is_empty());

        Note {
            id: item.id,
            content_html: item.content_html,
            date_published: item.date_published,
            url: item.url,
            image,
        }
    }
}

impl Feed {
    pub fn into_notes(self) -> Vec<Note> {
        self.items.into_iter().map(Note::from).collect()
    }
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => s,
        Some(Id::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_data::FEED_JSON;

    use super::*;

    #[test]
    fn test_feed_into_notes() {
        let feed: Feed = serde_json::from_str(FEED_JSON).unwrap();
        let notes = feed.into_notes();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0], Note {
            id: "123".to_string(),
            content_html: "<p>Hello world</p>".to_string(),
            date_published: "2025-01-15T10:00:00Z".to_string(),
            url: "https://micro.blog/test/123".to_string(),
            image: None,
        });
        assert_eq!(notes[1].image.as_deref(), Some("https://example.com/photo.jpg"));
        assert_eq!(notes[2].id, "789");
        assert_eq!(notes[2].image.as_deref(), Some("https://example.com/attached.jpg"));
    }

    #[test]
    fn test_explicit_image_beats_attachment() {
        let json = r#"{"items": [{"id": "1", "image": "https://a/explicit.jpg",
            "attachments": [{"url": "https://a/attached.jpg", "mime_type": "image/jpeg"}]}]}"#;
        let notes = serde_json::from_str::<Feed>(json).unwrap().into_notes();
        assert_eq!(notes[0].image.as_deref(), Some("https://a/explicit.jpg"));
    }

    #[test]
    fn test_empty_image_falls_back() {
        let json = r#"{"items": [{"id": "1", "image": "",
            "attachments": [{"url": "https://a/attached.jpg"}]}]}"#;
        let notes = serde_json::from_str::<Feed>(json).unwrap().into_notes();
        assert_eq!(notes[0].image.as_deref(), Some("https://a/attached.jpg"));

        let json = r#"{"items": [{"id": "2", "attachments": []}]}"#;
        let notes = serde_json::from_str::<Feed>(json).unwrap().into_notes();
        assert!(notes[0].image.is_none());
    }

    #[test]
    fn test_missing_fields_tolerated() {
        let json = r#"{"items": [{"id": null}, {}], "title": "ignored"}"#;
        let notes = serde_json::from_str::<Feed>(json).unwrap().into_notes();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, "");
        assert_eq!(notes[1].content_html, "");

        let feed: Feed = serde_json::from_str("{}").unwrap();
        assert!(feed.into_notes().is_empty());
    }

    #[test]
    fn test_null_fields_keep_other_items() {
        let json = r#"{"items": [
            {"id": "1", "content_html": "<p>ok</p>", "date_published": "2025-01-15T10:00:00Z", "url": "https://micro.blog/1"},
            {"id": "2", "content_html": null, "date_published": null, "url": null, "image": null},
            {"id": "3", "content_html": "<p>photo</p>", "attachments": [{"url": null, "mime_type": null}]}
        ]}"#;
        let notes = serde_json::from_str::<Feed>(json).unwrap().into_notes();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].content_html, "<p>ok</p>");
        assert_eq!(notes[1].content_html, "");
        assert_eq!(notes[1].url, "");
        assert_eq!(notes[2].content_html, "<p>photo</p>");
        assert!(notes[2].image.is_none());

        let feed: Feed = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(feed.into_notes().is_empty());
    }

    #[test]
    fn test_note_json_keeps_feed_names() {
        let note = Note {
            id: "1".to_string(),
            content_html: "<p>x</p>".to_string(),
            date_published: "2025-01-15T10:00:00Z".to_string(),
            url: "https://micro.blog/1".to_string(),
            image: None,
        };
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["content_html"], "<p>x</p>");
        assert_eq!(value["date_published"], "2025-01-15T10:00:00Z");
        assert!(value.get("image").is_none());
    }
}
