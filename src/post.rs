use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use spdlog::warn;

use crate::content::content_file::ContentFile;
use crate::content::front_matter::{parse_front_matter, FrontMatter};
use crate::content::ContentError;
use crate::text_utils::{format_iso, parse_post_date, reading_time};

pub const DEFAULT_TITLE: &str = "Untitled";

/// Everything about a post except its body. List operations only ever hand these out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostMeta {
    pub slug: String,
    pub title: String,
    #[serde(serialize_with = "serialize_iso")]
    pub date: DateTime<Utc>,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub draft: bool,
    pub reading_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    #[serde(flatten)]
    pub meta: BlogPostMeta,
    pub content: String,
}

impl Display for BlogPost {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, date={}, tags={:?}\ntitle={}\ncontent:\n{}",
               self.meta.slug,
               format_iso(&self.meta.date),
               self.meta.tags,
               self.meta.title,
               self.content
        )
    }
}

impl BlogPost {
    pub fn from_content_file(file: &ContentFile) -> Result<BlogPost, ContentError> {
        let malformed = |source| ContentError::Malformed {
            path: file.file_path.clone(),
            source,
        };

        let front_matter = parse_front_matter(&file.raw_content).map_err(malformed)?;
        let fields: PostFields = front_matter.deserialize().map_err(malformed)?;
        let FrontMatter { body, .. } = front_matter;

        Ok(fields.into_post(&file.slug, body))
    }

    pub fn into_meta(self) -> BlogPostMeta {
        self.meta
    }
}

/// Front matter keys as written in the file, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: Option<String>,
    pub date: Option<Value>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub cover_image: Option<String>,
    pub draft: Option<bool>,
}

impl PostFields {
    pub fn into_post(self, slug: &str, body: String) -> BlogPost {
        let meta = BlogPostMeta {
            slug: slug.to_string(),
            title: self.title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: Self::resolve_date(slug, self.date),
            description: self.description.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            cover_image: self.cover_image.filter(|c| !c.is_empty()),
            draft: self.draft.unwrap_or(false),
            reading_time: reading_time(&body),
        };

        BlogPost {
            meta,
            content: body,
        }
    }

    fn resolve_date(slug: &str, date: Option<Value>) -> DateTime<Utc> {
        let raw = match date {
            None | Some(Value::Null) => return Utc::now(),
            Some(Value::String(s)) => s,
            Some(other) => {
                warn!("Post {} has a non-text date {:?}. Using current time", slug, other);
                return Utc::now();
            }
        };

        match parse_post_date(&raw) {
            Ok(date) => date,
            Err(e) => {
                warn!("Post {}: {}. Using current time", slug, e);
                Utc::now()
            }
        }
    }
}

/// Text of a YAML scalar. Numbers and booleans are read as they are written
/// (`title: 1984`); sequences and mappings are rejected.
fn value_text<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Tagged(tagged) => value_text(tagged.value),
        Value::Sequence(_) => Err(E::invalid_type(Unexpected::Seq, &"a text value")),
        Value::Mapping(_) => Err(E::invalid_type(Unexpected::Map, &"a text value")),
    }
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    value_text(Value::deserialize(deserializer)?)
}

/// A list of scalars. Null entries are dropped.
fn scalar_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    let Some(values) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let mut items = Vec::with_capacity(values.len());
    for value in values {
        if let Some(text) = value_text(value)? {
            items.push(text);
        }
    }
    Ok(Some(items))
}

fn serialize_iso<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_iso(date))
}
