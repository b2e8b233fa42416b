use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

const DELIMITER: &str = "---";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("Front matter is not valid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("Front matter must be a key/value mapping")]
    NotAMapping,

    #[error("End of the front matter block is missing")]
    Unterminated,
}

/// Metadata block and body of a content file.
///
/// No field is interpreted here; defaults for missing keys are filled in by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrontMatter {
    pub metadata: Mapping,
    pub body: String,
}

impl FrontMatter {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)?.as_str()
    }

    /// Deserializes the metadata block into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, FrontMatterError> {
        let value = Value::Mapping(self.metadata.clone());
        Ok(serde_yaml::from_value(value)?)
    }
}

/// Example of a content file
/// ---
/// title: "What I learned"
/// date: 2025-01-15
/// tags: ["career", "design"]
/// ---
///
/// Body of the post.
pub fn parse_front_matter(raw: &str) -> Result<FrontMatter, FrontMatterError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(after_open) = strip_delimiter_line(raw) else {
        return Ok(FrontMatter {
            metadata: Mapping::new(),
            body: raw.to_string(),
        });
    };

    // Walk line by line until the closing delimiter
    let mut yaml_len = 0;
    let mut remaining = after_open;
    loop {
        if remaining.is_empty() {
            return Err(FrontMatterError::Unterminated);
        }

        if let Some(body) = strip_delimiter_line(remaining) {
            let yaml = &after_open[..yaml_len];
            let metadata = parse_metadata(yaml)?;
            return Ok(FrontMatter {
                metadata,
                body: body.to_string(),
            });
        }

        let line_len = remaining.find('\n').map_or(remaining.len(), |pos| pos + 1);
        yaml_len += line_len;
        remaining = &remaining[line_len..];
    }
}

/// Returns what follows the line if `text` starts with a `---` line.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let (line, rest) = match text.find('\n') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => (text, ""),
    };

    if line.trim_end() == DELIMITER {
        Some(rest)
    } else {
        None
    }
}

fn parse_metadata(yaml: &str) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}
