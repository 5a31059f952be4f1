use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use uuid::Uuid;

lazy_static::lazy_static! {
    static ref ID_REGEX: Regex = Regex::new(
        r"(?:^|[/\-=])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#&]|$)"
    ).expect("Failed to compile Notion ID regex - this is a bug in the code");
}

/// Returns the key under which a block id is stored in a record map.
///
/// Notion hands out the same identifier in two shapes: the 32-character
/// compact form used in URLs and post metadata, and the hyphenated UUID used
/// as record-map key. Every lookup goes through this function so both shapes
/// land on the same entry. Identifiers that are not UUIDs at all are only
/// trimmed and otherwise left alone.
pub fn canonical_block_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(uuid) = parse_uuid(trimmed) {
        return uuid.as_hyphenated().to_string();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        if let Ok(id) = PageId::parse(trimmed) {
            return id.to_hyphenated();
        }
    }
    trimmed.to_string()
}

fn parse_uuid(input: &str) -> Option<Uuid> {
    if input.len() == 32 || input.len() == 36 {
        return Uuid::parse_str(input).ok();
    }
    None
}

/// A validated Notion page identifier.
///
/// Stores the compact (non-hyphenated, lowercase) form internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    /// Parses a page id from a compact id, a hyphenated UUID or a Notion URL.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');
        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("page id"));
        }

        if let Some(uuid) = parse_uuid(cleaned) {
            return Ok(PageId(uuid.as_simple().to_string()));
        }

        if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Extracts the page id from a Notion URL.
    ///
    /// A `p=` query parameter (peek view) wins over the path, since the path
    /// then names the enclosing database instead of the page.
    fn extract_from_url(raw: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(raw).map_err(|e| {
            ValidationError::InvalidId(format!("Could not parse URL {}: {}", raw, e))
        })?;

        if let Some((_, peek)) = url.query_pairs().find(|(key, _)| key == "p") {
            if let Some(uuid) = parse_uuid(&peek) {
                return Ok(PageId(uuid.as_simple().to_string()));
            }
        }

        if let Some(captures) = ID_REGEX.captures(url.path()) {
            if let Some(id_match) = captures.get(1) {
                if let Some(uuid) = parse_uuid(id_match.as_str()) {
                    return Ok(PageId(uuid.as_simple().to_string()));
                }
            }
        }

        Err(ValidationError::InvalidId(format!(
            "No valid ID found in URL: {}",
            raw
        )))
    }

    /// Returns the compact 32-character id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID form used as record-map key and by the API.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PageId::parse(&s).map_err(serde::de::Error::custom)
    }
}
