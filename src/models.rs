use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deserialize an identifier that the backend may send as a JSON string or
/// number. Both forms map to the same opaque string id.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// A single search hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MangaSummary {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub title: String,
}

/// Chapter ordinal as the backend sends it: a number ("chapter": 1),
/// a label ("chapter": "10.5"), or absent for oneshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterNumber {
    Number(f64),
    Label(String),
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterNumber::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            ChapterNumber::Number(n) => write!(f, "{}", n),
            ChapterNumber::Label(s) => write!(f, "{}", s),
        }
    }
}

/// One row of a title's chapter list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub chapter: Option<ChapterNumber>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ChapterSummary {
    /// Label rendered in the chapter list
    pub fn label(&self) -> String {
        match (&self.chapter, self.title.as_deref()) {
            (Some(num), Some(title)) if !title.is_empty() => {
                format!("Chapter {} - {}", num, title)
            }
            (Some(num), _) => format!("Chapter {}", num),
            (None, Some(title)) if !title.is_empty() => title.to_string(),
            _ => String::from("Oneshot"),
        }
    }
}

/// Title detail as served by `/api/manga/:id`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MangaDetail {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// Body of `/api/health`
#[derive(Clone, Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Classified fetch failure, threaded into the owning view's state
#[derive(Clone, Debug, PartialEq)]
pub enum FetchError {
    /// Transport-level failure: connection refused, DNS, timeout
    Unreachable(String),
    /// The backend answered with a non-success status code
    Status(u16),
    /// The body was not the JSON shape the view expects
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Unreachable(msg) => write!(f, "backend unreachable: {}", msg),
            FetchError::Status(code) => write!(f, "backend returned HTTP {}", code),
            FetchError::Malformed(msg) => write!(f, "unexpected response body: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_accepts_number_or_string() {
        let a: MangaSummary = serde_json::from_str(r#"{"id":1,"title":"Naruto"}"#).unwrap();
        let b: MangaSummary =
            serde_json::from_str(r#"{"id":"1","title":"Naruto"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id, "1");
    }

    #[test]
    fn test_chapter_label_from_number() {
        let c: ChapterSummary = serde_json::from_str(r#"{"id":9,"chapter":1}"#).unwrap();
        assert_eq!(c.label(), "Chapter 1");
    }

    #[test]
    fn test_chapter_label_fractional_and_text() {
        let c: ChapterSummary =
            serde_json::from_str(r#"{"id":9,"chapter":10.5}"#).unwrap();
        assert_eq!(c.label(), "Chapter 10.5");

        let c: ChapterSummary =
            serde_json::from_str(r#"{"id":9,"chapter":"Extra"}"#).unwrap();
        assert_eq!(c.label(), "Chapter Extra");
    }

    #[test]
    fn test_chapter_label_with_title() {
        let c: ChapterSummary =
            serde_json::from_str(r#"{"id":9,"chapter":3,"title":"The Bridge"}"#).unwrap();
        assert_eq!(c.label(), "Chapter 3 - The Bridge");
    }

    #[test]
    fn test_chapter_without_number_falls_back() {
        let c: ChapterSummary =
            serde_json::from_str(r#"{"id":9,"chapter":null}"#).unwrap();
        assert_eq!(c.label(), "Oneshot");
    }

    #[test]
    fn test_manga_detail_optional_fields() {
        let d: MangaDetail =
            serde_json::from_str(r#"{"id":5,"title":"Berserk"}"#).unwrap();
        assert_eq!(d.description, "");
        assert!(d.cover_url.is_none());
    }
}
