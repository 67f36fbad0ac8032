//! HTTP client wrapper - executes catalog requests and classifies failures

use std::time::Instant;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::messages::NetworkResponse;
use crate::models::{ChapterSummary, FetchError, HealthStatus, MangaDetail, MangaSummary};

/// Create an HTTP client with default configuration
pub fn create_client() -> Client {
    use std::time::Duration;

    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

// ============================================================================
// Endpoint URLs
// ============================================================================

/// `/api/search?title=<query>`, query URL-encoded by the serializer
pub fn search_url(base: &str, query: &str) -> Result<Url, FetchError> {
    Url::parse_with_params(&format!("{}/api/search", base), &[("title", query)])
        .map_err(|e| FetchError::Unreachable(format!("invalid endpoint url: {}", e)))
}

/// `/api/manga/:id`
pub fn manga_url(base: &str, manga_id: &str) -> Result<Url, FetchError> {
    parse(format!("{}/api/manga/{}", base, manga_id))
}

/// `/api/chapters/:id`
pub fn chapters_url(base: &str, manga_id: &str) -> Result<Url, FetchError> {
    parse(format!("{}/api/chapters/{}", base, manga_id))
}

/// `/api/pages/:chapterId`
pub fn pages_url(base: &str, chapter_id: &str) -> Result<Url, FetchError> {
    parse(format!("{}/api/pages/{}", base, chapter_id))
}

/// `/api/health`
pub fn health_url(base: &str) -> Result<Url, FetchError> {
    parse(format!("{}/api/health", base))
}

fn parse(url: String) -> Result<Url, FetchError> {
    Url::parse(&url).map_err(|e| FetchError::Unreachable(format!("invalid endpoint url: {}", e)))
}

// ============================================================================
// Fetch execution
// ============================================================================

/// Issue a GET and parse the JSON body, classifying every failure mode
async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T, FetchError> {
    let resp = client.get(url).send().await.map_err(classify_transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    resp.json::<T>()
        .await
        .map_err(|e| FetchError::Malformed(e.to_string()))
}

fn classify_transport(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Unreachable(String::from("request timed out (30s)"))
    } else if e.is_connect() {
        FetchError::Unreachable(format!("connection failed: {}", e))
    } else {
        FetchError::Unreachable(format!("request failed: {}", e))
    }
}

pub async fn fetch_search(client: &Client, base: &str, id: u64, query: &str) -> NetworkResponse {
    let start = Instant::now();
    let result = match search_url(base, query) {
        Ok(url) => get_json::<Vec<MangaSummary>>(client, url).await,
        Err(e) => Err(e),
    };
    let time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(results) => NetworkResponse::SearchResults {
            id,
            results,
            time_ms,
        },
        Err(error) => NetworkResponse::Failed { id, error, time_ms },
    }
}

pub async fn fetch_manga(client: &Client, base: &str, id: u64, manga_id: &str) -> NetworkResponse {
    let start = Instant::now();
    let result = match manga_url(base, manga_id) {
        Ok(url) => get_json::<MangaDetail>(client, url).await,
        Err(e) => Err(e),
    };
    let time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(detail) => NetworkResponse::Manga { id, detail, time_ms },
        Err(error) => NetworkResponse::Failed { id, error, time_ms },
    }
}

pub async fn fetch_chapters(
    client: &Client,
    base: &str,
    id: u64,
    manga_id: &str,
) -> NetworkResponse {
    let start = Instant::now();
    let result = match chapters_url(base, manga_id) {
        Ok(url) => get_json::<Vec<ChapterSummary>>(client, url).await,
        Err(e) => Err(e),
    };
    let time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(chapters) => NetworkResponse::Chapters {
            id,
            chapters,
            time_ms,
        },
        Err(error) => NetworkResponse::Failed { id, error, time_ms },
    }
}

pub async fn fetch_pages(
    client: &Client,
    base: &str,
    id: u64,
    chapter_id: &str,
) -> NetworkResponse {
    let start = Instant::now();
    let result = match pages_url(base, chapter_id) {
        Ok(url) => get_json::<Vec<String>>(client, url).await,
        Err(e) => Err(e),
    };
    let time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(pages) => NetworkResponse::Pages { id, pages, time_ms },
        Err(error) => NetworkResponse::Failed { id, error, time_ms },
    }
}

/// Startup probe; any failure renders as unreachable rather than an error
pub async fn check_health(client: &Client, base: &str, id: u64) -> NetworkResponse {
    let result = match health_url(base) {
        Ok(url) => get_json::<HealthStatus>(client, url).await,
        Err(e) => Err(e),
    };

    NetworkResponse::Health {
        id,
        reachable: matches!(result, Ok(h) if h.status == "ok"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8000";

    #[test]
    fn test_search_url_carries_encoded_query() {
        let url = search_url(BASE, "naruto").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/search?title=naruto");
    }

    #[test]
    fn test_search_query_round_trips_through_encoding() {
        let query = "fullmetal alchemist: brotherhood";
        let url = search_url(BASE, query).unwrap();

        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "title");
        assert_eq!(value, query);
    }

    #[test]
    fn test_path_endpoints() {
        assert_eq!(
            chapters_url(BASE, "5").unwrap().as_str(),
            "http://localhost:8000/api/chapters/5"
        );
        assert_eq!(
            pages_url(BASE, "9").unwrap().as_str(),
            "http://localhost:8000/api/pages/9"
        );
        assert_eq!(
            manga_url(BASE, "5").unwrap().as_str(),
            "http://localhost:8000/api/manga/5"
        );
        assert_eq!(
            health_url(BASE).unwrap().as_str(),
            "http://localhost:8000/api/health"
        );
    }

    #[test]
    fn test_invalid_base_is_classified_unreachable() {
        assert!(matches!(
            search_url("not a url", "x"),
            Err(FetchError::Unreachable(_))
        ));
    }
}
