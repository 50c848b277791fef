use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Metadata returned by a successful lookup. Fields mirror what OMDb
/// reports; a missing or unparseable year and the `"N/A"` poster sentinel
/// come through as `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieData {
    pub name: String,
    pub director: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("OMDB_API_KEY is not configured")]
    NoApiKey,
    #[error("lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Outcome of a metadata lookup. `lookup` never returns an `Err`; every
/// failure collapses into `Unavailable`, which callers currently treat
/// the same as `NotFound`.
#[derive(Debug)]
pub enum Lookup {
    Found(MovieData),
    NotFound,
    Unavailable(LookupFailure),
}

impl Lookup {
    pub fn into_data(self) -> Option<MovieData> {
        match self {
            Lookup::Found(data) => Some(data),
            Lookup::NotFound | Lookup::Unavailable(_) => None,
        }
    }
}

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        // Warn once on app load when lookups are disabled
        if api_key.trim().is_empty() {
            warn!("OMDb lookups disabled - no OMDB_API_KEY provided");
        }

        Self { client, api_key, base_url, timeout: API_TIMEOUT }
    }

    /// Looks up a movie by title. No retries, no caching of prior lookups.
    pub async fn lookup(&self, title: &str) -> Lookup {
        if self.api_key.trim().is_empty() {
            return Lookup::Unavailable(LookupFailure::NoApiKey);
        }

        match self.fetch(title).await {
            Ok(lookup) => lookup,
            Err(err) => {
                debug!(title = %title, error = %err, "OMDb lookup failed");
                Lookup::Unavailable(err.into())
            }
        }
    }

    async fn fetch(&self, title: &str) -> Result<Lookup, reqwest::Error> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let resp: OmdbResponse = self
            .client
            .get(url)
            .timeout(self.timeout)
            .query(&[("apikey", self.api_key.as_str()), ("t", title), ("type", "movie")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if resp.response.eq_ignore_ascii_case("false") {
            return Ok(Lookup::NotFound);
        }

        Ok(Lookup::Found(MovieData {
            name: resp.title,
            director: resp.director,
            year: parse_year_field(&resp.year),
            poster_url: resp.poster.filter(|p| p != "N/A" && !p.is_empty()),
        }))
    }
}

// OMDb reports ranges like "2010–2012" for series; only a plain integer
// year counts.
fn parse_year_field(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|y| *y != 0)
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(base_url: String, api_key: &str) -> OmdbClient {
        OmdbClient::new(reqwest::Client::new(), api_key.to_string(), base_url)
    }

    #[tokio::test]
    async fn lookup_returns_movie_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("apikey", "k"))
            .and(query_param("t", "Inception"))
            .and(query_param("type", "movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Response": "True",
                "Title": "Inception",
                "Director": "Christopher Nolan",
                "Year": "2010",
                "Poster": "https://posters.example/inception.jpg",
            })))
            .mount(&server)
            .await;

        let Lookup::Found(data) = client(server.uri(), "k").lookup("Inception").await else {
            panic!("expected Found");
        };
        assert_eq!(data.name, "Inception");
        assert_eq!(data.director, "Christopher Nolan");
        assert_eq!(data.year, Some(2010));
        assert_eq!(data.poster_url.as_deref(), Some("https://posters.example/inception.jpg"));
    }

    #[tokio::test]
    async fn year_range_and_na_poster_are_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Response": "True",
                "Title": "Sherlock",
                "Director": "N/A",
                "Year": "2010\u{2013}2017",
                "Poster": "N/A",
            })))
            .mount(&server)
            .await;

        let Lookup::Found(data) = client(server.uri(), "k").lookup("Sherlock").await else {
            panic!("expected Found");
        };
        assert_eq!(data.year, None);
        assert_eq!(data.poster_url, None);
    }

    #[tokio::test]
    async fn service_not_found_flag_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Response": "False",
                "Error": "Movie not found!",
            })))
            .mount(&server)
            .await;

        let lookup = client(server.uri(), "k").lookup("no such film").await;
        assert!(matches!(lookup, Lookup::NotFound));
    }

    #[tokio::test]
    async fn missing_api_key_skips_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let lookup = client(server.uri(), "").lookup("Inception").await;
        assert!(matches!(lookup, Lookup::Unavailable(LookupFailure::NoApiKey)));
        assert!(lookup.into_data().is_none());
    }

    #[tokio::test]
    async fn timeout_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"Response": "True", "Title": "Slow"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut client = client(server.uri(), "k");
        client.timeout = Duration::from_millis(50);
        let lookup = client.lookup("Slow").await;
        assert!(matches!(lookup, Lookup::Unavailable(LookupFailure::Request(_))));
    }

    #[tokio::test]
    async fn connection_failure_maps_to_unavailable() {
        // Nothing listens on port 9 (discard)
        let lookup = client("http://127.0.0.1:9".to_string(), "k").lookup("Inception").await;
        assert!(matches!(lookup, Lookup::Unavailable(LookupFailure::Request(_))));
        assert!(lookup.into_data().is_none());
    }

    #[tokio::test]
    async fn http_error_status_maps_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let lookup = client(server.uri(), "bad-key").lookup("Inception").await;
        assert!(matches!(lookup, Lookup::Unavailable(LookupFailure::Request(_))));
    }

    #[test]
    fn year_field_parsing() {
        assert_eq!(parse_year_field("2010"), Some(2010));
        assert_eq!(parse_year_field(""), None);
        assert_eq!(parse_year_field("0"), None);
        assert_eq!(parse_year_field("soon"), None);
        assert_eq!(parse_year_field("2010-2012"), None);
    }
}
