use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, SearchResult},
};

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    authorization: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        authorization: String,
        base_url: String,
        rps: u32,
    ) -> Self {
        if api_key.trim().is_empty() && authorization.trim().is_empty() {
            tracing::warn!(
                "no TMDB credentials configured, set TMDB_AUTHORIZATION or TMDB_API_KEY"
            );
        }

        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN),
        )));
        Self { client, api_key, authorization, base_url, limiter }
    }

    pub async fn search_movie(&self, title: &str) -> AppResult<Vec<SearchResult>> {
        let resp: SearchResponse = self.get("/search/movie", &[("query", title)]).await?;

        let results = resp
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                let Some(original_title) = m.original_title else {
                    debug!(external_id = m.id, "skipping search result without a title");
                    return None;
                };
                Some(SearchResult {
                    original_title,
                    release_date: m.release_date.unwrap_or_default(),
                    external_id: m.id,
                })
            })
            .collect::<Vec<_>>();

        debug!(%title, found = results.len(), "searched TMDB");
        Ok(results)
    }

    pub async fn movie_details(&self, external_id: i64) -> AppResult<MovieDetails> {
        let resp: DetailsResponse = self.get(&format!("/movie/{external_id}"), &[]).await?;
        debug!(external_id, payload = ?resp, "fetched TMDB movie");

        let title = required(resp.original_title, "original_title")?;
        let poster_path = required(resp.poster_path, "poster_path")?;
        let release_date = required(resp.release_date, "release_date")?;
        let overview = required(resp.overview, "overview")?;
        let release_year = parse_release_year(&release_date).ok_or_else(|| {
            AppError::Upstream(format!("unreadable release_date {release_date:?}"))
        })?;

        Ok(MovieDetails { title, poster_path, release_year, overview })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> AppResult<T> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut req = self.client.get(url).header(ACCEPT, "application/json").query(params);
        if !self.api_key.trim().is_empty() {
            req = req.query(&[("api_key", self.api_key.trim())]);
        }
        let authorization = self.authorization.trim();
        if authorization.contains(char::is_whitespace) {
            req = req.header(AUTHORIZATION, authorization);
        } else if !authorization.is_empty() {
            req = req.bearer_auth(authorization);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("provider answered {status}")));
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Upstream(format!("unexpected response body: {e}")))
    }
}

/// Year from the leading four characters of a `YYYY-MM-DD` date.
pub fn parse_release_year(release_date: &str) -> Option<i32> {
    release_date.get(..4)?.parse().ok()
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::Upstream(format!("response is missing {field}")))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchMovie>>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    id: i64,
    original_title: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    original_title: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;

    fn client(server: &MockServer, authorization: &str) -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            String::new(),
            authorization.to_string(),
            server.uri(),
            100,
        )
    }

    #[test]
    fn release_year_comes_from_the_first_four_characters() {
        assert_eq!(parse_release_year("2010-07-16"), Some(2010));
        assert_eq!(parse_release_year("1999"), Some(1999));
        assert_eq!(parse_release_year(""), None);
        assert_eq!(parse_release_year("20"), None);
        assert_eq!(parse_release_year("soon"), None);
    }

    #[tokio::test]
    async fn search_maps_results_and_sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "Inception"))
            .and(header("authorization", "Bearer token-123"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    { "id": 27205, "original_title": "Inception", "release_date": "2010-07-15" },
                    { "id": 64956, "original_title": "Inception: The Cobol Job" },
                    { "id": 1, "release_date": "2001-01-01" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client(&server, "Bearer token-123").search_movie("Inception").await.unwrap();

        assert_eq!(
            results,
            vec![
                SearchResult {
                    original_title: "Inception".to_string(),
                    release_date: "2010-07-15".to_string(),
                    external_id: 27205,
                },
                SearchResult {
                    original_title: "Inception: The Cobol Job".to_string(),
                    release_date: String::new(),
                    external_id: 64956,
                },
            ]
        );
    }

    #[tokio::test]
    async fn bare_token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(header("authorization", "Bearer raw-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client(&server, "raw-token").search_movie("Nothing").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn api_key_goes_in_the_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "k3y"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let tmdb = TmdbClient::new(
            reqwest::Client::new(),
            "k3y".to_string(),
            String::new(),
            server.uri(),
            100,
        );
        assert!(tmdb.search_movie("Anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_results_mean_no_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "page": 1, "results": null, "total_results": 0 })),
            )
            .mount(&server)
            .await;

        let results = client(&server, "").search_movie("Nothing At All").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server, "").search_movie("Inception").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server, "").search_movie("Inception").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn details_extracts_fields_and_year() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/27205"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 27205,
                "original_title": "Inception",
                "poster_path": "/inception.jpg",
                "release_date": "2010-07-16",
                "overview": "A thief who steals corporate secrets.",
                "runtime": 148
            })))
            .mount(&server)
            .await;

        let details = client(&server, "").movie_details(27205).await.unwrap();

        assert_eq!(
            details,
            MovieDetails {
                title: "Inception".to_string(),
                poster_path: "/inception.jpg".to_string(),
                release_year: 2010,
                overview: "A thief who steals corporate secrets.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn details_missing_poster_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "original_title": "Posterless",
                "poster_path": null,
                "release_date": "2001-02-03",
                "overview": ""
            })))
            .mount(&server)
            .await;

        let err = client(&server, "").movie_details(5).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m.contains("poster_path")));
    }

    #[tokio::test]
    async fn details_with_blank_release_date_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "original_title": "Undated",
                "poster_path": "/u.jpg",
                "release_date": "",
                "overview": "TBA"
            })))
            .mount(&server)
            .await;

        let err = client(&server, "").movie_details(6).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_upstream_error() {
        let tmdb = TmdbClient::new(
            reqwest::Client::new(),
            String::new(),
            String::new(),
            "http://127.0.0.1:9".to_string(),
            100,
        );
        let err = tmdb.movie_details(1).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
