use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    models::{MediaType, NewMovie},
};

/// OMDb's explicit marker for a missing field; distinct from the field being
/// absent altogether.
const NOT_AVAILABLE: &str = "N/A";

/// Raw OMDb lookup response. Everything is optional; the normalizer owns the
/// defaulting.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbPayload {
    pub title: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub plot: Option<String>,
    pub poster: Option<String>,
    pub response: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
pub trait OmdbApi: Send + Sync {
    async fn fetch_by_imdb_id(&self, imdb_id: &str) -> ApiResult<OmdbPayload>;
}

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl OmdbApi for OmdbClient {
    async fn fetch_by_imdb_id(&self, imdb_id: &str) -> ApiResult<OmdbPayload> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("i", imdb_id), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| ApiError::Provider(format!("OMDb request failed: {err}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::ProviderConfig(
                "OMDb API key is invalid or missing; set OMDB_API_KEY".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ApiError::Provider(format!("OMDb API error: {status}")));
        }

        let payload: OmdbPayload = response
            .json()
            .await
            .map_err(|err| ApiError::Provider(format!("OMDb returned an unreadable body: {err}")))?;

        // OMDb reports failures inside a 200 body via Response/Error.
        if payload.response.as_deref() == Some("False") {
            let reason = payload
                .error
                .clone()
                .unwrap_or_else(|| "Movie not found in OMDb".to_string());
            if reason.contains("API key") {
                return Err(ApiError::ProviderConfig(format!(
                    "OMDb rejected the API key: {reason}"
                )));
            }
            return Err(ApiError::Provider(reason));
        }

        Ok(payload)
    }
}

/// Normalize an OMDb payload into a creation record. Imported records never
/// inherit `watched` or `priority` from the provider.
pub fn movie_from_payload(payload: OmdbPayload) -> NewMovie {
    let kind = match payload.kind.as_deref() {
        Some("series") => MediaType::Series,
        _ => MediaType::Movie,
    };

    let genre = payload
        .genre
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(split_genres)
        .unwrap_or_default();

    let rating = payload.imdb_rating.as_deref().and_then(parse_rating);
    let review = present(payload.plot).unwrap_or_default();
    let poster = present(payload.poster);
    let title = payload
        .title
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    NewMovie {
        title,
        kind,
        genre,
        watched: false,
        priority: 3,
        rating,
        review,
        poster,
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}

/// OMDb rates on a 0-10 decimal scale; round half away from zero to the
/// nearest integer (the same result as JS `Math.round` for a non-negative
/// scale). No clamping: values arrive pre-bounded.
fn parse_rating(raw: &str) -> Option<i32> {
    if raw == NOT_AVAILABLE {
        return None;
    }
    let value: f64 = raw.trim().parse().ok()?;
    Some(value.round() as i32)
}
