//! Client for the Filmot subtitle search API on RapidAPI.
//!
//! A search is a two-step fan-out:
//!
//! 1. `getsubtitlesearch` with the caller's filters returns the best matching
//!    video plus the ids of further matching videos (`more_results`).
//! 2. Each further video, up to the request's limit, is fetched with the same
//!    filters narrowed by `queryVideoID`. These calls go through a
//!    [`filmot_runner::Runner`], so concurrency, rate limits and retries come
//!    from the `search` section of the config file.

mod error;
mod http;

use std::fmt;

use filmot_config::{DEFAULT_RAPIDAPI_HOST, FilmotConfig};
use filmot_runner::{CallError, Runner, RunnerConfig};
use filmot_types::{QueryParams, SearchPayload, SearchRequest, SearchResponse};
use serde::de::DeserializeOwned;
use url::Url;

pub use error::FilmotError;

/// Endpoint that searches subtitles.
pub const SEARCH_COMMAND: &str = "getsubtitlesearch";

const KEY_HEADER: &str = "X-RapidAPI-Key";
const HOST_HEADER: &str = "X-RapidAPI-Host";

/// RapidAPI credentials. The key is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    host: String,
}

impl Credentials {
    /// Key for the canonical Filmot host.
    pub fn new(key: impl Into<String>) -> Result<Self, FilmotError> {
        Self::with_host(key, DEFAULT_RAPIDAPI_HOST)
    }

    pub fn with_host(key: impl Into<String>, host: impl Into<String>) -> Result<Self, FilmotError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(FilmotError::MissingKey);
        }
        Ok(Self {
            key,
            host: host.into(),
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("host", &self.host)
            .finish()
    }
}

/// Fan-out used by [`Filmot::search`] when the config has no `search` section.
#[must_use]
pub fn default_fan_out() -> RunnerConfig {
    RunnerConfig::default().collecting()
}

/// Handle to the API. Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Filmot {
    http: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    fan_out: RunnerConfig,
}

impl Filmot {
    pub fn new(credentials: Credentials) -> Result<Self, FilmotError> {
        let base_url = format!("https://{}", credentials.host);
        let client = Self {
            http: http::http_client()?,
            credentials,
            base_url: String::new(),
            fan_out: default_fan_out(),
        }
        .with_base_url(&base_url)?;
        tracing::debug!(base_url = %client.base_url, "Filmot client ready");
        Ok(client)
    }

    /// Build from the config file. `key_override` wins over
    /// `FILMOT_RAPIDAPI_KEY`, which wins over the stored key.
    pub fn from_config(config: &FilmotConfig, key_override: Option<&str>) -> Result<Self, FilmotError> {
        let key = key_override
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| config.api_key())
            .ok_or(FilmotError::MissingKey)?;
        let credentials = Credentials::with_host(key, config.host())?;
        Ok(Self::new(credentials)?.with_fan_out(config.search_settings(default_fan_out())))
    }

    /// Point at another server, e.g. a mock in tests.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, FilmotError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|source| FilmotError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Runner settings for the fan-out in [`Filmot::search`]. Output collection
    /// is always enabled.
    pub fn with_fan_out(mut self, fan_out: RunnerConfig) -> Self {
        self.fan_out = fan_out;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, cmd: &str, params: &QueryParams) -> Result<Url, FilmotError> {
        let raw = format!("{}/{cmd}", self.base_url);
        Url::parse_with_params(&raw, params.iter()).map_err(|source| FilmotError::InvalidUrl {
            url: raw,
            source,
        })
    }

    /// GET `{base}/{cmd}?{params}` and decode the JSON body.
    ///
    /// Statuses of 400 and above are logged with their body and returned as
    /// [`FilmotError::Http`].
    pub async fn send_api<T: DeserializeOwned>(
        &self,
        cmd: &str,
        params: &QueryParams,
    ) -> Result<T, FilmotError> {
        let url = self.endpoint(cmd, params)?;
        tracing::debug!(cmd, params = %params, "Sending API request");

        let response = self
            .http
            .get(url)
            .header(KEY_HEADER, &self.credentials.key)
            .header(HOST_HEADER, &self.credentials.host)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = http::truncate_body(response.text().await.unwrap_or_default());
            tracing::error!(cmd, status = status.as_u16(), body = %body, "API request failed");
            return Err(FilmotError::Http {
                cmd: cmd.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| FilmotError::Decode {
            cmd: cmd.to_string(),
            source,
        })
    }

    /// One `getsubtitlesearch` call.
    pub async fn search_one(&self, params: &QueryParams) -> Result<SearchResponse, FilmotError> {
        tracing::info!(params = %params, "Searching");
        let payload: SearchPayload = self.send_api(SEARCH_COMMAND, params).await?;
        Ok(SearchResponse::from_payload(
            params.query().unwrap_or_default(),
            payload,
        ))
    }

    /// Search and fan out to further matching videos.
    ///
    /// Returns the first response followed by up to `limit - 1` more, in the
    /// order they completed. Only the first call's failure is returned; a
    /// failing follow-up call is logged and left out.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResponse>, FilmotError> {
        let params = request.to_params()?;
        let first = self.search_one(&params).await?;

        let follow_ups: Vec<QueryParams> = first
            .more_video_ids(request.max_results() - 1)
            .into_iter()
            .map(|video_id| params.for_video(video_id))
            .collect();
        let mut results = vec![first];
        if follow_ups.is_empty() {
            return Ok(results);
        }

        let mut runner: Runner<SearchResponse> = Runner::new(self.fan_out.clone().collecting())?;
        for video_params in follow_ups {
            let client = self.clone();
            runner.submit(
                move |params: QueryParams| {
                    let client = client.clone();
                    async move {
                        let response = client.search_one(&params).await?;
                        Ok::<_, CallError>(Some(response))
                    }
                },
                video_params,
            );
        }
        runner.join().await;

        results.extend(runner.get_output().unwrap_or_default());
        tracing::info!(
            videos = results.len(),
            elapsed = %runner.elapsed_time(),
            "Search finished"
        );
        Ok(results)
    }
}
