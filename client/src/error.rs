use filmot_runner::RunnerError;
use filmot_types::ParamError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilmotError {
    #[error("no RapidAPI key configured; run `filmot set-key <KEY>` or set FILMOT_RAPIDAPI_KEY")]
    MissingKey,
    #[error("invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("API `{cmd}` failed with HTTP {status}: {body}")]
    Http {
        cmd: String,
        status: StatusCode,
        body: String,
    },
    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to parse JSON response from `{cmd}`: {source}")]
    Decode {
        cmd: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl FilmotError {
    /// HTTP status for `Http` errors.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
