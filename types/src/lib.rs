//! Core domain types for the Filmot subtitle search API.
//!
//! This crate contains pure domain types with no IO and no async: the value
//! catalogues the API accepts, the request builder that renders them onto a
//! query string, and the response model with its subtitle context helpers.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod catalog;
mod request;
mod response;

use std::fmt;

use thiserror::Error;

pub use catalog::{Category, Country, Language, License};
pub use request::{DEFAULT_LIMIT, ParamError, QueryParams, SearchRequest, parse_date};
pub use response::{
    Hit, HitData, MoreResult, SearchPayload, SearchResponse, SubtitleLine, VideoResult,
    watch_link,
};

/// Which catalogue a rejected value was parsed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    Category,
    Country,
    Language,
    License,
}

impl EnumKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnumKind::Category => "category",
            EnumKind::Country => "country",
            EnumKind::Language => "language",
            EnumKind::License => "license",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    kind: EnumKind,
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn new(kind: EnumKind, raw: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            raw: raw.into(),
            expected,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EnumKind {
        self.kind
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn expected(&self) -> &'static [&'static str] {
        self.expected
    }
}
