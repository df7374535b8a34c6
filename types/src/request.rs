//! Search request construction.
//!
//! [`SearchRequest`] is the typed form a caller builds; [`QueryParams`] is the
//! ordered list of `name=value` pairs that actually goes on the URL. Only
//! parameters that were set are emitted, in a fixed order.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde::ser::SerializeMap;
use thiserror::Error;

use crate::{Category, Country, Language, License};

/// Default number of videos a search fans out to, first page included.
pub const DEFAULT_LIMIT: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("search query must not be empty")]
    EmptyQuery,
    #[error("limit must be at least 1")]
    ZeroLimit,
    #[error("{name}: lower bound {low} is greater than upper bound {high}")]
    InvertedRange {
        name: &'static str,
        low: String,
        high: String,
    },
    #[error("invalid date '{raw}': expected YYYY-MM-DD")]
    InvalidDate { raw: String },
}

/// Parse a `YYYY-MM-DD` date as accepted by `startDate` / `endDate`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParamError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ParamError::InvalidDate {
        raw: raw.to_string(),
    })
}

// ============================================================================
// QueryParams
// ============================================================================

/// Ordered query-string parameters. Names are unique; setting a name again
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub const QUERY: &'static str = "query";
    pub const VIDEO_ID: &'static str = "queryVideoID";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `query` parameter, as sent.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.get(Self::QUERY)
    }

    /// A copy narrowed to one video through `queryVideoID`.
    #[must_use]
    pub fn for_video(&self, video_id: &str) -> Self {
        self.clone().with(Self::VIDEO_ID, video_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

impl Serialize for QueryParams {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// SearchRequest
// ============================================================================

/// Filters for a subtitle search.
///
/// ```
/// use filmot_types::{Language, SearchRequest};
///
/// let params = SearchRequest::new("hello world")
///     .unwrap()
///     .language(Language::English)
///     .min_views(1_000)
///     .limit(3)
///     .to_params()
///     .unwrap();
/// assert_eq!(params.query(), Some("\"hello world\""));
/// assert_eq!(params.get("lang"), Some("en"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    language: Option<Language>,
    category: Option<Category>,
    exclude_categories: Vec<Category>,
    license: Option<License>,
    max_views: Option<u64>,
    min_views: Option<u64>,
    min_likes: Option<u64>,
    country: Option<Country>,
    channel_id: Option<String>,
    title: Option<String>,
    start_duration: Option<u32>,
    end_duration: Option<u32>,
    search_manual_subs: bool,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    limit: usize,
}

impl SearchRequest {
    /// `query` is the text searched for inside the subtitles.
    pub fn new(query: impl Into<String>) -> Result<Self, ParamError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(ParamError::EmptyQuery);
        }
        Ok(Self {
            query,
            language: None,
            category: None,
            exclude_categories: Vec::new(),
            license: None,
            max_views: None,
            min_views: None,
            min_likes: None,
            country: None,
            channel_id: None,
            title: None,
            start_duration: None,
            end_duration: None,
            search_manual_subs: false,
            start_date: None,
            end_date: None,
            limit: DEFAULT_LIMIT,
        })
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Exclude a category; may be called repeatedly.
    pub fn exclude_category(mut self, category: Category) -> Self {
        if !self.exclude_categories.contains(&category) {
            self.exclude_categories.push(category);
        }
        self
    }

    pub fn license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }

    pub fn max_views(mut self, views: u64) -> Self {
        self.max_views = Some(views);
        self
    }

    pub fn min_views(mut self, views: u64) -> Self {
        self.min_views = Some(views);
        self
    }

    pub fn min_likes(mut self, likes: u64) -> Self {
        self.min_likes = Some(likes);
        self
    }

    pub fn country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Filter on the video title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Minimal video duration, in seconds.
    pub fn start_duration(mut self, seconds: u32) -> Self {
        self.start_duration = Some(seconds);
        self
    }

    /// Maximal video duration, in seconds.
    pub fn end_duration(mut self, seconds: u32) -> Self {
        self.end_duration = Some(seconds);
        self
    }

    /// Search manually written subtitles instead of automatic ones.
    pub fn manual_subs(mut self, enabled: bool) -> Self {
        self.search_manual_subs = enabled;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Total videos to return, first page included.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.limit
    }

    /// Validate the filters and render them as query parameters.
    pub fn to_params(&self) -> Result<QueryParams, ParamError> {
        if self.limit == 0 {
            return Err(ParamError::ZeroLimit);
        }
        check_range("views", self.min_views, self.max_views)?;
        check_range("duration", self.start_duration, self.end_duration)?;
        check_range("date", self.start_date, self.end_date)?;

        let mut params = QueryParams::new();
        params.set(QueryParams::QUERY, quote_query(&self.query));
        set_opt(&mut params, "lang", self.language.map(Language::code));
        set_opt(&mut params, "category", self.category.map(Category::as_str));
        if !self.exclude_categories.is_empty() {
            let excluded: Vec<&str> = self
                .exclude_categories
                .iter()
                .map(|category| category.as_str())
                .collect();
            params.set("excludeCategory", excluded.join(","));
        }
        set_opt(&mut params, "license", self.license.map(License::code));
        set_opt(&mut params, "maxViews", self.max_views);
        set_opt(&mut params, "minViews", self.min_views);
        set_opt(&mut params, "minLikes", self.min_likes);
        set_opt(&mut params, "country", self.country.map(Country::code));
        set_opt(&mut params, "channelID", self.channel_id.as_deref());
        set_opt(&mut params, "title", self.title.as_deref());
        set_opt(&mut params, "startDuration", self.start_duration);
        set_opt(&mut params, "endDuration", self.end_duration);
        if self.search_manual_subs {
            params.set("searchManualSubs", 1);
        }
        set_opt(
            &mut params,
            "startDate",
            self.start_date.map(|d| d.format(DATE_FORMAT)),
        );
        set_opt(
            &mut params,
            "endDate",
            self.end_date.map(|d| d.format(DATE_FORMAT)),
        );
        Ok(params)
    }
}

/// Multi-word queries are sent as an exact phrase.
fn quote_query(query: &str) -> String {
    let already_quoted = query.len() >= 2 && query.starts_with('"') && query.ends_with('"');
    if query.contains(' ') && !already_quoted {
        format!("\"{query}\"")
    } else {
        query.to_string()
    }
}

fn set_opt(params: &mut QueryParams, name: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        params.set(name, value);
    }
}

fn check_range<T: PartialOrd + fmt::Display>(
    name: &'static str,
    low: Option<T>,
    high: Option<T>,
) -> Result<(), ParamError> {
    if let (Some(low), Some(high)) = (low, high)
        && low > high
    {
        return Err(ParamError::InvertedRange {
            name,
            low: low.to_string(),
            high: high.to_string(),
        });
    }
    Ok(())
}
