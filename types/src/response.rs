//! Search responses and subtitle context extraction.
//!
//! The endpoint returns one video per call:
//!
//! ```json
//! {
//!   "result": { "id": "dQw4w9WgXcQ", "title": "..." },
//!   "hits": [{ "start": "12.5", ... }],
//!   "subtitles": [{ "s": "10.1", "txt": "..." }],
//!   "more_results": [{ "id": "dQw4w9WgXcQ" }, { "id": "..." }]
//! }
//! ```
//!
//! Timestamps arrive as numbers or numeric strings depending on the field and
//! the API version; both are accepted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Raw body of a `getsubtitlesearch` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub result: VideoResult,
    #[serde(default)]
    pub hits: Vec<Hit>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleLine>,
    #[serde(default)]
    pub more_results: Vec<MoreResult>,
}

/// The matched video. Fields other than `id` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoResult {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One occurrence of the query inside the subtitles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(deserialize_with = "seconds")]
    pub start: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleLine {
    #[serde(rename = "s", deserialize_with = "seconds")]
    pub start: f64,
    #[serde(rename = "txt", default)]
    pub text: String,
}

/// Another video matching the same query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoreResult {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A link to the moment of a hit plus the subtitle text around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitData {
    pub link: String,
    pub text: String,
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid timestamp '{text}'"))),
    }
}

/// One video's search result, with hits ordered by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    query: String,
    result: VideoResult,
    hits: Vec<Hit>,
    subtitles: Vec<SubtitleLine>,
    more_results: Vec<MoreResult>,
}

impl SearchResponse {
    /// `more_results` always starts with the video already in `result`; it is
    /// dropped here.
    #[must_use]
    pub fn from_payload(query: impl Into<String>, payload: SearchPayload) -> Self {
        let SearchPayload {
            result,
            mut hits,
            subtitles,
            mut more_results,
        } = payload;

        hits.sort_by(|a, b| a.start.total_cmp(&b.start));
        if !more_results.is_empty() {
            more_results.remove(0);
        }

        Self {
            query: query.into(),
            result,
            hits,
            subtitles,
            more_results,
        }
    }

    /// `"{query}-{video id}"`, unique per query and video.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.query, self.result.id)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.result.id
    }

    #[must_use]
    pub fn result(&self) -> &VideoResult {
        &self.result
    }

    #[must_use]
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    #[must_use]
    pub fn subtitles(&self) -> &[SubtitleLine] {
        &self.subtitles
    }

    /// Other matching videos, excluding this one.
    #[must_use]
    pub fn more_results(&self) -> &[MoreResult] {
        &self.more_results
    }

    /// Ids of the first `n` other matching videos.
    #[must_use]
    pub fn more_video_ids(&self, n: usize) -> Vec<&str> {
        self.more_results
            .iter()
            .take(n)
            .map(|more| more.id.as_str())
            .collect()
    }

    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    /// Context for the hit at `index`: the line holding it plus its neighbours.
    ///
    /// Returns `None` when there is no such hit or no subtitles.
    #[must_use]
    pub fn hit_data(&self, index: usize) -> Option<HitData> {
        let hit = self.hits.get(index)?;
        if self.subtitles.is_empty() {
            return None;
        }

        // Line holding the hit: the one before the first line starting after it.
        let hit_line = self
            .subtitles
            .iter()
            .skip(1)
            .position(|line| line.start > hit.start)
            .unwrap_or(0);

        Some(self.window(hit_line.saturating_sub(1), hit_line + 2))
    }

    /// Context for every hit, in time order.
    ///
    /// Each window spans two lines before and two lines from the first line
    /// starting after the hit. The scan resumes past the previous hit, so
    /// several hits on the same line yield the same window.
    #[must_use]
    pub fn hits_data(&self) -> Vec<HitData> {
        if self.subtitles.is_empty() {
            return Vec::new();
        }

        let mut hit_line = 0;
        let mut search_from = 1;
        let mut windows = Vec::with_capacity(self.hits.len());
        for hit in &self.hits {
            if let Some(offset) = self
                .subtitles
                .iter()
                .skip(search_from)
                .position(|line| line.start > hit.start)
            {
                hit_line = search_from + offset;
            }
            search_from = hit_line + 1;
            windows.push(self.window(hit_line.saturating_sub(2), hit_line + 2));
        }
        windows
    }

    /// Lines `[from, to)` clamped to the subtitle range; `from` must be in range.
    fn window(&self, from: usize, to: usize) -> HitData {
        let from = from.min(self.subtitles.len() - 1);
        let to = to.clamp(from + 1, self.subtitles.len());
        let lines = &self.subtitles[from..to];
        let text = lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        HitData {
            link: watch_link(&self.result.id, lines[0].start),
            text,
        }
    }
}

/// YouTube link that starts playback at `start` seconds.
#[must_use]
pub fn watch_link(video_id: &str, start: f64) -> String {
    format!("https://www.youtube.com/watch?v={video_id}&t={start}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> SearchPayload {
        serde_json::from_value(json!({
            "result": { "id": "vid1", "title": "Talk", "viewcount": 42 },
            "hits": [
                { "start": "31.0", "token": "b" },
                { "start": 12.5, "token": "a" }
            ],
            "subtitles": [
                { "s": "0", "txt": "intro" },
                { "s": "10", "txt": "first" },
                { "s": 20, "txt": "second" },
                { "s": "30", "txt": "third" },
                { "s": "40", "txt": "fourth" },
                { "s": "50", "txt": "fifth" }
            ],
            "more_results": [{ "id": "vid1" }, { "id": "vid2" }, { "id": "vid3" }]
        }))
        .unwrap()
    }

    #[test]
    fn from_payload_sorts_hits_and_skips_self_in_more_results() {
        let response = SearchResponse::from_payload("talk", payload());
        let starts: Vec<f64> = response.hits().iter().map(|h| h.start).collect();
        assert_eq!(starts, vec![12.5, 31.0]);
        assert_eq!(response.more_video_ids(10), vec!["vid2", "vid3"]);
        assert_eq!(response.more_video_ids(1), vec!["vid2"]);
        assert_eq!(response.hit_count(), 2);
        assert_eq!(response.key(), "talk-vid1");
        assert_eq!(response.result().extra["title"], "Talk");
    }

    #[test]
    fn hit_data_returns_line_and_neighbours() {
        let response = SearchResponse::from_payload("talk", payload());

        // 12.5 falls on the "first" line (10s).
        let data = response.hit_data(0).unwrap();
        assert_eq!(data.text, "intro first second");
        assert_eq!(data.link, "https://www.youtube.com/watch?v=vid1&t=0s");

        // 31.0 falls on the "third" line (30s).
        let data = response.hit_data(1).unwrap();
        assert_eq!(data.text, "second third fourth");
        assert_eq!(data.link, "https://www.youtube.com/watch?v=vid1&t=20s");

        assert_eq!(response.hit_data(2), None);
    }

    #[test]
    fn hits_data_walks_forward() {
        let response = SearchResponse::from_payload("talk", payload());
        let data = response.hits_data();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].text, "intro first second third");
        assert_eq!(data[0].link, "https://www.youtube.com/watch?v=vid1&t=0s");
        assert_eq!(data[1].text, "second third fourth fifth");
        assert_eq!(data[1].link, "https://www.youtube.com/watch?v=vid1&t=20s");
    }

    #[test]
    fn context_is_empty_without_subtitles() {
        let mut raw = payload();
        raw.subtitles.clear();
        let response = SearchResponse::from_payload("talk", raw);
        assert_eq!(response.hit_data(0), None);
        assert!(response.hits_data().is_empty());
    }

    #[test]
    fn hit_before_second_line_uses_first_lines() {
        let raw: SearchPayload = serde_json::from_value(json!({
            "result": { "id": "v" },
            "hits": [{ "start": 0.5 }],
            "subtitles": [{ "s": 0, "txt": "a" }, { "s": 1.5, "txt": "b" }]
        }))
        .unwrap();
        let response = SearchResponse::from_payload("q", raw);
        let data = response.hit_data(0).unwrap();
        assert_eq!(data.text, "a b");
        assert_eq!(data.link, "https://www.youtube.com/watch?v=v&t=0s");
        assert!(response.more_results().is_empty());
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let raw = json!({
            "result": { "id": "v" },
            "hits": [{ "start": "soon" }]
        });
        assert!(serde_json::from_value::<SearchPayload>(raw).is_err());
    }

    #[test]
    fn response_survives_json_round_trip() {
        let response = SearchResponse::from_payload("talk", payload());
        let text = serde_json::to_string(&response).unwrap();
        let back: SearchResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, response);
    }
}
