//! Plain-text output.

use std::fmt::Write;

use filmot_types::{Category, Country, Language, SearchResponse};

use crate::Catalogue;

pub(crate) fn responses(responses: &[SearchResponse]) -> String {
    if responses.is_empty() {
        return "No results.".to_string();
    }

    let mut out = String::new();
    for (i, response) in responses.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let title = response
            .result()
            .extra
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("");
        let _ = writeln!(
            out,
            "{}  {title}  ({} hits)",
            response.video_id(),
            response.hit_count()
        );
        for hit in response.hits_data() {
            let _ = writeln!(out, "  {}", hit.link);
            let _ = writeln!(out, "    {}", hit.text);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub(crate) fn catalogue(catalogue: Catalogue) -> String {
    let lines: Vec<String> = match catalogue {
        Catalogue::Categories => Category::all()
            .iter()
            .map(|category| category.as_str().to_string())
            .collect(),
        Catalogue::Countries => Country::all()
            .map(|country| format!("{:>3}  {}", country.code(), country.name()))
            .collect(),
        Catalogue::Languages => Language::all()
            .iter()
            .map(|language| format!("{:<6} {}", language.code(), language.name()))
            .collect(),
    };
    lines.join("\n")
}
