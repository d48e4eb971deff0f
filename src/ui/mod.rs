//! Terminal rendering for the `metaphor` binary.
//!
//! Results can be rendered as a table, as styled plain text or as JSON; the
//! `Auto` format picks a table on a TTY and JSON otherwise.

use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::{ContentsResponse, SearchResponse};

const ELLIPSIS: &str = "...";

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, JSON otherwise
    Auto,
    Table,
    Json,
    Plain,
}

impl OutputFormat {
    /// Replace `Auto` with the concrete format for the current stdout
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Shorten `text` to at most `max_width` display columns, marking the cut with `...`
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut used = 0;
    let cut = text
        .char_indices()
        .find(|&(_, c)| {
            used += UnicodeWidthChar::width(c).unwrap_or(1);
            used > budget
        })
        .map_or(text.len(), |(idx, _)| idx);

    format!("{}{}", &text[..cut], ELLIPSIS)
}

/// Collapse runs of whitespace so extracts fit on one line
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render search results in the given format
pub fn render_search(response: &SearchResponse, format: OutputFormat) -> String {
    match format.resolve() {
        OutputFormat::Json => serde_json::to_string_pretty(response).unwrap_or_default(),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Title", "URL", "Published", "Score", "ID"]);

            for result in &response.results {
                table.add_row(vec![
                    Cell::new(truncate_with_ellipsis(
                        result.title.as_deref().unwrap_or("(untitled)"),
                        50,
                    ))
                    .add_attribute(Attribute::Bold),
                    Cell::new(truncate_with_ellipsis(&result.url, 50)),
                    Cell::new(result.published_date.as_deref().unwrap_or("")),
                    Cell::new(format!("{:.3}", result.score)),
                    Cell::new(&result.id),
                ]);
            }
            table.to_string()
        }
        _ => {
            let mut out = String::new();
            for (i, result) in response.results.iter().enumerate() {
                out.push_str(&format!(
                    "{}. {}\n",
                    i + 1,
                    result.title.as_deref().unwrap_or("(untitled)").bold()
                ));
                out.push_str(&format!("   URL: {}\n", result.url.blue()));
                if let Some(author) = &result.author {
                    out.push_str(&format!("   Author: {}\n", author));
                }
                if let Some(date) = &result.published_date {
                    out.push_str(&format!("   Published: {}\n", date.yellow()));
                }
                out.push_str(&format!("   Score: {:.3}  ID: {}\n\n", result.score, result.id.dimmed()));
            }
            out
        }
    }
}

/// Render extracted contents in the given format
pub fn render_contents(response: &ContentsResponse, format: OutputFormat) -> String {
    match format.resolve() {
        OutputFormat::Json => serde_json::to_string_pretty(response).unwrap_or_default(),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Title", "URL", "Extract"]);

            for record in &response.contents {
                table.add_row(vec![
                    Cell::new(truncate_with_ellipsis(
                        record.title.as_deref().unwrap_or("(untitled)"),
                        40,
                    ))
                    .add_attribute(Attribute::Bold),
                    Cell::new(truncate_with_ellipsis(&record.url, 40)),
                    Cell::new(truncate_with_ellipsis(&single_line(&record.extract), 80)),
                ]);
            }
            table.to_string()
        }
        _ => {
            let mut out = String::new();
            for record in &response.contents {
                out.push_str(&format!(
                    "Title: {}\n",
                    record.title.as_deref().unwrap_or("(untitled)").bold()
                ));
                out.push_str(&format!("URL: {}\n", record.url.blue()));
                out.push_str(&format!("ID: {}\n", record.id.dimmed()));
                out.push_str(&format!("Content: {}\n\n", single_line(&record.extract)));
            }
            out
        }
    }
}

/// Print search results header.
pub fn print_search_header(label: &str, subject: &str, count: usize, duration: Duration) {
    eprintln!();
    eprintln!("{} {}: \"{}\"", "🔍".yellow().bold(), label, subject.cyan().bold());
    eprintln!(
        "{} {} results in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    eprintln!();
}

/// Spinner shown while a request is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for pipes and `--quiet`.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentRecord, SearchResult};

    fn sample_results() -> SearchResponse {
        SearchResponse {
            results: vec![SearchResult {
                id: "abc".to_string(),
                url: "https://example.com/post".to_string(),
                title: Some("An Example".to_string()),
                published_date: Some("2023-02-01".to_string()),
                author: None,
                score: 0.8125,
            }],
        }
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
        assert_eq!(truncate_with_ellipsis("日本語のタイトル", 9), "日本語...");
    }

    #[test]
    fn test_explicit_formats_resolve_to_themselves() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_ne!(OutputFormat::Auto.resolve(), OutputFormat::Auto);
    }

    #[test]
    fn test_render_search_json() {
        let rendered = render_search(&sample_results(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["results"][0]["id"], "abc");
        assert_eq!(value["results"][0]["publishedDate"], "2023-02-01");
    }

    #[test]
    fn test_render_search_table() {
        let rendered = render_search(&sample_results(), OutputFormat::Table);
        assert!(rendered.contains("An Example"));
        assert!(rendered.contains("0.812") || rendered.contains("0.813"));
    }

    #[test]
    fn test_render_contents_plain() {
        let contents = ContentsResponse {
            contents: vec![ContentRecord {
                id: "abc".to_string(),
                url: "https://example.com/post".to_string(),
                title: None,
                extract: "first line\n\n  second line".to_string(),
            }],
        };
        let rendered = render_contents(&contents, OutputFormat::Plain);
        assert!(rendered.contains("(untitled)"));
        assert!(rendered.contains("first line second line"));
    }
}
