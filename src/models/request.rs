//! Request payload models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{DEFAULT_AUTOPROMPT, DEFAULT_NUM_RESULTS};

/// Ranking strategy offered by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Neural,
    Keyword,
}

impl SearchType {
    /// Wire name of the search type
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Neural => "neural",
            SearchType::Keyword => "keyword",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neural" => Ok(SearchType::Neural),
            "keyword" => Ok(SearchType::Keyword),
            other => Err(format!("unknown search type: {}", other)),
        }
    }
}

/// JSON body sent to `/search` and `/findSimilar`.
///
/// `numResults` and `useAutoprompt` are always present. Every other field is
/// omitted from the payload while unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// Free-text query (search only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Subject URL (find-similar only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Number of results to return
    pub num_results: u32,

    /// Let the service rewrite the query before running it
    pub use_autoprompt: bool,

    /// Ranking strategy
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,

    /// Only return results from these domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,

    /// Never return results from these domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_crawl_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_crawl_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_published_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_published_date: Option<String>,

    /// Drop results from the subject URL's own domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_source_domain: Option<bool>,
}

impl RequestBody {
    fn blank() -> Self {
        Self {
            query: None,
            url: None,
            num_results: DEFAULT_NUM_RESULTS,
            use_autoprompt: DEFAULT_AUTOPROMPT,
            search_type: None,
            include_domains: None,
            exclude_domains: None,
            start_crawl_date: None,
            end_crawl_date: None,
            start_published_date: None,
            end_published_date: None,
            exclude_source_domain: None,
        }
    }

    /// Base parameters for a `/search` call: count 10, no autoprompt, neural ranking
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            search_type: Some(SearchType::default()),
            ..Self::blank()
        }
    }

    /// Base parameters for a `/findSimilar` call: count 10, no autoprompt
    pub fn find_similar(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::blank()
        }
    }
}

/// Ordered identifiers for a `/contents` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentsRequest {
    pub ids: Vec<String>,
}

impl ContentsRequest {
    /// Create a contents request for the given identifiers
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// The `ids="a","b"` query string understood by the service
    pub fn query_string(&self) -> String {
        format!("ids=\"{}\"", self.ids.join("\",\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_body_defaults_only() {
        let body = serde_json::to_value(RequestBody::search("rust async")).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "rust async",
                "numResults": 10,
                "useAutoprompt": false,
                "type": "neural",
            })
        );
    }

    #[test]
    fn test_find_similar_body_has_no_type() {
        let body = serde_json::to_value(RequestBody::find_similar("https://example.com")).unwrap();
        assert_eq!(
            body,
            json!({
                "url": "https://example.com",
                "numResults": 10,
                "useAutoprompt": false,
            })
        );
    }

    #[test]
    fn test_filters_use_camel_case() {
        let mut body = RequestBody::search("q");
        body.include_domains = Some(vec!["arxiv.org".to_string()]);
        body.start_published_date = Some("2023-01-01".to_string());
        body.exclude_source_domain = Some(true);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["includeDomains"], json!(["arxiv.org"]));
        assert_eq!(value["startPublishedDate"], json!("2023-01-01"));
        assert_eq!(value["excludeSourceDomain"], json!(true));
        assert!(value.get("excludeDomains").is_none());
        assert!(value.get("endCrawlDate").is_none());
    }

    #[test]
    fn test_search_type_parse() {
        assert_eq!("Keyword".parse::<SearchType>().unwrap(), SearchType::Keyword);
        assert_eq!("neural".parse::<SearchType>().unwrap(), SearchType::Neural);
        assert!("fuzzy".parse::<SearchType>().is_err());
        assert_eq!(SearchType::Keyword.to_string(), "keyword");
    }

    #[test]
    fn test_contents_query_string() {
        assert_eq!(ContentsRequest::new(["a", "b"]).query_string(), r#"ids="a","b""#);
        assert_eq!(
            ContentsRequest::new(["id1", "id2", "id3"]).query_string(),
            r#"ids="id1","id2","id3""#
        );
        assert_eq!(ContentsRequest::new(["solo"]).query_string(), r#"ids="solo""#);
    }
}
