//! Response models returned by the Metaphor API.

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as the type's default, as a missing field already is
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single hit from `/search` or `/findSimilar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Identifier usable with `/contents`
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Publication date as reported by the service
    #[serde(default)]
    pub published_date: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Relevance score
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
}

/// Body of a successful `/search` or `/findSimilar` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    /// Identifiers of the results, in ranking order
    pub fn ids(&self) -> Vec<String> {
        self.results.iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Extracted content for one identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Cleaned text excerpt, empty when nothing was extracted
    #[serde(default, deserialize_with = "null_as_default")]
    pub extract: String,
}

/// Body of a successful `/contents` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentsResponse {
    pub contents: Vec<ContentRecord>,
}

impl ContentsResponse {
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Envelope returned with any non-success status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parse() {
        let body = r#"{
            "results": [
                {"id": "abc", "url": "https://a.example", "title": "A", "publishedDate": "2023-05-01", "author": "Ann", "score": 0.91},
                {"id": "def", "url": "https://b.example", "title": null, "score": 0.42}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.len(), 2);
        assert_eq!(response.results[0].published_date.as_deref(), Some("2023-05-01"));
        assert_eq!(response.results[0].author.as_deref(), Some("Ann"));
        assert_eq!(response.results[1].title, None);
        assert_eq!(response.results[1].author, None);
        assert_eq!(response.ids(), vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn test_contents_response_parse() {
        let body = r#"{"contents": [{"id": "abc", "url": "https://a.example", "title": "A", "extract": "<p>hello</p>"}]}"#;
        let response: ContentsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(response.contents[0].extract, "<p>hello</p>");
    }

    #[test]
    fn test_null_and_missing_fields_default() {
        let body = r#"{"results": [{"id": "abc", "score": null}, {"url": null}]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results[0].url, "");
        assert_eq!(response.results[0].score, 0.0);
        assert_eq!(response.results[1].id, "");
        assert_eq!(response.results[1].url, "");

        let body = r#"{"contents": [{"id": "abc", "extract": null}, {"id": "def"}]}"#;
        let response: ContentsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.contents[0].extract, "");
        assert_eq!(response.contents[0].url, "");
        assert_eq!(response.contents[1].extract, "");
    }

    #[test]
    fn test_missing_collection_is_an_error() {
        assert!(serde_json::from_str::<SearchResponse>("{}").is_err());
        assert!(serde_json::from_str::<ContentsResponse>(r#"{"results": []}"#).is_err());
    }
}
