//! Pure translation from request parameters to transport-ready descriptors.

use reqwest::Method;
use serde::Serialize;
use std::fmt;

use super::{ClientError, EmptyResultKind};
use crate::config::{CONTENTS_PATH, FIND_SIMILAR_PATH, SEARCH_PATH};
use crate::models::{ContentsRequest, RequestBody};

/// The three remote operations offered by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    FindSimilar,
    Contents,
}

impl Operation {
    /// Endpoint path relative to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Search => SEARCH_PATH,
            Operation::FindSimilar => FIND_SIMILAR_PATH,
            Operation::Contents => CONTENTS_PATH,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::Search | Operation::FindSimilar => Method::POST,
            Operation::Contents => Method::GET,
        }
    }

    /// The error raised when this operation succeeds with nothing in it
    pub fn empty_result(&self) -> EmptyResultKind {
        match self {
            Operation::Search => EmptyResultKind::NoSearchResults,
            Operation::FindSimilar => EmptyResultKind::NoSimilarLinks,
            Operation::Contents => EmptyResultKind::NoContentExtracted,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::FindSimilar => "find similar",
            Operation::Contents => "get contents",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a transport needs to send one request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub operation: Operation,
    pub method: Method,
    pub path: &'static str,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    /// Serialized JSON body
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// Full request URL for the given base URL
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match &self.query {
            Some(query) => format!("{}{}?{}", base, self.path, query),
            None => format!("{}{}", base, self.path),
        }
    }

    /// Body as a JSON value, if there is one and it parses
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}

/// `POST /search` with `body` as JSON
pub fn build_search(body: &RequestBody) -> Result<RequestDescriptor, ClientError> {
    build_json(Operation::Search, body)
}

/// `POST /findSimilar` with `body` as JSON
pub fn build_find_similar(body: &RequestBody) -> Result<RequestDescriptor, ClientError> {
    build_json(Operation::FindSimilar, body)
}

/// `GET /contents?ids="a","b"` with no body.
///
/// The query is stored exactly as above; when the URL is sent the quotes are
/// percent-encoded as `%22`, which the service decodes back to the same value.
pub fn build_contents(request: &ContentsRequest) -> RequestDescriptor {
    let operation = Operation::Contents;
    RequestDescriptor {
        operation,
        method: operation.method(),
        path: operation.path(),
        query: Some(request.query_string()),
        body: None,
    }
}

fn build_json<T: Serialize + ?Sized>(
    operation: Operation,
    body: &T,
) -> Result<RequestDescriptor, ClientError> {
    let bytes = serde_json::to_vec(body)
        .map_err(|source| ClientError::RequestBuild { operation, source })?;

    Ok(RequestDescriptor {
        operation,
        method: operation.method(),
        path: operation.path(),
        query: None,
        body: Some(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_unencodable_body_is_request_build_error() {
        let mut body = HashMap::new();
        body.insert((1u8, 2u8), "non-string key");

        match build_json(Operation::Search, &body).unwrap_err() {
            ClientError::RequestBuild { operation, source } => {
                assert_eq!(operation, Operation::Search);
                assert!(source.to_string().contains("key must be a string"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_search() {
        let descriptor = build_search(&RequestBody::search("rust")).unwrap();

        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.path, "/search");
        assert_eq!(descriptor.query, None);
        assert_eq!(
            descriptor.json_body().unwrap(),
            json!({"query": "rust", "numResults": 10, "useAutoprompt": false, "type": "neural"})
        );
        assert_eq!(
            descriptor.url("https://api.metaphor.systems"),
            "https://api.metaphor.systems/search"
        );
    }

    #[test]
    fn test_build_find_similar() {
        let descriptor = build_find_similar(&RequestBody::find_similar("https://tokio.rs")).unwrap();

        assert_eq!(descriptor.method, Method::POST);
        assert_eq!(descriptor.path, "/findSimilar");
        assert_eq!(descriptor.json_body().unwrap()["url"], json!("https://tokio.rs"));
    }

    #[test]
    fn test_build_contents_query() {
        let descriptor = build_contents(&ContentsRequest::new(["a", "b"]));

        assert_eq!(descriptor.method, Method::GET);
        assert_eq!(descriptor.path, "/contents");
        assert_eq!(descriptor.body, None);
        assert_eq!(descriptor.query.as_deref(), Some(r#"ids="a","b""#));
        assert_eq!(
            descriptor.url("http://localhost:8080/"),
            r#"http://localhost:8080/contents?ids="a","b""#
        );
    }

    #[test]
    fn test_operation_empty_result_kinds() {
        assert_eq!(Operation::Search.empty_result(), EmptyResultKind::NoSearchResults);
        assert_eq!(Operation::FindSimilar.empty_result(), EmptyResultKind::NoSimilarLinks);
        assert_eq!(Operation::Contents.empty_result(), EmptyResultKind::NoContentExtracted);
    }
}
