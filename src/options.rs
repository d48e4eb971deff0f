//! Request options layered over the base parameters of a call.
//!
//! Every call starts from fresh base parameters ([`RequestBody::search`] or
//! [`RequestBody::find_similar`]) and folds a sequence of [`RequestOption`]s
//! over them in order. Each option sets exactly one field, so when two options
//! touch the same field the later one wins while every other field is kept.
//!
//! ```rust
//! use metaphor::models::RequestBody;
//! use metaphor::options::{apply_options, RequestOption};
//!
//! let body = apply_options(
//!     RequestBody::search("rust web frameworks"),
//!     &[RequestOption::NumResults(3), RequestOption::Autoprompt(true)],
//! );
//! assert_eq!(body.num_results, 3);
//! assert!(body.use_autoprompt);
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{RequestBody, SearchType};

/// A single named change to the request parameters
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOption {
    NumResults(u32),
    IncludeDomains(Vec<String>),
    ExcludeDomains(Vec<String>),
    StartCrawlDate(String),
    EndCrawlDate(String),
    StartPublishedDate(String),
    EndPublishedDate(String),
    Autoprompt(bool),
    SearchType(SearchType),
    ExcludeSourceDomain(bool),
    /// Copy every set field of a [`RequestOptions`] value
    Overrides(RequestOptions),
}

impl RequestOption {
    /// Apply this option to `body`, returning the updated parameters
    pub fn apply(&self, mut body: RequestBody) -> RequestBody {
        match self {
            RequestOption::NumResults(n) => body.num_results = *n,
            RequestOption::IncludeDomains(domains) => body.include_domains = Some(domains.clone()),
            RequestOption::ExcludeDomains(domains) => body.exclude_domains = Some(domains.clone()),
            RequestOption::StartCrawlDate(date) => body.start_crawl_date = Some(date.clone()),
            RequestOption::EndCrawlDate(date) => body.end_crawl_date = Some(date.clone()),
            RequestOption::StartPublishedDate(date) => {
                body.start_published_date = Some(date.clone())
            }
            RequestOption::EndPublishedDate(date) => body.end_published_date = Some(date.clone()),
            RequestOption::Autoprompt(flag) => body.use_autoprompt = *flag,
            RequestOption::SearchType(kind) => body.search_type = Some(*kind),
            RequestOption::ExcludeSourceDomain(flag) => body.exclude_source_domain = Some(*flag),
            RequestOption::Overrides(overrides) => return overrides.overlay(body),
        }
        body
    }
}

/// Fold `options` over `current` in order
pub fn apply_options(current: RequestBody, options: &[RequestOption]) -> RequestBody {
    options.iter().fold(current, |body, option| option.apply(body))
}

/// Bulk overrides for the request parameters.
///
/// Only fields holding a non-zero value are copied by [`RequestOption::Overrides`]:
/// empty strings, empty lists, a zero count, `false` flags and an absent search
/// type all count as "unset" and leave the target untouched. This means the
/// overrides can never force a field back to `false` or zero; use the
/// single-field options for that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub num_results: u32,

    #[serde(default)]
    pub include_domains: Vec<String>,

    #[serde(default)]
    pub exclude_domains: Vec<String>,

    #[serde(default)]
    pub start_crawl_date: String,

    #[serde(default)]
    pub end_crawl_date: String,

    #[serde(default)]
    pub start_published_date: String,

    #[serde(default)]
    pub end_published_date: String,

    #[serde(default)]
    pub exclude_source_domain: bool,

    #[serde(default)]
    pub use_autoprompt: bool,

    #[serde(default, rename = "type")]
    pub search_type: Option<SearchType>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_results(mut self, n: u32) -> Self {
        self.num_results = n;
        self
    }

    pub fn include_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn crawl_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_crawl_date = start.into();
        self.end_crawl_date = end.into();
        self
    }

    pub fn published_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_published_date = start.into();
        self.end_published_date = end.into();
        self
    }

    pub fn autoprompt(mut self, flag: bool) -> Self {
        self.use_autoprompt = flag;
        self
    }

    pub fn search_type(mut self, kind: SearchType) -> Self {
        self.search_type = Some(kind);
        self
    }

    pub fn exclude_source_domain(mut self, flag: bool) -> Self {
        self.exclude_source_domain = flag;
        self
    }

    /// Copy the set fields onto `body`
    pub fn overlay(&self, mut body: RequestBody) -> RequestBody {
        if !self.query.is_empty() {
            body.query = Some(self.query.clone());
        }
        if !self.url.is_empty() {
            body.url = Some(self.url.clone());
        }
        if self.num_results != 0 {
            body.num_results = self.num_results;
        }
        if !self.include_domains.is_empty() {
            body.include_domains = Some(self.include_domains.clone());
        }
        if !self.exclude_domains.is_empty() {
            body.exclude_domains = Some(self.exclude_domains.clone());
        }
        if !self.start_crawl_date.is_empty() {
            body.start_crawl_date = Some(self.start_crawl_date.clone());
        }
        if !self.end_crawl_date.is_empty() {
            body.end_crawl_date = Some(self.end_crawl_date.clone());
        }
        if !self.start_published_date.is_empty() {
            body.start_published_date = Some(self.start_published_date.clone());
        }
        if !self.end_published_date.is_empty() {
            body.end_published_date = Some(self.end_published_date.clone());
        }
        if self.exclude_source_domain {
            body.exclude_source_domain = Some(true);
        }
        if self.use_autoprompt {
            body.use_autoprompt = true;
        }
        if let Some(kind) = self.search_type {
            body.search_type = Some(kind);
        }
        body
    }
}

impl From<RequestOptions> for RequestOption {
    fn from(overrides: RequestOptions) -> Self {
        RequestOption::Overrides(overrides)
    }
}
