//! Request and response models for the Metaphor API.

mod request;
mod response;

pub use request::{ContentsRequest, RequestBody, SearchType};
pub use response::{ContentRecord, ContentsResponse, ErrorResponse, SearchResponse, SearchResult};
