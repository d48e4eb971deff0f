//! Response decoding and error classification.

use serde::de::DeserializeOwned;

use super::{ClientError, Operation};
use crate::models::{ContentsResponse, ErrorResponse, SearchResponse};
use crate::transport::RawResponse;

/// Decode a `/search` or `/findSimilar` response
pub fn decode_search(
    operation: Operation,
    response: &RawResponse,
) -> Result<SearchResponse, ClientError> {
    let decoded: SearchResponse = decode(operation, response)?;
    if decoded.is_empty() {
        return Err(ClientError::EmptyResult(operation.empty_result()));
    }
    Ok(decoded)
}

/// Decode a `/contents` response
pub fn decode_contents(response: &RawResponse) -> Result<ContentsResponse, ClientError> {
    let operation = Operation::Contents;
    let decoded: ContentsResponse = decode(operation, response)?;
    if decoded.is_empty() {
        return Err(ClientError::EmptyResult(operation.empty_result()));
    }
    Ok(decoded)
}

fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: &RawResponse,
) -> Result<T, ClientError> {
    if !response.is_success() {
        return Err(classify_failure(operation, response));
    }

    serde_json::from_slice(&response.body)
        .map_err(|source| ClientError::Decode { operation, source })
}

fn classify_failure(operation: Operation, response: &RawResponse) -> ClientError {
    let status = response.status;
    match serde_json::from_slice::<ErrorResponse>(&response.body) {
        Ok(envelope) => {
            tracing::warn!("Metaphor {} failed with status {}: {}", operation, status, envelope.error);
            ClientError::Server {
                status,
                message: envelope.error,
            }
        }
        Err(source) => {
            tracing::warn!("Metaphor {} failed with status {} and an unreadable body", operation, status);
            ClientError::MalformedErrorResponse { status, source }
        }
    }
}
