use thiserror::Error;

/// Errors returned by the affiliate-network API client and normalizer.
#[derive(Debug, Error)]
pub enum AffiliateError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx HTTP status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is not parseable.
    #[error("invalid affiliate API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// Three pages in a row failed during a paginated walk; the batch is
    /// aborted rather than silently truncated.
    #[error("aborting {act} fetch: {failures} consecutive page failures")]
    ConsecutivePageFailures { act: String, failures: u32 },

    /// An upstream record is missing a required field and was skipped.
    #[error("normalization error for record {external_id}: {reason}")]
    Normalization { external_id: String, reason: String },
}
