use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("all fetch attempts failed for {url}")]
    AllAttemptsFailed { url: String },

    #[error("no site configuration matches {url}")]
    UnknownSite { url: String },
}
