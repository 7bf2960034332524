//! HTTP client for the affiliate network's paginated JSON API.
//!
//! All endpoints share one URL shape: the base URL plus `act`, `user`,
//! `key`, `outformat=json`, `page`, and optional `pagesize` query
//! parameters, answered with the `{"response": {"PageTotal": n}, "data":
//! [...]}` envelope. Page walks are strictly sequential with a fixed
//! inter-request delay; a failed page is logged and skipped, and the walk
//! aborts after three consecutive failures.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::AffiliateError;
use crate::types::{ApiEnvelope, RawMerchant, RawOffer};

/// Consecutive page failures tolerated before a paginated walk aborts.
const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Hard page ceiling guarding against a cycling or absurd `PageTotal`.
const MAX_PAGES: u32 = 500;

/// Client for the affiliate network REST API.
///
/// Use [`AffiliateClient::new`] for production or
/// [`AffiliateClient::with_base_url`] to point at a mock server in tests.
pub struct AffiliateClient {
    client: Client,
    base_url: Url,
    user: String,
    key: String,
    page_size: u32,
}

impl AffiliateClient {
    /// Creates a client for the given API base URL and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AffiliateError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        user: &str,
        key: &str,
        page_size: u32,
        timeout_secs: u64,
    ) -> Result<Self, AffiliateError> {
        Self::with_base_url(base_url, user, key, page_size, timeout_secs)
    }

    /// Creates a client with an explicit base URL (wiremock in tests).
    ///
    /// # Errors
    ///
    /// Same as [`AffiliateClient::new`].
    pub fn with_base_url(
        base_url: &str,
        user: &str,
        key: &str,
        page_size: u32,
        timeout_secs: u64,
    ) -> Result<Self, AffiliateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("dealscout/0.1 (affiliate sync)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| AffiliateError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            user: user.to_owned(),
            key: key.to_owned(),
            page_size,
        })
    }

    /// Fetches one page of merchants (`act=merchants`).
    ///
    /// # Errors
    ///
    /// - [`AffiliateError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AffiliateError::Http`] on network failure.
    /// - [`AffiliateError::Deserialize`] when the body does not match the
    ///   envelope shape.
    pub async fn fetch_merchants_page(
        &self,
        page: u32,
    ) -> Result<ApiEnvelope<RawMerchant>, AffiliateError> {
        self.fetch_page("merchants", page).await
    }

    /// Fetches one page of offers (`act=coupons`).
    ///
    /// # Errors
    ///
    /// Same as [`AffiliateClient::fetch_merchants_page`].
    pub async fn fetch_coupons_page(
        &self,
        page: u32,
    ) -> Result<ApiEnvelope<RawOffer>, AffiliateError> {
        self.fetch_page("coupons", page).await
    }

    /// Fetches every page of merchants sequentially.
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateError::ConsecutivePageFailures`] when three pages
    /// in a row fail; scattered failures are logged, skipped, and do not
    /// fail the walk.
    pub async fn fetch_all_merchants(
        &self,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<RawMerchant>, AffiliateError> {
        self.fetch_all("merchants", inter_request_delay_ms).await
    }

    /// Fetches every page of offers sequentially.
    ///
    /// # Errors
    ///
    /// Same as [`AffiliateClient::fetch_all_merchants`].
    pub async fn fetch_all_coupons(
        &self,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<RawOffer>, AffiliateError> {
        self.fetch_all("coupons", inter_request_delay_ms).await
    }

    /// Sequential page walk for one `act`. The page total is taken from
    /// the first successful page's envelope and re-read on every page (the
    /// network recounts while programs change mid-walk; the latest value
    /// wins).
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        act: &str,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<T>, AffiliateError> {
        let mut records: Vec<T> = Vec::new();
        let mut page_total: Option<u32> = None;
        let mut consecutive_failures: u32 = 0;
        let mut page: u32 = 1;

        loop {
            if let Some(total) = page_total {
                if page > total {
                    break;
                }
            }
            if page > MAX_PAGES {
                tracing::warn!(act, page, "page ceiling reached; stopping walk");
                break;
            }

            if page > 1 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            match self.fetch_page::<T>(act, page).await {
                Ok(envelope) => {
                    consecutive_failures = 0;
                    page_total = Some(envelope.response.page_total.max(1).min(MAX_PAGES));
                    records.extend(envelope.data);
                }
                Err(err) => {
                    consecutive_failures += 1;
                    tracing::warn!(act, page, consecutive_failures, error = %err, "page fetch failed; skipping");
                    if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                        return Err(AffiliateError::ConsecutivePageFailures {
                            act: act.to_owned(),
                            failures: consecutive_failures,
                        });
                    }
                    // Without a known total there is nothing safe to walk
                    // toward; keep probing the next page until the counter
                    // trips or a page answers.
                }
            }

            page += 1;
        }

        Ok(records)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        act: &str,
        page: u32,
    ) -> Result<ApiEnvelope<T>, AffiliateError> {
        let url = self.build_url(act, page);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AffiliateError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<ApiEnvelope<T>>(&body).map_err(|e| AffiliateError::Deserialize {
            context: format!("{act} page {page}"),
            source: e,
        })
    }

    fn build_url(&self, act: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("act", act)
            .append_pair("user", &self.user)
            .append_pair("key", &self.key)
            .append_pair("outformat", "json")
            .append_pair("page", &page.to_string())
            .append_pair("pagesize", &self.page_size.to_string());
        url
    }
}
