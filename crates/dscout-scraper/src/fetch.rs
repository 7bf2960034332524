//! HTTP fetch helpers for coupon pages.
//!
//! Coupon sites sit behind aggressive anti-bot stacks; a plain fetch with a
//! service user-agent often gets an interstitial instead of the page. The
//! fetch loop retries with a browser user-agent and rejects challenge pages
//! so the scraper never wastes a cascade run on Cloudflare HTML.

use std::time::Duration;

use crate::error::ScrapeError;

const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const FETCH_ATTEMPTS: usize = 3;
const FETCH_BACKOFF_MS: [u64; 3] = [0, 300, 900];

/// Builds the HTTP client used for page fetches.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<reqwest::Client, ScrapeError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetches the HTML body of a coupon page.
///
/// Tries the configured user-agent first and the browser fallback UA
/// second on each attempt, preferring browser-flavored content when both
/// succeed (some sites hide offers from non-browser agents). Challenge
/// interstitials count as failures.
///
/// # Errors
///
/// Returns [`ScrapeError::AllAttemptsFailed`] when every attempt returned
/// a non-2xx status or unusable HTML.
pub async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
) -> Result<String, ScrapeError> {
    for attempt in 0..FETCH_ATTEMPTS {
        if let Some(delay_ms) = FETCH_BACKOFF_MS.get(attempt).copied() {
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }

        let mut user_agents = vec![user_agent.to_owned()];
        if user_agent != BROWSER_FALLBACK_UA {
            user_agents.push(BROWSER_FALLBACK_UA.to_owned());
        }

        let mut custom_ua_body: Option<String> = None;
        let mut last_error: Option<reqwest::Error> = None;

        for ua in user_agents {
            let response = match client
                .get(url)
                .header(reqwest::header::USER_AGENT, &ua)
                .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    last_error = Some(err);
                    continue;
                }
            };

            if response.status().is_success() {
                let body = response.text().await?;
                if !is_usable_html(&body) {
                    continue;
                }
                if ua == BROWSER_FALLBACK_UA {
                    return Ok(body);
                }
                custom_ua_body = Some(body);
            }
        }

        if let Some(body) = custom_ua_body {
            return Ok(body);
        }
        if let Some(err) = last_error {
            tracing::debug!(url, attempt, error = %err, "fetch_html attempt failed; retrying");
        }
    }

    Err(ScrapeError::AllAttemptsFailed {
        url: url.to_owned(),
    })
}

fn is_usable_html(body: &str) -> bool {
    let trimmed = body.trim();
    !trimmed.is_empty() && !looks_like_bot_challenge(trimmed)
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_unusable() {
        assert!(!is_usable_html("   \n  "));
    }

    #[test]
    fn cloudflare_banner_is_unusable() {
        assert!(!is_usable_html(
            "<title>Attention Required! | Cloudflare</title>"
        ));
    }

    #[test]
    fn challenge_platform_script_is_unusable() {
        assert!(!is_usable_html(
            r#"<script src="/cdn-cgi/challenge-platform/h/b/orchestrate"></script>"#
        ));
    }

    #[test]
    fn just_a_moment_alone_is_usable() {
        // A coupon page may legitimately contain the phrase; only combined
        // with a cookie gate or challenge token is it an interstitial.
        assert!(is_usable_html("<p>Just a moment... your deals load</p>"));
    }

    #[test]
    fn just_a_moment_with_cookie_gate_is_unusable() {
        assert!(!is_usable_html(
            "<title>Just a moment...</title><p>Please enable cookies.</p>"
        ));
    }

    #[test]
    fn ordinary_page_is_usable() {
        assert!(is_usable_html("<html><body>20% off</body></html>"));
    }
}
