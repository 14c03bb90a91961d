//! Image URL validation.
//!
//! Posts embed image URLs that rot over time. This crate probes them over
//! HTTP with a bounded pool: at most 10 simultaneous checks, each
//! following up to 3 redirects with a 30 second timeout. A slow or failing
//! check fails only its own URL; there is no cancellation propagation and
//! nothing here ever returns an error to the caller.

use std::time::Duration;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use ureq::Agent;

/// Simultaneous check ceiling.
const MAX_CONCURRENT_CHECKS: usize = 10;

/// Redirects followed per check.
const MAX_REDIRECTS: u32 = 3;

/// Per-check timeout in seconds; a slower URL counts as failed.
const CHECK_TIMEOUT: u64 = 30;

/// Outcome of probing one image URL.
#[derive(Debug, Clone, Serialize)]
pub struct ImageCheck {
    /// The URL as found in the document.
    pub url: String,
    /// Whether the URL resolved to a success status.
    pub is_valid: bool,
    /// Final HTTP status, when a response came back at all.
    pub status_code: Option<u16>,
    /// Transport-level failure description.
    pub error: Option<String>,
}

/// Probe every URL, preserving input order in the results.
#[must_use]
pub fn check_images(urls: &[String]) -> Vec<ImageCheck> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(MAX_CONCURRENT_CHECKS)
        .build();

    match pool {
        Ok(pool) => pool.install(|| urls.par_iter().map(|url| check_one(url)).collect()),
        // Pool construction can only fail under resource exhaustion;
        // checking sequentially still yields correct results.
        Err(_) => urls.iter().map(|url| check_one(url)).collect(),
    }
}

fn check_one(url: &str) -> ImageCheck {
    debug!("Checking image URL {url}");

    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(CHECK_TIMEOUT)))
        .max_redirects(MAX_REDIRECTS)
        .http_status_as_error(false)
        .build()
        .into();

    match agent.get(url).call() {
        Ok(response) => {
            let status = response.status().as_u16();
            ImageCheck {
                url: url.to_owned(),
                is_valid: (200..300).contains(&status),
                status_code: Some(status),
                error: None,
            }
        }
        Err(err) => ImageCheck {
            url: url.to_owned(),
            is_valid: false,
            status_code: None,
            error: Some(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(check_images(&[]).is_empty());
    }

    #[test]
    fn test_unparseable_url_fails_without_panicking() {
        let results = check_images(&["not a url at all".to_owned()]);
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_valid);
        assert!(results[0].status_code.is_none());
        assert!(results[0].error.is_some());
    }

    #[test]
    fn test_results_preserve_input_order() {
        let urls = vec![
            "bad one".to_owned(),
            "also bad".to_owned(),
            "still bad".to_owned(),
        ];
        let results = check_images(&urls);
        let returned: Vec<&str> = results.iter().map(|check| check.url.as_str()).collect();
        assert_eq!(returned, vec!["bad one", "also bad", "still bad"]);
    }
}
