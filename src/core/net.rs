// src/core/net.rs

// Blocking GET; one request per measure, no retries.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{KeyError, Result};

pub fn http_get(url: &str) -> Result<String> {
    let wrap = |source: reqwest::Error| KeyError::Http { url: s!(url), source };

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(wrap)?;

    let resp = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(wrap)?;
    logd!("GET {} -> {}", url, resp.status());
    resp.text().map_err(wrap)
}
