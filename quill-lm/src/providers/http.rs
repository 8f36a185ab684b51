//! Blocking JSON POST with retry and exponential backoff.

use std::time::Duration;

use quill_core::errors::{LanguageModelError, QuillResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

pub(crate) fn build_client(
    timeout_secs: u64,
    model: &str,
) -> QuillResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .build()
        .map_err(|e| {
            LanguageModelError::RequestFailed {
                model: model.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

/// POST `body` to `url`. Transport errors, 429 and 5xx responses are retried
/// up to `max_retries` times; any other client error fails immediately.
pub(crate) fn post_json<Req: Serialize, Resp: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    url: &str,
    headers: &[(&str, &str)],
    body: &Req,
    max_retries: u32,
    model: &str,
) -> QuillResult<Resp> {
    let mut backoff = INITIAL_BACKOFF;
    let mut last_err = String::new();

    for attempt in 0..=max_retries {
        if attempt > 0 {
            debug!(model, attempt, max_retries, ?backoff, "retrying language model call");
            std::thread::sleep(backoff);
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }

        let mut req = client.post(url).json(body);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        match req.send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return resp.json::<Resp>().map_err(|e| {
                        LanguageModelError::RequestFailed {
                            model: model.to_string(),
                            reason: format!("deserialization failed: {e}"),
                        }
                        .into()
                    });
                }
                if status.is_client_error() && status.as_u16() != 429 {
                    return Err(LanguageModelError::BadStatus {
                        model: model.to_string(),
                        status: status.as_u16(),
                        body: resp.text().unwrap_or_default(),
                    }
                    .into());
                }
                last_err = format!("HTTP {status}");
            }
            Err(e) => last_err = e.to_string(),
        }
    }

    Err(LanguageModelError::RequestFailed {
        model: model.to_string(),
        reason: format!("all {max_retries} retries exhausted: {last_err}"),
    }
    .into())
}
