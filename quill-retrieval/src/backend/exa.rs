//! Exa web search over blocking HTTP.

use std::time::Duration;

use quill_core::errors::{QuillResult, RetrievalError};
use quill_core::traits::IRetrievalBackend;
use quill_core::Information;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const EXA_SEARCH_URL: &str = "https://api.exa.ai/search";
const MAX_RESULT_CHARACTERS: u32 = 2_000;
const MAX_RETRIES: u32 = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest<'a> {
    query: &'a str,
    num_results: u32,
    #[serde(rename = "type")]
    search_type: &'a str,
    contents: ExaContents,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaContents {
    text: ExaTextConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaTextConfig {
    max_characters: u32,
}

#[derive(Deserialize)]
struct ExaSearchResponse {
    results: Vec<ExaResult>,
}

#[derive(Deserialize)]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "publishedDate")]
    published_date: Option<String>,
}

pub struct ExaBackend {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl ExaBackend {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> QuillResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .map_err(|e| backend_err(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Read the API key from `env_var`.
    pub fn from_env(env_var: &str) -> QuillResult<Self> {
        let api_key = std::env::var(env_var)
            .map_err(|_| backend_err(format!("{env_var} is not set")))?;
        Self::new(api_key, EXA_SEARCH_URL)
    }

    fn search_one(&self, query: &str, k: usize) -> QuillResult<Vec<ExaResult>> {
        let request = ExaSearchRequest {
            query,
            num_results: k.clamp(1, 100) as u32,
            search_type: "auto",
            contents: ExaContents {
                text: ExaTextConfig {
                    max_characters: MAX_RESULT_CHARACTERS,
                },
            },
        };

        let mut last_err = String::new();
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                std::thread::sleep(Duration::from_millis(500 * 2u64.pow(attempt - 1)));
            }
            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", &self.api_key)
                .json(&request)
                .send();
            match response {
                Ok(resp) if resp.status().is_success() => {
                    return resp
                        .json::<ExaSearchResponse>()
                        .map(|r| r.results)
                        .map_err(|e| backend_err(format!("bad response body: {e}")));
                }
                Ok(resp) if resp.status().is_client_error() => {
                    let status = resp.status();
                    let body = resp.text().unwrap_or_default();
                    return Err(backend_err(format!("HTTP {status}: {body}")));
                }
                Ok(resp) => last_err = format!("HTTP {}", resp.status()),
                Err(e) => last_err = e.to_string(),
            }
        }
        Err(backend_err(format!(
            "all {MAX_RETRIES} retries exhausted: {last_err}"
        )))
    }
}

fn backend_err(reason: String) -> quill_core::QuillError {
    RetrievalError::BackendFailed {
        backend: "exa".to_string(),
        reason,
    }
    .into()
}

impl IRetrievalBackend for ExaBackend {
    /// Queries that fail are logged and skipped; the call only errors when
    /// every query failed.
    fn search(
        &self,
        queries: &[String],
        k: usize,
        exclude_urls: &[String],
    ) -> QuillResult<Vec<Information>> {
        let mut out: Vec<Information> = Vec::new();
        let mut failures = 0usize;
        let mut last_error = None;

        for query in queries {
            match self.search_one(query, k) {
                Ok(results) => {
                    debug!(query = %query, hits = results.len(), "exa search");
                    for r in results {
                        if exclude_urls.contains(&r.url) || out.iter().any(|i| i.url == r.url) {
                            continue;
                        }
                        let text = r.text.unwrap_or_default();
                        let mut info = Information::new(
                            r.url,
                            r.title.unwrap_or_default(),
                            "",
                            if text.trim().is_empty() { Vec::new() } else { vec![text] },
                        );
                        if let Some(date) = r.published_date {
                            info.meta.insert("published_date".to_string(), date.into());
                        }
                        info.meta.insert("query".to_string(), query.clone().into());
                        out.push(info);
                    }
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "exa search failed");
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failures == queries.len() => Err(e),
            _ => Ok(out),
        }
    }

    fn name(&self) -> &str {
        "exa"
    }
}
