use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::FetchError;
use crate::http_client::{build_client, init_http_client};
use crate::selection::Selector;
use crate::view_data::ViewData;

/// Relative to the configured base, so a path prefix on the base survives.
pub const WINS_BY_PLAYER_PATH: &str = "api/wins-by-player";
pub const PLAYER_PARAM: &str = "player";

/// Anything that can turn a selector into chart data. Called from worker
/// threads, so implementations must be shareable.
pub trait StatsSource: Send + Sync {
    fn fetch_wins(&self, selector: &Selector) -> Result<ViewData, FetchError>;

    fn label(&self) -> String;
}

pub struct HttpStatsSource {
    base_url: Url,
    client: Client,
}

impl HttpStatsSource {
    /// Uses the process-wide client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = init_http_client(timeout)?.clone();
        Self::with_client(base_url, client)
    }

    /// Uses a dedicated client, for callers that need their own timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::with_client(base_url, build_client(timeout)?)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid stats api url {base_url:?}"))?;
        Ok(Self { base_url, client })
    }

    pub fn wins_url(&self, selector: &Selector) -> Result<Url, FetchError> {
        wins_url(&self.base_url, selector)
    }
}

pub fn wins_url(base: &Url, selector: &Selector) -> Result<Url, FetchError> {
    let mut root = base.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    let mut url = root
        .join(WINS_BY_PLAYER_PATH)
        .map_err(|err| FetchError::Network(format!("bad url: {err}")))?;
    url.query_pairs_mut()
        .clear()
        .append_pair(PLAYER_PARAM, selector.as_str());
    Ok(url)
}

impl StatsSource for HttpStatsSource {
    fn fetch_wins(&self, selector: &Selector) -> Result<ViewData, FetchError> {
        let url = self.wins_url(selector)?;
        tracing::debug!(%url, "requesting wins");

        let resp = self.client.get(url).send().map_err(network_error)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }
        let body = resp.text().map_err(network_error)?;
        parse_view_data_json(&body)
    }

    fn label(&self) -> String {
        self.base_url.to_string()
    }
}

fn network_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Network(format!("request timed out: {err}"));
    }
    FetchError::Network(err.to_string())
}

/// Parses `{"Azir": 12, "Ahri": 7}` keeping the payload's key order.
pub fn parse_view_data_json(raw: &str) -> Result<ViewData, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::Malformed("empty body".to_string()));
    }
    let root: Value = serde_json::from_str(trimmed)
        .map_err(|err| FetchError::Malformed(format!("invalid json: {err}")))?;
    let Value::Object(map) = root else {
        return Err(FetchError::Malformed(format!(
            "expected an object, got {}",
            json_kind(&root)
        )));
    };

    let mut entries = Vec::with_capacity(map.len());
    for (label, value) in map {
        let Some(number) = value.as_f64() else {
            return Err(FetchError::Malformed(format!(
                "value for {label:?} is {}, not a number",
                json_kind(&value)
            )));
        };
        entries.push((label, number));
    }
    ViewData::from_entries(entries)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(s: &str, max: usize) -> String {
    let trimmed = s.trim();
    match trimmed.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
