use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::feed::DEFAULT_INFLIGHT_MAX;
use crate::http_client::DEFAULT_REQUEST_TIMEOUT_SECS;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PLAYERS: &[&str] = &["Faker", "Caps"];
const APP_DIR: &str = "lol_terminal";
const LOG_FILE: &str = "lol_terminal.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Fake,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub players: Vec<String>,
    pub initial_player: Option<String>,
    pub request_timeout: Duration,
    pub inflight_max: usize,
    pub source: SourceKind,
    pub fake_fail_pct: u8,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    /// Reads `.env.local`, then `.env`, then the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = non_empty(lookup("STATS_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let players = match non_empty(lookup("STATS_PLAYERS")) {
            Some(raw) => parse_list(&raw),
            None => DEFAULT_PLAYERS.iter().map(|p| p.to_string()).collect(),
        };
        if players.is_empty() {
            bail!("STATS_PLAYERS must name at least one player");
        }

        let request_timeout = Duration::from_secs(
            lookup("STATS_TIMEOUT_SECS")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .clamp(1, 120),
        );

        let inflight_max = lookup("STATS_INFLIGHT_MAX")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_INFLIGHT_MAX)
            .clamp(1, 16);

        let source = match lookup("STATS_SOURCE")
            .map(|val| val.trim().to_lowercase())
            .as_deref()
        {
            None | Some("") | Some("http") => SourceKind::Http,
            Some("fake") => SourceKind::Fake,
            Some(other) => bail!("unknown STATS_SOURCE {other:?} (expected http or fake)"),
        };

        let fake_fail_pct = lookup("STATS_FAKE_FAIL_PCT")
            .and_then(|val| val.trim().parse::<u8>().ok())
            .unwrap_or(0)
            .min(100);

        let log_file = non_empty(lookup("STATS_LOG_FILE"))
            .map(PathBuf::from)
            .or_else(|| default_log_path(&lookup));

        let log_filter = non_empty(lookup("RUST_LOG"))
            .unwrap_or_else(|| "lol_terminal=info".to_string());

        Ok(Self {
            api_url,
            players,
            initial_player: non_empty(lookup("STATS_INITIAL_PLAYER")),
            request_timeout,
            inflight_max,
            source,
            fake_fail_pct,
            log_file,
            log_filter,
        })
    }

    pub fn source_label(&self) -> String {
        match self.source {
            SourceKind::Http => self.api_url.clone(),
            SourceKind::Fake => "fake".to_string(),
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(val: Option<String>) -> Option<String> {
    val.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn default_log_path<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base) = non_empty(lookup("XDG_CACHE_HOME")) {
        return Some(PathBuf::from(base).join(APP_DIR).join(LOG_FILE));
    }
    let home = non_empty(lookup("HOME"))?;
    Some(PathBuf::from(home).join(".cache").join(APP_DIR).join(LOG_FILE))
}
