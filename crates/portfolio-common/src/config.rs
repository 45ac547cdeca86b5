//! Environment-driven configuration.
//!
//! Every setting has a default so the tool runs with no environment at all.
//! CLI flags are applied on top by the caller.

use camino::Utf8PathBuf;

/// Shared secret used when `PORTFOLIO_PASSCODE` is not set.
pub const DEFAULT_PASSCODE: &str = "DISTRESSED2025";

/// Content document used when `PORTFOLIO_CONTENT_PATH` is not set.
pub const DEFAULT_CONTENT_PATH: &str = "content.json";

/// Where memo and resume records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A single static JSON document with `site`, `resume` and `memos`.
    File(Utf8PathBuf),
    /// An entity-style HTTP API exposing `Memo` and `Resume` collections.
    Remote {
        base_url: String,
        api_key: Option<String>,
    },
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub source: ContentSource,
    pub passcode: String,
    pub session_id: String,
    pub state_dir: Utf8PathBuf,
    pub debug: bool,
    pub log_path: Utf8PathBuf,
}

impl PortfolioConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match non_empty("PORTFOLIO_API_URL") {
            Some(base_url) => ContentSource::Remote {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: non_empty("PORTFOLIO_API_KEY"),
            },
            None => ContentSource::File(Utf8PathBuf::from(
                non_empty("PORTFOLIO_CONTENT_PATH")
                    .unwrap_or_else(|| DEFAULT_CONTENT_PATH.to_string()),
            )),
        };

        let state_dir = non_empty("PORTFOLIO_STATE_DIR")
            .map(Utf8PathBuf::from)
            .unwrap_or_else(default_state_dir);

        let log_path = non_empty("PORTFOLIO_LOG_PATH")
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| state_dir.join("portfolio-debug.jsonl"));

        let debug = lookup("PORTFOLIO_DEBUG")
            .map(|v| {
                let v = v.trim();
                !["", "0", "false", "off", "no"]
                    .iter()
                    .any(|falsy| v.eq_ignore_ascii_case(falsy))
            })
            .unwrap_or(false);

        Self {
            source,
            passcode: non_empty("PORTFOLIO_PASSCODE").unwrap_or_else(|| DEFAULT_PASSCODE.to_string()),
            session_id: non_empty("PORTFOLIO_SESSION_ID").unwrap_or_else(default_session_id),
            state_dir,
            debug,
            log_path,
        }
    }
}

/// Per-login runtime directory if the platform has one, else the temp dir.
pub fn default_state_dir() -> Utf8PathBuf {
    let dir = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
    Utf8PathBuf::from_path_buf(dir).unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
}

/// The invoking shell is the session: every command run from it shares the marker.
fn default_session_id() -> String {
    #[cfg(unix)]
    {
        std::os::unix::process::parent_id().to_string()
    }
    #[cfg(not(unix))]
    {
        std::process::id().to_string()
    }
}
