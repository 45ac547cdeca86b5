//! Route parsing for hash-fragment or path URLs.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static MEMO_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/memos/([^/?#]+)$").expect("valid memo route regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "param", rename_all = "snake_case")]
pub enum Route {
    Home,
    Resume,
    Memos,
    MemoDetail(String),
    About,
    Contact,
    Private,
    NotFound(String),
}

impl Route {
    /// Parse `#/memos/x`, `/memos/x` or `memos/x`. Query strings are ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let without_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let path = without_hash.split('?').next().unwrap_or_default();

        let mut path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }

        match path.as_str() {
            "/" => Route::Home,
            "/resume" => Route::Resume,
            "/memos" => Route::Memos,
            "/about" => Route::About,
            "/contact" => Route::Contact,
            "/private" => Route::Private,
            other => match MEMO_DETAIL.captures(other) {
                Some(caps) => Route::MemoDetail(caps[1].to_string()),
                None => Route::NotFound(other.to_string()),
            },
        }
    }

    /// Canonical hash-fragment form.
    pub fn to_hash(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            Route::Resume => "#/resume".to_string(),
            Route::Memos => "#/memos".to_string(),
            Route::MemoDetail(slug) => format!("#/memos/{}", slug),
            Route::About => "#/about".to_string(),
            Route::Contact => "#/contact".to_string(),
            Route::Private => "#/private".to_string(),
            Route::NotFound(path) => format!("#{}", path),
        }
    }
}
