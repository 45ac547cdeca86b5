//! `portfolio`: browse memos, resume and private access from the terminal.
//!
//! Loads content from a static JSON document or the entity API, runs the
//! memo query engine and prints plain-text (or `--json`) views.

mod render;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Parser, Subcommand};
use memo_engine::gate::MARKER_PREFIX;
use memo_engine::{
    AccessGate, ContentRepository, FilterSpec, JsonContentRepository, MemoView, RemoteEntityRepository,
    Route, SessionMarker, TypeFilter, UnlockOutcome, YearFilter, facets, open_memo,
    query_with_counts, recent_public, selected_work,
};
use portfolio_common::prelude::*;
use render::HomeStats;

/// Featured memos on the home page.
const FEATURED_LIMIT: usize = 3;

#[derive(Debug, Parser)]
#[command(name = "portfolio", version, about = "Browse the memo portfolio")]
struct Cli {
    /// Static content document (overrides PORTFOLIO_CONTENT_PATH)
    #[arg(long, global = true)]
    content: Option<Utf8PathBuf>,

    /// Entity API base URL (overrides PORTFOLIO_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session key for private access (overrides PORTFOLIO_SESSION_ID)
    #[arg(long, global = true)]
    session: Option<String>,

    /// Directory for session state (overrides PORTFOLIO_STATE_DIR)
    #[arg(long, global = true)]
    state_dir: Option<Utf8PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List memos, newest first
    Memos {
        /// Case-insensitive substring of title, company, thesis or tags
        #[arg(long, short, default_value = "")]
        search: String,
        /// Memo type, or "All"
        #[arg(long = "type", short = 't', default_value = "All")]
        memo_type: TypeFilter,
        /// Analysis year, or "All"
        #[arg(long, short, default_value = "All")]
        year: YearFilter,
    },
    /// Show filter options for the visible memos
    Facets,
    /// Show one memo
    Show { slug: String },
    /// Unlock private memos for this session
    Unlock { passcode: String },
    /// Lock private memos again
    Lock,
    /// Show private access state
    Status,
    /// Home page statistics
    Stats,
    /// Show the resume
    Resume,
    /// Render a site route such as "#/memos/acme"
    Open { route: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = run(cli)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Apply CLI flags over the environment configuration.
fn resolve_config(cli: &Cli, mut config: PortfolioConfig) -> PortfolioConfig {
    if let Some(path) = &cli.content {
        config.source = ContentSource::File(path.clone());
    }
    if let Some(base_url) = &cli.api_url {
        let api_key = match config.source {
            ContentSource::Remote { api_key, .. } => api_key,
            ContentSource::File(_) => None,
        };
        config.source = ContentSource::Remote {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        };
    }
    if let Some(session) = &cli.session {
        config.session_id = session.clone();
    }
    if let Some(dir) = &cli.state_dir {
        config.state_dir = dir.clone();
    }
    config
}

/// Everything a command needs.
struct App {
    config: PortfolioConfig,
    diagnostics: Diagnostics,
    gate: AccessGate<SessionMarker>,
    json: bool,
}

impl App {
    fn new(config: PortfolioConfig, json: bool) -> Self {
        let diagnostics = Diagnostics::from_config(&config);
        let marker = SessionMarker::new(
            StateManager::new(config.state_dir.clone(), MARKER_PREFIX),
            config.session_id.clone(),
        );
        let gate = AccessGate::open(config.passcode.clone(), marker);
        Self {
            config,
            diagnostics,
            gate,
            json,
        }
    }

    fn repository(&self) -> Result<Box<dyn ContentRepository>> {
        match &self.config.source {
            ContentSource::File(path) => {
                let repo = JsonContentRepository::load(path, &self.diagnostics)
                    .map_err(|e| self.load_failed(path.as_str(), e))?;
                Ok(Box::new(repo))
            }
            ContentSource::Remote { base_url, api_key } => Ok(Box::new(
                RemoteEntityRepository::new(base_url.clone(), api_key.clone())
                    .with_diagnostics(self.diagnostics.clone()),
            )),
        }
    }

    fn load_failed(&self, source: &str, err: memo_engine::ContentError) -> anyhow::Error {
        self.diagnostics.record(
            &DiagnosticEntry::new("content", "load_failed")
                .with_detail(&err.to_string())
                .with_context(source),
        );
        anyhow::Error::new(err).context(format!("Failed to load content from {}", source))
    }

    fn unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text())
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = resolve_config(&cli, PortfolioConfig::from_env());
    let mut app = App::new(config, cli.json);

    match cli.command {
        Command::Memos {
            search,
            memo_type,
            year,
        } => {
            let spec = FilterSpec::match_all()
                .with_search(search)
                .with_type(memo_type)
                .with_year(year);
            memos_view(&app, &spec)
        }
        Command::Facets => {
            let memos = load_memos(&app)?;
            let facets = facets(&memos, app.unlocked());
            app.emit(&facets, || render::facet_list(&facets))
        }
        Command::Show { slug } => show_view(&app, &slug),
        Command::Unlock { passcode } => unlock(&mut app, &passcode),
        Command::Lock => {
            app.gate.lock().context("Failed to clear private access")?;
            app.diagnostics.log("gate", "locked", &app.config.session_id);
            app.emit(&serde_json::json!({ "state": app.gate.state() }), || {
                "Private access locked.".to_string()
            })
        }
        Command::Status => status_view(&app),
        Command::Stats => {
            let repo = app.repository()?;
            let memos = fetch(&app, || repo.memos())?;
            let resume = fetch(&app, || repo.resume())?;
            let stats = HomeStats::compute(&memos, resume.as_ref(), app.unlocked(), Utc::now());
            app.emit(&stats, || render::home_stats(&stats))
        }
        Command::Resume => resume_view(&app),
        Command::Open { route } => open_route(&app, &Route::parse(&route)),
    }
}

/// Run a repository call, logging failures to diagnostics.
fn fetch<T>(app: &App, call: impl FnOnce() -> memo_engine::error::Result<T>) -> Result<T> {
    call().map_err(|e| {
        let source = match &app.config.source {
            ContentSource::File(path) => path.to_string(),
            ContentSource::Remote { base_url, .. } => base_url.clone(),
        };
        app.load_failed(&source, e)
    })
}

fn load_memos(app: &App) -> Result<Vec<memo_engine::MemoRecord>> {
    let repo = app.repository()?;
    fetch(app, || repo.memos())
}

fn memos_view(app: &App, spec: &FilterSpec) -> Result<String> {
    let memos = load_memos(app)?;
    let outcome = query_with_counts(&memos, app.unlocked(), spec);
    app.emit(&outcome, || render::memo_list(&outcome))
}

fn show_view(app: &App, slug: &str) -> Result<String> {
    let repo = app.repository()?;
    let memo = fetch(app, || repo.memo_by_slug(slug))?;
    let memos: Vec<_> = memo.into_iter().collect();

    match open_memo(&memos, slug, app.unlocked()) {
        MemoView::Visible(memo) => app.emit(memo, || render::memo_detail(memo)),
        MemoView::Locked => app.emit(
            &serde_json::json!({ "slug": slug, "error": "locked" }),
            || {
                "This memo is private. Unlock private access with `portfolio unlock <passcode>`."
                    .to_string()
            },
        ),
        MemoView::NotFound => app.emit(
            &serde_json::json!({ "slug": slug, "error": "not_found" }),
            || format!("Memo not found: {}", slug),
        ),
    }
}

fn unlock(app: &mut App, passcode: &str) -> Result<String> {
    let outcome = app
        .gate
        .submit(passcode)
        .context("Failed to persist private access")?;

    let message = match &outcome {
        UnlockOutcome::Unlocked => {
            app.diagnostics.log("gate", "unlocked", &app.config.session_id);
            "Private access unlocked.".to_string()
        }
        UnlockOutcome::Rejected { message } => {
            app.diagnostics.log("gate", "rejected", &app.config.session_id);
            message.clone()
        }
    };

    app.emit(
        &serde_json::json!({
            "state": app.gate.state(),
            "unlocked": outcome.is_unlocked(),
            "message": message,
        }),
        || message.clone(),
    )
}

fn status_view(app: &App) -> Result<String> {
    app.emit(&serde_json::json!({ "state": app.gate.state() }), || {
        if app.unlocked() {
            "Private access: unlocked".to_string()
        } else {
            "Private access: locked".to_string()
        }
    })
}

fn resume_view(app: &App) -> Result<String> {
    let repo = app.repository()?;
    let resume = fetch(app, || repo.resume())?;
    let Some(resume) = resume else {
        return app.emit(&serde_json::json!({ "error": "not_found" }), || {
            "No resume available.".to_string()
        });
    };
    let site = fetch(app, || repo.site())?;
    let memos = fetch(app, || repo.memos())?;
    let selected = selected_work(&resume, &memos);
    app.emit(&resume, || render::resume(&site, &resume, &selected))
}

fn open_route(app: &App, route: &Route) -> Result<String> {
    match route {
        Route::Home => {
            let repo = app.repository()?;
            let memos = fetch(app, || repo.memos())?;
            let resume = fetch(app, || repo.resume())?;
            let site = fetch(app, || repo.site())?;
            let stats = HomeStats::compute(&memos, resume.as_ref(), app.unlocked(), Utc::now());
            let featured = recent_public(&memos, FEATURED_LIMIT);
            app.emit(
                &serde_json::json!({ "stats": stats, "featured": featured }),
                || render::home(&site, resume.as_ref(), &stats, &featured),
            )
        }
        Route::Resume => resume_view(app),
        Route::Memos => memos_view(app, &FilterSpec::match_all()),
        Route::MemoDetail(slug) => show_view(app, slug),
        Route::About => {
            let repo = app.repository()?;
            let site = fetch(app, || repo.site())?;
            let resume = fetch(app, || repo.resume())?;
            app.emit(&site, || render::about(&site, resume.as_ref()))
        }
        Route::Contact => {
            let repo = app.repository()?;
            let site = fetch(app, || repo.site())?;
            app.emit(&site.social, || render::contact(&site))
        }
        Route::Private => status_view(app),
        Route::NotFound(path) => app.emit(
            &serde_json::json!({ "path": path, "error": "not_found" }),
            || format!("Page not found: {}", path),
        ),
    }
}
