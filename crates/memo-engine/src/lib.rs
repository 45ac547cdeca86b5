//! Memo engine for the portfolio site.
//!
//! Provides:
//! - Content schema (memos, resume, site)
//! - Content repositories (static JSON, remote entity API)
//! - Memo query engine and facets
//! - Private access gate
//! - Derived statistics and route parsing

pub mod dates;
pub mod detail;
pub mod error;
pub mod gate;
pub mod query;
pub mod remote;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod stats;

pub use detail::{MemoView, TocEntry, open_memo, selected_work, table_of_contents};
pub use error::ContentError;
pub use gate::{AccessGate, AccessState, MemoryMarker, SessionMarker, UnlockMarker, UnlockOutcome};
pub use query::{
    Facets, FilterSpec, QueryOutcome, TypeFilter, YearFilter, facets, lookup_by_slug, query,
    query_with_counts, recent_public,
};
pub use remote::{EntityQuery, RemoteEntityRepository};
pub use repository::{ContentDocument, ContentRepository, JsonContentRepository};
pub use routes::Route;
pub use schema::{MemoRecord, MemoStatus, Resume, SiteInfo};
