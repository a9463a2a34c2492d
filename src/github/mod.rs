//! GitHub REST API access: transport, pagination and repository endpoints.

pub mod auth;
pub mod client;
pub mod date;
pub mod fetcher;
pub mod models;
pub mod paginator;

pub use auth::resolve_token;
pub use client::{Endpoint, GitHub};
pub use fetcher::{DEFAULT_BASE_URI, Fetcher, Request};
pub use models::{
    Comparison, FullCommit, Issue, Label, Milestone, PullRequest, Release, SearchResult, State,
    Summary, Tag, User,
};
pub use paginator::{DEFAULT_PAGE_SIZE, Page, Paginated, PaginationState, Paginator};
