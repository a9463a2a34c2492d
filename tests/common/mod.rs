//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use changelog_gen::github::Summary;

pub const REPO: &str = "AFNetworking/AFNetworking";

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to a changelog fixture.
pub fn changelog_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("changelogs").join(name)
}

/// Get the path to a GitHub API fixture.
pub fn github_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("github").join(name)
}

/// Read a fixture file as a string.
pub fn read_fixture(path: PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Read a GitHub API fixture as JSON.
pub fn github_json(name: &str) -> Value {
    serde_json::from_str(&read_fixture(github_fixture(name)))
        .unwrap_or_else(|e| panic!("Invalid JSON in fixture {}: {}", name, e))
}

/// Minimal payload for exercising the transport and paginators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MockStruct {
    pub value: String,
}

impl Summary for MockStruct {
    fn summary(&self) -> String {
        format!("MockStruct: {}", self.value)
    }
}

/// Eight full pages of two items followed by a final page of one.
pub fn mock_pages() -> Vec<Value> {
    let mut pages: Vec<Value> = (0..8)
        .map(|i| {
            json!([
                { "value": format!("Hello {}", i) },
                { "value": format!("World {}", i) }
            ])
        })
        .collect();
    pages.push(json!([{ "value": "Hello 9" }]));
    pages
}

/// Mount one response per page number on `route`.
pub async fn mount_pages(server: &MockServer, route: &str, pages: Vec<Value>) {
    for (i, page) in pages.into_iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("page", (i + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .mount(server)
            .await;
    }
}

/// A commit as listed by the compare endpoint.
pub fn mock_full_commit(sha: &str, message: &str) -> Value {
    let signature = json!({
        "name": "Test User",
        "email": "test@example.com",
        "date": "2023-05-01T12:00:00Z"
    });
    json!({
        "sha": sha,
        "commit": {
            "message": message,
            "author": signature.clone(),
            "committer": signature
        }
    })
}

/// A compare payload carrying `shas` as its commit list.
pub fn mock_comparison(shas: &[&str], total_commits: usize) -> Value {
    let commits: Vec<Value> = shas
        .iter()
        .map(|sha| mock_full_commit(sha, &format!("Commit {}", sha)))
        .collect();
    json!({
        "url": "https://api.github.com/repos/o/r/compare/a...b",
        "status": "ahead",
        "ahead_by": total_commits,
        "behind_by": 0,
        "total_commits": total_commits,
        "commits": commits,
        "base_commit": mock_full_commit("base", "Base"),
        "merge_base_commit": mock_full_commit("base", "Base")
    })
}
