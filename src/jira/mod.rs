//! Jira retrieval collaborator: fetches raw issues with their changelogs
//! and maps them into pipeline-owned issue records.

pub mod client;
pub mod models;

pub use client::{JiraClient, TrackerCredentials};
pub use models::{sprint_date_from_name, to_issue_record, RawIssue};
