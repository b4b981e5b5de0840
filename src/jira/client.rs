//! Blocking HTTP client for the tracker's search API.

use std::time::Duration;

use crate::config::TrackerConfig;
use crate::core::{Error, Result};

use super::models::{RawIssue, SearchResponse};

const ENV_URL: &str = "JIRA_URL";
const ENV_USER: &str = "JIRA_USER";
const ENV_TOKEN: &str = "JIRA_TOKEN";

/// Tracker credentials, loaded from the environment rather than the
/// config file so tokens never land on disk next to the project.
#[derive(Clone, Debug)]
pub struct TrackerCredentials {
    pub base_url: String,
    pub user: String,
    pub token: String,
}

impl TrackerCredentials {
    pub fn from_env() -> Result<Self> {
        let get = |name: &str| {
            std::env::var(name)
                .map_err(|_| Error::Configuration(format!("missing environment variable {name}")))
        };
        Ok(Self {
            base_url: get(ENV_URL)?.trim_end_matches('/').to_string(),
            user: get(ENV_USER)?,
            token: get(ENV_TOKEN)?,
        })
    }
}

pub struct JiraClient {
    http: reqwest::blocking::Client,
    credentials: TrackerCredentials,
    tracker: TrackerConfig,
}

impl JiraClient {
    pub fn new(credentials: TrackerCredentials, tracker: TrackerConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            credentials,
            tracker,
        })
    }

    fn jql(&self) -> String {
        format!(
            "project = \"{}\" AND \"{}\" = \"{}\" ORDER BY created DESC",
            self.tracker.project_key, self.tracker.team_field, self.tracker.team_filter
        )
    }

    /// Fetch all matching issues with their changelogs, page by page.
    pub fn fetch_issues(&self) -> Result<Vec<RawIssue>> {
        let jql = self.jql();
        log::info!("Fetching issues with JQL: {jql}");

        let url = format!("{}/rest/api/2/search", self.credentials.base_url);
        let fields = format!(
            "summary,status,issuetype,created,updated,{},{},{}",
            self.tracker.story_points_field, self.tracker.sprint_field, self.tracker.team_field
        );

        let max_results = self.tracker.page_size.to_string();
        let mut issues = Vec::new();
        let mut start_at: u32 = 0;
        loop {
            let start = start_at.to_string();
            let page: SearchResponse = self
                .http
                .get(&url)
                .basic_auth(&self.credentials.user, Some(&self.credentials.token))
                .query(&[
                    ("jql", jql.as_str()),
                    ("startAt", start.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("expand", "changelog"),
                    ("fields", fields.as_str()),
                ])
                .send()?
                .error_for_status()?
                .json()?;

            let fetched = page.issues.len() as u32;
            issues.extend(page.issues);
            start_at = page.start_at + fetched;
            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        log::info!("Fetched {} issues", issues.len());
        Ok(issues)
    }
}
