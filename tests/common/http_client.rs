//! HTTP client helpers for tests.

use chrono::{DateTime, Utc};
use leaderboard::Leaders;
use leaderboard::domain::Leader;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventBody {
    pub event_id: Uuid,
    pub talent_id: String,
    pub raw_metric: f64,
    pub skill: String,
    pub ts: DateTime<Utc>,
}

impl EventBody {
    pub fn new(talent_id: &str, raw_metric: f64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            talent_id: talent_id.to_string(),
            raw_metric,
            skill: "dribble".to_string(),
            ts: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Posts an event and returns the status code.
    pub async fn post_event(&self, body: &EventBody) -> reqwest::Result<u16> {
        let resp = self.client.post(self.url("/events")).json(body).send().await?;
        Ok(resp.status().as_u16())
    }

    pub async fn post_raw(&self, body: &str) -> reqwest::Result<(u16, ErrorBody)> {
        let resp = self
            .client
            .post(self.url("/events"))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }

    pub async fn leaderboard(&self, limit: Option<usize>) -> reqwest::Result<Leaders> {
        let path = match limit {
            Some(limit) => format!("/leaderboard?limit={limit}"),
            None => "/leaderboard".to_string(),
        };
        self.client
            .get(self.url(&path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn leaderboard_all(&self) -> reqwest::Result<Leaders> {
        self.client
            .get(self.url("/leaderboard/all"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Returns `None` on 404.
    pub async fn rank(&self, talent_id: &str) -> reqwest::Result<Option<Leader>> {
        let resp = self
            .client
            .get(self.url(&format!("/rank/{talent_id}")))
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(resp.error_for_status()?.json().await?))
    }

    pub async fn get_status(&self, path: &str) -> reqwest::Result<u16> {
        let resp = self.client.get(self.url(path)).send().await?;
        Ok(resp.status().as_u16())
    }

    pub async fn health(&self) -> reqwest::Result<HealthResponse> {
        self.client
            .get(self.url("/healthz"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
