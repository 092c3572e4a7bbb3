//! HTTP draw source
//!
//! Queries a lottery results API: `GET <url>?code=<game>&expect=<issue>`
//! authenticated with `app_id`/`app_secret` headers. A body of
//! `{"code": 1, "data": {"openCode": "..."}}` carries the result.

use serde::Deserialize;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

use super::DrawSource;
use crate::config::RemoteSettings;
use crate::error::{CheckError, CheckResult};
use crate::slip::Game;

/// Response `code` meaning the draw was found
const CODE_FOUND: i64 = 1;

#[derive(Debug, Deserialize)]
struct DrawResponse {
    code: i64,
    #[serde(default)]
    data: Option<DrawData>,
}

#[derive(Debug, Deserialize)]
struct DrawData {
    #[serde(rename = "openCode", default)]
    open_code: Option<String>,
}

/// Draw source backed by the results web API
pub struct HttpDrawSource {
    settings: RemoteSettings,
    client: reqwest::Client,
    runtime: Runtime,
}

impl HttpDrawSource {
    pub fn new(settings: RemoteSettings) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;

        Ok(Self {
            settings,
            client,
            runtime,
        })
    }

    async fn fetch_async(&self, game: Game, issue: &str) -> CheckResult<String> {
        let response = self
            .client
            .get(&self.settings.url)
            .query(&[("code", game.code()), ("expect", issue)])
            .header("app_id", &self.settings.app_id)
            .header("app_secret", &self.settings.app_secret)
            .send()
            .await
            .map_err(|e| CheckError::RemoteUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CheckError::RemoteUnavailable(format!(
                "draw service returned status {}",
                response.status()
            )));
        }

        let body: DrawResponse = response
            .json()
            .await
            .map_err(|e| CheckError::RemoteUnavailable(format!("unreadable response: {}", e)))?;
        debug!("Draw service answered code {} for {} {}", body.code, game, issue);

        open_code(body, game, issue)
    }
}

fn open_code(body: DrawResponse, game: Game, issue: &str) -> CheckResult<String> {
    if body.code != CODE_FOUND {
        return Err(CheckError::NoDrawData {
            game,
            issue: issue.to_string(),
        });
    }
    body.data
        .and_then(|d| d.open_code)
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| CheckError::MissingInfo("response carries no winning numbers".to_string()))
}

impl DrawSource for HttpDrawSource {
    fn fetch(&self, game: Game, issue: &str) -> CheckResult<String> {
        self.runtime.block_on(self.fetch_async(game, issue))
    }
}
