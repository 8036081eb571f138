use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{FlagSummary, Page, SourceFlag, SourceSegment};
use crate::config::Config;
use crate::error::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only client for the three LaunchDarkly endpoints the migration
/// consumes. One request in flight at a time, no retries, first page only.
pub struct SourceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    project: String,
}

impl SourceClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            project: config.project.clone(),
        })
    }

    /// List the project's flags (key and name only).
    pub async fn list_flags(&self) -> Result<Vec<FlagSummary>, Error> {
        let url = format!("{}/flags/{}", self.base_url, self.project);
        let page: Page<FlagSummary> = self.get_json(&url).await?;
        Ok(page.items)
    }

    /// Fetch one flag's full detail, including per-environment rules.
    pub async fn flag_detail(&self, key: &str) -> Result<SourceFlag, Error> {
        let url = format!("{}/flags/{}/{}", self.base_url, self.project, key);
        self.get_json(&url).await
    }

    /// List the native segments defined for one environment.
    pub async fn segments(&self, environment: &str) -> Result<Vec<SourceSegment>, Error> {
        let url = format!("{}/segments/{}/{}", self.base_url, self.project, environment);
        let page: Page<SourceSegment> = self.get_json(&url).await?;
        Ok(page.items)
    }

    /// GET a URL with the API key in the Authorization header and decode
    /// the body. Network and status failures are transport errors; a body
    /// that does not decode into the expected shape is a schema error.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        debug!(%url, "fetching");

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.api_key.as_str())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;

        let body = response.text().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| Error::Schema {
            url: url.to_string(),
            source,
        })
    }
}
