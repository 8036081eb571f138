use dotenvy::dotenv;
use std::env;

use crate::error::Error;

const DEFAULT_BASE_URL: &str = "https://app.launchdarkly.com/api/v2";
const DEFAULT_PROJECT: &str = "default";

pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub project: String,
}

impl Config {
    /// Reads configuration from the environment before any network I/O.
    /// Only the API key is required; base URL and project have defaults.
    pub fn from_env() -> Result<Self, Error> {
        let _ = dotenv().is_ok();

        let api_key = env::var("LAUNCHDARKLY_API_KEY")
            .map_err(|_| Error::Config("LAUNCHDARKLY_API_KEY missing, it is required".to_string()))?;

        let base_url = env::var("LAUNCHDARKLY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let project = env::var("LAUNCHDARKLY_PROJECT")
            .unwrap_or_else(|_| DEFAULT_PROJECT.to_string());

        Ok(Self {
            api_key,
            base_url,
            project,
        })
    }
}
