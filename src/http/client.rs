use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::time::Duration;

use super::throttle::Throttle;
use crate::config::FetchSettings;
use crate::errors::with_fetch_context;

/// HTTP client that spaces requests out by a minimum interval
pub struct ThrottledClient {
    client: Client,
    throttle: Throttle,
}

impl ThrottledClient {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;
        let throttle = Throttle::new(settings.min_request_interval_ms);

        Ok(Self { client, throttle })
    }

    pub async fn get(&mut self, url: &str) -> Result<reqwest::Response> {
        self.throttle.wait().await;
        debug!("GET {} (request #{})", url, self.throttle.request_count());
        self.send_get_request(url).await
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        with_fetch_context(self.client.get(url).send().await, url)
    }
}
