// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use url::Url;

use crate::{
    error::{self, Result},
    metadata,
};

/// Somewhere to get published keys from.
#[async_trait]
pub(crate) trait Source: Send + Sync {
    async fn lines(&self) -> Result<Vec<String>>;
}

/// Fetches `<base><user>.keys` over HTTP(S), the way GitHub publishes a user's
/// public keys.
pub(crate) struct Http {
    client: reqwest::Client,
    url: Url,
}

impl Http {
    pub(crate) fn new(base: &str, user: &str) -> Result<Self> {
        let url = Url::parse(base)
            .and_then(|base| base.join(&format!("{user}.keys")))
            .map_err(|e| error::Fetch::Url(format!("{base}{user}.keys"), e))?;
        let client = reqwest::Client::builder()
            .user_agent(metadata::USER_AGENT.as_str())
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, url })
    }

    pub(crate) const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Source for Http {
    async fn lines(&self) -> Result<Vec<String>> {
        debug!("Fetching keys from {}", self.url);
        let res = self.client.get(self.url.clone()).send().await?;
        if res.status() != StatusCode::OK {
            return Err(error::Fetch::Status {
                url: self.url.clone(),
                status: res.status(),
            }
            .into());
        }

        let body = res.text().await?;
        Ok(body.split('\n').map(str::to_owned).collect())
    }
}
