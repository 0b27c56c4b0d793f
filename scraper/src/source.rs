use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, RequestBuilder, StatusCode,
};

use crate::config::{AuthScope, Config, RequestKind};

/// Where pages come from. The scraper only ever needs the body of a page and
/// whether a URL answers at all.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;

    /// `true` only for a 200 response.
    async fn exists(&self, url: &str) -> Result<bool>;
}

pub struct HttpSource {
    client: Client,
    auth: HeaderMap,
    scope: AuthScope,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            auth: auth_headers(config)?,
            scope: config.auth_scope,
        })
    }

    fn request(&self, method: Method, url: &str, kind: RequestKind) -> RequestBuilder {
        let request = self.client.request(method, url);
        if self.scope.covers(kind) {
            request.headers(self.auth.clone())
        } else {
            request
        }
    }
}

fn auth_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.auth_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("invalid auth header name {name:?}"))?;
        let mut value = HeaderValue::from_str(value)
            .with_context(|| format!("invalid value for auth header {name}"))?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl PageSource for HttpSource {
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.request(Method::GET, url, RequestKind::Page).send().await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response.text().await?)
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        let response = self.request(Method::HEAD, url, RequestKind::Probe).send().await?;
        debug!("HEAD {} -> {}", url, response.status());
        Ok(response.status() == StatusCode::OK)
    }
}
