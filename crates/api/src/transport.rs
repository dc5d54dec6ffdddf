//! Wire transport: bearer-token HTTP with envelope decoding.
//!
//! Non-2xx responses carry `{"error": {"type": ..., "message": ...}}`.
//! Callers may allow-list expected error types per call; allow-listed
//! envelopes are handed back as ordinary values instead of raising.
//! HTTP 429 is retried here and never surfaced as an error type.

use async_trait::async_trait;
use kata_core::{Context, Error, Result, RetryConfig};
use kata_utils::{retry, Attempt};
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The seam between the typed client and the wire. Tests implement this
/// with scripted responses; production uses [`HttpTransport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a JSON request. `allow` lists remote error types that are
    /// expected outcomes; their envelopes come back as the value.
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        allow: &[&str],
    ) -> Result<Value>;

    /// Fetch a raw (non-JSON) resource body
    async fn call_raw(&self, path: &str) -> Result<String>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(ctx: &Context) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: ctx.endpoint.clone(),
            token: ctx.token.clone(),
            retry: ctx.retry.clone(),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| Error::configuration(format!("invalid API path '{path}': {e}")))
    }

    fn request(&self, method: Method, url: &Url, body: Option<&Value>) -> reqwest::RequestBuilder {
        let builder = match method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
            Method::Patch => self.http.patch(url.clone()),
        };
        let builder = builder.bearer_auth(&self.token);
        match body {
            Some(body) => builder.json(body),
            None => builder,
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
        allow: &[&str],
    ) -> Result<Attempt<Value>> {
        let response = self
            .request(method, url, body)
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            tracing::debug!(%url, "rate limited, will retry");
            return Ok(Attempt::Pending);
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::network(url.as_str(), e.to_string()))?;

        if status.is_success() {
            if text.is_empty() {
                return Ok(Attempt::Ready(Value::Null));
            }
            let value: Value = serde_json::from_str(&text)?;
            return Ok(Attempt::Ready(value));
        }

        // Decode the error envelope
        let envelope: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        let error_type = envelope
            .get("error")
            .and_then(|e| e.get("type"))
            .and_then(Value::as_str);
        match error_type {
            Some(error_type) if allow.contains(&error_type) => {
                tracing::debug!(%url, error_type, "allow-listed remote error");
                Ok(Attempt::Ready(envelope))
            }
            Some(error_type) => {
                let message = envelope
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown remote error");
                Err(Error::api(error_type, message))
            }
            None => Err(Error::network(
                url.as_str(),
                format!("unexpected status {status}"),
            )),
        }
    }

    async fn fetch_raw_once(&self, url: &Url) -> Result<Attempt<String>> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::network(url.as_str(), e.to_string()))?;
        if response.status().as_u16() == 429 {
            tracing::debug!(%url, "rate limited, will retry");
            return Ok(Attempt::Pending);
        }
        if !response.status().is_success() {
            return Err(Error::network(
                url.as_str(),
                format!("unexpected status {}", response.status()),
            ));
        }
        let text = response
            .text()
            .await
            .map_err(|e| Error::network(url.as_str(), e.to_string()))?;
        Ok(Attempt::Ready(text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        allow: &[&str],
    ) -> Result<Value> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "remote call");
        let outcome = retry(&self.retry, || {
            self.send_once(method, &url, body.as_ref(), allow)
        })
        .await?;
        outcome.ok_or_else(|| Error::network(url.as_str(), "rate-limit retries exhausted"))
    }

    async fn call_raw(&self, path: &str) -> Result<String> {
        let url = self.url(path)?;
        tracing::debug!(%url, "remote raw fetch");
        let outcome = retry(&self.retry, || self.fetch_raw_once(&url)).await?;
        outcome.ok_or_else(|| Error::network(url.as_str(), "rate-limit retries exhausted"))
    }
}
