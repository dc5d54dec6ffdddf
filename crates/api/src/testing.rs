//! Scripted transport for exercising callers without a network.
//!
//! Lives in the library (not behind `cfg(test)`) so downstream crates can
//! drive the model and pipeline against scripted remote behavior.

use crate::client::Client;
use crate::transport::{Method, Transport};
use async_trait::async_trait;
use kata_cache::Cache;
use kata_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Serves queued responses per (method, path). Each call pops the front of
/// the route's queue; a single remaining entry repeats forever.
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Vec<Value>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Queue one response for a route
    pub fn route(self: &Arc<Self>, method: Method, path: &str, response: Value) -> Arc<Self> {
        self.routes
            .lock()
            .unwrap()
            .entry(format!("{method} {path}"))
            .or_default()
            .push(response);
        Arc::clone(self)
    }

    /// Client over this transport with caching disabled
    #[must_use]
    pub fn client(self: &Arc<Self>) -> Client {
        Client::with_transport(
            Arc::clone(self) as Arc<dyn Transport>,
            Cache::disabled(),
            Duration::from_secs(3600),
        )
    }

    /// Total calls that reached the transport
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn pop(&self, key: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(key)
            .ok_or_else(|| Error::configuration(format!("no scripted route for {key}")))?;
        if queue.len() > 1 {
            Ok(queue.remove(0))
        } else {
            queue
                .first()
                .cloned()
                .ok_or_else(|| Error::configuration(format!("script exhausted for {key}")))
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(
        &self,
        method: Method,
        path: &str,
        _body: Option<Value>,
        _allow: &[&str],
    ) -> Result<Value> {
        self.pop(&format!("{method} {path}"))
    }

    async fn call_raw(&self, path: &str) -> Result<String> {
        let value = self.pop(&format!("GET {path}"))?;
        match value {
            Value::String(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }
}
