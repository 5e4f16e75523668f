//! Scripted in-memory transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use super::transport::{RawResponse, Transport, TransportError};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(RawResponse),
    Fail,
}

/// Transport that answers from a fixed table and counts requests.
///
/// URLs with no scripted answer get a 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, Scripted>>,
    requested: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, url: &str, answer: Scripted) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(url.to_string(), answer);
    }

    /// Answer `url` with a 200 served from `url` itself.
    pub fn ok(&self, url: &str, body: &[u8]) {
        self.redirected(url, url, body);
    }

    /// Answer `url` with a 200 served from `final_url`.
    pub fn redirected(&self, url: &str, final_url: &str, body: &[u8]) {
        self.script(
            url,
            Scripted::Respond(RawResponse {
                status: 200,
                final_url: final_url.to_string(),
                bytes: Bytes::copy_from_slice(body),
            }),
        );
    }

    /// Answer `url` with a bodiless status.
    pub fn status(&self, url: &str, status: u16) {
        self.script(url, Scripted::Respond(RawResponse { status, final_url: url.to_string(), bytes: Bytes::new() }));
    }

    /// Fail `url` below the HTTP layer.
    pub fn fail(&self, url: &str) {
        self.script(url, Scripted::Fail);
    }

    /// Number of requests made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());

        let answer = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(url)
            .cloned();

        match answer {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail) => Err(TransportError::Network(format!("connection reset: {url}"))),
            None => Ok(RawResponse { status: 404, final_url: url.to_string(), bytes: Bytes::new() }),
        }
    }
}
