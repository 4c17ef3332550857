#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use learnhub::endpoints::ApiRequest;
use learnhub::error::ClientError;
use learnhub::Transport;
use reqwest::Method;
use serde_json::{Value, json};

/// Answers every GET with `{"id": <last segment>, "revision": <n>}`, where
/// `n` counts the reads of that path so refetches are observable.
#[derive(Default)]
pub struct CountingTransport {
    reads: Mutex<HashMap<String, u64>>,
    writes: Mutex<Vec<String>>,
}

impl CountingTransport {
    pub fn reads(&self, path: &str) -> u64 {
        self.reads
            .lock()
            .expect("reads lock")
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<Value, ClientError> {
        let path = request.path();
        if request.method != Method::GET {
            self.writes.lock().expect("writes lock").push(path);
            return Ok(json!({ "success": true }));
        }

        let mut reads = self.reads.lock().expect("reads lock");
        let revision = reads.entry(path).or_default();
        *revision += 1;
        let id = request.segments.last().cloned().unwrap_or_default();
        Ok(json!({
            "success": true,
            "data": { "id": id, "revision": *revision }
        }))
    }

    async fn download(&self, _request: &ApiRequest) -> Result<Bytes, ClientError> {
        Ok(Bytes::from_static(b""))
    }
}
