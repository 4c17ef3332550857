//! In-process transport double for cache and client tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Value, json};

use super::Transport;
use crate::endpoints::ApiRequest;
use crate::error::ClientError;

/// Answers by request path and records every request it sees.
///
/// Unscripted paths answer `{"success": true}`.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<HashMap<String, Result<Value, String>>>,
    failures_after: Mutex<HashMap<String, (usize, String)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn respond(&self, path: &str, envelope: Value) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(path.to_string(), Ok(envelope));
    }

    /// Make `path` fail with an API error carrying `message`.
    pub(crate) fn fail(&self, path: &str, message: &str) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(path.to_string(), Err(message.to_string()));
    }

    /// Let `successes` requests to `path` through, then fail the rest.
    pub(crate) fn fail_after(&self, path: &str, successes: usize, message: &str) {
        self.failures_after
            .lock()
            .expect("failures lock")
            .insert(path.to_string(), (successes, message.to_string()));
    }

    pub(crate) fn calls(&self, path: &str) -> usize {
        self.requests
            .lock()
            .expect("requests lock")
            .iter()
            .filter(|req| req.path() == path)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn answer(&self, request: &ApiRequest) -> Result<Value, ClientError> {
        let path = request.path();
        let earlier = self.calls(&path);
        let failure = self
            .failures_after
            .lock()
            .expect("failures lock")
            .get(&path)
            .filter(|(successes, _)| earlier >= *successes)
            .map(|(_, message)| message.clone());
        if let Some(message) = failure {
            self.requests.lock().expect("requests lock").push(request.clone());
            return Err(ClientError::api(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                message,
            ));
        }

        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        match self
            .responses
            .lock()
            .expect("responses lock")
            .get(&path)
        {
            Some(Ok(envelope)) => Ok(envelope.clone()),
            Some(Err(message)) => Err(ClientError::api(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                message.clone(),
            )),
            None => Ok(json!({ "success": true })),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<Value, ClientError> {
        self.answer(request)
    }

    async fn download(&self, request: &ApiRequest) -> Result<Bytes, ClientError> {
        let envelope = self.answer(request)?;
        Ok(Bytes::from(envelope.to_string()))
    }
}
