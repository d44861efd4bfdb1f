//! Stub transport for service tests
//!
//! Every call records the verb, path and payload, then answers with the
//! canned reply the stub was built with.

use super::{ApiError, ConcertoService, RawResponse, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Mutex;

#[derive(Clone)]
enum Reply {
    Response(RawResponse),
    TransportError(String),
}

/// One request seen by [`MockConcerto`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub path: String,
    pub payload: Option<Value>,
}

pub(crate) struct MockConcerto {
    reply: Reply,
    calls: Mutex<Vec<Call>>,
}

impl MockConcerto {
    /// Answer with `body` serialized as JSON
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        let body = serde_json::to_vec(body).expect("serializable test body");
        Self::raw(status, &body)
    }

    /// Answer with raw bytes
    pub fn raw(status: u16, body: &[u8]) -> Self {
        Self {
            reply: Reply::Response(RawResponse {
                status,
                body: body.to_vec(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call before any response is produced
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Reply::TransportError(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls().last().cloned().expect("no request was made")
    }

    fn answer(&self, method: &'static str, path: &str, payload: Option<&Value>) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            payload: payload.cloned(),
        });

        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::TransportError(message) => Err(ApiError::transport(message.clone())),
        }
    }
}

#[async_trait]
impl ConcertoService for MockConcerto {
    async fn get(&self, path: &str) -> Result<RawResponse> {
        self.answer("GET", path, None)
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<RawResponse> {
        self.answer("POST", path, Some(payload))
    }

    async fn put(&self, path: &str, payload: &Value) -> Result<RawResponse> {
        self.answer("PUT", path, Some(payload))
    }

    async fn delete(&self, path: &str) -> Result<RawResponse> {
        self.answer("DELETE", path, None)
    }
}

/// Assert a transport failure came back unchanged
pub(crate) fn assert_transport_error<T: Debug>(result: Result<T>, message: &str) {
    match result {
        Err(err @ ApiError::Transport(_)) => assert_eq!(err.to_string(), message),
        other => panic!("expected transport error, got {:?}", other),
    }
}

/// Assert a non-2xx answer surfaced with its code
pub(crate) fn assert_status_error<T: Debug>(result: Result<T>, code: u16) {
    match result {
        Err(err @ ApiError::Status { .. }) => {
            assert_eq!(err.status_code(), Some(code));
            assert!(err.to_string().contains(&code.to_string()));
        }
        other => panic!("expected status error {}, got {:?}", code, other),
    }
}

/// Assert a malformed body surfaced as a decode error
pub(crate) fn assert_decode_error<T: Debug>(result: Result<T>) {
    match result {
        Err(ApiError::Decode(_)) => {}
        other => panic!("expected decode error, got {:?}", other),
    }
}

/// Body used by decode-error tests
pub(crate) const MALFORMED_JSON: &[u8] = b"{\"id\": invalid";
