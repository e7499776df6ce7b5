//! Canned-response server that records every request it receives.
//!
//! Any method on any path is accepted and answered with the same status and
//! body, so tests can assert exactly what a client sent.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Raw (still percent-encoded) value of query parameter `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
    }
}

/// Shared handle onto the requests seen by a stub router.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }

    fn push(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    recorder: Recorder,
}

/// Router answering every request with `status` and `body`.
///
/// A non-empty body is sent as `application/json`.
pub fn app(status: StatusCode, body: impl Into<String>) -> (Router, Recorder) {
    let recorder = Recorder::default();
    let stub = Stub {
        status,
        body: body.into(),
        recorder: recorder.clone(),
    };
    let router = Router::new().fallback(record).with_state(stub);
    (router, recorder)
}

async fn record(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    stub.recorder.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type,
        body,
    });

    if stub.body.is_empty() {
        stub.status.into_response()
    } else {
        (
            stub.status,
            [(header::CONTENT_TYPE, "application/json")],
            stub.body,
        )
            .into_response()
    }
}
