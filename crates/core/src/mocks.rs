//! Mocks for the interfaces of the system.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value};

use crate::{HttpClient, HttpRequest, HttpResponse};

/// A mock HTTP client that records requests and replays a canned response.
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    response: HttpResponse,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::responding(HttpResponse::ok(201, json!({"id": 101})))
    }
}

impl MockHttpClient {
    /// Replies with the provided response.
    pub fn responding(response: HttpResponse) -> Self {
        Self {
            response,
            requests: Default::default(),
        }
    }

    /// Replies with a successful response carrying the provided body.
    pub fn with_data(data: Value) -> Self {
        Self::responding(HttpResponse::ok(201, data))
    }

    /// Replies with a failed response.
    pub fn failing() -> Self {
        Self::responding(HttpResponse::failed(Some(500), "internal server error"))
    }

    /// Returns the recorded requests.
    ///
    /// A poisoned lock still yields the requests recorded before the panic.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> anyhow::Result<HttpResponse> {
        self.requests
            .lock()
            .map_err(|e| anyhow::anyhow!("error locking requests: {e}"))?
            .push(request.clone());

        Ok(self.response.clone())
    }
}

#[test]
fn poisoned_lock_keeps_recorded_requests() {
    let client = MockHttpClient::default();
    let requests = client.requests.clone();

    std::thread::spawn(move || {
        let mut r = requests.lock().unwrap();

        r.push(HttpRequest::post("http://127.0.0.1:8080/posts"));

        panic!("poison the lock");
    })
    .join()
    .unwrap_err();

    assert!(client.requests.is_poisoned());
    assert_eq!(client.requests().len(), 1);
}
