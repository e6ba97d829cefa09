//! Outbound HTTP descriptors and clients.

use std::{collections::BTreeMap, fmt, future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method of an outbound request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `DELETE`
    Delete,
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `POST`
    #[default]
    Post,
    /// `PUT`
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        };

        f.write_str(m)
    }
}

/// An outbound request descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Target URL.
    pub url: String,
    /// Request method.
    pub method: HttpMethod,
    /// Additional headers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl HttpRequest {
    /// Creates a request with no headers.
    pub fn new<U: AsRef<str>>(method: HttpMethod, url: U) -> Self {
        Self {
            url: url.as_ref().into(),
            method,
            headers: BTreeMap::new(),
        }
    }

    /// Creates a `POST` request with no headers and no body.
    pub fn post<U: AsRef<str>>(url: U) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Appends a header.
    pub fn with_header<K: AsRef<str>, V: AsRef<str>>(mut self, key: K, value: V) -> Self {
        self.headers
            .insert(key.as_ref().into(), value.as_ref().into());
        self
    }
}

/// The response handed back to the callback.
///
/// A transport failure or a non-success status is reported through `error`, not as an `Err`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// `true` if the request failed.
    pub error: bool,
    /// Status code, absent if no response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Decoded body.
    #[serde(default)]
    pub data: Value,
}

impl HttpResponse {
    /// A successful response with the given status and body.
    pub fn ok(status: u16, data: Value) -> Self {
        Self {
            error: false,
            status: Some(status),
            message: None,
            data,
        }
    }

    /// A failed response carrying the failure detail.
    pub fn failed<M: Into<String>>(status: Option<u16>, message: M) -> Self {
        Self {
            error: true,
            status,
            message: Some(message.into()),
            data: Value::Null,
        }
    }
}

/// A client able to submit a [`HttpRequest`].
pub trait HttpClient {
    /// Submits the request, awaiting its response.
    ///
    /// An `Err` is reserved for requests that could not be dispatched at all.
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = anyhow::Result<HttpResponse>> + Send;
}

impl<C: HttpClient + Sync> HttpClient for &C {
    fn execute(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = anyhow::Result<HttpResponse>> + Send {
        (**self).execute(request)
    }
}

/// A [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    timeout: Duration,
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl ReqwestClient {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new client with the provided per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl HttpClient for ReqwestClient {
    async fn execute(&self, request: &HttpRequest) -> anyhow::Result<HttpResponse> {
        let url = request.url.as_str();

        let mut builder = match request.method {
            HttpMethod::Delete => self.client.delete(url),
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Head => self.client.head(url),
            HttpMethod::Patch => self.client.patch(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
        };

        builder = builder.timeout(self.timeout);

        for (k, v) in request.headers.iter() {
            builder = builder.header(k, v);
        }

        tracing::debug!("sending {} {url}...", request.method);

        let ret = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("request to {url} failed: {e}");
                return Ok(HttpResponse::failed(None, e.to_string()));
            }
        };

        let status = ret.status();
        let bytes = match ret.bytes().await {
            Ok(b) => b,
            Err(e) => return Ok(HttpResponse::failed(Some(status.as_u16()), e.to_string())),
        };

        tracing::debug!("response received; status {status}, {} bytes", bytes.len());

        if !status.is_success() {
            return Ok(HttpResponse::failed(
                Some(status.as_u16()),
                format!("unexpected status {status}"),
            ));
        }

        Ok(HttpResponse::ok(status.as_u16(), decode_body(&bytes)))
    }
}

/// Decodes a response body as JSON, falling back to a string, then to null.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .or_else(|_| std::str::from_utf8(bytes).map(|s| Value::String(s.into())))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt as _, AsyncWriteExt as _},
        net::TcpListener,
        time,
    };

    use super::*;

    /// Serves a single connection, answering the raw `response` once the request head is read.
    ///
    /// With no `response`, the connection is held open without a reply.
    async fn serve_once(response: Option<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];

            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }

            match response {
                Some(r) => {
                    socket.write_all(r.as_bytes()).await.ok();
                    socket.shutdown().await.ok();
                }
                None => time::sleep(Duration::from_secs(5)).await,
            }
        });

        format!("http://{addr}/posts")
    }

    fn raw_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn post_descriptor_has_no_headers() {
        let request = HttpRequest::post("https://jsonplaceholder.typicode.com/posts");

        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.headers.is_empty());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "url": "https://jsonplaceholder.typicode.com/posts",
                "method": "post",
            })
        );
    }

    #[test]
    fn headers_are_serialized_when_present() {
        let request =
            HttpRequest::post("http://127.0.0.1:8080").with_header("Accept", "application/json");

        assert_eq!(
            serde_json::to_value(&request).unwrap()["headers"],
            json!({"Accept": "application/json"})
        );
    }

    #[test]
    fn body_decoding_falls_back() {
        assert_eq!(decode_body(br#"{"id":101}"#), json!({"id": 101}));
        assert_eq!(decode_body(b"plain"), Value::String("plain".into()));
        assert_eq!(decode_body(&[0xff, 0xfe]), Value::Null);
        assert_eq!(decode_body(b""), Value::Null);
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        assert_eq!(ReqwestClient::default().timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn created_response_is_decoded() {
        let url = serve_once(Some(raw_response("201 Created", r#"{"id":101}"#))).await;

        let response = ReqwestClient::default()
            .execute(&HttpRequest::post(url))
            .await
            .unwrap();

        assert!(!response.error);
        assert_eq!(response.status, Some(201));
        assert_eq!(response.data, json!({"id": 101}));
        assert!(response.message.is_none());
    }

    #[tokio::test]
    async fn server_error_is_reported_in_response() {
        let url = serve_once(Some(raw_response("500 Internal Server Error", ""))).await;

        let response = ReqwestClient::default()
            .execute(&HttpRequest::post(url))
            .await
            .unwrap();

        assert!(response.error);
        assert_eq!(response.status, Some(500));
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn timeout_is_reported_in_response() {
        let url = serve_once(None).await;

        let response = ReqwestClient::new(Duration::from_millis(100))
            .execute(&HttpRequest::post(url))
            .await
            .unwrap();

        assert!(response.error);
        assert_eq!(response.status, None);
        assert!(response.message.is_some());
    }

    #[tokio::test]
    async fn unreachable_host_is_reported_in_response() {
        let response = ReqwestClient::new(Duration::from_millis(500))
            .execute(&HttpRequest::post("http://127.0.0.1:1/posts"))
            .await
            .unwrap();

        assert!(response.error);
        assert_eq!(response.status, None);
        assert!(response.message.is_some());
    }

    #[tokio::test]
    #[ignore = "depends on remote service"]
    async fn reqwest_client_posts() {
        let response = ReqwestClient::default()
            .execute(&HttpRequest::post(
                "https://jsonplaceholder.typicode.com/posts",
            ))
            .await
            .unwrap();

        assert!(!response.error);
        assert_eq!(response.status, Some(201));
    }
}
