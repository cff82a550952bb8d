//! Recording HTTP double.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Body parsed as JSON, `Null` when absent or malformed.
    pub fn json_body(&self) -> serde_json::Value {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(serde_json::Value::Null)
    }
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered response. On `post_stream` a 2xx becomes a one-chunk stream
    /// and anything else becomes [`HttpError::ServerError`].
    Success(Response),
    /// Transport failure before any response.
    Error(HttpError),
    /// Chunked 200 body.
    Stream(Vec<Bytes>),
    /// Chunked 200 body, sleeping before each chunk.
    SlowStream { chunks: Vec<Bytes>, delay: Duration },
    /// Chunks followed by a mid-stream failure.
    BrokenStream { chunks: Vec<Bytes>, error: HttpError },
}

impl MockResponse {
    /// JSON body with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(value.to_string())))
    }

    /// Text chunks of a 200 stream.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Bytes>,
    {
        MockResponse::Stream(chunks.into_iter().map(Into::into).collect())
    }
}

/// Mock transport keyed by URL.
///
/// Lookups try an exact match first, then the longest configured prefix,
/// then the default response. Clones share configuration and the request log.
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://test/api/chat/getAllChats",
///     MockResponse::json(200, serde_json::json!({"chats": []})),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose URL ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn lookup(&self, url: &str) -> Result<MockResponse, HttpError> {
        let found = {
            let responses = self.responses.lock().unwrap();
            responses.get(url).cloned().or_else(|| {
                responses
                    .iter()
                    .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
                    .max_by_key(|(pattern, _)| pattern.len())
                    .map(|(_, response)| response.clone())
            })
        };

        found
            .or_else(|| self.default_response.lock().unwrap().clone())
            .ok_or_else(|| HttpError::Other(format!("No mock response for URL: {}", url)))
    }

    fn buffered(&self, url: &str) -> Result<Response, HttpError> {
        match self.lookup(url)? {
            MockResponse::Success(response) => Ok(response),
            MockResponse::Error(err) => Err(err),
            MockResponse::Stream(_)
            | MockResponse::SlowStream { .. }
            | MockResponse::BrokenStream { .. } => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.buffered(url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.buffered(url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("DELETE", url, headers, None);
        self.buffered(url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.lookup(url)? {
            MockResponse::Success(response) if response.is_success() => {
                Ok(Box::pin(futures::stream::iter(vec![Ok::<_, HttpError>(
                    response.body,
                )])))
            }
            MockResponse::Success(response) => Err(HttpError::ServerError {
                status: response.status,
                message: response.text_lossy(),
            }),
            MockResponse::Error(err) => Err(err),
            MockResponse::Stream(chunks) => Ok(Box::pin(futures::stream::iter(
                chunks.into_iter().map(Ok::<_, HttpError>),
            ))),
            MockResponse::SlowStream { chunks, delay } => {
                let stream = futures::stream::iter(chunks).then(move |chunk| async move {
                    tokio::time::sleep(delay).await;
                    Ok::<_, HttpError>(chunk)
                });
                Ok(Box::pin(stream))
            }
            MockResponse::BrokenStream { chunks, error } => {
                let items = chunks
                    .into_iter()
                    .map(Ok::<_, HttpError>)
                    .chain(std::iter::once(Err(error)));
                Ok(Box::pin(futures::stream::iter(items)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(mut stream: ByteStream) -> Vec<Result<Bytes, HttpError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_get_records_request() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/api/user/userdetails",
            MockResponse::json(200, serde_json::json!({"_id": "u1"})),
        );

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer t".to_string());
        let response = client
            .get("http://test/api/user/userdetails", &headers)
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer t".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_uses_prefix_match() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/api/chat/delete/",
            MockResponse::json(200, serde_json::json!({"success": true})),
        );

        let response = client
            .delete("http://test/api/chat/delete/c1", &Headers::new())
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(client.requests_to("/delete/c1")[0].method, "DELETE");
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("http://test/api", MockResponse::json(500, serde_json::json!({})));
        client.set_response(
            "http://test/api/chat",
            MockResponse::json(200, serde_json::json!({})),
        );

        let response = client
            .get("http://test/api/chat/getAllChats", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.get("http://test/missing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_post_stream_chunks() {
        let client = MockHttpClient::new();
        client.set_response("http://test/s", MockResponse::chunks(["a", "b"]));

        let stream = client
            .post_stream("http://test/s", "{}", &Headers::new())
            .await
            .unwrap();
        let items = drain(stream).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].as_ref().unwrap(), &Bytes::from("b"));
        assert_eq!(client.get_requests()[0].body.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_post_stream_error_status() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/s",
            MockResponse::json(402, serde_json::json!({"message": "no credits"})),
        );

        let result = client.post_stream("http://test/s", "{}", &Headers::new()).await;
        match result {
            Err(HttpError::ServerError { status, message }) => {
                assert_eq!(status, 402);
                assert!(message.contains("no credits"));
            }
            _ => panic!("expected ServerError"),
        }
    }

    #[tokio::test]
    async fn test_broken_stream_ends_with_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://test/s",
            MockResponse::BrokenStream {
                chunks: vec![Bytes::from("partial")],
                error: HttpError::Io("reset".to_string()),
            },
        );

        let stream = client
            .post_stream("http://test/s", "{}", &Headers::new())
            .await
            .unwrap();
        let items = drain(stream).await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_clones_share_log() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let cloned = client.clone();

        cloned.get("http://test/x", &Headers::new()).await.unwrap();
        assert_eq!(client.get_requests().len(), 1);

        client.clear_requests();
        assert!(cloned.get_requests().is_empty());
    }
}
