//! Production [`HttpClient`] on top of reqwest.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// reqwest-backed transport.
///
/// No request timeout is configured: generation streams can legitimately stay
/// open for minutes.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap a preconfigured client (proxies, TLS roots, tests).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        mut builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn json_post(&self, url: &str, body: &str, headers: &Headers) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        Self::apply_headers(builder, headers)
    }

    /// Send and buffer the whole body.
    async fn send_buffered(builder: reqwest::RequestBuilder) -> Result<Response, HttpError> {
        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = Self::apply_headers(self.client.get(url), headers);
        Self::send_buffered(builder).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        Self::send_buffered(self.json_post(url, body, headers)).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = Self::apply_headers(self.client.delete(url), headers);
        Self::send_buffered(builder).await
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let response = self
            .json_post(url, body, headers)
            .send()
            .await
            .map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client.get("not-a-valid-url", &Headers::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_stream_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .post_stream("http://127.0.0.1:59999/test", "{}", &Headers::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_sends_json_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/create"))
            .and(header("Authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"a": 1})))
            .respond_with(ResponseTemplate::new(201).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer tok".to_string());
        let resp = client
            .post(
                &format!("{}/api/chat/create", server.uri()),
                r#"{"a":1}"#,
                &headers,
            )
            .await
            .unwrap();

        assert_eq!(resp.status, 201);
        assert_eq!(resp.text_lossy(), "ok");
    }

    #[tokio::test]
    async fn test_delete_returns_error_status_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/chat/delete/c1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let resp = client
            .delete(&format!("{}/api/chat/delete/c1", server.uri()), &Headers::new())
            .await
            .unwrap();
        assert_eq!(resp.status, 404);
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn test_post_stream_yields_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/message/text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Hello world."))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let mut stream = client
            .post_stream(
                &format!("{}/api/message/text", server.uri()),
                "{}",
                &Headers::new(),
            )
            .await
            .unwrap();

        let mut body = Vec::new();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"Hello world.");
    }

    #[tokio::test]
    async fn test_post_stream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/message/text"))
            .respond_with(
                ResponseTemplate::new(402).set_body_string(r#"{"message":"Not enough credits"}"#),
            )
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let result = client
            .post_stream(
                &format!("{}/api/message/text", server.uri()),
                "{}",
                &Headers::new(),
            )
            .await;

        match result {
            Err(HttpError::ServerError { status, message }) => {
                assert_eq!(status, 402);
                assert!(message.contains("Not enough credits"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected error"),
        }
    }
}
