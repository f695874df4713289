//! The network seam under [`GalleryClient`](crate::client::GalleryClient).
//!
//! A [`Transport`] performs one `GET` and hands back the status and body.
//! Status interpretation, JSON decoding and normalization all live above
//! it, so a transport has nothing to get wrong beyond moving bytes.
//!
//! The production implementation is [`HttpTransport`](crate::http::HttpTransport)
//! on top of `reqwest`. Tests use the recording [`tests::MockTransport`].

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Host unreachable: {0}")]
    Unreachable(String),
}

/// Status and body of a completed request, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a `GET` for `url`. Only transport-level failures are errors;
    /// a 4xx/5xx response is still `Ok`.
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned-response transport that records every requested URL.
    ///
    /// Routes are keyed by path plus query string (`/collections?page=1`),
    /// falling back to the bare path. Unrouted requests get a 404.
    /// Uses Mutex (not RefCell) so it is Sync and can sit behind the client.
    #[derive(Default)]
    pub struct MockTransport {
        routes: Mutex<HashMap<String, Result<TransportResponse, String>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `body` with status 200 for `route`.
        pub fn ok(self, route: &str, body: serde_json::Value) -> Self {
            self.respond(route, 200, &body.to_string())
        }

        pub fn respond(self, route: &str, status: u16, body: &str) -> Self {
            self.routes.lock().unwrap().insert(
                route.to_string(),
                Ok(TransportResponse {
                    status,
                    body: body.to_string(),
                }),
            );
            self
        }

        /// Fail `route` at the transport level.
        pub fn unreachable(self, route: &str) -> Self {
            self.routes
                .lock()
                .unwrap()
                .insert(route.to_string(), Err(format!("connection refused: {route}")));
            self
        }

        /// Requested routes, in order, as `path?query`.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    fn route_of(url: &Url) -> String {
        match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
            let full = route_of(url);
            self.requests.lock().unwrap().push(full.clone());

            let routes = self.routes.lock().unwrap();
            let hit = routes.get(&full).or_else(|| routes.get(url.path()));
            match hit {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(reason)) => Err(TransportError::Unreachable(reason.clone())),
                None => Ok(TransportResponse {
                    status: 404,
                    body: r#"{"message":"Not Found"}"#.to_string(),
                }),
            }
        }
    }

    #[test]
    fn success_range() {
        let ok = |status| TransportResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(204).is_success());
        assert!(!ok(301).is_success());
        assert!(!ok(404).is_success());
        assert!(!ok(500).is_success());
    }

    #[tokio::test]
    async fn mock_records_and_routes() {
        let mock = MockTransport::new()
            .ok("/api/collections", serde_json::json!({"data": []}))
            .unreachable("/api/images");

        let hit = Url::parse("https://x.test/api/collections?page=2").unwrap();
        let down = Url::parse("https://x.test/api/images").unwrap();
        let missing = Url::parse("https://x.test/api/nope").unwrap();

        assert_eq!(mock.get(&hit).await.unwrap().status, 200);
        assert!(matches!(
            mock.get(&down).await,
            Err(TransportError::Unreachable(_))
        ));
        assert_eq!(mock.get(&missing).await.unwrap().status, 404);
        assert_eq!(
            mock.requests(),
            vec!["/api/collections?page=2", "/api/images", "/api/nope"]
        );
    }
}
