//! HTTP sources for real backends.
//!
//! Thin `reqwest` wrappers. Graph routes: `GET {base}/mindmap` and
//! `POST {base}/mindmap/nodes`. Flight routes: `GET {base}/flights` and
//! `GET {base}/flights/search?q=`. The flight backend rejects anonymous
//! calls, so a configured token is sent as a bearer credential.
//! Body decoding lives in `decode_body` so it can be tested without a
//! network.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{FlightSource, GraphSource, SourceError};
use crate::services::flights::Flight;
use crate::services::mindmap::{Graph, NodeCreated};

const CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// CLIENT
// =============================================================================

struct JsonClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Option<String>,
}

impl JsonClient {
    fn new(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, bearer: None })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, SourceError> {
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        decode_body(status, &text)
    }
}

/// Turn an upstream status and body into a typed payload.
fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, SourceError> {
    if !(200..300).contains(&status) {
        return Err(SourceError::Status { status, body: body.to_owned() });
    }
    serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))
}

// =============================================================================
// GRAPH
// =============================================================================

pub struct HttpGraphSource {
    client: JsonClient,
}

impl HttpGraphSource {
    /// # Errors
    ///
    /// Returns [`SourceError::HttpClientBuild`] if the client cannot be built.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self { client: JsonClient::new(base_url, timeout)? })
    }
}

#[derive(Serialize)]
struct AddNodeRequest<'a> {
    parent_id: &'a str,
    question: &'a str,
    answer: &'a str,
}

#[async_trait::async_trait]
impl GraphSource for HttpGraphSource {
    async fn fetch_graph(&self) -> Result<Graph, SourceError> {
        let request = self.client.get("/mindmap");
        self.client.send(request).await
    }

    async fn add_node(&self, parent_id: &str, question: &str, answer: &str) -> Result<NodeCreated, SourceError> {
        let body = AddNodeRequest { parent_id, question, answer };
        let request = self.client.post("/mindmap/nodes").json(&body);
        self.client.send(request).await
    }
}

// =============================================================================
// FLIGHTS
// =============================================================================

pub struct HttpFlightSource {
    client: JsonClient,
}

impl HttpFlightSource {
    /// # Errors
    ///
    /// Returns [`SourceError::HttpClientBuild`] if the client cannot be built.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self { client: JsonClient::new(base_url, timeout)? })
    }

    /// Send `token` as a bearer credential on every call.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.client.bearer = token;
        self
    }
}

#[async_trait::async_trait]
impl FlightSource for HttpFlightSource {
    async fn all_flights(&self) -> Result<Vec<Flight>, SourceError> {
        let request = self.client.get("/flights");
        self.client.send(request).await
    }

    async fn search(&self, needle: &str) -> Result<Vec<Flight>, SourceError> {
        let request = self.client.get("/flights/search").query(&[("q", needle)]);
        self.client.send(request).await
    }
}
