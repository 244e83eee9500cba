//! Relays requests accepted by the gateway filter to downstream services.

use std::time::Duration;

use anyhow::anyhow;
use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use http_body_util::LengthLimitError;
use tracing::{debug, instrument, warn};

use ridegate_config::{UpstreamConfig, UpstreamRoute};
use ridegate_core::AppError;

use crate::metrics::track_upstream_error;

/// Headers that describe a single connection and are never relayed.
const HOP_BY_HOP_HEADERS: [header::HeaderName; 8] = [
    header::CONNECTION,
    header::HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
    headers.remove(header::HOST);
}

#[derive(Debug)]
pub struct ProxyService {
    client: reqwest::Client,
    routes: Vec<UpstreamRoute>,
    max_body_bytes: usize,
}

impl ProxyService {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(
        routes: Vec<UpstreamRoute>,
        timeout: Duration,
        max_body_bytes: usize,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            routes,
            max_body_bytes,
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.routes.clone(), config.timeout(), config.max_body_bytes)
    }

    /// First route whose prefix the path starts with.
    pub fn route_for(&self, path: &str) -> Option<&UpstreamRoute> {
        self.routes.iter().find(|route| path.starts_with(&route.prefix))
    }

    /// Forwards the request and relays the upstream response.
    ///
    /// # Errors
    ///
    /// - 404 when no route matches
    /// - 413 when the body exceeds the configured limit
    /// - 502 when the upstream cannot be reached or times out
    #[instrument(skip_all, fields(method = %req.method(), path = %req.uri().path()))]
    pub async fn forward(&self, req: Request) -> Result<Response, AppError> {
        let path = req.uri().path().to_owned();
        let Some(route) = self.route_for(&path) else {
            debug!("No upstream route");
            return Err(AppError::not_found(anyhow!("No route for path")));
        };

        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or(path);
        let url = format!("{}{}", route.target.trim_end_matches('/'), path_and_query);

        let (parts, body) = req.into_parts();
        let body = to_bytes(body, self.max_body_bytes).await.map_err(|e| {
            if e.into_inner().downcast_ref::<LengthLimitError>().is_some() {
                AppError::new(StatusCode::PAYLOAD_TOO_LARGE, anyhow!("Payload too large"))
            } else {
                AppError::bad_request(anyhow!("Failed to read request body"))
            }
        })?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);

        debug!(upstream = %url, "Forwarding request");

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timeout" } else { "connect" };
                warn!(upstream = %url, kind, error = %e, "Upstream request failed");
                track_upstream_error(kind);
                AppError::bad_gateway(e)
            })?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        let bytes = upstream.bytes().await.map_err(|e| {
            warn!(upstream = %url, error = %e, "Failed to read upstream response");
            track_upstream_error("body");
            AppError::bad_gateway(e)
        })?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;

        Ok(response)
    }
}
