use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use serde::de::DeserializeOwned;

use crate::error::detail_response;
use crate::service::SpeechService;

/// Runtime context for synthesis requests
#[derive(Debug)]
pub struct RequestContext {
    pub parts: http::request::Parts,

    /// Peer address when the listener provides one
    pub client_addr: Option<SocketAddr>,
}

impl RequestContext {
    pub const fn headers(&self) -> &axum::http::HeaderMap {
        &self.parts.headers
    }

    /// Peer address for request logs, `unknown` when the transport has none
    pub fn client_label(&self) -> String {
        self.client_addr
            .map_or_else(|| "unknown".to_string(), |addr| addr.ip().to_string())
    }

    /// Raw Accept header, if the client sent one
    pub fn accept(&self) -> Option<&str> {
        self.headers().get(http::header::ACCEPT).and_then(|value| value.to_str().ok())
    }
}

/// Extractor for JSON request bodies
pub struct ExtractPayload<T>(pub RequestContext, pub T);

static APPLICATION_JSON: http::HeaderValue = http::HeaderValue::from_static("application/json");

impl<T: DeserializeOwned> axum::extract::FromRequest<Arc<SpeechService>> for ExtractPayload<T> {
    type Rejection = axum::response::Response;

    async fn from_request(
        request: http::Request<Body>,
        state: &Arc<SpeechService>,
    ) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = request.into_parts();

        if parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .is_none_or(|value| value != APPLICATION_JSON)
        {
            return Err(detail_response(
                axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Content-Type, expected: 'Content-Type: application/json'",
            ));
        }

        let limit = state.body_limit();
        let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                detail_response(
                    axum::http::StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body is too large, limit is {limit} bytes"),
                )
            } else {
                detail_response(
                    axum::http::StatusCode::BAD_REQUEST,
                    format!("Failed to read request body: {err}"),
                )
            }
        })?;

        let body = match serde_json::from_slice::<T>(&bytes) {
            Ok(body) => body,
            Err(e) => {
                return Err(detail_response(
                    axum::http::StatusCode::BAD_REQUEST,
                    format!("Failed to parse request body: {e}"),
                ));
            }
        };

        let ctx = RequestContext {
            client_addr: parts
                .extensions
                .get::<axum::extract::ConnectInfo<SocketAddr>>()
                .map(|info| info.0),
            parts,
        };

        Ok(Self(ctx, body))
    }
}
