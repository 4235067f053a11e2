//! HTTP 服务 - 路由组装、中间件和服务器启动

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Method};
use tower::ServiceExt;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use uuid::Uuid;

use crate::core::{Config, ServerState};
use crate::utils::AppError;

pub type OneshotResult = Result<http::Response<axum::body::Body>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        request_id = %request_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "{} {} {}",
        method,
        uri,
        response.status()
    );

    response
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build the Axum router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::tickets::router())
        .merge(crate::api::ws::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    let cors = cors_layer(&state.config);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}

/// HTTP server
#[derive(Clone, Debug)]
pub struct HttpService {
    config: Config,
    router: Router,
}

impl HttpService {
    pub fn new(state: ServerState) -> Self {
        Self {
            config: state.config.clone(),
            router: build_app(state),
        }
    }

    /// Run one request through the full middleware stack without a socket
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        self.router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| AppError::internal(format!("Oneshot call failed: {e}")))
    }

    /// Serve until `shutdown_signal` resolves, then drain for `SHUTDOWN_TIMEOUT_MS`
    pub async fn start_server<F>(&self, shutdown_signal: F) -> Result<(), AppError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🚀 Starting HTTP server on {}", addr);

        let handle = axum_server::Handle::new();
        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);

        let handle_clone = handle.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            handle_clone.graceful_shutdown(Some(grace));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(self.router.clone().into_make_service())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
