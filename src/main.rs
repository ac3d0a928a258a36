use anyhow::{Context, Result};
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::tower::{StreamableHttpServerConfig, StreamableHttpService},
    },
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Axum HTTP server for remote MCP
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{Request, Uri};
use axum::middleware::Next;
use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
};

use egymi_compass::config::Config;
use egymi_compass::service::CompassServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Arc::new(Config::load());
    let service = CompassServer::new(Arc::clone(&config));

    // Choose transport: stdio (default) or http
    let transport = std::env::var("EGYMI_TRANSPORT").unwrap_or_else(|_| "stdio".to_string());
    match transport.as_str() {
        "http" | "streamable_http" => serve_http(service, &config).await,
        _ => {
            tracing::info!("main: Service created, starting server on stdio transport");
            let server = service.serve(stdio()).await?;
            tracing::info!("main: Server started, waiting for connection to close");
            server.waiting().await?;
            tracing::info!("main: Server connection closed");
            Ok(())
        }
    }
}

async fn serve_http(service: CompassServer, config: &Config) -> Result<()> {
    let bind: SocketAddr = config
        .http
        .bind
        .parse()
        .with_context(|| format!("invalid EGYMI_HTTP_BIND '{}' (expected host:port)", config.http.bind))?;
    let path = config.http.path.clone();
    let bearer_token = config.http.bearer_token.clone();

    let session_manager: rmcp::transport::streamable_http_server::session::local::LocalSessionManager = Default::default();
    let http_service: StreamableHttpService<CompassServer, _> = StreamableHttpService::new(
        move || Ok(service.clone()),
        Arc::new(session_manager),
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
        },
    );

    let mut router = Router::new().nest_service(path.as_str(), http_service);
    if let Some(expected) = bearer_token.clone() {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(expected),
            require_bearer,
        ));
    }
    let router = router.route("/health", axum::routing::get(|| async { "ok" }));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        path = %path,
        auth = %bearer_token.as_deref().map(|_| "bearer").unwrap_or("none"),
        "Starting Streamable HTTP MCP server"
    );

    axum::serve(listener, router).await?;
    Ok(())
}

async fn require_bearer(
    State(expected): State<Arc<String>>,
    req: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    if req.uri().path() == "/health" || is_authorized(req.headers(), req.uri(), &expected) {
        return next.run(req).await;
    }
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

/// Bearer header, or a percent-encoded `access_token`/`token` query parameter
/// for clients that cannot set headers.
fn is_authorized(headers: &HeaderMap, uri: &Uri, expected: &str) -> bool {
    let header_ok = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);
    if header_ok {
        return true;
    }

    Query::<HashMap<String, String>>::try_from_uri(uri).is_ok_and(|Query(params)| {
        ["access_token", "token"]
            .iter()
            .any(|key| params.get(*key).is_some_and(|v| v == expected))
    })
}
