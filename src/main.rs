#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
mod executor;
mod structures;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::{header::HeaderMap, redirect::Policy, Client};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    executor::{Pinger, Protocol, Unresolvable},
    structures::ServerStatus,
};

#[macro_use]
extern crate tracing;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

type AppState = Arc<Pinger>;

#[tokio::main]
async fn main() {
    start_tracing();
    let port: u16 = std::env::var("PORT").map_or(DEFAULT_PORT, |v| {
        v.parse().expect("PORT must be a valid port number")
    });
    let http_timeout: u64 = std::env::var("HTTP_TIMEOUT_SECS")
        .map_or(DEFAULT_HTTP_TIMEOUT_SECS, |v| {
            v.parse().expect("HTTP_TIMEOUT_SECS must be a whole number of seconds")
        });
    let mut default_headers = HeaderMap::new();
    default_headers.insert("Accept", HeaderValue::from_static("application/json"));
    let http_client = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(http_timeout))
        .default_headers(default_headers)
        .user_agent(concat!("gameping/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(10))
        .build()
        .expect("failed to build HTTP client");
    let pinger: AppState = Arc::new(Pinger::new(gsping::tokio::new_resolver(), http_client));

    let app = router(pinger);
    let socket_address = SocketAddr::from(([0, 0, 0, 0], port));
    let tcp = TcpListener::bind(socket_address)
        .await
        .expect("failed to bind listener");
    info!(%socket_address, "Listening");
    axum::serve(tcp, app)
        .with_graceful_shutdown(vss::shutdown_signal())
        .await
        .expect("server failed");
}

fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/api/server/samp", get(handle_samp_query))
        .route("/api/server/rage", get(handle_rage_query))
        .route("/health", get(|| async { "ok" }))
        .layer(SetResponseHeaderLayer::overriding(
            ROBOTS_NAME.clone(),
            ROBOTS_VALUE.clone(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            NO_STORE.clone(),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

static ROBOTS_NAME: HeaderName = HeaderName::from_static("x-robots-tag");
static ROBOTS_VALUE: HeaderValue = HeaderValue::from_static("noindex");
static NO_STORE: HeaderValue = HeaderValue::from_static("no-store");

#[derive(Deserialize, Debug)]
pub struct ServerQuery {
    ip: Option<String>,
    port: Option<u16>,
}

async fn handle_samp_query(
    State(pinger): State<AppState>,
    Query(query): Query<ServerQuery>,
) -> Result<Json<ServerStatus>, Failure> {
    run_query(&pinger, query, Protocol::Samp).await
}

async fn handle_rage_query(
    State(pinger): State<AppState>,
    Query(query): Query<ServerQuery>,
) -> Result<Json<ServerStatus>, Failure> {
    run_query(&pinger, query, Protocol::Rage).await
}

async fn run_query(
    pinger: &Pinger,
    query: ServerQuery,
    protocol: Protocol,
) -> Result<Json<ServerStatus>, Failure> {
    let host = query
        .ip
        .as_deref()
        .filter(|ip| !ip.trim().is_empty())
        .ok_or(Failure::MissingAddress)?;
    let status = pinger.try_query(host, query.port, protocol).await?;
    Ok(Json(status))
}

#[derive(thiserror::Error, Debug)]
pub enum Failure {
    #[error("an ip address or hostname is required")]
    MissingAddress,
    #[error("could not resolve host")]
    UnresolvableHost(#[from] Unresolvable),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingAddress | Self::UnresolvableHost(_) => StatusCode::BAD_REQUEST,
        };
        error!(error = ?self, "Error processing request");
        let ser = ErrorSerialization {
            error: self.to_string(),
        };
        (status, Json(ser)).into_response()
    }
}

#[derive(serde::Serialize)]
pub struct ErrorSerialization {
    error: String,
}

pub struct Json<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        static JSON_CTYPE: HeaderValue = HeaderValue::from_static("application/json;charset=utf-8");

        let body = serde_json::to_vec_pretty(&self.0).unwrap_or_else(|_| {
            r#"{"error": "JSON Serialization failed, please make a bug report"}"#
                .as_bytes()
                .to_vec()
        });
        ([(CONTENT_TYPE, JSON_CTYPE.clone())], body).into_response()
    }
}

fn start_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(concat!(env!("CARGO_PKG_NAME"), "=info").parse().unwrap())
        .with_env_var("LOG")
        .from_env()
        .expect("failed to parse env");
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}
