//! Static preview server for the built site in `dist/`.

use crate::logging::{log_event, set_threshold, LogLevel, DEFAULT_LOG_LEVEL};
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use serde_json::json;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::{net::TcpListener, time::Instant};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const PORT_BOUNDS: (u16, u16) = (1, u16::MAX);
const ASSET_PREFIX: &str = "/assets/";
const ASSET_CACHE_CONTROL: &str = "public, max-age=604800, immutable";
const DOCUMENT_CACHE_CONTROL: &str = "no-cache";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub dist_dir: PathBuf,
    pub log_level: LogLevel,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: parse_env_with_bounds("PORT", DEFAULT_PORT, PORT_BOUNDS),
            dist_dir: parse_env_non_empty_string("DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
            log_level: parse_env_non_empty_string("LOG_LEVEL")
                .and_then(|value| LogLevel::parse(&value))
                .unwrap_or(DEFAULT_LOG_LEVEL),
        }
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_env_with_bounds<T>(name: &str, default: T, bounds: (T, T)) -> T
where
    T: FromStr + PartialOrd + Copy,
{
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| *value >= bounds.0 && *value <= bounds.1)
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn cache_policy(path: &str) -> &'static str {
    if path.starts_with(ASSET_PREFIX) {
        ASSET_CACHE_CONTROL
    } else {
        DOCUMENT_CACHE_CONTROL
    }
}

async fn annotate_response(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_policy(&path)),
    );

    log_event(
        LogLevel::Info,
        "request_served",
        json!({
            "method": method,
            "path": path,
            "status": response.status().as_u16(),
            "elapsed_ms": started.elapsed().as_millis() as u64,
        }),
    );

    response
}

/// Serves `dist_dir` and falls back to its `index.html` for unknown paths.
pub fn router(dist_dir: &Path) -> Router {
    let static_service =
        ServeDir::new(dist_dir).not_found_service(ServeFile::new(dist_dir.join("index.html")));

    Router::new()
        .fallback_service(static_service)
        .layer(middleware::from_fn(annotate_response))
}

pub async fn serve(listener: TcpListener, config: &ServerConfig) -> Result<(), ServerError> {
    let app = router(&config.dist_dir);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    log_event(LogLevel::Info, "shutdown_requested", json!({}));
}

pub async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_env();
    set_threshold(config.log_level);

    let address = config.bind_address();
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    log_event(
        LogLevel::Info,
        "server_listening",
        json!({
            "url": format!("http://127.0.0.1:{}", config.port),
            "dist_dir": config.dist_dir.display().to_string(),
        }),
    );

    serve(listener, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_dist(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "portfolio-fx-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("assets")).expect("create fixture dirs");
        fs::write(dir.join("index.html"), "<div id=\"app\"></div>").expect("write index");
        fs::write(dir.join("assets/corporate_bg.png"), [0x89, b'P', b'N', b'G']).expect("write asset");
        dir
    }

    async fn spawn_server(dist_dir: PathBuf) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
        let address = listener.local_addr().expect("local address");
        let app = router(&dist_dir);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        address
    }

    #[test]
    fn assets_get_long_lived_cache_policy() {
        assert_eq!(cache_policy("/assets/athletic_bg.png"), ASSET_CACHE_CONTROL);
        assert_eq!(cache_policy("/"), DOCUMENT_CACHE_CONTROL);
        assert_eq!(cache_policy("/index.html"), DOCUMENT_CACHE_CONTROL);
    }

    #[test]
    fn env_parsing_rejects_out_of_bounds_values() {
        std::env::set_var("PORTFOLIO_FX_TEST_PORT", "0");
        assert_eq!(
            parse_env_with_bounds("PORTFOLIO_FX_TEST_PORT", DEFAULT_PORT, PORT_BOUNDS),
            DEFAULT_PORT
        );

        std::env::set_var("PORTFOLIO_FX_TEST_PORT", " 3000 ");
        assert_eq!(
            parse_env_with_bounds("PORTFOLIO_FX_TEST_PORT", DEFAULT_PORT, PORT_BOUNDS),
            3000
        );

        std::env::set_var("PORTFOLIO_FX_TEST_PORT", "not-a-port");
        assert_eq!(
            parse_env_with_bounds("PORTFOLIO_FX_TEST_PORT", DEFAULT_PORT, PORT_BOUNDS),
            DEFAULT_PORT
        );
        std::env::remove_var("PORTFOLIO_FX_TEST_PORT");
    }

    #[test]
    fn blank_strings_are_treated_as_unset() {
        std::env::set_var("PORTFOLIO_FX_TEST_DIST", "   ");
        assert_eq!(parse_env_non_empty_string("PORTFOLIO_FX_TEST_DIST"), None);
        std::env::remove_var("PORTFOLIO_FX_TEST_DIST");
    }

    #[tokio::test]
    async fn serves_index_and_falls_back_for_unknown_paths() {
        let address = spawn_server(fixture_dist("index")).await;

        let index = reqwest::get(format!("http://{address}/"))
            .await
            .expect("index request");
        assert!(index.status().is_success());
        assert_eq!(
            index
                .headers()
                .get(header::CACHE_CONTROL.as_str())
                .and_then(|value| value.to_str().ok()),
            Some(DOCUMENT_CACHE_CONTROL)
        );
        assert!(index.text().await.expect("body").contains("id=\"app\""));

        let fallback = reqwest::get(format!("http://{address}/projects/unknown"))
            .await
            .expect("fallback request");
        assert!(fallback.text().await.expect("body").contains("id=\"app\""));
    }

    #[tokio::test]
    async fn assets_are_served_with_immutable_caching() {
        let address = spawn_server(fixture_dist("assets")).await;

        let asset = reqwest::get(format!("http://{address}/assets/corporate_bg.png"))
            .await
            .expect("asset request");
        assert!(asset.status().is_success());
        assert_eq!(
            asset
                .headers()
                .get(header::CACHE_CONTROL.as_str())
                .and_then(|value| value.to_str().ok()),
            Some(ASSET_CACHE_CONTROL)
        );
    }
}
