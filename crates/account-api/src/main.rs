//! 계정 서비스 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 로그인, 사용자 CRUD, 헬스 체크 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use account_api::auth::JwtConfig;
use account_api::config::ApiConfig;
use account_api::openapi::swagger_ui_router;
use account_api::routes::create_api_router;
use account_api::state::AppState;
use account_core::logging::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (없어도 무방)
    let _ = dotenvy::dotenv();

    init_logging(LogConfig::from_env()).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // 설정은 시작 시 한 번 해석되어 주입된다 (시크릿 하드코딩 금지)
    let config = ApiConfig::from_env()?;
    let addr = config.socket_addr()?;

    // 데이터베이스 연결 및 마이그레이션
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;
    info!("Database connection established");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let state = Arc::new(AppState::new(config.jwt.clone()).with_db(pool));
    info!(version = %state.version, "Application state initialized");

    // 라우터 구성: API + Swagger UI + 공통 레이어
    let app = Router::new()
        .merge(create_api_router())
        .merge(swagger_ui_router())
        .layer(Extension(JwtConfig {
            secret: config.jwt.secret.clone(),
        }))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
