//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 요청 간 공유 가변 상태는 데이터베이스 풀뿐입니다.

use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;

use crate::config::JwtSettings;
use crate::error::{reject, ApiErrorResponse};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 (PostgreSQL)
    pub db_pool: Option<PgPool>,

    /// JWT 발급 설정 (시작 시 주입, 하드코딩 금지)
    pub jwt: JwtSettings,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(jwt: JwtSettings) -> Self {
        Self {
            db_pool: None,
            jwt,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 풀 연결.
    #[must_use]
    pub fn with_db(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 데이터베이스 풀 참조.
    ///
    /// 풀이 설정되지 않았으면 503 응답 페어를 반환합니다.
    pub fn db(&self) -> Result<&PgPool, (StatusCode, Json<ApiErrorResponse>)> {
        self.db_pool.as_ref().ok_or_else(|| {
            reject(
                StatusCode::SERVICE_UNAVAILABLE,
                "DB_NOT_CONFIGURED",
                "데이터베이스가 설정되지 않았습니다",
            )
        })
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// 데이터베이스 풀 없이 상태를 구성합니다. DB가 필요한 경로는
/// 503을 반환합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::new(JwtSettings {
        secret: "test-secret-key-for-jwt-testing-minimum-32-chars".to_string(),
        expires_minutes: 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_without_db() {
        let state = create_test_state();
        assert!(state.db_pool.is_none());
        assert!(state.db().is_err());

        let (status, body) = state.db().unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.0.code, "DB_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_db_health_without_pool() {
        let state = create_test_state();
        assert!(!state.is_db_healthy().await);
    }
}
