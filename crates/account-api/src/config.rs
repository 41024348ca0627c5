//! 서버 설정.
//!
//! 모든 설정은 프로세스 시작 시 환경 변수에서 한 번 해석되어
//! 토큰 발급기와 데이터베이스 풀에 주입됩니다. 시크릿을 코드에
//! 내장하지 않습니다.

use std::net::SocketAddr;

/// JWT 발급 설정.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// 서명 비밀 키 (HS256)
    pub secret: String,
    /// Access Token 만료 시간 (분)
    pub expires_minutes: i64,
}

/// API 서버 설정.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// 바인딩할 호스트 주소
    pub host: String,
    /// 바인딩할 포트
    pub port: u16,
    /// PostgreSQL 연결 URL
    pub database_url: String,
    /// DB 풀 최대 연결 수
    pub max_connections: u32,
    /// JWT 설정
    pub jwt: JwtSettings,
}

impl ApiConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    ///
    /// - `API_HOST`: 바인딩 호스트 (기본값: "127.0.0.1")
    /// - `API_PORT`: 바인딩 포트 (기본값: 3000)
    /// - `DATABASE_URL`: PostgreSQL 연결 URL (필수)
    /// - `DATABASE_MAX_CONNECTIONS`: 풀 최대 연결 수 (기본값: 10)
    /// - `JWT_SECRET`: 토큰 서명 키 (필수)
    /// - `JWT_EXPIRES_MINUTES`: 토큰 만료 시간 (기본값: 60)
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL 환경 변수가 설정되지 않았습니다"))?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET 환경 변수가 설정되지 않았습니다"))?;
        let expires_minutes = std::env::var("JWT_EXPIRES_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            jwt: JwtSettings {
                secret,
                expires_minutes,
            },
        })
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
