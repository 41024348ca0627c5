//! 비즈니스 로직 서비스.
//!
//! 라우트 핸들러와 저장소 사이의 오케스트레이션 계층입니다.
//! 모든 권한 판단은 능력 엔진([`account_core::Ability`]) 하나에
//! 위임하며, 역할별 분기를 서비스에 중복해서 두지 않습니다.

pub mod auth;
pub mod users;

pub use auth::AuthService;
pub use users::{CreateUserInput, CreatedUser, UpdateUserInput, UserService};

use axum::http::StatusCode;
use axum::Json;

use crate::auth::{JwtError, PasswordError};
use crate::error::{reject, ApiErrorResponse};
use crate::repository::UserRepoError;

/// 서비스 계층 에러.
///
/// 스펙의 에러 분류(401/403/404/400)를 그대로 따릅니다.
/// 내부 에러는 클라이언트에 원문을 노출하지 않고 로그로만 남깁니다.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("비밀번호는 필수 항목입니다")]
    MissingPassword,

    #[error("이미 사용 중인 이메일입니다")]
    DuplicateEmail,

    #[error("잘못된 이메일 또는 비밀번호입니다")]
    InvalidCredentials,

    #[error("사용자를 찾을 수 없습니다: {0}")]
    NotFound(uuid::Uuid),

    #[error("이 작업을 수행할 권한이 없습니다")]
    Forbidden,

    #[error("비밀번호 처리 실패: {0}")]
    Password(#[from] PasswordError),

    #[error("토큰 생성 실패: {0}")]
    Token(#[from] JwtError),

    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UserRepoError> for ServiceError {
    fn from(e: UserRepoError) -> Self {
        match e {
            UserRepoError::DuplicateEmail => Self::DuplicateEmail,
            UserRepoError::Database(e) => Self::Database(e),
        }
    }
}

impl ServiceError {
    /// HTTP 응답 페어로 변환.
    ///
    /// 내부 에러(해싱/토큰/DB)는 일반화된 메시지로 대체합니다.
    pub fn into_api(self) -> (StatusCode, Json<ApiErrorResponse>) {
        match self {
            Self::MissingPassword => reject(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            Self::DuplicateEmail => {
                reject(StatusCode::BAD_REQUEST, "EMAIL_IN_USE", self.to_string())
            }
            Self::InvalidCredentials => reject(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            Self::NotFound(_) => reject(StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            Self::Forbidden => reject(StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            Self::Password(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "내부 서버 에러",
                )
            }
            Self::Token(e) => {
                tracing::error!(error = %e, "Token creation failed");
                reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "내부 서버 에러",
                )
            }
            Self::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
                reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DB_ERROR",
                    "데이터베이스 에러가 발생했습니다",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ServiceError::MissingPassword, StatusCode::BAD_REQUEST),
            (ServiceError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                ServiceError::NotFound(uuid::Uuid::new_v4()),
                StatusCode::NOT_FOUND,
            ),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            let (status, _) = error.into_api();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let error = ServiceError::Database(sqlx::Error::PoolClosed);
        let (status, body) = error.into_api();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.0.message.contains("Pool"));
    }

    #[test]
    fn test_repo_error_conversion() {
        let converted: ServiceError = UserRepoError::DuplicateEmail.into();
        assert!(matches!(converted, ServiceError::DuplicateEmail));
    }
}
