//! 인증 서비스.
//!
//! 자격증명 검증과 토큰 발급을 오케스트레이션합니다.

use account_core::User;
use sqlx::PgPool;
use tracing::{info, warn};

use super::ServiceError;
use crate::auth::{create_token, verify_password, Claims};
use crate::config::JwtSettings;
use crate::repository::UserRepository;

/// 인증 서비스.
pub struct AuthService;

impl AuthService {
    /// 로그인.
    ///
    /// 이메일로 사용자를 조회하고 비밀번호를 검증한 뒤 Access
    /// Token을 발급합니다. 존재하지 않는 이메일과 잘못된
    /// 비밀번호는 동일한 에러로 응답합니다.
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtSettings,
        email: &str,
        password: &str,
    ) -> Result<(String, User), ServiceError> {
        let user = UserRepository::find_by_email(pool, email)
            .await?
            .ok_or_else(|| {
                warn!(email, "Login attempt with unknown email");
                ServiceError::InvalidCredentials
            })?;

        verify_password(password, &user.password_hash).map_err(|_| {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            ServiceError::InvalidCredentials
        })?;

        let claims = Claims::new(user.id, user.email.clone(), user.role, jwt.expires_minutes);
        let token = create_token(&claims, &jwt.secret)?;

        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok((token, user))
    }
}
